//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
use bitflags::bitflags;

use crate::layout::LayoutCursor;
use crate::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Options passed to [`Context::begin_window`].
    pub struct WindowOption : u32 {
        /// Resizes the window to its content at the end of every frame.
        const AUTO_SIZE = 512;
        /// Ignores input: the window never becomes hovered.
        const NO_INPUTS = 256;
        /// Hides the title bar.
        const NO_TITLE = 128;
        /// Hides the collapse button.
        const NO_COLLAPSE = 64;
        /// Ignores the mouse wheel.
        const NO_SCROLL_WITH_MOUSE = 32;
        /// Prevents the user from resizing the window.
        const NO_RESIZE = 16;
        /// Skips background and border.
        const NO_BACKGROUND = 8;
        /// Hides the vertical scrollbar.
        const NO_SCROLLBAR = 4;
        /// Prevents dragging the window by its title bar.
        const NO_MOVE = 2;
        /// No special options.
        const NONE = 0;
    }
}

impl WindowOption {
    /// Returns `true` if the option requests automatic sizing.
    pub fn is_auto_sizing(&self) -> bool { self.intersects(Self::AUTO_SIZE) }
    /// Returns `true` if the title bar should be hidden.
    pub fn has_no_title(&self) -> bool { self.intersects(Self::NO_TITLE) }
    /// Returns `true` if the user cannot resize the window.
    pub fn is_fixed(&self) -> bool { self.intersects(Self::NO_RESIZE | Self::AUTO_SIZE) }
    /// Returns `true` if the window ignores input.
    pub fn has_no_inputs(&self) -> bool { self.intersects(Self::NO_INPUTS) }
}

#[derive(Copy, Clone, Debug)]
/// Snapshot of a window taken by [`Context::begin_window`].
pub struct WindowHandle {
    pub(crate) id: Id,
    pub(crate) rect: Recti,
    pub(crate) content_rect: Recti,
    pub(crate) collapsed: bool,
    pub(crate) first_use: bool,
}

impl WindowHandle {
    /// Id of the window, derived from its title.
    pub fn id(&self) -> Id { self.id }
    /// Outer rectangle, including the title bar.
    pub fn rect(&self) -> Recti { self.rect }
    /// Region where items are laid out.
    pub fn content_rect(&self) -> Recti { self.content_rect }
    /// Returns `true` if only the title bar is shown.
    pub fn is_collapsed(&self) -> bool { self.collapsed }
    /// Returns `true` if content submitted now can be seen.
    pub fn is_visible(&self) -> bool { !self.collapsed && !rect_is_empty(self.content_rect) }
    /// Returns `true` in the frame the window was created.
    pub fn is_first_use(&self) -> bool { self.first_use }
}

/// Depths of the context-wide stacks when the window was begun.
#[derive(Copy, Clone, Default)]
pub(crate) struct StackMarks {
    pub style_colors: usize,
    pub style_vars: usize,
    pub disabled: usize,
}

/// Vertical scrollbar geometry, derived from the content size of the previous frame.
#[derive(Copy, Clone)]
pub(crate) struct Scrollbar {
    pub track: Recti,
    pub thumb: Recti,
    pub max_scroll: i32,
}

impl Scrollbar {
    pub fn new(track: Recti, view_len: i32, content_len: i32, scroll: i32, min_thumb: i32) -> Self {
        let max_scroll = (content_len - view_len).max(0);
        let mut thumb = track;
        if track.height > 0 && content_len > 0 && view_len > 0 {
            thumb.height = (track.height.saturating_mul(view_len) / content_len).clamp(min_thumb.min(track.height), track.height);
            let travel = track.height - thumb.height;
            if max_scroll > 0 && travel > 0 {
                thumb.y += scroll.clamp(0, max_scroll) * travel / max_scroll;
            }
        }
        Self { track, thumb, max_scroll }
    }

    /// Converts a pointer movement along the track into a scroll movement.
    pub fn drag_delta(&self, delta_y: i32, content_len: i32) -> i32 {
        if self.track.height <= 0 {
            return 0;
        }
        delta_y.saturating_mul(content_len) / self.track.height
    }
}

/// Registry entry of a window: persisted geometry plus the per-frame lists and stacks.
pub(crate) struct Window {
    pub id: Id,
    pub title: String,
    pub pos: Vec2i,
    pub size: Dimensioni,
    pub scroll: Vec2i,
    pub collapsed: bool,
    pub options: WindowOption,
    pub content_size: Dimensioni,
    pub draw_list: DrawList,
    pub clip_stack: Vec<Recti>,
    pub clip_base: usize,
    pub ids: IdStack,
    pub layout: LayoutCursor,
    pub focusable: Vec<Id>,
    pub marks: StackMarks,
    pub last_frame_seen: u64,
    pub begun: bool,
}

impl Window {
    pub fn new(id: Id, title: &str, initial_rect: Recti) -> Self {
        Self {
            id,
            title: title.to_string(),
            pos: vec2(initial_rect.x, initial_rect.y),
            size: dim(initial_rect.width.max(0), initial_rect.height.max(0)),
            scroll: vec2(0, 0),
            collapsed: false,
            options: WindowOption::NONE,
            content_size: dim(0, 0),
            draw_list: DrawList::default(),
            clip_stack: Vec::new(),
            clip_base: 0,
            ids: IdStack::new(id),
            layout: LayoutCursor::default(),
            focusable: Vec::new(),
            marks: StackMarks::default(),
            last_frame_seen: 0,
            begun: false,
        }
    }

    pub fn rect(&self) -> Recti { rect(self.pos.x, self.pos.y, self.size.width, self.size.height) }

    fn title_height(&self, style: &Style) -> i32 {
        if self.options.has_no_title() {
            0
        } else {
            style.title_height.min(self.size.height).max(0)
        }
    }

    pub fn title_rect(&self, style: &Style) -> Recti { rect(self.pos.x, self.pos.y, self.size.width, self.title_height(style)) }

    /// Part of the window that is drawn and receives the pointer.
    pub fn visible_rect(&self, style: &Style) -> Recti {
        if self.collapsed && !self.options.has_no_title() {
            self.title_rect(style)
        } else {
            self.rect()
        }
    }

    /// Window rect below the title bar.
    pub fn body_rect(&self, style: &Style) -> Recti {
        let th = self.title_height(style);
        rect(self.pos.x, self.pos.y + th, self.size.width, (self.size.height - th).max(0))
    }

    pub fn has_scrollbar(&self, style: &Style) -> bool {
        if self.options.intersects(WindowOption::NO_SCROLLBAR) || self.options.is_auto_sizing() {
            return false;
        }
        let view = self.body_rect(style).height - style.window_padding.y * 2;
        self.content_size.height > view
    }

    pub fn content_rect(&self, style: &Style) -> Recti {
        if self.collapsed {
            let body = self.body_rect(style);
            return rect(body.x + style.window_padding.x, body.y, 0, 0);
        }
        let mut r = self.body_rect(style);
        if self.has_scrollbar(style) {
            r.width -= style.scrollbar_size;
        }
        let pad = style.window_padding;
        rect(r.x + pad.x, r.y + pad.y, (r.width - pad.x * 2).max(0), (r.height - pad.y * 2).max(0))
    }

    pub fn grip_rect(&self, style: &Style) -> Recti {
        let r = self.rect();
        let g = style.window_padding.x.max(style.window_padding.y).max(1);
        rect(r.x + r.width - g, r.y + r.height - g, g, g)
    }

    pub fn scrollbar(&self, style: &Style) -> Scrollbar {
        let body = self.body_rect(style);
        let mut track = rect(body.x + body.width - style.scrollbar_size, body.y, style.scrollbar_size, body.height);
        if !self.options.is_fixed() {
            track.height -= self.grip_rect(style).height;
        }
        let view = self.content_rect(style).height;
        Scrollbar::new(track, view, self.content_size.height, self.scroll.y, style.thumb_size)
    }

    pub fn max_scroll(&self, style: &Style) -> Vec2i {
        let view = self.content_rect(style);
        vec2((self.content_size.width - view.width).max(0), (self.content_size.height - view.height).max(0))
    }

    pub fn clamp_scroll(&mut self, style: &Style) {
        let m = self.max_scroll(style);
        self.scroll = vec2(self.scroll.x.clamp(0, m.x), self.scroll.y.clamp(0, m.y));
    }

    pub fn is_live(&self, frame: u64) -> bool { self.begun || self.last_frame_seen + 1 >= frame }

    pub fn current_clip_rect(&self) -> Recti { self.clip_stack.last().copied().unwrap_or(UNCLIPPED_RECT) }

    /// Resets the per-frame state and installs the root clip rect.
    pub fn begin_frame(&mut self, frame: u64, style: &Style) {
        self.begun = true;
        self.last_frame_seen = frame;
        self.draw_list.clear();
        self.focusable.clear();
        self.ids.reset(self.id);
        self.clip_stack.clear();
        let root = self.visible_rect(style);
        self.clip_stack.push(root);
        self.draw_list.set_clip_rect(root);
    }

    /// Replaces the root clip rect after the geometry changed during `begin_window`.
    pub fn refresh_root_clip(&mut self, style: &Style) {
        let root = self.visible_rect(style);
        self.clip_stack.clear();
        self.clip_stack.push(root);
        self.draw_list.set_clip_rect(root);
    }

    pub fn push_clip(&mut self, r: Recti) {
        self.clip_stack.push(r);
        self.draw_list.set_clip_rect(r);
    }

    pub fn pop_clip(&mut self) -> Option<Recti> {
        let popped = self.clip_stack.pop();
        let top = self.current_clip_rect();
        self.draw_list.set_clip_rect(top);
        popped
    }

    /// Starts laying out content: resets the cursor and pushes the content clip rect.
    pub fn begin_content(&mut self, style: &Style) {
        let content = self.content_rect(style);
        self.layout.reset(content, self.scroll);
        let clip = intersect_rects(content, self.current_clip_rect());
        self.push_clip(clip);
        self.clip_base = self.clip_stack.len();
    }

    /// Records the content size, applies auto sizing and clamps the scroll offset.
    pub fn end_content(&mut self, style: &Style) {
        self.content_size = self.layout.content_size();
        if self.options.is_auto_sizing() && !self.collapsed {
            let pad = style.window_padding;
            let width = self.content_size.width + pad.x * 2;
            let title = if self.options.has_no_title() { 0 } else { style.title_height };
            let height = self.content_size.height + pad.y * 2 + title;
            self.size = dim(width.max(style.min_window_size.x), height.max(style.min_window_size.y));
        }
        self.clamp_scroll(style);
        self.clip_stack.clear();
        self.clip_base = 0;
    }

    pub fn handle(&self, style: &Style, first_use: bool) -> WindowHandle {
        WindowHandle {
            id: self.id,
            rect: self.rect(),
            content_rect: self.content_rect(style),
            collapsed: self.collapsed,
            first_use,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(r: Recti) -> Window { Window::new(Id::from_label("W"), "W", r) }

    #[test]
    fn content_rect_excludes_title_and_padding() {
        let style = Style::default();
        let w = window(rect(10, 10, 200, 100));
        let c = w.content_rect(&style);
        assert_eq!((c.x, c.y, c.width, c.height), (18, 42, 184, 60));
    }

    #[test]
    fn collapsed_window_shows_only_title() {
        let style = Style::default();
        let mut w = window(rect(0, 0, 200, 100));
        w.collapsed = true;
        let v = w.visible_rect(&style);
        assert_eq!(v.height, style.title_height);
        assert!(rect_is_empty(w.content_rect(&style)));
    }

    #[test]
    fn scrollbar_appears_when_content_overflows() {
        let style = Style::default();
        let mut w = window(rect(0, 0, 200, 100));
        assert!(!w.has_scrollbar(&style));
        w.content_size = dim(100, 500);
        assert!(w.has_scrollbar(&style));
        assert_eq!(w.content_rect(&style).width, 200 - 16 - style.scrollbar_size);
        let bar = w.scrollbar(&style);
        assert!(bar.max_scroll > 0);
        assert!(bar.thumb.height >= style.thumb_size);
        assert!(bar.thumb.height < bar.track.height);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let style = Style::default();
        let mut w = window(rect(0, 0, 200, 100));
        w.content_size = dim(100, 120);
        w.scroll = vec2(0, 1000);
        w.clamp_scroll(&style);
        assert_eq!(w.scroll.y, w.max_scroll(&style).y);
        w.scroll = vec2(-5, -5);
        w.clamp_scroll(&style);
        assert_eq!((w.scroll.x, w.scroll.y), (0, 0));
    }

    #[test]
    fn root_clip_tracks_visible_rect() {
        let style = Style::default();
        let mut w = window(rect(5, 6, 70, 80));
        w.begin_frame(1, &style);
        let root = w.current_clip_rect();
        assert_eq!((root.x, root.y, root.width, root.height), (5, 6, 70, 80));
        w.begin_content(&style);
        assert_eq!(w.clip_stack.len(), 2);
        assert_eq!(w.clip_base, 2);
        let pos = w.layout.position();
        let c = w.content_rect(&style);
        assert_eq!((pos.x, pos.y), (c.x, c.y));
    }
}

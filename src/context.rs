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
use std::fmt;
use std::path::Path;

use nohash_hasher::IntMap;
use thiserror::Error;

use crate::interaction::InteractionState;
use crate::window::{StackMarks, Window};
use crate::*;

/// Tunables of a [`Context`].
#[derive(Copy, Clone, Debug)]
pub struct ContextConfig {
    /// A window not submitted for more than this many frames is evicted with its state.
    pub window_gc_frames: u64,
    /// Seconds of frame time between a settings change and [`Context::wants_save_settings`].
    pub settings_save_interval: f32,
    /// Gives focus to the first focusable widget when nothing holds focus.
    pub focus_first_by_default: bool,
    /// Pointer distance, in pixels, before a held widget reports drag deltas.
    pub drag_threshold: i32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window_gc_frames: 1,
            settings_save_interval: 5.0,
            focus_first_by_default: true,
            drag_threshold: 0,
        }
    }
}

/// Frame state machine of a [`Context`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FramePhase {
    /// No frame was started yet.
    Idle,
    /// `new_frame` was called and no window is open.
    FrameBegun,
    /// At least one window is open.
    WindowBegun,
    /// A window was closed and no window is open.
    WindowEnded,
    /// `end_frame` returned.
    FrameEnded,
}

impl FramePhase {
    fn is_open(self) -> bool { matches!(self, FramePhase::FrameBegun | FramePhase::WindowBegun | FramePhase::WindowEnded) }
}

/// Stacks checked for push/pop balance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StackKind {
    /// Id scopes.
    Id,
    /// Clip rects.
    Clip,
    /// Layout groups.
    Group,
    /// Item widths.
    ItemWidth,
    /// Style colors.
    StyleColor,
    /// Style variables.
    StyleVar,
    /// Disabled scopes.
    Disabled,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StackKind::Id => "id",
            StackKind::Clip => "clip rect",
            StackKind::Group => "group",
            StackKind::ItemWidth => "item width",
            StackKind::StyleColor => "style color",
            StackKind::StyleVar => "style var",
            StackKind::Disabled => "disabled",
        };
        f.write_str(name)
    }
}

/// Misuse of the frame API. The context panics with this message when it detects one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// An operation that needs an open frame was called outside one.
    #[error("`{0}` called outside of an open frame")]
    OutsideFrame(&'static str),
    /// An operation that needs an open window was called outside one.
    #[error("`{0}` called without an open window")]
    OutsideWindow(&'static str),
    /// The same window was begun twice in one frame.
    #[error("window `{0}` begun twice in the same frame")]
    DoubleBegin(String),
    /// A window was still open when the frame ended.
    #[error("window `{0}` still open at the end of the frame")]
    WindowLeftOpen(String),
    /// `end_window` was called with no window open.
    #[error("`end_window` called with no window open")]
    EndWithoutBegin,
    /// A stack was left with pushes that were never popped.
    #[error("{stack} stack unbalanced in `{scope}`: {pushed} push(es) never popped")]
    Unbalanced {
        /// Offending stack.
        stack: StackKind,
        /// Window title, or `<frame>` outside windows.
        scope: String,
        /// Pushes left on the stack.
        pushed: usize,
    },
    /// A stack was popped more often than pushed.
    #[error("{0} stack popped more than pushed")]
    Underflow(StackKind),
}

#[derive(Clone, Default)]
struct NextWindowData {
    pos: Option<Vec2i>,
    size: Option<Dimensioni>,
    collapsed: Option<bool>,
}

const FRAME_SCOPE: &str = "<frame>";

/// Primary entry point: owns windows, widget state and interaction state across frames.
pub struct Context {
    /// Input snapshot, filled by the backend between frames.
    pub input: Input,
    pub(crate) config: ContextConfig,
    pub(crate) style: Style,
    pub(crate) metrics: Box<dyn TextMetrics>,
    pub(crate) phase: FramePhase,
    pub(crate) frame: u64,
    pub(crate) display_size: Dimensioni,
    pub(crate) windows: IntMap<Id, Window>,
    pub(crate) z_order: Vec<Id>,
    pub(crate) window_stack: Vec<Id>,
    pub(crate) root_ids: IdStack,
    pub(crate) store: StateStore,
    pub(crate) interaction: InteractionState,
    settings: SettingsStore,
    settings_timer: Option<f32>,
    wants_save_settings: bool,
    style_colors: Vec<(ControlColor, Color)>,
    style_vars: Vec<StyleVar>,
    disabled_depth: usize,
    next_window: NextWindowData,
}

impl Default for Context {
    fn default() -> Self { Self::new() }
}

impl Context {
    /// Creates a context with the default configuration and monospace text metrics.
    pub fn new() -> Self { Self::with_config(ContextConfig::default()) }

    /// Creates a context with `config`.
    pub fn with_config(config: ContextConfig) -> Self {
        Self {
            input: Input::default(),
            config,
            style: Style::default(),
            metrics: Box::new(MonospaceMetrics::default()),
            phase: FramePhase::Idle,
            frame: 0,
            display_size: dim(0, 0),
            windows: IntMap::default(),
            z_order: Vec::new(),
            window_stack: Vec::new(),
            root_ids: IdStack::default(),
            store: StateStore::default(),
            interaction: InteractionState::default(),
            settings: SettingsStore::default(),
            settings_timer: None,
            wants_save_settings: false,
            style_colors: Vec::new(),
            style_vars: Vec::new(),
            disabled_depth: 0,
            next_window: NextWindowData::default(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &ContextConfig { &self.config }

    /// Mutable configuration.
    pub fn config_mut(&mut self) -> &mut ContextConfig { &mut self.config }

    /// Current style, including scoped overrides.
    pub fn style(&self) -> &Style { &self.style }

    /// Replaces the style.
    pub fn set_style(&mut self, style: Style) { self.style = style }

    /// Installs the font backend used to measure text.
    pub fn set_text_metrics(&mut self, metrics: Box<dyn TextMetrics>) { self.metrics = metrics }

    /// Size of the render target, forwarded to the frame output.
    pub fn set_display_size(&mut self, width: i32, height: i32) { self.display_size = dim(width, height) }

    /// Current frame phase.
    pub fn phase(&self) -> FramePhase { self.phase }

    /// Number of frames started so far.
    pub fn frame_count(&self) -> u64 { self.frame }

    /// Persistent widget state.
    pub fn store(&self) -> &StateStore { &self.store }

    /// Mutable persistent widget state.
    pub fn store_mut(&mut self) -> &mut StateStore { &mut self.store }

    fn violation(&self, v: ContractViolation) -> ! {
        log::error!("{}", v);
        panic!("{}", v)
    }

    pub(crate) fn expect_frame(&self, op: &'static str) {
        if !self.phase.is_open() {
            self.violation(ContractViolation::OutsideFrame(op));
        }
    }

    pub(crate) fn expect_window(&self, op: &'static str) -> Id {
        self.expect_frame(op);
        match self.window_stack.last() {
            Some(id) => *id,
            None => self.violation(ContractViolation::OutsideWindow(op)),
        }
    }

    fn current(&self, op: &'static str) -> &Window {
        let id = self.expect_window(op);
        &self.windows[&id]
    }

    fn current_mut(&mut self, op: &'static str) -> &mut Window {
        let id = self.expect_window(op);
        self.windows.get_mut(&id).expect("open windows are registered")
    }

    fn ids_mut(&mut self) -> &mut IdStack {
        match self.window_stack.last() {
            Some(id) => &mut self.windows.get_mut(id).expect("open windows are registered").ids,
            None => &mut self.root_ids,
        }
    }

    fn ids(&self) -> &IdStack {
        match self.window_stack.last() {
            Some(id) => &self.windows[id].ids,
            None => &self.root_ids,
        }
    }

    fn marks(&self) -> StackMarks {
        match self.window_stack.last() {
            Some(id) => self.windows[id].marks,
            None => StackMarks::default(),
        }
    }
}

impl Context {

    /// Starts a frame.
    ///
    /// A frame that was never ended is validated and discarded.
    pub fn new_frame(&mut self) {
        if self.phase.is_open() {
            if let Err(v) = self.validate_stacks() {
                self.violation(v);
            }
            log::warn!("frame {} was never ended, discarding it", self.frame);
            self.input.epilogue();
        }
        self.frame += 1;
        self.store.set_frame(self.frame);
        self.input.prelude();
        for w in self.windows.values_mut() {
            w.begun = false;
            w.draw_list.clear();
            w.focusable.clear();
        }
        self.window_stack.clear();
        self.root_ids.reset(Id::ROOT_SEED);
        self.interaction.begin_frame();
        self.update_hovered_window();
        self.phase = FramePhase::FrameBegun;
        log::trace!("frame {} begun", self.frame);
    }

    /// Ends the frame and returns its draw output, back to front.
    pub fn end_frame(&mut self) -> FrameOutput {
        self.expect_frame("end_frame");
        if let Err(v) = self.validate_stacks() {
            self.violation(v);
        }
        self.resolve_focus();
        if self.input.any_mouse_pressed() {
            let clicked = self.interaction.hovered_window;
            if !clicked.is_none() {
                self.bring_window_to_front(clicked);
                self.interaction.nav_window = clicked;
            }
        }
        self.collect_windows();
        self.update_settings_timer();

        let mut output = FrameOutput::new(self.display_size);
        for id in &self.z_order {
            if let Some(w) = self.windows.get(id) {
                if w.begun {
                    output.append(&w.draw_list);
                }
            }
        }
        self.input.epilogue();
        self.phase = FramePhase::FrameEnded;
        log::trace!("frame {} ended with {} commands", self.frame, output.len());
        output
    }

    /// Runs `f` between [`Context::new_frame`] and [`Context::end_frame`].
    pub fn frame<F: FnOnce(&mut Self)>(&mut self, f: F) -> FrameOutput {
        self.new_frame();
        f(self);
        self.end_frame()
    }

    /// Checks the frame-level stacks: no window open and nothing pushed outside windows.
    pub fn validate_stacks(&self) -> Result<(), ContractViolation> {
        if let Some(id) = self.window_stack.last() {
            return Err(ContractViolation::WindowLeftOpen(self.windows[id].title.clone()));
        }
        let checks = [
            (StackKind::Id, self.root_ids.depth()),
            (StackKind::StyleColor, self.style_colors.len()),
            (StackKind::StyleVar, self.style_vars.len()),
            (StackKind::Disabled, self.disabled_depth),
        ];
        for (stack, pushed) in checks {
            if pushed != 0 {
                return Err(ContractViolation::Unbalanced { stack, scope: FRAME_SCOPE.to_string(), pushed });
            }
        }
        Ok(())
    }

    fn check_window_stacks(&self, id: Id) -> Result<(), ContractViolation> {
        let w = &self.windows[&id];
        let checks = [
            (StackKind::Id, w.ids.depth()),
            (StackKind::Clip, w.clip_stack.len().saturating_sub(w.clip_base)),
            (StackKind::Group, w.layout.group_depth()),
            (StackKind::ItemWidth, w.layout.item_width_depth()),
            (StackKind::StyleColor, self.style_colors.len().saturating_sub(w.marks.style_colors)),
            (StackKind::StyleVar, self.style_vars.len().saturating_sub(w.marks.style_vars)),
            (StackKind::Disabled, self.disabled_depth.saturating_sub(w.marks.disabled)),
        ];
        for (stack, pushed) in checks {
            if pushed != 0 {
                return Err(ContractViolation::Unbalanced { stack, scope: w.title.clone(), pushed });
            }
        }
        Ok(())
    }

    fn collect_windows(&mut self) {
        let frame = self.frame;
        let limit = self.config.window_gc_frames;
        let stale: Vec<Id> = self
            .z_order
            .iter()
            .copied()
            .filter(|id| self.windows.get(id).is_some_and(|w| !w.begun && frame.saturating_sub(w.last_frame_seen) > limit))
            .collect();
        for id in stale {
            self.evict_window(id);
        }
    }

    fn evict_window(&mut self, id: Id) {
        self.sync_window_settings(id);
        let dropped = self.store.evict_owner(id);
        self.interaction.forget_window(id);
        self.z_order.retain(|z| *z != id);
        if let Some(w) = self.windows.remove(&id) {
            log::debug!("window `{}` evicted, {} state entries dropped", w.title, dropped);
        }
    }
}

impl Context {

    fn create_window(&mut self, id: Id, title: &str, initial_rect: Recti) {
        let mut window = Window::new(id, title, initial_rect);
        match self.settings.window(id) {
            Some(saved) => {
                window.pos = saved.pos;
                window.size = saved.size;
                window.collapsed = saved.collapsed;
                log::debug!("window `{}` created from saved settings", title);
            }
            None => log::debug!("window `{}` created", title),
        }
        self.windows.insert(id, window);
        self.z_order.push(id);
    }

    /// Opens a window for this frame and returns a snapshot of its geometry.
    ///
    /// The window is created on first use, from saved settings when there are some, otherwise
    /// from `initial_rect`. Every call must be matched by [`Context::end_window`].
    pub fn begin_window(&mut self, title: &str, initial_rect: Recti, options: WindowOption) -> WindowHandle {
        self.expect_frame("begin_window");
        let id = Id::from_label(title);
        if self.window_stack.contains(&id) || self.windows.get(&id).is_some_and(|w| w.begun) {
            self.violation(ContractViolation::DoubleBegin(title.to_string()));
        }
        let first_use = !self.windows.contains_key(&id);
        if first_use {
            self.create_window(id, title, initial_rect);
        }

        let next = std::mem::take(&mut self.next_window);
        let marks = StackMarks {
            style_colors: self.style_colors.len(),
            style_vars: self.style_vars.len(),
            disabled: self.disabled_depth,
        };
        let style = self.style;
        let frame = self.frame;
        let move_id = id.with("#MOVE");
        let collapse_id = id.with("#COLLAPSE");
        let resize_id = id.with("#RESIZE");
        let scroll_id = id.with("#SCROLLY");
        let mouse_down = self.input.is_mouse_down(MouseButton::LEFT);
        let delta = self.input.mouse_delta();
        let wheel = self.input.scroll_delta();
        let active = self.interaction.active;
        let dragging = self.interaction.dragging;
        let hovered = self.interaction.hovered_window == id;
        let mut changed = false;

        {
            let w = self.windows.get_mut(&id).expect("window registered above");
            if w.title != title {
                w.title = title.to_string();
            }
            w.options = options;
            if let Some(pos) = next.pos {
                w.pos = pos;
            }
            if let Some(size) = next.size {
                w.size = size;
            }
            if let Some(collapsed) = next.collapsed {
                w.collapsed = collapsed;
            }
            if mouse_down && dragging && (delta.x != 0 || delta.y != 0) {
                if active == move_id && !options.contains(WindowOption::NO_MOVE) {
                    w.pos = vec2(w.pos.x + delta.x, w.pos.y + delta.y);
                    changed = true;
                } else if active == resize_id && !options.is_fixed() {
                    let min = style.min_window_size;
                    w.size = dim((w.size.width + delta.x).max(min.x), (w.size.height + delta.y).max(min.y));
                    changed = true;
                } else if active == scroll_id {
                    let bar = w.scrollbar(&style);
                    w.scroll.y = (w.scroll.y + bar.drag_delta(delta.y, w.content_size.height)).clamp(0, bar.max_scroll);
                }
            }
            if hovered && !w.collapsed && !options.contains(WindowOption::NO_SCROLL_WITH_MOUSE) {
                w.scroll = vec2(w.scroll.x + wheel.x, w.scroll.y + wheel.y);
            }
            w.clamp_scroll(&style);
            w.begin_frame(frame, &style);
            w.marks = marks;
        }
        self.window_stack.push(id);
        self.phase = FramePhase::WindowBegun;
        self.update_hovered_window();
        self.shadow_lower_windows(id);
        log::trace!("window `{}` begun", title);

        if !options.has_no_title() {
            let title_rect = self.windows[&id].title_rect(&style);
            let mut drag_area = title_rect;
            if !options.contains(WindowOption::NO_COLLAPSE) {
                let button = rect(title_rect.x, title_rect.y, title_rect.height, title_rect.height);
                if self.item_behavior(collapse_id, button, WidgetOption::NO_FOCUS).clicked {
                    let w = self.windows.get_mut(&id).expect("window registered above");
                    w.collapsed = !w.collapsed;
                    w.refresh_root_clip(&style);
                    changed = true;
                }
                drag_area.x += button.width;
                drag_area.width -= button.width;
            }
            if !options.contains(WindowOption::NO_MOVE) {
                self.item_behavior(move_id, drag_area, WidgetOption::NO_FOCUS);
            }
        }

        let collapsed = self.windows[&id].collapsed;
        let resizable = !collapsed && !options.is_fixed();
        if resizable {
            let grip = self.windows[&id].grip_rect(&style);
            self.item_behavior(resize_id, grip, WidgetOption::NO_FOCUS);
        }
        let has_scrollbar = !collapsed && self.windows[&id].has_scrollbar(&style);
        if has_scrollbar {
            let thumb = self.windows[&id].scrollbar(&style).thumb;
            self.item_behavior(scroll_id, thumb, WidgetOption::NO_FOCUS);
        }

        self.draw_window_frame(id, resizable, has_scrollbar);
        let w = self.windows.get_mut(&id).expect("window registered above");
        w.begin_content(&style);
        let handle = w.handle(&style, first_use);
        if changed {
            self.mark_settings_dirty();
        }
        handle
    }

    fn draw_window_frame(&mut self, id: Id, resizable: bool, has_scrollbar: bool) {
        let style = self.style;
        let nav = self.interaction.nav_window == id;
        let grip_hot = self.interaction.hot == id.with("#RESIZE") || self.interaction.active == id.with("#RESIZE");
        let metrics = self.metrics.as_ref();
        let w = self.windows.get_mut(&id).expect("window registered above");
        let options = w.options;
        let background = !options.contains(WindowOption::NO_BACKGROUND);

        if background && !w.collapsed {
            w.draw_list.add_rect(w.rect(), style.color(ControlColor::WindowBG));
        }
        if !options.has_no_title() {
            let tr = w.title_rect(&style);
            let bg = if nav { ControlColor::TitleBGActive } else { ControlColor::TitleBG };
            w.draw_list.add_rect(tr, style.color(bg));
            let line_height = metrics.line_height(style.font);
            let text_y = tr.y + (tr.height - line_height) / 2;
            let mut text_x = tr.x + style.padding;
            if !options.contains(WindowOption::NO_COLLAPSE) {
                let marker = if w.collapsed { "+" } else { "-" };
                let size = metrics.text_size(style.font, marker);
                let mx = tr.x + (tr.height - size.width) / 2;
                w.draw_list.add_text(vec2(mx, text_y), marker, style.font, style.color(ControlColor::TitleText), metrics);
                text_x = tr.x + tr.height;
            }
            let title = label_text(&w.title).to_string();
            w.draw_list.add_text(vec2(text_x, text_y), &title, style.font, style.color(ControlColor::TitleText), metrics);
        }
        if has_scrollbar {
            let bar = w.scrollbar(&style);
            w.draw_list.add_rect(bar.track, style.color(ControlColor::ScrollBase));
            w.draw_list.add_rect(bar.thumb, style.color(ControlColor::ScrollThumb));
        }
        if resizable {
            let grip = if grip_hot { ControlColor::ButtonHover } else { ControlColor::ResizeGrip };
            w.draw_list.add_rect(w.grip_rect(&style), style.color(grip));
        }
        if background {
            w.draw_list.add_rect_outline(w.visible_rect(&style), style.color(ControlColor::Border), 1);
        }
    }

    /// Closes the innermost window. Panics if one of its stacks is unbalanced.
    pub fn end_window(&mut self) {
        self.expect_frame("end_window");
        let Some(&id) = self.window_stack.last() else {
            self.violation(ContractViolation::EndWithoutBegin)
        };
        if let Err(v) = self.check_window_stacks(id) {
            self.violation(v);
        }
        let style = self.style;
        if let Some(w) = self.windows.get_mut(&id) {
            w.end_content(&style);
        }
        self.window_stack.pop();
        self.phase = if self.window_stack.is_empty() { FramePhase::WindowEnded } else { FramePhase::WindowBegun };
    }

    /// Opens a window, runs `f` unless the window is collapsed, and closes it.
    pub fn window<F: FnOnce(&mut Self)>(&mut self, title: &str, initial_rect: Recti, options: WindowOption, f: F) -> WindowHandle {
        let handle = self.begin_window(title, initial_rect, options);
        if !handle.is_collapsed() {
            f(self);
        }
        self.end_window();
        handle
    }

    /// Position used by the next [`Context::begin_window`].
    pub fn set_next_window_pos(&mut self, pos: Vec2i) { self.next_window.pos = Some(pos) }

    /// Size used by the next [`Context::begin_window`].
    pub fn set_next_window_size(&mut self, size: Dimensioni) { self.next_window.size = Some(size) }

    /// Collapsed flag used by the next [`Context::begin_window`].
    pub fn set_next_window_collapsed(&mut self, collapsed: bool) { self.next_window.collapsed = Some(collapsed) }

    /// Moves a registered window. Returns `false` for unknown ids.
    pub fn set_window_pos(&mut self, id: Id, pos: Vec2i) -> bool {
        match self.windows.get_mut(&id) {
            Some(w) => {
                w.pos = pos;
                self.mark_settings_dirty();
                true
            }
            None => false,
        }
    }

    /// Resizes a registered window. Returns `false` for unknown ids.
    pub fn set_window_size(&mut self, id: Id, size: Dimensioni) -> bool {
        match self.windows.get_mut(&id) {
            Some(w) => {
                w.size = size;
                self.mark_settings_dirty();
                true
            }
            None => false,
        }
    }

    /// Sets the scroll offset of a registered window; clamped at its next `end_window`.
    pub fn set_window_scroll(&mut self, id: Id, scroll: Vec2i) -> bool {
        match self.windows.get_mut(&id) {
            Some(w) => {
                w.scroll = scroll;
                true
            }
            None => false,
        }
    }

    /// Outer rect of a registered window.
    pub fn window_rect(&self, id: Id) -> Option<Recti> { self.windows.get(&id).map(|w| w.rect()) }

    /// Scroll offset of a registered window.
    pub fn window_scroll(&self, id: Id) -> Option<Vec2i> { self.windows.get(&id).map(|w| w.scroll) }

    /// Content size measured at the last `end_window` of a registered window.
    pub fn window_content_size(&self, id: Id) -> Option<Dimensioni> { self.windows.get(&id).map(|w| w.content_size) }

    /// Collapsed flag of a registered window.
    pub fn is_window_collapsed(&self, id: Id) -> Option<bool> { self.windows.get(&id).map(|w| w.collapsed) }

    /// Registered windows, back to front.
    pub fn window_order(&self) -> &[Id] { &self.z_order }

    /// Number of registered windows.
    pub fn window_count(&self) -> usize { self.windows.len() }

    /// Position of a window in the back-to-front order.
    pub fn z_index(&self, id: Id) -> Option<usize> { self.z_order.iter().position(|z| *z == id) }

    /// Moves a window to the front.
    pub fn bring_window_to_front(&mut self, id: Id) {
        if let Some(index) = self.z_index(id) {
            if index + 1 != self.z_order.len() {
                self.z_order.remove(index);
                self.z_order.push(id);
            }
        }
    }

    /// Id of the innermost open window.
    pub fn current_window_id(&self) -> Option<Id> { self.window_stack.last().copied() }
}

impl Context {

    /// Derives the id of `key` in the current scope.
    pub fn get_id<K: IdKey + ?Sized>(&self, key: &K) -> Id { self.ids().get(key) }

    /// Derives the id of a widget label (`##` / `###` aware) in the current scope.
    pub fn get_label_id(&self, label: &str) -> Id { self.ids().get_label(label) }

    /// Opens an id scope.
    pub fn push_id<K: IdKey + ?Sized>(&mut self, key: &K) -> Id {
        self.expect_frame("push_id");
        self.ids_mut().push(key)
    }

    /// Closes the innermost id scope.
    pub fn pop_id(&mut self) {
        self.expect_frame("pop_id");
        if self.ids_mut().try_pop().is_none() {
            self.violation(ContractViolation::Underflow(StackKind::Id));
        }
    }

    /// Runs `f` inside an id scope.
    pub fn with_id<K: IdKey + ?Sized, R, F: FnOnce(&mut Self) -> R>(&mut self, key: &K, f: F) -> R {
        self.push_id(key);
        let res = f(self);
        self.pop_id();
        res
    }
}

impl Context {

    /// Pushes a clip rect, intersected with the current one when `intersect_with_current`.
    pub fn push_clip_rect(&mut self, r: Recti, intersect_with_current: bool) {
        let w = self.current_mut("push_clip_rect");
        let clip = if intersect_with_current { intersect_rects(r, w.current_clip_rect()) } else { r };
        w.push_clip(clip);
    }

    /// Pops the innermost clip rect. The rects installed by `begin_window` cannot be popped.
    pub fn pop_clip_rect(&mut self) {
        let w = self.current("pop_clip_rect");
        if w.clip_stack.len() <= w.clip_base {
            self.violation(ContractViolation::Underflow(StackKind::Clip));
        }
        self.current_mut("pop_clip_rect").pop_clip();
    }

    /// Clip rect applied to new items and draw commands.
    pub fn current_clip_rect(&self) -> Recti { self.current("current_clip_rect").current_clip_rect() }

    /// Runs `f` with a clip rect pushed.
    pub fn with_clip_rect<R, F: FnOnce(&mut Self) -> R>(&mut self, r: Recti, intersect_with_current: bool, f: F) -> R {
        self.push_clip_rect(r, intersect_with_current);
        let res = f(self);
        self.pop_clip_rect();
        res
    }
}

impl Context {

    /// Reserves a rect of `size` at the cursor and advances it.
    pub fn advance_cursor(&mut self, size: Dimensioni) -> Recti {
        let spacing = self.style.item_spacing;
        self.current_mut("advance_cursor").layout.advance(size, spacing)
    }

    /// Places the next item to the right of the previous one.
    pub fn same_line(&mut self) {
        let spacing = self.style.item_spacing.x;
        self.current_mut("same_line").layout.same_line(None, spacing);
    }

    /// Like [`Context::same_line`]; a non-zero `offset` positions the item that many pixels from
    /// the content origin, a negative `spacing` uses the style spacing.
    pub fn same_line_with(&mut self, offset: i32, spacing: i32) {
        let spacing = if spacing < 0 { self.style.item_spacing.x } else { spacing };
        let offset = if offset != 0 { Some(offset) } else { None };
        self.current_mut("same_line_with").layout.same_line(offset, spacing);
    }

    /// Ends the current line, or adds an empty line when it is empty.
    pub fn new_line(&mut self) {
        let spacing = self.style.item_spacing;
        let line_height = self.metrics.line_height(self.style.font);
        self.current_mut("new_line").layout.new_line(line_height, spacing);
    }

    /// Adds vertical spacing.
    pub fn spacing(&mut self) { self.advance_cursor(dim(0, 0)); }

    /// Moves the line start right by `width`, or by the style indent when `width` is 0.
    pub fn indent(&mut self, width: i32) {
        let width = if width == 0 { self.style.indent } else { width };
        self.current_mut("indent").layout.indent(width);
    }

    /// Reverts [`Context::indent`].
    pub fn unindent(&mut self, width: i32) {
        let width = if width == 0 { self.style.indent } else { width };
        self.current_mut("unindent").layout.indent(-width);
    }

    /// Runs `f` indented by the style indent.
    pub fn indented<R, F: FnOnce(&mut Self) -> R>(&mut self, f: F) -> R {
        self.indent(0);
        let res = f(self);
        self.unindent(0);
        res
    }

    /// Starts a group: items until [`Context::pop_group`] register as one item.
    pub fn push_group(&mut self) { self.current_mut("push_group").layout.push_group(); }

    /// Ends the innermost group and returns its rect.
    pub fn pop_group(&mut self) -> Recti {
        let spacing = self.style.item_spacing;
        match self.current_mut("pop_group").layout.pop_group(spacing) {
            Some(r) => r,
            None => self.violation(ContractViolation::Underflow(StackKind::Group)),
        }
    }

    /// Runs `f` inside a group and returns the group rect.
    pub fn group<F: FnOnce(&mut Self)>(&mut self, f: F) -> Recti {
        self.push_group();
        f(self);
        self.pop_group()
    }

    /// Sets the width used by subsequent items.
    pub fn push_item_width(&mut self, width: SizePolicy) { self.current_mut("push_item_width").layout.push_item_width(width); }

    /// Reverts [`Context::push_item_width`].
    pub fn pop_item_width(&mut self) {
        if self.current_mut("pop_item_width").layout.pop_item_width().is_none() {
            self.violation(ContractViolation::Underflow(StackKind::ItemWidth));
        }
    }

    /// Width the next item should take.
    pub fn calc_item_width(&self) -> i32 { self.current("calc_item_width").layout.item_width(self.style.item_width) }

    /// Position the next item will be placed at.
    pub fn cursor_pos(&self) -> Vec2i { self.current("cursor_pos").layout.position() }

    /// Moves the cursor.
    pub fn set_cursor_pos(&mut self, pos: Vec2i) { self.current_mut("set_cursor_pos").layout.set_position(pos); }

    /// Space left in the content region from the cursor.
    pub fn content_region_avail(&self) -> Dimensioni {
        let layout = &self.current("content_region_avail").layout;
        let content = layout.content();
        let pos = layout.position();
        dim((content.x + content.width - pos.x).max(0), (content.y + content.height - pos.y).max(0))
    }

    /// Rect of the last item placed by the cursor.
    pub fn last_item_rect(&self) -> Recti { self.current("last_item_rect").layout.last_rect() }
}

impl Context {

    /// Overrides a style color until the matching [`Context::pop_style_color`].
    pub fn push_style_color(&mut self, id: ControlColor, color: Color) {
        self.expect_frame("push_style_color");
        self.style_colors.push((id, self.style.color(id)));
        self.style.colors[id as usize] = color;
    }

    /// Reverts the innermost [`Context::push_style_color`].
    pub fn pop_style_color(&mut self) {
        self.expect_frame("pop_style_color");
        if self.style_colors.len() <= self.marks().style_colors {
            self.violation(ContractViolation::Underflow(StackKind::StyleColor));
        }
        if let Some((id, color)) = self.style_colors.pop() {
            self.style.colors[id as usize] = color;
        }
    }

    /// Runs `f` with a style color overridden.
    pub fn with_style_color<R, F: FnOnce(&mut Self) -> R>(&mut self, id: ControlColor, color: Color, f: F) -> R {
        self.push_style_color(id, color);
        let res = f(self);
        self.pop_style_color();
        res
    }

    /// Overrides a style metric until the matching [`Context::pop_style_var`].
    pub fn push_style_var(&mut self, var: StyleVar) {
        self.expect_frame("push_style_var");
        let previous = var.apply(&mut self.style);
        self.style_vars.push(previous);
    }

    /// Reverts the innermost [`Context::push_style_var`].
    pub fn pop_style_var(&mut self) {
        self.expect_frame("pop_style_var");
        if self.style_vars.len() <= self.marks().style_vars {
            self.violation(ContractViolation::Underflow(StackKind::StyleVar));
        }
        if let Some(previous) = self.style_vars.pop() {
            previous.apply(&mut self.style);
        }
    }

    /// Runs `f` with a style metric overridden.
    pub fn with_style_var<R, F: FnOnce(&mut Self) -> R>(&mut self, var: StyleVar, f: F) -> R {
        self.push_style_var(var);
        let res = f(self);
        self.pop_style_var();
        res
    }

    /// Disables interaction for subsequent items.
    pub fn push_disabled(&mut self) {
        self.expect_frame("push_disabled");
        self.disabled_depth += 1;
    }

    /// Reverts [`Context::push_disabled`].
    pub fn pop_disabled(&mut self) {
        self.expect_frame("pop_disabled");
        if self.disabled_depth <= self.marks().disabled {
            self.violation(ContractViolation::Underflow(StackKind::Disabled));
        }
        self.disabled_depth -= 1;
    }

    /// Runs `f` with interaction disabled.
    pub fn with_disabled<R, F: FnOnce(&mut Self) -> R>(&mut self, f: F) -> R {
        self.push_disabled();
        let res = f(self);
        self.pop_disabled();
        res
    }

    /// Returns `true` inside a disabled scope.
    pub fn is_disabled(&self) -> bool { self.disabled_depth > 0 }
}

impl Context {

    /// Measures `text` with the style font.
    pub fn text_size(&self, text: &str) -> Dimensioni { self.metrics.text_size(self.style.font, text) }

    /// Line height of the style font.
    pub fn line_height(&self) -> i32 { self.metrics.line_height(self.style.font) }

    /// Draws a solid rect into the current window.
    pub fn add_rect(&mut self, r: Recti, color: Color) { self.current_mut("add_rect").draw_list.add_rect(r, color); }

    /// Draws a rect outline into the current window.
    pub fn add_rect_outline(&mut self, r: Recti, color: Color, thickness: i32) {
        self.current_mut("add_rect_outline").draw_list.add_rect_outline(r, color, thickness);
    }

    /// Draws a line into the current window.
    pub fn add_line(&mut self, from: Vec2i, to: Vec2i, color: Color, thickness: i32) {
        self.current_mut("add_line").draw_list.add_line(from, to, color, thickness);
    }

    /// Draws text into the current window.
    pub fn add_text(&mut self, pos: Vec2i, text: &str, font: FontId, color: Color) {
        let id = self.expect_window("add_text");
        let metrics = self.metrics.as_ref();
        if let Some(w) = self.windows.get_mut(&id) {
            w.draw_list.add_text(pos, text, font, color, metrics);
        }
    }

    /// Draws a textured quad into the current window.
    pub fn add_image(&mut self, r: Recti, uv: [f32; 4], texture: TextureId, color: Color) {
        self.current_mut("add_image").draw_list.add_image(r, uv, texture, color);
    }
}

impl Context {

    /// State of `id`, created with `T::default()` and owned by the current window.
    pub fn get_or_create<T: Default + 'static>(&mut self, id: Id) -> &mut T {
        let owner = self.window_stack.last().copied().unwrap_or(Id::NONE);
        self.store.get_or_create(id, owner)
    }

    /// State of `id` if it exists with type `T`.
    pub fn state<T: 'static>(&self, id: Id) -> Option<&T> { self.store.get(id) }

    /// Mutable state of `id` if it exists with type `T`.
    pub fn state_mut<T: 'static>(&mut self, id: Id) -> Option<&mut T> { self.store.get_mut(id) }

    /// Drops the state of `id`.
    pub fn remove_state(&mut self, id: Id) -> bool { self.store.remove(id) }
}

impl Context {

    /// Window settings known to the context.
    pub fn settings(&self) -> &SettingsStore { &self.settings }

    /// Loads settings text. Windows it names use the loaded geometry.
    pub fn load_settings(&mut self, text: &str) -> Result<usize, SettingsError> {
        let count = self.settings.merge_from_str(text)?;
        for (id, w) in self.windows.iter_mut() {
            if let Some(saved) = self.settings.window(*id) {
                w.pos = saved.pos;
                w.size = saved.size;
                w.collapsed = saved.collapsed;
            }
        }
        log::debug!("loaded settings for {} window(s)", count);
        Ok(count)
    }

    /// Loads a settings file.
    pub fn load_settings_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        self.load_settings(&text)
    }

    /// Returns `true` once geometry changed and the save interval elapsed.
    pub fn wants_save_settings(&self) -> bool { self.wants_save_settings }

    /// Serializes the settings of every window seen so far and clears the save request.
    pub fn save_settings(&mut self) -> String {
        for id in self.z_order.clone() {
            self.sync_window_settings(id);
        }
        self.wants_save_settings = false;
        self.settings_timer = None;
        self.settings.save_to_string()
    }

    /// Writes [`Context::save_settings`] to `path`.
    pub fn save_settings_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SettingsError> {
        let text = self.save_settings();
        std::fs::write(path, text)?;
        Ok(())
    }

    fn sync_window_settings(&mut self, id: Id) {
        if let Some(w) = self.windows.get(&id) {
            self.settings.set_window(WindowSettings { title: w.title.clone(), pos: w.pos, size: w.size, collapsed: w.collapsed });
        }
    }

    pub(crate) fn mark_settings_dirty(&mut self) {
        if self.settings_timer.is_none() {
            self.settings_timer = Some(0.0);
        }
    }

    fn update_settings_timer(&mut self) {
        if let Some(elapsed) = self.settings_timer.as_mut() {
            *elapsed += self.input.delta_time();
            if *elapsed >= self.config.settings_save_interval {
                self.settings_timer = None;
                self.wants_save_settings = true;
                log::debug!("settings changed, save requested");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn tuple(r: Recti) -> (i32, i32, i32, i32) { (r.x, r.y, r.width, r.height) }

    fn tight_context() -> Context {
        let mut ctx = Context::new();
        let mut style = Style::default();
        style.item_spacing = vec2(0, 0);
        style.window_padding = vec2(0, 0);
        ctx.set_style(style);
        ctx
    }

    #[test]
    fn phases_follow_the_frame() {
        let mut ctx = Context::new();
        assert_eq!(ctx.phase(), FramePhase::Idle);
        ctx.new_frame();
        assert_eq!(ctx.phase(), FramePhase::FrameBegun);
        let handle = ctx.begin_window("Main", rect(10, 10, 200, 100), WindowOption::NONE);
        assert_eq!(ctx.phase(), FramePhase::WindowBegun);
        assert!(handle.is_first_use());
        assert_eq!(tuple(handle.content_rect()), (18, 42, 184, 60));
        ctx.end_window();
        assert_eq!(ctx.phase(), FramePhase::WindowEnded);
        ctx.end_frame();
        assert_eq!(ctx.phase(), FramePhase::FrameEnded);
        assert_eq!(ctx.frame_count(), 1);
    }

    #[test]
    fn same_line_places_items_side_by_side() {
        let mut ctx = tight_context();
        ctx.frame(|ctx| {
            ctx.window("Row", rect(10, 20, 200, 100), WindowOption::NO_TITLE, |ctx| {
                assert_eq!(tuple(ctx.advance_cursor(dim(30, 12))), (10, 20, 30, 12));
                ctx.same_line();
                assert_eq!(tuple(ctx.advance_cursor(dim(40, 12))), (40, 20, 40, 12));
                assert_eq!(tuple(ctx.advance_cursor(dim(10, 12))), (10, 32, 10, 12));
            });
        });
    }

    #[test]
    fn cursor_restarts_at_content_origin() {
        let mut ctx = tight_context();
        for _ in 0..2 {
            ctx.frame(|ctx| {
                ctx.window("Again", rect(5, 5, 100, 100), WindowOption::NO_TITLE, |ctx| {
                    let pos = ctx.cursor_pos();
                    assert_eq!((pos.x, pos.y), (5, 5));
                    ctx.advance_cursor(dim(20, 20));
                    ctx.advance_cursor(dim(20, 20));
                });
            });
        }
        let id = Id::from_label("Again");
        let content = ctx.window_content_size(id).expect("window registered");
        assert_eq!((content.width, content.height), (20, 40));
    }

    #[test]
    fn groups_register_as_one_item() {
        let mut ctx = tight_context();
        ctx.frame(|ctx| {
            ctx.window("Groups", rect(0, 0, 200, 200), WindowOption::NO_TITLE, |ctx| {
                let group = ctx.group(|ctx| {
                    ctx.advance_cursor(dim(50, 10));
                    ctx.advance_cursor(dim(30, 10));
                });
                assert_eq!(tuple(group), (0, 0, 50, 20));
                ctx.same_line();
                assert_eq!(tuple(ctx.advance_cursor(dim(10, 10))), (50, 0, 10, 10));
            });
        });
    }

    #[test]
    fn auto_size_fits_content() {
        let mut ctx = Context::new();
        ctx.frame(|ctx| {
            ctx.window("Fit", rect(0, 0, 10, 10), WindowOption::AUTO_SIZE, |ctx| {
                ctx.advance_cursor(dim(100, 50));
            });
        });
        let r = ctx.window_rect(Id::from_label("Fit")).expect("window registered");
        assert_eq!((r.width, r.height), (116, 90));
    }

    #[test]
    fn draw_order_follows_z_order() {
        let mut ctx = Context::new();
        let red = color(1, 2, 3, 255);
        let blue = color(4, 5, 6, 255);
        let submit = |ctx: &mut Context| {
            ctx.frame(|ctx| {
                ctx.window("A", rect(0, 0, 100, 100), WindowOption::NONE, |ctx| ctx.add_rect(rect(10, 40, 5, 5), red));
                ctx.window("B", rect(200, 0, 100, 100), WindowOption::NONE, |ctx| ctx.add_rect(rect(210, 40, 5, 5), blue));
            })
        };
        let index_of = |out: &FrameOutput, wanted: Color| {
            out.commands().iter().position(|c| matches!(c.primitive, Primitive::Rect { color, .. } if color == wanted))
        };

        let out = submit(&mut ctx);
        assert!(index_of(&out, red) < index_of(&out, blue));

        ctx.bring_window_to_front(Id::from_label("A"));
        let out = submit(&mut ctx);
        assert!(index_of(&out, blue) < index_of(&out, red));
        assert_eq!(ctx.window_order(), &[Id::from_label("B"), Id::from_label("A")]);
    }

    #[test]
    fn clip_stack_round_trips() {
        let mut rng = rand::rng();
        let mut ctx = Context::new();
        ctx.frame(|ctx| {
            ctx.window("Clip", rect(0, 0, 300, 300), WindowOption::NONE, |ctx| {
                let before = tuple(ctx.current_clip_rect());
                let depth = rng.random_range(1..16);
                for _ in 0..depth {
                    let r = rect(rng.random_range(-50..300), rng.random_range(-50..300), rng.random_range(0..200), rng.random_range(0..200));
                    ctx.push_clip_rect(r, rng.random_range(0..2) == 0);
                }
                for _ in 0..depth {
                    ctx.pop_clip_rect();
                }
                assert_eq!(tuple(ctx.current_clip_rect()), before);
            });
        });
    }

    #[test]
    fn style_overrides_are_scoped() {
        let mut ctx = Context::new();
        let original = ctx.style().color(ControlColor::Button);
        ctx.frame(|ctx| {
            ctx.window("Style", rect(0, 0, 100, 100), WindowOption::NONE, |ctx| {
                ctx.with_style_color(ControlColor::Button, color(9, 9, 9, 9), |ctx| {
                    assert_eq!(ctx.style().color(ControlColor::Button), color(9, 9, 9, 9));
                });
                ctx.with_style_var(StyleVar::Padding(1), |ctx| assert_eq!(ctx.style().padding, 1));
            });
        });
        assert_eq!(ctx.style().color(ControlColor::Button), original);
        assert_eq!(ctx.style().padding, Style::default().padding);
    }

    #[test]
    fn validate_reports_pushes_outside_windows() {
        let mut ctx = Context::new();
        ctx.new_frame();
        ctx.push_id("scope");
        let err = ctx.validate_stacks().unwrap_err();
        assert_eq!(err, ContractViolation::Unbalanced { stack: StackKind::Id, scope: "<frame>".to_string(), pushed: 1 });
        ctx.pop_id();
        assert!(ctx.validate_stacks().is_ok());
        ctx.end_frame();
    }

    #[test]
    #[should_panic(expected = "still open")]
    fn window_left_open_panics() {
        let mut ctx = Context::new();
        ctx.new_frame();
        ctx.begin_window("Open", rect(0, 0, 100, 100), WindowOption::NONE);
        ctx.end_frame();
    }

    #[test]
    #[should_panic(expected = "begun twice")]
    fn double_begin_panics() {
        let mut ctx = Context::new();
        ctx.new_frame();
        ctx.window("Twice", rect(0, 0, 100, 100), WindowOption::NONE, |_| {});
        ctx.window("Twice", rect(0, 0, 100, 100), WindowOption::NONE, |_| {});
    }

    #[test]
    #[should_panic(expected = "clip rect stack popped more than pushed")]
    fn popping_the_window_clip_panics() {
        let mut ctx = Context::new();
        ctx.new_frame();
        ctx.begin_window("Clip", rect(0, 0, 100, 100), WindowOption::NONE);
        ctx.pop_clip_rect();
    }

    #[test]
    #[should_panic(expected = "id stack unbalanced")]
    fn unbalanced_id_scope_panics() {
        let mut ctx = Context::new();
        ctx.new_frame();
        ctx.begin_window("Ids", rect(0, 0, 100, 100), WindowOption::NONE);
        ctx.push_id(&7u32);
        ctx.end_window();
    }

    #[test]
    #[should_panic(expected = "outside of an open frame")]
    fn window_outside_frame_panics() {
        let mut ctx = Context::new();
        ctx.begin_window("Early", rect(0, 0, 100, 100), WindowOption::NONE);
    }

    #[test]
    #[should_panic(expected = "no window open")]
    fn end_without_begin_panics() {
        let mut ctx = Context::new();
        ctx.new_frame();
        ctx.end_window();
    }

    #[test]
    fn unseen_windows_are_evicted_with_their_state() {
        let mut ctx = Context::new();
        let mut counter = Id::NONE;
        ctx.frame(|ctx| {
            ctx.window("Temp", rect(0, 0, 100, 100), WindowOption::NONE, |ctx| {
                counter = ctx.get_id("counter");
                *ctx.get_or_create::<u32>(counter) = 5;
            });
        });
        assert_eq!(ctx.state::<u32>(counter), Some(&5));

        ctx.frame(|_| {});
        assert_eq!(ctx.window_count(), 1);
        assert!(ctx.store().contains(counter));

        ctx.frame(|_| {});
        assert_eq!(ctx.window_count(), 0);
        assert!(!ctx.store().contains(counter));
        assert!(ctx.window_order().is_empty());
    }

    #[test]
    fn state_outlives_frames_while_submitted() {
        let mut ctx = Context::new();
        for expected in 1..4u32 {
            ctx.frame(|ctx| {
                ctx.window("Count", rect(0, 0, 100, 100), WindowOption::NONE, |ctx| {
                    let id = ctx.get_id("clicks");
                    let clicks = ctx.get_or_create::<u32>(id);
                    *clicks += 1;
                    assert_eq!(*clicks, expected);
                });
            });
        }
    }

    #[test]
    fn settings_restore_window_geometry() {
        let mut first = Context::new();
        first.frame(|ctx| {
            ctx.window("Tools", rect(10, 10, 150, 120), WindowOption::NONE, |_| {});
        });
        assert!(first.set_window_pos(Id::from_label("Tools"), vec2(100, 100)));
        let text = first.save_settings();
        assert!(text.contains("Pos=100,100"));

        let mut second = Context::new();
        assert_eq!(second.load_settings(&text).expect("settings parse"), 1);
        let mut restored = None;
        second.frame(|ctx| {
            restored = Some(ctx.window("Tools", rect(10, 10, 150, 120), WindowOption::NONE, |_| {}));
        });
        let handle = restored.expect("window submitted");
        assert_eq!(tuple(handle.rect()), (100, 100, 150, 120));
    }

    #[test]
    fn settings_save_is_requested_after_the_interval() {
        let mut ctx = Context::with_config(ContextConfig { settings_save_interval: 1.0, ..ContextConfig::default() });
        ctx.input.set_delta_time(0.6);
        ctx.frame(|ctx| {
            ctx.window("Moved", rect(0, 0, 100, 100), WindowOption::NONE, |_| {});
        });
        ctx.set_window_pos(Id::from_label("Moved"), vec2(20, 20));
        let submit = |ctx: &mut Context| {
            ctx.frame(|ctx| {
                ctx.window("Moved", rect(0, 0, 100, 100), WindowOption::NONE, |_| {});
            })
        };
        submit(&mut ctx);
        assert!(!ctx.wants_save_settings());
        submit(&mut ctx);
        assert!(ctx.wants_save_settings());
        ctx.save_settings();
        assert!(!ctx.wants_save_settings());
    }

    #[test]
    fn next_window_data_applies_once() {
        let mut ctx = Context::new();
        ctx.new_frame();
        ctx.set_next_window_pos(vec2(40, 50));
        ctx.set_next_window_size(dim(80, 90));
        let handle = ctx.window("Placed", rect(0, 0, 10, 10), WindowOption::NONE, |_| {});
        ctx.end_frame();
        assert_eq!(tuple(handle.rect()), (40, 50, 80, 90));

        let out = ctx.frame(|_| {});
        assert!(out.is_empty());
        let r = ctx.window_rect(Id::from_label("Placed")).expect("window registered");
        assert_eq!(tuple(r), (40, 50, 80, 90));
    }
}

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
//! Per-window draw lists and the merged frame output.
//!
//! Commands carry a [`ClipId`] into the clip table of the list that holds them and a
//! [`TextureId`]. [`FrameOutput`] concatenates the lists back to front and remaps every clip id
//! into a single table so a renderer can scissor once per [`DrawBatch`].

use std::ops::Range;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Font handle passed through to [`TextMetrics`] and the renderer.
pub struct FontId(u32);

impl FontId {
    /// Wraps a backend font index.
    pub fn new(raw: u32) -> Self { Self(raw) }
    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Handle referencing a renderer-owned texture.
pub struct TextureId(u32);

impl TextureId {
    /// Solid color geometry.
    pub const NONE: Self = Self(0);
    /// Glyphs of the backend font atlas.
    pub const FONT_ATLAS: Self = Self(u32::MAX);

    /// Wraps a backend texture handle.
    pub fn new(raw: u32) -> Self { Self(raw) }
    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Index into a clip table.
pub struct ClipId(u32);

impl ClipId {
    /// Returns the table index.
    pub fn index(self) -> usize { self.0 as usize }
}

/// Measures text for layout and culling. Implemented by the font backend.
pub trait TextMetrics {
    /// Size in pixels of `text` rendered with `font`.
    fn text_size(&self, font: FontId, text: &str) -> Dimensioni;
    /// Height of a line of text.
    fn line_height(&self, font: FontId) -> i32;
}

#[derive(Copy, Clone, Debug)]
/// Fixed-advance metrics, used when no font backend is installed.
pub struct MonospaceMetrics {
    /// Advance of every character.
    pub char_width: i32,
    /// Height of a line.
    pub line_height: i32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self { Self { char_width: 7, line_height: 13 } }
}

impl TextMetrics for MonospaceMetrics {
    fn text_size(&self, _font: FontId, text: &str) -> Dimensioni {
        let mut lines = 0;
        let mut widest = 0;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count() as i32);
        }
        dim(widest * self.char_width, lines * self.line_height)
    }

    fn line_height(&self, _font: FontId) -> i32 { self.line_height }
}

#[derive(Clone, Debug)]
/// A single primitive.
pub enum Primitive {
    /// Solid rectangle, already clipped to its clip rect.
    Rect {
        /// Target rectangle.
        rect: Recti,
        /// Fill color.
        color: Color,
    },
    /// Rectangle outline.
    RectOutline {
        /// Outer bounds.
        rect: Recti,
        /// Stroke color.
        color: Color,
        /// Stroke width in pixels, drawn inward.
        thickness: i32,
    },
    /// Straight line segment.
    Line {
        /// Start point.
        from: Vec2i,
        /// End point.
        to: Vec2i,
        /// Stroke color.
        color: Color,
        /// Stroke width in pixels.
        thickness: i32,
    },
    /// Text run.
    Text {
        /// Top-left text position.
        pos: Vec2i,
        /// UTF-8 string to render.
        text: String,
        /// Font to use.
        font: FontId,
        /// Text color.
        color: Color,
    },
    /// Textured quad.
    Image {
        /// Target rectangle.
        rect: Recti,
        /// Normalized texture coordinates `[u0, v0, u1, v1]`.
        uv: [f32; 4],
        /// Tint color.
        color: Color,
    },
}

#[derive(Clone, Debug)]
/// A primitive tagged with its clip rect and texture.
pub struct DrawCommand {
    /// Geometry to draw.
    pub primitive: Primitive,
    /// Entry of the owning clip table.
    pub clip: ClipId,
    /// Texture sampled by the primitive.
    pub texture: TextureId,
}

fn line_bounds(from: Vec2i, to: Vec2i, thickness: i32) -> Recti {
    let half = (thickness + 1) / 2;
    let x0 = from.x.min(to.x) - half;
    let y0 = from.y.min(to.y) - half;
    let x1 = from.x.max(to.x) + half + 1;
    let y1 = from.y.max(to.y) + half + 1;
    rect(x0, y0, x1 - x0, y1 - y0)
}

#[derive(Default, Clone, Debug)]
/// Command list of one window.
pub struct DrawList {
    commands: Vec<DrawCommand>,
    clip_rects: Vec<Recti>,
    current: Option<ClipId>,
}

impl DrawList {
    /// Drops every command and clip entry.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_rects.clear();
        self.current = None;
    }

    /// Makes `rect` the clip rect of subsequent commands, reusing the last table entry when equal.
    pub fn set_clip_rect(&mut self, rect: Recti) -> ClipId {
        let id = match self.clip_rects.last() {
            Some(last) if same_rect(*last, rect) => ClipId((self.clip_rects.len() - 1) as u32),
            _ => {
                self.clip_rects.push(rect);
                ClipId((self.clip_rects.len() - 1) as u32)
            }
        };
        self.current = Some(id);
        id
    }

    /// Clip rect applied to new commands.
    pub fn current_clip_rect(&self) -> Recti {
        match self.current {
            Some(id) => self.clip_rects[id.index()],
            None => UNCLIPPED_RECT,
        }
    }

    fn clip_id(&mut self) -> ClipId {
        match self.current {
            Some(id) => id,
            None => self.set_clip_rect(UNCLIPPED_RECT),
        }
    }

    fn is_visible(&self, bounds: Recti) -> bool { !rect_is_empty(bounds) && !rect_is_empty(intersect_rects(bounds, self.current_clip_rect())) }

    fn push(&mut self, primitive: Primitive, texture: TextureId) {
        let clip = self.clip_id();
        self.commands.push(DrawCommand { primitive, clip, texture });
    }

    /// Solid rectangle, clipped to the current clip rect.
    pub fn add_rect(&mut self, r: Recti, color: Color) {
        let rect = intersect_rects(r, self.current_clip_rect());
        if !rect_is_empty(rect) {
            self.push(Primitive::Rect { rect, color }, TextureId::NONE);
        }
    }

    /// Rectangle outline with the stroke drawn inside `r`.
    pub fn add_rect_outline(&mut self, r: Recti, color: Color, thickness: i32) {
        if thickness > 0 && self.is_visible(r) {
            self.push(Primitive::RectOutline { rect: r, color, thickness }, TextureId::NONE);
        }
    }

    /// Line segment from `from` to `to`.
    pub fn add_line(&mut self, from: Vec2i, to: Vec2i, color: Color, thickness: i32) {
        if thickness > 0 && self.is_visible(line_bounds(from, to, thickness)) {
            self.push(Primitive::Line { from, to, color, thickness }, TextureId::NONE);
        }
    }

    /// Text run measured with `metrics` for culling.
    pub fn add_text(&mut self, pos: Vec2i, text: &str, font: FontId, color: Color, metrics: &dyn TextMetrics) {
        if text.is_empty() {
            return;
        }
        let size = metrics.text_size(font, text);
        if self.is_visible(rect(pos.x, pos.y, size.width, size.height)) {
            self.push(Primitive::Text { pos, text: text.to_string(), font, color }, TextureId::FONT_ATLAS);
        }
    }

    /// Textured quad.
    pub fn add_image(&mut self, r: Recti, uv: [f32; 4], texture: TextureId, color: Color) {
        if self.is_visible(r) {
            self.push(Primitive::Image { rect: r, uv, color }, texture);
        }
    }

    /// Recorded commands, in submission order.
    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    /// Clip table referenced by [`DrawCommand::clip`].
    pub fn clip_rects(&self) -> &[Recti] { &self.clip_rects }

    /// Number of recorded commands.
    pub fn len(&self) -> usize { self.commands.len() }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
}

#[derive(Clone, Debug)]
/// Run of consecutive commands sharing clip rect and texture.
pub struct DrawBatch {
    /// Clip id in the frame clip table.
    pub clip: ClipId,
    /// Resolved clip rect.
    pub clip_rect: Recti,
    /// Texture sampled by every command in the batch.
    pub texture: TextureId,
    /// Command range in [`FrameOutput::commands`].
    pub range: Range<usize>,
}

/// Trait implemented by render backends consuming [`FrameOutput`].
pub trait Renderer {
    /// Starts a frame of the given display size.
    fn begin(&mut self, display_size: Dimensioni);
    /// Draws `commands` scissored by `clip_rect`, sampling `texture`.
    fn draw_batch(&mut self, clip_rect: Recti, texture: TextureId, commands: &[DrawCommand]);
    /// Ends the frame.
    fn end(&mut self);
}

#[derive(Clone, Debug, Default)]
/// Renderable output of one frame: every window's commands, back to front.
pub struct FrameOutput {
    commands: Vec<DrawCommand>,
    clip_rects: Vec<Recti>,
    display_size: Vec2i,
    remap: Vec<u32>,
}

impl FrameOutput {
    pub(crate) fn new(display_size: Dimensioni) -> Self { Self { display_size: vec2(display_size.width, display_size.height), ..Self::default() } }

    pub(crate) fn append(&mut self, list: &DrawList) {
        self.remap.clear();
        for r in &list.clip_rects {
            let index = match self.clip_rects.last() {
                Some(last) if same_rect(*last, *r) => self.clip_rects.len() - 1,
                _ => {
                    self.clip_rects.push(*r);
                    self.clip_rects.len() - 1
                }
            };
            self.remap.push(index as u32);
        }
        for cmd in &list.commands {
            let clip = ClipId(self.remap[cmd.clip.index()]);
            self.commands.push(DrawCommand { primitive: cmd.primitive.clone(), clip, texture: cmd.texture });
        }
    }

    /// All commands, back to front.
    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    /// Global clip table.
    pub fn clip_rects(&self) -> &[Recti] { &self.clip_rects }

    /// Resolves a clip id of this output.
    pub fn clip_rect(&self, id: ClipId) -> Recti { self.clip_rects.get(id.index()).copied().unwrap_or(UNCLIPPED_RECT) }

    /// Display size given to [`Context::set_display_size`].
    pub fn display_size(&self) -> Dimensioni { dim(self.display_size.x, self.display_size.y) }

    /// Number of commands.
    pub fn len(&self) -> usize { self.commands.len() }

    /// Returns `true` when the frame draws nothing.
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// Groups consecutive commands sharing clip id and texture.
    pub fn batches(&self) -> Vec<DrawBatch> {
        let mut batches: Vec<DrawBatch> = Vec::new();
        for (i, cmd) in self.commands.iter().enumerate() {
            match batches.last_mut() {
                Some(batch) if batch.clip == cmd.clip && batch.texture == cmd.texture => batch.range.end = i + 1,
                _ => batches.push(DrawBatch {
                    clip: cmd.clip,
                    clip_rect: self.clip_rect(cmd.clip),
                    texture: cmd.texture,
                    range: i..i + 1,
                }),
            }
        }
        batches
    }

    /// Feeds every batch to `renderer`.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.begin(self.display_size());
        for batch in self.batches() {
            renderer.draw_batch(batch.clip_rect, batch.texture, &self.commands[batch.range.clone()]);
        }
        renderer.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> Color { color(255, 255, 255, 255) }

    #[test]
    fn rects_are_clipped_and_culled() {
        let mut list = DrawList::default();
        list.set_clip_rect(rect(0, 0, 100, 100));
        list.add_rect(rect(90, 90, 20, 20), white());
        list.add_rect(rect(200, 200, 10, 10), white());
        list.add_rect(rect(10, 10, 0, 10), white());
        assert_eq!(list.len(), 1);
        match &list.commands()[0].primitive {
            Primitive::Rect { rect, .. } => assert!(same_rect(*rect, crate::rect(90, 90, 10, 10))),
            _ => panic!("expected a rect"),
        }
    }

    #[test]
    fn text_outside_clip_is_culled() {
        let metrics = MonospaceMetrics::default();
        let mut list = DrawList::default();
        list.set_clip_rect(rect(0, 0, 50, 20));
        list.add_text(vec2(60, 0), "hidden", FontId::default(), white(), &metrics);
        list.add_text(vec2(40, 0), "partly", FontId::default(), white(), &metrics);
        assert_eq!(list.len(), 1);
        assert_eq!(list.commands()[0].texture, TextureId::FONT_ATLAS);
    }

    #[test]
    fn repeated_clip_rect_shares_an_id() {
        let mut list = DrawList::default();
        let a = list.set_clip_rect(rect(0, 0, 10, 10));
        let again = list.set_clip_rect(rect(0, 0, 10, 10));
        assert_eq!(a, again);
        let b = list.set_clip_rect(rect(5, 5, 10, 10));
        assert_ne!(a, b);
        let c = list.set_clip_rect(rect(0, 0, 10, 10));
        assert_ne!(b, c);
        assert_eq!(list.clip_rects().len(), 3);
        assert!(same_rect(list.clip_rects()[c.index()], rect(0, 0, 10, 10)));
    }

    #[test]
    fn many_clip_changes_grow_the_table_linearly() {
        let mut list = DrawList::default();
        for i in 0..1000 {
            list.set_clip_rect(rect(i, 0, 10, 10));
            list.set_clip_rect(rect(i, 0, 10, 10));
        }
        assert_eq!(list.clip_rects().len(), 1000);
    }

    #[test]
    fn output_remaps_clips_and_batches() {
        let mut back = DrawList::default();
        back.set_clip_rect(rect(0, 0, 100, 100));
        back.add_rect(rect(0, 0, 10, 10), white());
        back.add_rect(rect(10, 0, 10, 10), white());
        back.add_image(rect(0, 20, 10, 10), [0.0, 0.0, 1.0, 1.0], TextureId::new(7), white());

        let mut front = DrawList::default();
        front.set_clip_rect(rect(50, 50, 10, 10));
        front.add_rect(rect(50, 50, 5, 5), white());
        front.set_clip_rect(rect(0, 0, 100, 100));
        front.add_rect(rect(1, 1, 5, 5), white());

        let mut out = FrameOutput::new(dim(640, 480));
        out.append(&back);
        out.append(&front);
        assert_eq!(out.len(), 5);
        assert_eq!(out.clip_rects().len(), 3);

        let batches = out.batches();
        assert_eq!(batches.len(), 4);
        assert_eq!(batches[0].range, 0..2);
        assert_eq!(batches[1].texture, TextureId::new(7));
        assert!(same_rect(batches[2].clip_rect, rect(50, 50, 10, 10)));
        assert!(same_rect(batches[3].clip_rect, batches[0].clip_rect));
    }

    #[derive(Default)]
    struct CountingRenderer {
        begun: bool,
        batches: usize,
        commands: usize,
        ended: bool,
    }

    impl Renderer for CountingRenderer {
        fn begin(&mut self, _display_size: Dimensioni) { self.begun = true; }
        fn draw_batch(&mut self, _clip_rect: Recti, _texture: TextureId, commands: &[DrawCommand]) {
            self.batches += 1;
            self.commands += commands.len();
        }
        fn end(&mut self) { self.ended = true; }
    }

    #[test]
    fn render_visits_every_command() {
        let mut list = DrawList::default();
        list.add_rect(rect(0, 0, 4, 4), white());
        list.add_line(vec2(0, 0), vec2(10, 10), white(), 1);
        let mut out = FrameOutput::default();
        out.append(&list);
        let mut renderer = CountingRenderer::default();
        out.render(&mut renderer);
        assert!(renderer.begun && renderer.ended);
        assert_eq!(renderer.batches, 1);
        assert_eq!(renderer.commands, 2);
    }

    #[test]
    fn monospace_measures_lines() {
        let m = MonospaceMetrics { char_width: 8, line_height: 10 };
        let size = m.text_size(FontId::default(), "abc\nde");
        assert_eq!(size.width, 24);
        assert_eq!(size.height, 20);
    }
}

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
use std::cmp::max;

use crate::*;

/// Describes how an item width is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// Falls back to [`Style::item_width`].
    #[default]
    Auto,
    /// Always this many pixels.
    Fixed(i32),
    /// The space left on the current line, minus a margin.
    Remainder(i32),
}

impl SizePolicy {
    fn resolve(self, default_size: i32, available_space: i32) -> i32 {
        let resolved = match self {
            SizePolicy::Auto => default_size,
            SizePolicy::Fixed(value) => value,
            SizePolicy::Remainder(margin) => available_space.saturating_sub(margin),
        };
        resolved.max(0)
    }
}

#[derive(Clone, Default)]
struct GroupFrame {
    start: Vec2i,
    indent: i32,
    line_height: i32,
    prev_line_pos: Vec2i,
    prev_line_height: i32,
    max: Option<Vec2i>,
}

/// Cursor of a window's content region.
///
/// Items flow top to bottom. After an item the pen drops to the start of the next line,
/// `line height + spacing.y` below; [`LayoutCursor::same_line`] instead moves it back to the
/// right end of the previous item.
#[derive(Clone, Default)]
pub(crate) struct LayoutCursor {
    content: Recti,
    origin: Vec2i,
    position: Vec2i,
    prev_line_pos: Vec2i,
    line_height: i32,
    prev_line_height: i32,
    indent: i32,
    max: Option<Vec2i>,
    item_widths: Vec<SizePolicy>,
    groups: Vec<GroupFrame>,
    last_rect: Recti,
}

impl LayoutCursor {
    pub fn reset(&mut self, content: Recti, scroll: Vec2i) {
        self.content = content;
        self.origin = vec2(content.x - scroll.x, content.y - scroll.y);
        self.position = self.origin;
        self.prev_line_pos = self.origin;
        self.line_height = 0;
        self.prev_line_height = 0;
        self.indent = 0;
        self.max = None;
        self.item_widths.clear();
        self.groups.clear();
        self.last_rect = rect(self.origin.x, self.origin.y, 0, 0);
    }

    fn line_start_x(&self) -> i32 { self.origin.x + self.indent }

    pub fn position(&self) -> Vec2i { self.position }

    pub fn set_position(&mut self, pos: Vec2i) { self.position = pos; }

    pub fn content(&self) -> Recti { self.content }

    pub fn last_rect(&self) -> Recti { self.last_rect }

    /// Reserves `size` at the pen and moves the pen to the next line.
    pub fn advance(&mut self, size: Dimensioni, spacing: Vec2i) -> Recti {
        let pos = self.position;
        let res = rect(pos.x, pos.y, size.width.max(0), size.height.max(0));
        let line_height = max(self.line_height, res.height);

        self.prev_line_pos = vec2(pos.x + res.width, pos.y);
        self.prev_line_height = line_height;
        self.position = vec2(self.line_start_x(), pos.y + line_height + spacing.y);
        self.line_height = 0;

        let corner = vec2(res.x + res.width, res.y + res.height);
        self.max = Some(match self.max {
            None => corner,
            Some(m) => vec2(max(m.x, corner.x), max(m.y, corner.y)),
        });
        self.last_rect = res;
        res
    }

    /// Keeps the next item on the line of the previous one.
    ///
    /// With `offset` the item starts `offset` pixels from the content origin, otherwise
    /// `spacing` pixels after the end of the previous item.
    pub fn same_line(&mut self, offset: Option<i32>, spacing: i32) {
        self.position.x = match offset {
            Some(offset) => self.origin.x + offset,
            None => self.prev_line_pos.x + spacing,
        };
        self.position.y = self.prev_line_pos.y;
        self.line_height = self.prev_line_height;
    }

    /// Ends the current line; an empty line is `line_height` tall.
    pub fn new_line(&mut self, line_height: i32, spacing: Vec2i) {
        if self.position.x != self.line_start_x() || self.line_height > 0 {
            let h = self.line_height;
            self.position = vec2(self.line_start_x(), self.position.y + h + spacing.y);
            self.line_height = 0;
        } else {
            self.advance(dim(0, line_height), spacing);
        }
    }

    pub fn indent(&mut self, width: i32) {
        let at_line_start = self.position.x == self.line_start_x();
        self.indent += width;
        if at_line_start {
            self.position.x = self.line_start_x();
        }
    }

    pub fn push_item_width(&mut self, width: SizePolicy) { self.item_widths.push(width); }

    pub fn pop_item_width(&mut self) -> Option<SizePolicy> { self.item_widths.pop() }

    pub fn item_width_depth(&self) -> usize { self.item_widths.len() }

    pub fn current_item_width(&self) -> Option<SizePolicy> { self.item_widths.last().copied() }

    pub fn item_width(&self, default_width: i32) -> i32 {
        let available = self.content.x + self.content.width - self.position.x;
        self.item_widths.last().copied().unwrap_or_default().resolve(default_width, available)
    }

    pub fn push_group(&mut self) {
        self.groups.push(GroupFrame {
            start: self.position,
            indent: self.indent,
            line_height: self.line_height,
            prev_line_pos: self.prev_line_pos,
            prev_line_height: self.prev_line_height,
            max: self.max.take(),
        });
        self.indent = self.position.x - self.origin.x;
        self.line_height = 0;
    }

    /// Closes the innermost group and registers its bounds as one item of the enclosing line.
    pub fn pop_group(&mut self, spacing: Vec2i) -> Option<Recti> {
        let frame = self.groups.pop()?;
        let inner_max = self.max.unwrap_or(frame.start);
        let size = dim(max(inner_max.x - frame.start.x, 0), max(inner_max.y - frame.start.y, 0));

        self.indent = frame.indent;
        self.prev_line_pos = frame.prev_line_pos;
        self.prev_line_height = frame.prev_line_height;
        self.line_height = frame.line_height;
        self.position = frame.start;
        self.max = frame.max;
        Some(self.advance(size, spacing))
    }

    pub fn group_depth(&self) -> usize { self.groups.len() }

    /// Extent of the items placed since the last reset, relative to the content origin.
    pub fn content_size(&self) -> Dimensioni {
        match self.max {
            Some(m) => dim(max(m.x - self.origin.x, 0), max(m.y - self.origin.y, 0)),
            None => dim(0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_at(x: i32, y: i32) -> LayoutCursor {
        let mut cursor = LayoutCursor::default();
        cursor.reset(rect(x, y, 200, 100), vec2(0, 0));
        cursor
    }

    fn assert_rect_eq(actual: Recti, expected: (i32, i32, i32, i32)) {
        assert_eq!((actual.x, actual.y, actual.width, actual.height), expected);
    }

    #[test]
    fn same_line_continues_after_previous_item() {
        let no_spacing = vec2(0, 0);
        let mut cursor = cursor_at(10, 20);
        let a = cursor.advance(dim(30, 12), no_spacing);
        cursor.same_line(None, 0);
        let b = cursor.advance(dim(40, 12), no_spacing);
        let c = cursor.advance(dim(10, 12), no_spacing);
        assert_rect_eq(a, (10, 20, 30, 12));
        assert_rect_eq(b, (40, 20, 40, 12));
        assert_rect_eq(c, (10, 32, 10, 12));
    }

    #[test]
    fn spacing_is_applied_between_lines_and_items() {
        let spacing = vec2(4, 3);
        let mut cursor = cursor_at(0, 0);
        cursor.advance(dim(30, 10), spacing);
        cursor.same_line(None, spacing.x);
        let b = cursor.advance(dim(30, 16), spacing);
        let c = cursor.advance(dim(30, 10), spacing);
        assert_rect_eq(b, (34, 0, 30, 16));
        assert_rect_eq(c, (0, 19, 30, 10));
    }

    #[test]
    fn same_line_with_offset_is_relative_to_origin() {
        let mut cursor = cursor_at(5, 5);
        cursor.advance(dim(10, 10), vec2(0, 0));
        cursor.same_line(Some(100), 0);
        let b = cursor.advance(dim(10, 10), vec2(0, 0));
        assert_rect_eq(b, (105, 5, 10, 10));
    }

    #[test]
    fn scroll_translates_origin() {
        let mut cursor = LayoutCursor::default();
        cursor.reset(rect(0, 0, 100, 100), vec2(0, 40));
        let a = cursor.advance(dim(10, 10), vec2(0, 0));
        assert_rect_eq(a, (0, -40, 10, 10));
        assert_eq!(cursor.content_size().height, 10);
    }

    #[test]
    fn group_registers_as_single_item() {
        let spacing = vec2(0, 0);
        let mut cursor = cursor_at(0, 0);
        cursor.push_group();
        cursor.advance(dim(50, 10), spacing);
        cursor.advance(dim(20, 10), spacing);
        let group = cursor.pop_group(spacing).expect("group");
        assert_rect_eq(group, (0, 0, 50, 20));
        cursor.same_line(None, 0);
        let next = cursor.advance(dim(10, 10), spacing);
        assert_rect_eq(next, (50, 0, 10, 10));
        let below = cursor.advance(dim(10, 10), spacing);
        assert_rect_eq(below, (0, 20, 10, 10));
    }

    #[test]
    fn group_lines_start_at_group_x() {
        let spacing = vec2(0, 0);
        let mut cursor = cursor_at(0, 0);
        cursor.advance(dim(30, 10), spacing);
        cursor.same_line(None, 0);
        cursor.push_group();
        let first = cursor.advance(dim(10, 10), spacing);
        let second = cursor.advance(dim(10, 10), spacing);
        cursor.pop_group(spacing);
        assert_rect_eq(first, (30, 0, 10, 10));
        assert_rect_eq(second, (30, 10, 10, 10));
        assert_eq!(cursor.position().x, 0);
        assert_eq!(cursor.position().y, 20);
    }

    #[test]
    fn indent_moves_line_start() {
        let spacing = vec2(0, 0);
        let mut cursor = cursor_at(0, 0);
        cursor.indent(24);
        let a = cursor.advance(dim(10, 10), spacing);
        cursor.indent(-24);
        let b = cursor.advance(dim(10, 10), spacing);
        assert_eq!(a.x, 24);
        assert_eq!(b.x, 0);
    }

    #[test]
    fn item_width_policies() {
        let mut cursor = cursor_at(0, 0);
        assert_eq!(cursor.item_width(68), 68);
        cursor.push_item_width(SizePolicy::Fixed(120));
        assert_eq!(cursor.item_width(68), 120);
        cursor.push_item_width(SizePolicy::Remainder(10));
        assert_eq!(cursor.item_width(68), 190);
        cursor.pop_item_width();
        cursor.pop_item_width();
        assert_eq!(cursor.item_width_depth(), 0);
    }

    #[test]
    fn empty_new_line_advances_by_line_height() {
        let mut cursor = cursor_at(0, 0);
        cursor.new_line(13, vec2(0, 2));
        assert_eq!(cursor.position().y, 15);
    }
}

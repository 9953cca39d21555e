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
//! Built-in widgets composed from the layout cursor, [`Context::item_behavior`] and the draw list.
use crate::*;

fn fill_color(res: &Response, base: ControlColor) -> ControlColor {
    let mut color = base;
    if res.held {
        color.focus();
    } else if res.hovered {
        color.hover();
    }
    color
}

impl Context {
    fn draw_control_frame(&mut self, res: &Response, base: ControlColor, opt: WidgetOption) {
        if opt.has_no_frame() {
            return;
        }
        let style = self.style;
        self.add_rect(res.rect, style.color(fill_color(res, base)));
        let border = if res.focused { ControlColor::BaseFocus } else { ControlColor::Border };
        self.add_rect_outline(res.rect, style.color(border), 1);
    }

    fn draw_control_text(&mut self, text: &str, r: Recti, color: ControlColor, opt: WidgetOption) {
        let style = self.style;
        let size = self.text_size(text);
        let y = r.y + (r.height - size.height) / 2;
        let x = if opt.is_aligned_center() {
            r.x + (r.width - size.width) / 2
        } else if opt.is_aligned_right() {
            r.x + r.width - size.width - style.padding
        } else {
            r.x + style.padding
        };
        self.with_clip_rect(r, true, |ctx| ctx.add_text(vec2(x, y), text, style.font, style.color(color)));
    }

    /// Draws a line of text and advances the cursor past it.
    pub fn label(&mut self, text: &str) {
        let style = self.style;
        let size = self.text_size(text);
        let r = self.advance_cursor(size);
        self.add_text(vec2(r.x, r.y), text, style.font, style.color(ControlColor::Text));
    }

    /// Push button with centered text.
    pub fn button(&mut self, label: &str) -> Response { self.button_ex(label, WidgetOption::ALIGN_CENTER) }

    /// Push button. The part of `label` after `##` only contributes to the id.
    pub fn button_ex(&mut self, label: &str, opt: WidgetOption) -> Response {
        let id = self.get_label_id(label);
        let text = label_text(label);
        let pad = self.style.padding;
        let text_size = self.text_size(text);
        let width = if self.current_item_width_is_auto() { text_size.width + pad * 2 } else { self.calc_item_width() };
        let r = self.advance_cursor(dim(width, self.line_height() + pad * 2));
        let res = self.item_behavior(id, r, opt);
        self.draw_control_frame(&res, ControlColor::Button, opt);
        self.draw_control_text(text, r, ControlColor::Text, opt);
        res
    }

    /// Check box toggling `value` on click.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> Response {
        let id = self.get_label_id(label);
        let text = label_text(label);
        let box_size = self.line_height() + self.style.padding;
        let text_size = self.text_size(text);
        let gap = self.style.item_spacing.x;
        let r = self.advance_cursor(dim(box_size + gap + text_size.width, box_size));
        let mut res = self.item_behavior(id, r, WidgetOption::NONE);
        if res.clicked {
            *value = !*value;
        }
        let check = rect(r.x, r.y, box_size, box_size);
        let style = self.style;
        let frame = Response { rect: check, ..res };
        self.draw_control_frame(&frame, ControlColor::Base, WidgetOption::NONE);
        if *value {
            self.add_rect(expand_rect(check, -3), style.color(ControlColor::CheckMark));
        }
        let text_rect = rect(r.x + box_size, r.y, r.width - box_size, box_size);
        self.draw_control_text(text, text_rect, ControlColor::Text, WidgetOption::NONE);
        res.rect = r;
        res
    }

    /// Collapsible header. Runs `f` with an indent and its own id scope while open.
    ///
    /// The open flag lives in the state store under the node id, so it survives frames as long
    /// as the owning window is submitted. Returns whether the node is open.
    pub fn tree_node<F: FnOnce(&mut Self)>(&mut self, label: &str, f: F) -> bool {
        let id = self.get_label_id(label);
        let text = label_text(label);
        let pad = self.style.padding;
        let width = self.content_region_avail().width;
        let r = self.advance_cursor(dim(width, self.line_height() + pad * 2));
        let res = self.item_behavior(id, r, WidgetOption::NONE);
        let open = {
            let open = self.get_or_create::<bool>(id);
            if res.clicked {
                *open = !*open;
            }
            *open
        };

        if res.hovered || res.held {
            self.draw_control_frame(&res, ControlColor::Button, WidgetOption::NONE);
        }
        let marker = if open { "-" } else { "+" };
        let indent = self.style.indent;
        self.draw_control_text(marker, rect(r.x, r.y, indent, r.height), ControlColor::Text, WidgetOption::NONE);
        self.draw_control_text(text, rect(r.x + indent - pad, r.y, r.width - indent + pad, r.height), ControlColor::Text, WidgetOption::NONE);

        if open {
            self.with_id(&id, |ctx| ctx.indented(f));
        }
        open
    }

    /// Horizontal rule across the content region.
    pub fn separator(&mut self) {
        let width = self.content_region_avail().width;
        let r = self.advance_cursor(dim(width, 1));
        let color = self.style.color(ControlColor::Border);
        self.add_rect(r, color);
    }

    fn current_item_width_is_auto(&self) -> bool {
        let id = self.current_window_id().unwrap_or(Id::NONE);
        self.windows.get(&id).is_none_or(|w| w.layout.current_item_width().is_none_or(|p| p == SizePolicy::Auto))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<F: FnMut(&mut Context)>(ctx: &mut Context, mut f: F) -> FrameOutput {
        ctx.frame(|ctx| {
            ctx.window("Widgets", rect(0, 0, 300, 300), WindowOption::NO_TITLE, |ctx| f(ctx));
        })
    }

    fn texts(out: &FrameOutput) -> Vec<String> {
        out.commands()
            .iter()
            .filter_map(|c| match &c.primitive {
                Primitive::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn label_advances_by_text_size() {
        let mut ctx = Context::new();
        let out = run(&mut ctx, |ctx| {
            ctx.label("hello");
            let r = ctx.last_item_rect();
            assert_eq!((r.x, r.y, r.width, r.height), (8, 8, 35, 13));
        });
        assert_eq!(texts(&out), vec!["hello".to_string()]);
    }

    #[test]
    fn button_reports_click_on_release() {
        let mut ctx = Context::new();
        ctx.input.mousedown(12, 12, MouseButton::LEFT);
        run(&mut ctx, |ctx| assert!(ctx.button("Press").pressed));
        ctx.input.mouseup(12, 12, MouseButton::LEFT);
        run(&mut ctx, |ctx| assert!(ctx.button("Press").clicked));
    }

    #[test]
    fn hidden_label_suffix_changes_the_id_only() {
        let mut ctx = Context::new();
        let mut ids = Vec::new();
        let out = run(&mut ctx, |ctx| {
            ids.push(ctx.button("OK##first").id);
            ids.push(ctx.button("OK##second").id);
        });
        assert_ne!(ids[0], ids[1]);
        assert_eq!(texts(&out), vec!["OK".to_string(), "OK".to_string()]);
    }

    #[test]
    fn checkbox_toggles_its_value() {
        let mut ctx = Context::new();
        let mut checked = false;
        ctx.input.mousedown(12, 12, MouseButton::LEFT);
        run(&mut ctx, |ctx| {
            ctx.checkbox("Enabled", &mut checked);
        });
        ctx.input.mouseup(12, 12, MouseButton::LEFT);
        run(&mut ctx, |ctx| {
            assert!(ctx.checkbox("Enabled", &mut checked).clicked);
        });
        assert!(checked);
    }

    #[test]
    fn tree_node_remembers_open_state_and_scopes_children() {
        let mut ctx = Context::new();
        let mut children = Vec::new();
        ctx.input.mousedown(20, 12, MouseButton::LEFT);
        run(&mut ctx, |ctx| {
            ctx.tree_node("Node", |_| {});
        });
        ctx.input.mouseup(20, 12, MouseButton::LEFT);
        run(&mut ctx, |ctx| {
            ctx.tree_node("Node", |_| {});
        });

        ctx.input.mousemove(250, 250);
        run(&mut ctx, |ctx| {
            let open = ctx.tree_node("Node", |ctx| {
                children.push(ctx.get_id("child"));
                assert_eq!(ctx.cursor_pos().x, 8 + ctx.style().indent);
            });
            assert!(open);
            children.push(ctx.get_id("child"));
            let _ = ctx.tree_node("Other", |_| panic!("closed nodes do not run their body"));
        });
        assert_ne!(children[0], children[1]);
    }

    #[test]
    fn separator_spans_the_content_width() {
        let mut ctx = Context::new();
        run(&mut ctx, |ctx| {
            ctx.separator();
            let r = ctx.last_item_rect();
            assert_eq!((r.width, r.height), (284, 1));
        });
    }
}

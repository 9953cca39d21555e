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
#![deny(missing_docs)]
//! `imcore` is the per-frame context engine of an immediate-mode GUI.
//!
//! An application calls widget functions every frame. The [`Context`] rebuilds layout, input
//! response and a flat draw-command stream from those calls, while widgets keep memory across
//! frames through scoped [`Id`]s and the [`StateStore`]. Rendering, font rasterization and
//! platform input capture stay outside the crate: the backend fills an [`Input`] snapshot
//! before [`Context::new_frame`] and consumes the [`FrameOutput`] returned by
//! [`Context::end_frame`].
//!
//! ```
//! use imcore::*;
//!
//! let mut ctx = Context::new();
//! ctx.input.mousemove(40, 40);
//! ctx.new_frame();
//! ctx.window("Hello", rect(10, 10, 200, 120), WindowOption::NONE, |ctx| {
//!     ctx.label("immediate mode");
//!     if ctx.button("Press").clicked {
//!         // react to the click
//!     }
//! });
//! let output = ctx.end_frame();
//! assert!(!output.is_empty());
//! ```

mod context;
mod draw_list;
mod id;
mod input;
mod interaction;
mod layout;
mod settings;
mod store;
mod widgets;
mod window;

pub use context::{Context, ContextConfig, ContractViolation, FramePhase, StackKind};
pub use draw_list::{ClipId, DrawBatch, DrawCommand, DrawList, FontId, FrameOutput, MonospaceMetrics, Primitive, Renderer, TextMetrics, TextureId};
pub use id::{Id, IdHasher, IdKey, IdPtr, IdStack, label_text};
pub use input::{Input, KeyCode, KeyMode, MouseButton};
pub use interaction::Response;
pub use layout::SizePolicy;
pub use rs_math3d::{Dimensioni, Recti, Vec2i};
pub use settings::{SettingsError, SettingsStore, WindowSettings};
pub use store::{StateHandle, StateStore};
pub use window::{WindowHandle, WindowOption};

use bitflags::bitflags;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u32)]
/// Identifiers for each of the built-in style colors.
pub enum ControlColor {
    /// Default text color.
    Text = 0,
    /// Outline/border color.
    Border = 1,
    /// Window background color.
    WindowBG = 2,
    /// Window title background color.
    TitleBG = 3,
    /// Title background of the window owning keyboard navigation.
    TitleBGActive = 4,
    /// Window title text color.
    TitleText = 5,
    /// Default button color.
    Button = 6,
    /// Button color while the pointer hovers the widget.
    ButtonHover = 7,
    /// Button color while the widget is held.
    ButtonActive = 8,
    /// Default base color of frames (checkboxes, fields).
    Base = 9,
    /// Base color while the pointer hovers the widget.
    BaseHover = 10,
    /// Base color for focused widgets.
    BaseFocus = 11,
    /// Base frame of scrollbars.
    ScrollBase = 12,
    /// Thumb of scrollbars.
    ScrollThumb = 13,
    /// Resize grip in the bottom-right corner of windows.
    ResizeGrip = 14,
    /// Mark drawn inside checked boxes.
    CheckMark = 15,
}

impl ControlColor {
    /// Number of color entries in [`Style::colors`].
    pub const COUNT: usize = 16;

    /// Promotes the enum to the hover variant when relevant.
    pub fn hover(&mut self) {
        *self = match self {
            Self::Base => Self::BaseHover,
            Self::Button => Self::ButtonHover,
            _ => *self,
        }
    }

    /// Promotes the enum to the focused/held variant when relevant.
    pub fn focus(&mut self) {
        *self = match self {
            Self::Base | Self::BaseHover => Self::BaseFocus,
            Self::Button | Self::ButtonHover => Self::ButtonActive,
            _ => *self,
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Widget specific options that influence interactivity and drawing.
    pub struct WidgetOption : u32 {
        /// Centers the widget text inside its rect.
        const ALIGN_CENTER = 1;
        /// Aligns the widget text to the right side of its rect.
        const ALIGN_RIGHT = 2;
        /// Disables interaction for the widget: never hot, never active.
        const NO_INTERACT = 4;
        /// Draws the widget without its frame/background.
        const NO_FRAME = 128;
        /// Excludes the widget from keyboard focus and Tab navigation.
        const NO_FOCUS = 256;
        /// No special options.
        const NONE = 0;
    }
}

impl WidgetOption {
    /// Returns `true` if the widget is non-interactive.
    pub fn is_not_interactive(&self) -> bool { self.intersects(WidgetOption::NO_INTERACT) }
    /// Returns `true` if the widget shouldn't draw its frame.
    pub fn has_no_frame(&self) -> bool { self.intersects(WidgetOption::NO_FRAME) }
    /// Returns `true` if the widget can take keyboard focus.
    pub fn is_focusable(&self) -> bool { !self.intersects(WidgetOption::NO_FOCUS | WidgetOption::NO_INTERACT) }
    /// Returns `true` if the widget prefers right alignment.
    pub fn is_aligned_right(&self) -> bool { self.intersects(WidgetOption::ALIGN_RIGHT) }
    /// Returns `true` if the widget prefers centered alignment.
    pub fn is_aligned_center(&self) -> bool { self.intersects(WidgetOption::ALIGN_CENTER) }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(Copy, Clone, Debug)]
/// Collection of metrics and colors that drive layout and decoration.
pub struct Style {
    /// Font used for all text emitted by the core and the reference widgets.
    pub font: FontId,
    /// Width given to items when no item width is pushed.
    pub item_width: i32,
    /// Inner padding between a widget frame and its text.
    pub padding: i32,
    /// Horizontal and vertical spacing between items.
    pub item_spacing: Vec2i,
    /// Padding between a window border and its content region.
    pub window_padding: Vec2i,
    /// Indentation applied by [`Context::indent`] when no width is given.
    pub indent: i32,
    /// Height of window title bars.
    pub title_height: i32,
    /// Width of scrollbars.
    pub scrollbar_size: i32,
    /// Minimum length of scrollbar thumbs.
    pub thumb_size: i32,
    /// Smallest size a window can be resized to.
    pub min_window_size: Vec2i,
    /// Palette indexed by [`ControlColor`].
    pub colors: [Color; ControlColor::COUNT],
}

impl Style {
    /// Returns the palette entry for `id`.
    pub fn color(&self, id: ControlColor) -> Color { self.colors[id as usize] }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font: FontId::default(),
            item_width: 68,
            padding: 5,
            item_spacing: vec2(4, 4),
            window_padding: vec2(8, 8),
            indent: 24,
            title_height: 24,
            scrollbar_size: 12,
            thumb_size: 8,
            min_window_size: vec2(32, 32),
            colors: [
                color(230, 230, 230, 255),
                color(25, 25, 25, 255),
                color(50, 50, 50, 255),
                color(25, 25, 25, 255),
                color(45, 60, 90, 255),
                color(240, 240, 240, 255),
                color(75, 75, 75, 255),
                color(95, 95, 95, 255),
                color(115, 115, 115, 255),
                color(30, 30, 30, 255),
                color(35, 35, 35, 255),
                color(40, 40, 40, 255),
                color(43, 43, 43, 255),
                color(30, 30, 30, 255),
                color(90, 90, 90, 255),
                color(230, 230, 230, 255),
            ],
        }
    }
}

#[derive(Copy, Clone, Debug)]
/// A style metric that can be overridden for a scope with [`Context::push_style_var`].
pub enum StyleVar {
    /// Overrides [`Style::item_width`].
    ItemWidth(i32),
    /// Overrides [`Style::padding`].
    Padding(i32),
    /// Overrides [`Style::item_spacing`].
    ItemSpacing(Vec2i),
    /// Overrides [`Style::window_padding`].
    WindowPadding(Vec2i),
    /// Overrides [`Style::indent`].
    Indent(i32),
    /// Overrides [`Style::scrollbar_size`].
    ScrollbarSize(i32),
}

impl StyleVar {
    /// Writes the value into `style` and returns the value it replaced.
    pub(crate) fn apply(self, style: &mut Style) -> StyleVar {
        match self {
            StyleVar::ItemWidth(v) => StyleVar::ItemWidth(std::mem::replace(&mut style.item_width, v)),
            StyleVar::Padding(v) => StyleVar::Padding(std::mem::replace(&mut style.padding, v)),
            StyleVar::ItemSpacing(v) => StyleVar::ItemSpacing(std::mem::replace(&mut style.item_spacing, v)),
            StyleVar::WindowPadding(v) => StyleVar::WindowPadding(std::mem::replace(&mut style.window_padding, v)),
            StyleVar::Indent(v) => StyleVar::Indent(std::mem::replace(&mut style.indent, v)),
            StyleVar::ScrollbarSize(v) => StyleVar::ScrollbarSize(std::mem::replace(&mut style.scrollbar_size, v)),
        }
    }
}

/// Convenience constructor for [`Vec2i`].
pub fn vec2(x: i32, y: i32) -> Vec2i { Vec2i { x, y } }

/// Convenience constructor for [`Recti`].
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Recti { Recti { x, y, width: w, height: h } }

/// Convenience constructor for [`Dimensioni`].
pub fn dim(width: i32, height: i32) -> Dimensioni { Dimensioni::new(width, height) }

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

/// Expands (or shrinks) a rectangle uniformly on all sides.
pub fn expand_rect(r: Recti, n: i32) -> Recti { rect(r.x - n, r.y - n, r.width + n * 2, r.height + n * 2) }

/// Returns `true` if the rectangle covers no pixel.
pub fn rect_is_empty(r: Recti) -> bool { r.width <= 0 || r.height <= 0 }

/// Half-open point test: the left/top edges are inside, the right/bottom edges are not.
pub fn rect_contains(r: Recti, p: Vec2i) -> bool { p.x >= r.x && p.y >= r.y && p.x < r.x + r.width && p.y < r.y + r.height }

/// Intersection of two rectangles. Disjoint inputs yield a zero-sized rect anchored inside `a`.
pub fn intersect_rects(a: Recti, b: Recti) -> Recti {
    let x0 = a.x.max(b.x);
    let y0 = a.y.max(b.y);
    let x1 = a.x.saturating_add(a.width).min(b.x.saturating_add(b.width));
    let y1 = a.y.saturating_add(a.height).min(b.y.saturating_add(b.height));
    rect(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
}

/// Returns `true` if both rectangles have identical origin and size.
pub fn same_rect(a: Recti, b: Recti) -> bool { a.x == b.x && a.y == b.y && a.width == b.width && a.height == b.height }

/// Rect covering the whole `i32` plane; used where no clipping applies.
pub(crate) static UNCLIPPED_RECT: Recti = Recti {
    x: 0,
    y: 0,
    width: i32::MAX,
    height: i32::MAX,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_disjoint_is_empty() {
        let r = intersect_rects(rect(0, 0, 10, 10), rect(20, 20, 5, 5));
        assert!(rect_is_empty(r));
    }

    #[test]
    fn intersect_overlap() {
        let r = intersect_rects(rect(0, 0, 10, 10), rect(5, 2, 10, 4));
        assert!(same_rect(r, rect(5, 2, 5, 4)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = rect(0, 0, 10, 10);
        assert!(rect_contains(r, vec2(0, 0)));
        assert!(rect_contains(r, vec2(9, 9)));
        assert!(!rect_contains(r, vec2(10, 5)));
        assert!(!rect_contains(r, vec2(5, 10)));
    }

    #[test]
    fn style_var_apply_returns_previous() {
        let mut style = Style::default();
        let prev = StyleVar::Indent(40).apply(&mut style);
        assert_eq!(style.indent, 40);
        match prev {
            StyleVar::Indent(v) => assert_eq!(v, 24),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn control_color_promotions() {
        let mut c = ControlColor::Button;
        c.hover();
        assert_eq!(c, ControlColor::ButtonHover);
        c.focus();
        assert_eq!(c, ControlColor::ButtonActive);
    }
}

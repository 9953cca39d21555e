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
//! Hot / active / focus resolution.
//!
//! Hit testing happens inline: each widget asks for hot status the moment it is submitted.
//! A widget is only eligible while its window is the topmost window under the pointer, so a
//! window in front always wins over the windows behind it regardless of submission order.

use crate::*;

/// Interaction result of one widget for the current frame.
#[derive(Copy, Clone, Debug, Default)]
pub struct Response {
    /// Id the widget was submitted with.
    pub id: Id,
    /// Rect the widget occupies.
    pub rect: Recti,
    /// The widget is hot: pointer over it and nothing else takes precedence.
    pub hovered: bool,
    /// The widget became active this frame.
    pub pressed: bool,
    /// The widget is active and the primary button is held.
    pub held: bool,
    /// The widget stopped being active this frame.
    pub released: bool,
    /// Released while hovered, or activated from the keyboard.
    pub clicked: bool,
    /// The widget has keyboard focus.
    pub focused: bool,
    /// The widget was submitted disabled.
    pub disabled: bool,
    /// Pointer movement while held, once past the drag threshold.
    pub drag_delta: Vec2i,
}

#[derive(Copy, Clone, Default)]
pub(crate) struct InteractionState {
    pub hot: Id,
    pub hot_window: Id,
    pub active: Id,
    pub active_window: Id,
    pub active_seen: bool,
    pub active_claimed_this_frame: bool,
    pub activated_by_key: bool,
    pub press_pos: Vec2i,
    pub dragging: bool,
    pub pressed_on_item: bool,
    pub focus: Id,
    pub focus_window: Id,
    pub nav_window: Id,
    pub hovered_window: Id,
}

impl InteractionState {
    pub fn begin_frame(&mut self) {
        self.hot = Id::NONE;
        self.hot_window = Id::NONE;
        self.active_seen = false;
        self.active_claimed_this_frame = false;
        self.pressed_on_item = false;
    }

    pub fn clear_active(&mut self) {
        self.active = Id::NONE;
        self.active_window = Id::NONE;
        self.activated_by_key = false;
        self.dragging = false;
    }

    pub fn clear_focus(&mut self) {
        self.focus = Id::NONE;
        self.focus_window = Id::NONE;
    }

    /// Takes back an active id claimed this frame, with the focus and press that came with it.
    pub fn revoke_active(&mut self) {
        if self.focus == self.active {
            self.clear_focus();
        }
        self.clear_active();
        self.pressed_on_item = false;
    }

    /// Drops every id owned by `window`.
    pub fn forget_window(&mut self, window: Id) {
        if self.hot_window == window {
            self.hot = Id::NONE;
            self.hot_window = Id::NONE;
        }
        if self.active_window == window {
            self.clear_active();
        }
        if self.focus_window == window {
            self.clear_focus();
        }
        if self.nav_window == window {
            self.nav_window = Id::NONE;
        }
        if self.hovered_window == window {
            self.hovered_window = Id::NONE;
        }
    }
}

fn as_option(id: Id) -> Option<Id> { if id.is_none() { None } else { Some(id) } }

impl Context {
    /// Widget under the pointer this frame.
    pub fn hot_id(&self) -> Option<Id> { as_option(self.interaction.hot) }

    /// Widget being pressed or dragged.
    pub fn active_id(&self) -> Option<Id> { as_option(self.interaction.active) }

    /// Widget holding keyboard focus.
    pub fn focus_id(&self) -> Option<Id> { as_option(self.interaction.focus) }

    /// Topmost window under the pointer.
    pub fn hovered_window(&self) -> Option<Id> { as_option(self.interaction.hovered_window) }

    /// Window that received the last click and owns Tab navigation.
    pub fn nav_window(&self) -> Option<Id> { as_option(self.interaction.nav_window) }

    pub(crate) fn update_hovered_window(&mut self) {
        let mouse = self.input.mouse_pos();
        let frame = self.frame;
        let style = &self.style;
        let windows = &self.windows;
        self.interaction.hovered_window = self
            .z_order
            .iter()
            .rev()
            .copied()
            .find(|id| {
                windows
                    .get(id)
                    .is_some_and(|w| w.is_live(frame) && !w.options.has_no_inputs() && rect_contains(w.visible_rect(style), mouse))
            })
            .unwrap_or(Id::NONE);
    }

    /// Makes `id` hot if the pointer is over `rect` and nothing with higher priority claims it.
    ///
    /// The pointer must be inside `rect` intersected with the current clip rect, the current
    /// window must be the topmost window under the pointer and no other widget may be active.
    pub fn set_hot_if_eligible(&mut self, id: Id, rect: Recti) -> bool {
        let window = self.expect_window("set_hot_if_eligible");
        if id.is_none() || self.is_disabled() {
            return false;
        }
        let visible = intersect_rects(rect, self.windows[&window].current_clip_rect());
        if !rect_contains(visible, self.input.mouse_pos()) {
            return false;
        }
        let st = self.interaction;
        if st.hovered_window != window {
            return false;
        }
        let depth = self.z_index(window).unwrap_or(0);
        if !st.active.is_none() && st.active != id {
            let claimed_below = st.active_claimed_this_frame && self.z_index(st.active_window).unwrap_or(0) < depth;
            if !claimed_below {
                return false;
            }
            log::trace!("active {:?} revoked by {:?} in a window above", st.active, id);
            self.interaction.revoke_active();
        }
        if !st.hot.is_none() && st.hot_window != window && depth < self.z_index(st.hot_window).unwrap_or(0) {
            return false;
        }
        self.interaction.hot = id;
        self.interaction.hot_window = window;
        true
    }

    /// Makes `id` the active widget on a primary press while hot, or on Return while focused.
    ///
    /// Returns `true` if `id` is active after the call. A widget registered as focusable this
    /// frame also receives keyboard focus.
    pub fn try_claim_active(&mut self, id: Id) -> bool {
        let window = self.expect_window("try_claim_active");
        if id.is_none() || self.is_disabled() {
            return false;
        }
        if self.interaction.active == id {
            if !self.interaction.activated_by_key && !self.input.is_mouse_down(MouseButton::LEFT) {
                self.interaction.clear_active();
                return false;
            }
            self.interaction.active_seen = true;
            return true;
        }
        if !self.interaction.active.is_none() {
            return false;
        }
        let by_mouse = self.interaction.hot == id && self.input.is_mouse_pressed(MouseButton::LEFT);
        let by_key = !by_mouse && self.interaction.focus == id && self.input.is_key_pressed(KeyMode::RETURN);
        if !by_mouse && !by_key {
            return false;
        }
        let st = &mut self.interaction;
        st.active = id;
        st.active_window = window;
        st.active_seen = true;
        st.active_claimed_this_frame = true;
        st.activated_by_key = by_key;
        st.press_pos = self.input.mouse_pos();
        st.dragging = by_mouse && self.config.drag_threshold <= 0;
        if by_mouse {
            st.pressed_on_item = true;
        }
        if self.windows[&window].focusable.contains(&id) {
            st.focus = id;
            st.focus_window = window;
        }
        log::trace!("{:?} active", id);
        true
    }

    /// Called once `window` is begun: hot and same-frame active ids of windows below it that
    /// lie under the pointer are taken back, since `window` now covers them.
    pub(crate) fn shadow_lower_windows(&mut self, window: Id) {
        if self.interaction.hovered_window != window {
            return;
        }
        let depth = self.z_index(window).unwrap_or(0);
        let st = self.interaction;
        if !st.hot.is_none() && st.hot_window != window && self.z_index(st.hot_window).unwrap_or(0) < depth {
            self.interaction.hot = Id::NONE;
            self.interaction.hot_window = Id::NONE;
        }
        if !st.active.is_none()
            && st.active_claimed_this_frame
            && st.active_window != window
            && self.z_index(st.active_window).unwrap_or(0) < depth
        {
            log::trace!("active {:?} revoked, covered by window {:?}", st.active, window);
            self.interaction.revoke_active();
        }
    }

    /// Clears the active id if `id` holds it.
    pub fn release_active_if(&mut self, id: Id) {
        if !id.is_none() && self.interaction.active == id {
            self.interaction.clear_active();
        }
    }

    /// Gives keyboard focus to `id`, owned by the current window.
    pub fn request_focus(&mut self, id: Id) {
        let window = self.window_stack.last().copied().unwrap_or(Id::NONE);
        self.interaction.focus = id;
        self.interaction.focus_window = if id.is_none() { Id::NONE } else { window };
    }

    /// Button-like behaviour built from the hot / active / focus primitives.
    pub fn item_behavior(&mut self, id: Id, rect: Recti, opt: WidgetOption) -> Response {
        let window = self.expect_window("item_behavior");
        let mut res = Response { id, rect, ..Response::default() };
        if self.is_disabled() || opt.is_not_interactive() {
            self.release_active_if(id);
            res.disabled = true;
            return res;
        }
        if opt.is_focusable() && !id.is_none() {
            if let Some(w) = self.windows.get_mut(&window) {
                w.focusable.push(id);
            }
        }
        if self.interaction.active == id {
            self.interaction.active_seen = true;
        }

        res.hovered = self.set_hot_if_eligible(id, rect);
        if self.interaction.active != id && self.try_claim_active(id) {
            res.pressed = true;
        }

        if self.interaction.active == id {
            if self.interaction.activated_by_key {
                res.clicked = true;
                res.released = true;
                self.release_active_if(id);
            } else {
                let mouse = self.input.mouse_pos();
                let from = self.interaction.press_pos;
                let threshold = self.config.drag_threshold;
                if !self.interaction.dragging && ((mouse.x - from.x).abs() >= threshold || (mouse.y - from.y).abs() >= threshold) {
                    self.interaction.dragging = true;
                }
                if self.input.is_mouse_down(MouseButton::LEFT) {
                    res.held = true;
                    if self.interaction.dragging {
                        res.drag_delta = self.input.mouse_delta();
                    }
                } else {
                    res.released = true;
                    res.clicked = res.hovered;
                    self.release_active_if(id);
                }
            }
        }
        res.focused = self.interaction.focus == id;
        res
    }

    fn front_window_with_focusables(&self) -> Option<Id> {
        self.z_order.iter().rev().copied().find(|id| self.windows.get(id).is_some_and(|w| w.begun && !w.focusable.is_empty()))
    }

    /// End-of-frame focus bookkeeping: stale ids, press on empty space, Tab and default focus.
    pub(crate) fn resolve_focus(&mut self) {
        for (id, w) in self.windows.iter() {
            if !w.begun {
                self.interaction.forget_window(*id);
            }
        }
        if !self.interaction.active.is_none() && !self.interaction.active_seen {
            log::trace!("{:?} not submitted, releasing active", self.interaction.active);
            self.interaction.clear_active();
        }
        if !self.interaction.active.is_none() && (self.interaction.activated_by_key || !self.input.is_mouse_down(MouseButton::LEFT)) {
            log::trace!("{:?} released", self.interaction.active);
            self.interaction.clear_active();
        }
        if self.input.is_mouse_pressed(MouseButton::LEFT) && !self.interaction.pressed_on_item {
            self.interaction.clear_focus();
        }

        let nav = [self.interaction.focus_window, self.interaction.nav_window]
            .into_iter()
            .find(|id| self.windows.get(id).is_some_and(|w| !w.focusable.is_empty()))
            .or_else(|| self.front_window_with_focusables());
        let Some(nav) = nav else { return };
        let list = &self.windows[&nav].focusable;

        if self.input.is_key_code_pressed(KeyCode::TAB) {
            let back = self.input.key_state().is_shift();
            let len = list.len();
            let next = match list.iter().position(|id| *id == self.interaction.focus) {
                Some(i) if back => (i + len - 1) % len,
                Some(i) => (i + 1) % len,
                None if back => len - 1,
                None => 0,
            };
            self.interaction.focus = list[next];
            self.interaction.focus_window = nav;
        } else if self.interaction.focus.is_none() && self.config.focus_first_by_default {
            self.interaction.focus = list[0];
            self.interaction.focus_window = nav;
        }
    }
}

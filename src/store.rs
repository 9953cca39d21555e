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
//! Persistent per-id widget state.
//!
//! Values live in a slab of slots. Each slot records the id it belongs to, the window that
//! created it and a generation that is bumped on removal, so a [`StateHandle`] taken before a
//! removal never resolves to the value that later reuses the slot.

use std::any::Any;

use nohash_hasher::IntMap;

use crate::Id;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Generation-checked reference to a state slot.
pub struct StateHandle {
    index: u32,
    generation: u32,
}

struct Slot {
    id: Id,
    owner: Id,
    generation: u32,
    last_used: u64,
    value: Option<Box<dyn Any>>,
}

#[derive(Default)]
/// Typed storage keyed by [`Id`], owned by the [`Context`](crate::Context).
pub struct StateStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: IntMap<Id, u32>,
    frame: u64,
    gc_ids: Vec<Id>,
}

impl StateStore {
    pub(crate) fn set_frame(&mut self, frame: u64) { self.frame = frame; }

    fn allocate(&mut self, id: Id, owner: Id) -> u32 {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.id = id;
                slot.owner = owner;
                index
            }
            None => {
                self.slots.push(Slot { id, owner, generation: 0, last_used: self.frame, value: None });
                (self.slots.len() - 1) as u32
            }
        };
        self.index.insert(id, index);
        index
    }

    /// Returns the value stored under `id`, creating a default one owned by `owner` if needed.
    ///
    /// If the slot holds a value of another type (two widgets share an id), the value is
    /// replaced with `T::default()` and a warning is logged.
    pub fn get_or_create<T: Default + 'static>(&mut self, id: Id, owner: Id) -> &mut T {
        let index = match self.index.get(&id) {
            Some(&index) => index,
            None => self.allocate(id, owner),
        };
        let frame = self.frame;
        let slot = &mut self.slots[index as usize];
        slot.last_used = frame;
        if !slot.value.as_deref().is_some_and(|value| value.is::<T>()) {
            if slot.value.is_some() {
                log::warn!("state {:?} requested as `{}` but holds another type, resetting", id, std::any::type_name::<T>());
            }
            slot.value = Some(Box::new(T::default()));
        }
        slot.value
            .as_deref_mut()
            .and_then(|value| value.downcast_mut::<T>())
            .expect("slot holds a value of the requested type")
    }

    /// Stores `value` under `id`, replacing whatever was there.
    pub fn insert<T: 'static>(&mut self, id: Id, owner: Id, value: T) {
        let index = match self.index.get(&id) {
            Some(&index) => index,
            None => self.allocate(id, owner),
        };
        let slot = &mut self.slots[index as usize];
        slot.last_used = self.frame;
        slot.value = Some(Box::new(value));
    }

    /// Returns the value under `id` if it exists and has type `T`.
    pub fn get<T: 'static>(&self, id: Id) -> Option<&T> {
        let index = *self.index.get(&id)?;
        self.slots[index as usize].value.as_deref()?.downcast_ref::<T>()
    }

    /// Mutable counterpart of [`StateStore::get`].
    pub fn get_mut<T: 'static>(&mut self, id: Id) -> Option<&mut T> {
        let index = *self.index.get(&id)?;
        let slot = &mut self.slots[index as usize];
        slot.last_used = self.frame;
        slot.value.as_deref_mut()?.downcast_mut::<T>()
    }

    /// Returns `true` if an entry exists for `id`.
    pub fn contains(&self, id: Id) -> bool { self.index.contains_key(&id) }

    /// Window that created the entry, [`Id::NONE`] for entries created outside windows.
    pub fn owner(&self, id: Id) -> Option<Id> { self.index.get(&id).map(|&index| self.slots[index as usize].owner) }

    /// Frame in which the entry was last touched.
    pub fn last_used(&self, id: Id) -> Option<u64> { self.index.get(&id).map(|&index| self.slots[index as usize].last_used) }

    /// Removes the entry under `id`. Returns `false` when there was none.
    pub fn remove(&mut self, id: Id) -> bool {
        match self.index.remove(&id) {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = None;
                slot.id = Id::NONE;
                slot.owner = Id::NONE;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
                true
            }
            None => false,
        }
    }

    /// Returns a handle to the slot currently holding `id`.
    pub fn handle(&self, id: Id) -> Option<StateHandle> {
        self.index.get(&id).map(|&index| StateHandle { index, generation: self.slots[index as usize].generation })
    }

    /// Resolves `handle`; `None` once the entry it pointed to was removed.
    pub fn get_by_handle<T: 'static>(&self, handle: StateHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_deref()?.downcast_ref::<T>()
    }

    /// Removes every entry owned by `owner` and returns how many were dropped.
    pub fn evict_owner(&mut self, owner: Id) -> usize {
        self.gc_ids.clear();
        for slot in &self.slots {
            if slot.value.is_some() && slot.owner == owner {
                self.gc_ids.push(slot.id);
            }
        }
        let ids = std::mem::take(&mut self.gc_ids);
        for id in &ids {
            self.remove(*id);
        }
        let count = ids.len();
        self.gc_ids = ids;
        count
    }

    /// Number of live entries.
    pub fn len(&self) -> usize { self.index.len() }

    /// Returns `true` when no entry is stored.
    pub fn is_empty(&self) -> bool { self.index.is_empty() }

    /// Drops every entry. Outstanding handles become stale.
    pub fn clear(&mut self) {
        let ids: Vec<Id> = self.index.keys().copied().collect();
        for id in ids {
            self.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW_A: Id = Id::ROOT_SEED;

    #[test]
    fn creates_default_once() {
        let mut store = StateStore::default();
        let id = Id::from_label("counter");
        *store.get_or_create::<i32>(id, WINDOW_A) += 5;
        *store.get_or_create::<i32>(id, WINDOW_A) += 1;
        assert_eq!(store.get::<i32>(id), Some(&6));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn type_mismatch_replaces_value() {
        let mut store = StateStore::default();
        let id = Id::from_label("shared");
        *store.get_or_create::<i32>(id, WINDOW_A) = 9;
        assert!(store.get::<bool>(id).is_none());
        let flag = store.get_or_create::<bool>(id, WINDOW_A);
        assert!(!*flag);
        assert!(store.get::<i32>(id).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removed_slot_reuse_invalidates_handles() {
        let mut store = StateStore::default();
        let a = Id::from_label("a");
        let b = Id::from_label("b");
        store.insert(a, WINDOW_A, String::from("first"));
        let handle = store.handle(a).expect("handle");
        assert_eq!(store.get_by_handle::<String>(handle).map(String::as_str), Some("first"));
        assert!(store.remove(a));
        assert!(!store.remove(a));
        store.insert(b, WINDOW_A, String::from("second"));
        assert!(store.get_by_handle::<String>(handle).is_none());
        let fresh = store.handle(b).expect("handle");
        assert_eq!(store.get_by_handle::<String>(fresh).map(String::as_str), Some("second"));
    }

    #[test]
    fn evict_owner_only_drops_owned_entries() {
        let mut store = StateStore::default();
        let window_b = Id::from_label("B");
        store.insert(Id::from_label("a1"), WINDOW_A, 1u8);
        store.insert(Id::from_label("a2"), WINDOW_A, 2u8);
        store.insert(Id::from_label("b1"), window_b, 3u8);
        store.insert(Id::from_label("free"), Id::NONE, 4u8);
        assert_eq!(store.evict_owner(WINDOW_A), 2);
        assert!(!store.contains(Id::from_label("a1")));
        assert!(store.contains(Id::from_label("b1")));
        assert_eq!(store.owner(Id::from_label("free")), Some(Id::NONE));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_empties_store() {
        let mut store = StateStore::default();
        store.insert(Id::from_label("x"), WINDOW_A, 1.0f32);
        store.clear();
        assert!(store.is_empty());
        assert!(store.get::<f32>(Id::from_label("x")).is_none());
    }
}

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
//! Scoped identifiers.
//!
//! Ids are 64-bit FNV-1a hashes. A key is mixed into the seed on top of the current [`IdStack`],
//! so the same label in two different scopes yields two different ids while the same label in
//! the same scope yields the same id every frame.

use std::fmt;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

const STRING_TERMINATOR: u8 = 0xFF;
const TAG_UNSIGNED: u8 = 0xF8;
const TAG_SIGNED: u8 = 0xF9;
const TAG_ID: u8 = 0xFA;
const TAG_PTR: u8 = 0xFB;

#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
/// Numeric identifier of a widget, window or state entry.
pub struct Id(u64);

impl nohash_hasher::IsEnabled for Id {}

impl Id {
    /// The "no id" sentinel. No hash ever produces it.
    pub const NONE: Self = Self(0);

    /// Seed used when no scope is pushed.
    pub const ROOT_SEED: Self = Self(FNV_OFFSET_BASIS);

    /// Creates an ID from a caller-supplied numeric value.
    pub fn new(value: u64) -> Self { Self(value) }

    /// Returns the raw numeric value wrapped by this ID.
    pub fn raw(self) -> u64 { self.0 }

    /// Returns `true` for [`Id::NONE`].
    pub fn is_none(self) -> bool { self.0 == 0 }

    /// Mixes `key` into `seed`.
    pub fn hash<K: IdKey + ?Sized>(seed: Id, key: &K) -> Id {
        let mut hasher = IdHasher::new(seed);
        key.write_key(&mut hasher);
        hasher.finish()
    }

    /// Mixes raw bytes into `seed`.
    pub fn hash_bytes(seed: Id, bytes: &[u8]) -> Id {
        let mut hasher = IdHasher::new(seed);
        hasher.write(bytes);
        hasher.finish()
    }

    /// Hashes a widget label under `seed` following the `##` / `###` conventions.
    ///
    /// When the label contains `###`, only the text from `###` onward is hashed so the visible
    /// part may change between frames without changing the id.
    pub fn hash_label(seed: Id, label: &str) -> Id {
        match label.find("###") {
            Some(pos) => Self::hash(seed, &label[pos..]),
            None => Self::hash(seed, label),
        }
    }

    /// Creates a stable ID from a string label at the root scope.
    pub fn from_label(label: &str) -> Self { Self::hash_label(Self::ROOT_SEED, label) }

    /// Derives a child id, `Id::hash(self, key)`.
    pub fn with<K: IdKey + ?Sized>(self, key: &K) -> Id { Self::hash(self, key) }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Id({:#018x})", self.0) }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:016x}", self.0) }
}

/// Returns the visible part of a label: everything before the first `##`.
pub fn label_text(label: &str) -> &str {
    match label.find("##") {
        Some(pos) => &label[..pos],
        None => label,
    }
}

/// Incremental FNV-1a state used by [`IdKey`] implementations.
pub struct IdHasher {
    state: u64,
}

impl IdHasher {
    /// Starts hashing from `seed`.
    pub fn new(seed: Id) -> Self { Self { state: seed.0 } }

    /// Mixes raw bytes.
    pub fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= *byte as u64;
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    /// Mixes a single byte.
    pub fn write_u8(&mut self, byte: u8) { self.write(&[byte]) }

    /// Finishes the hash; a result of zero is remapped so it never equals [`Id::NONE`].
    pub fn finish(&self) -> Id {
        match self.state {
            0 => Id(1),
            state => Id(state),
        }
    }
}

/// A value that can be mixed into an id.
///
/// Every kind of key carries its own encoding so an integer and a string with the same bytes
/// do not collide.
pub trait IdKey {
    /// Writes the encoded key into `hasher`.
    fn write_key(&self, hasher: &mut IdHasher);
}

impl IdKey for str {
    fn write_key(&self, hasher: &mut IdHasher) {
        hasher.write(self.as_bytes());
        hasher.write_u8(STRING_TERMINATOR);
    }
}

impl IdKey for String {
    fn write_key(&self, hasher: &mut IdHasher) { self.as_str().write_key(hasher) }
}

impl<T: IdKey + ?Sized> IdKey for &T {
    fn write_key(&self, hasher: &mut IdHasher) { (**self).write_key(hasher) }
}

macro_rules! unsigned_key {
    ($($t:ty),*) => {
        $(impl IdKey for $t {
            fn write_key(&self, hasher: &mut IdHasher) {
                hasher.write_u8(TAG_UNSIGNED);
                hasher.write(&(*self as u64).to_le_bytes());
            }
        })*
    };
}

macro_rules! signed_key {
    ($($t:ty),*) => {
        $(impl IdKey for $t {
            fn write_key(&self, hasher: &mut IdHasher) {
                hasher.write_u8(TAG_SIGNED);
                hasher.write(&(*self as i64).to_le_bytes());
            }
        })*
    };
}

unsigned_key!(u32, u64, usize);
signed_key!(i32, i64);

impl IdKey for Id {
    fn write_key(&self, hasher: &mut IdHasher) {
        hasher.write_u8(TAG_ID);
        hasher.write(&self.0.to_le_bytes());
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Address of a stable object used as an id key.
pub struct IdPtr(usize);

impl IdPtr {
    /// Captures the address of `value`.
    pub fn of<T: ?Sized>(value: &T) -> Self { Self(value as *const T as *const () as usize) }
}

impl IdKey for IdPtr {
    fn write_key(&self, hasher: &mut IdHasher) {
        hasher.write_u8(TAG_PTR);
        hasher.write(&(self.0 as u64).to_le_bytes());
    }
}

#[derive(Clone, Debug)]
/// Stack of id seeds. The top seeds every derived id.
pub struct IdStack {
    root: Id,
    seeds: Vec<Id>,
}

impl Default for IdStack {
    fn default() -> Self { Self::new(Id::ROOT_SEED) }
}

impl IdStack {
    /// Creates an empty stack whose base seed is `root`.
    pub fn new(root: Id) -> Self { Self { root, seeds: Vec::new() } }

    /// Returns the current seed.
    pub fn seed(&self) -> Id { self.seeds.last().copied().unwrap_or(self.root) }

    /// Derives the id of `key` in the current scope without pushing it.
    pub fn get<K: IdKey + ?Sized>(&self, key: &K) -> Id { Id::hash(self.seed(), key) }

    /// Derives the id of a widget label in the current scope.
    pub fn get_label(&self, label: &str) -> Id { Id::hash_label(self.seed(), label) }

    /// Derives the id of `key` and pushes it as the new seed.
    pub fn push<K: IdKey + ?Sized>(&mut self, key: &K) -> Id {
        let id = self.get(key);
        self.seeds.push(id);
        id
    }

    /// Pushes an already computed id as the new seed.
    pub fn push_id(&mut self, id: Id) { self.seeds.push(id) }

    /// Pops the top seed, `None` when only the base seed is left.
    pub fn try_pop(&mut self) -> Option<Id> { self.seeds.pop() }

    /// Pops the top seed.
    ///
    /// # Panics
    /// Panics when nothing was pushed.
    pub fn pop(&mut self) -> Id {
        match self.seeds.pop() {
            Some(id) => id,
            None => panic!("id stack popped more than pushed"),
        }
    }

    /// Number of pushed seeds, excluding the base seed.
    pub fn depth(&self) -> usize { self.seeds.len() }

    /// Drops every pushed seed and rebases the stack on `root`.
    pub fn reset(&mut self, root: Id) {
        self.root = root;
        self.seeds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn encode_str(s: &str) -> Vec<u8> {
        let mut v = s.as_bytes().to_vec();
        v.push(STRING_TERMINATOR);
        v
    }

    #[test]
    fn hashing_is_deterministic() {
        let a = Id::hash(Id::ROOT_SEED, "OK");
        let b = Id::hash(Id::ROOT_SEED, "OK");
        assert_eq!(a, b);
        assert_ne!(a, Id::hash(Id::ROOT_SEED, "Cancel"));
    }

    #[test]
    fn hashing_is_associative_over_scopes() {
        let mut rng = rand::rng();
        for _ in 0..64 {
            let a: String = (0..rng.random_range(0..12)).map(|_| rng.random_range('a'..='z')).collect();
            let b: String = (0..rng.random_range(0..12)).map(|_| rng.random_range('a'..='z')).collect();
            let nested = Id::hash(Id::hash(Id::ROOT_SEED, a.as_str()), b.as_str());
            let mut bytes = encode_str(&a);
            bytes.extend(encode_str(&b));
            assert_eq!(nested, Id::hash_bytes(Id::ROOT_SEED, &bytes));
        }
    }

    #[test]
    fn empty_label_differs_from_seed() {
        let id = Id::hash(Id::ROOT_SEED, "");
        assert_ne!(id, Id::ROOT_SEED);
        assert_ne!(id, Id::NONE);
    }

    #[test]
    fn same_label_in_different_scopes_differs() {
        let mut stack = IdStack::default();
        stack.push("A");
        let in_a = stack.get("OK");
        stack.pop();
        stack.push("B");
        let in_b = stack.get("OK");
        assert_ne!(in_a, in_b);
    }

    #[test]
    fn integer_and_string_keys_do_not_collide() {
        assert_ne!(Id::hash(Id::ROOT_SEED, &1u32), Id::hash(Id::ROOT_SEED, "\u{1}"));
        assert_ne!(Id::hash(Id::ROOT_SEED, &1u32), Id::hash(Id::ROOT_SEED, &1i32));
        assert_eq!(Id::hash(Id::ROOT_SEED, &7u32), Id::hash(Id::ROOT_SEED, &7usize));
    }

    #[test]
    fn triple_hash_keeps_id_while_text_changes() {
        let a = Id::hash_label(Id::ROOT_SEED, "Score: 10###score");
        let b = Id::hash_label(Id::ROOT_SEED, "Score: 42###score");
        assert_eq!(a, b);
        assert_eq!(label_text("Score: 10###score"), "Score: 10");
    }

    #[test]
    fn double_hash_hides_suffix_but_keeps_it_in_id() {
        assert_eq!(label_text("Play##menu"), "Play");
        assert_ne!(Id::hash_label(Id::ROOT_SEED, "Play##menu"), Id::hash_label(Id::ROOT_SEED, "Play##toolbar"));
        assert_eq!(label_text("no marker"), "no marker");
    }

    #[test]
    fn pointer_keys_follow_the_object() {
        let a = 1u8;
        let b = 2u8;
        assert_eq!(Id::hash(Id::ROOT_SEED, &IdPtr::of(&a)), Id::hash(Id::ROOT_SEED, &IdPtr::of(&a)));
        assert_ne!(Id::hash(Id::ROOT_SEED, &IdPtr::of(&a)), Id::hash(Id::ROOT_SEED, &IdPtr::of(&b)));
    }

    #[test]
    fn stack_push_pop_restores_seed() {
        let mut rng = rand::rng();
        let mut stack = IdStack::new(Id::new(99));
        let base = stack.seed();
        let n = rng.random_range(1..32);
        for i in 0..n {
            stack.push(&(i as u32));
        }
        assert_eq!(stack.depth(), n);
        for _ in 0..n {
            stack.pop();
        }
        assert_eq!(stack.seed(), base);
        assert!(stack.try_pop().is_none());
    }

    #[test]
    #[should_panic]
    fn stack_underflow_panics() {
        let mut stack = IdStack::default();
        stack.pop();
    }
}

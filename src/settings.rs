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
//! Window settings persistence.
//!
//! The format is a small INI dialect, one section per window:
//!
//! ```text
//! [Window][Settings]
//! Pos=100,100
//! Size=300,200
//! Collapsed=0
//! ```
//!
//! Sections of other types and unknown fields are skipped so files written by newer versions
//! still load.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use nohash_hasher::IntMap;
use thiserror::Error;

use crate::*;

/// Failure to read or parse a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the file failed.
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A line starting with `[` is not a `[Type][Name]` header.
    #[error("line {line}: malformed section header `{text}`")]
    MalformedHeader {
        /// 1-based line number.
        line: usize,
        /// Offending line.
        text: String,
    },
    /// A line inside a section is not `Field=Value`.
    #[error("line {line}: expected `Field=Value`, found `{text}`")]
    MalformedEntry {
        /// 1-based line number.
        line: usize,
        /// Offending line.
        text: String,
    },
    /// A known field carries a value that does not parse.
    #[error("line {line}: invalid value `{value}` for `{field}`")]
    InvalidValue {
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: String,
        /// Raw value.
        value: String,
    },
}

#[derive(Clone)]
/// Persisted geometry of one window.
pub struct WindowSettings {
    /// Full window title, as passed to [`Context::begin_window`].
    pub title: String,
    /// Top-left corner.
    pub pos: Vec2i,
    /// Outer size.
    pub size: Dimensioni,
    /// Collapsed flag.
    pub collapsed: bool,
}

impl WindowSettings {
    /// Id of the window these settings belong to.
    pub fn id(&self) -> Id { Id::from_label(&self.title) }
}

#[derive(Clone, Default)]
/// In-memory settings, keyed by window id and kept in insertion order.
pub struct SettingsStore {
    windows: IntMap<Id, WindowSettings>,
    order: Vec<Id>,
}

fn parse_pair(line: usize, field: &str, value: &str) -> Result<(i32, i32), SettingsError> {
    let invalid = || SettingsError::InvalidValue { line, field: field.to_string(), value: value.to_string() };
    let (a, b) = value.split_once(',').ok_or_else(invalid)?;
    let a = a.trim().parse::<i32>().map_err(|_| invalid())?;
    let b = b.trim().parse::<i32>().map_err(|_| invalid())?;
    Ok((a, b))
}

impl SettingsStore {
    /// Parses settings text.
    pub fn load_from_str(text: &str) -> Result<Self, SettingsError> {
        let mut store = Self::default();
        store.merge_from_str(text)?;
        Ok(store)
    }

    /// Reads and parses a settings file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::load_from_str(&text)
    }

    /// Parses settings text into this store, overwriting windows it names.
    /// Returns the number of window sections read. Nothing is merged if parsing fails.
    pub fn merge_from_str(&mut self, text: &str) -> Result<usize, SettingsError> {
        let mut parsed = SettingsStore::default();
        let count = parsed.parse_into(text)?;
        let SettingsStore { mut windows, order } = parsed;
        for id in order {
            if let Some(settings) = windows.remove(&id) {
                self.set_window(settings);
            }
        }
        Ok(count)
    }

    fn parse_into(&mut self, text: &str) -> Result<usize, SettingsError> {
        let mut current: Option<WindowSettings> = None;
        let mut count = 0;
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('[') {
                if let Some(done) = current.take() {
                    self.set_window(done);
                    count += 1;
                }
                let header = || SettingsError::MalformedHeader { line, text: trimmed.to_string() };
                let inner = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')).ok_or_else(header)?;
                let (kind, name) = inner.split_once("][").ok_or_else(header)?;
                if kind == "Window" {
                    current = Some(WindowSettings { title: name.to_string(), pos: vec2(0, 0), size: dim(0, 0), collapsed: false });
                } else {
                    log::debug!("skipping settings section [{}][{}]", kind, name);
                }
                continue;
            }
            let (field, value) = trimmed.split_once('=').ok_or_else(|| SettingsError::MalformedEntry { line, text: trimmed.to_string() })?;
            let Some(window) = current.as_mut() else { continue };
            let (field, value) = (field.trim(), value.trim());
            match field {
                "Pos" => {
                    let (x, y) = parse_pair(line, field, value)?;
                    window.pos = vec2(x, y);
                }
                "Size" => {
                    let (w, h) = parse_pair(line, field, value)?;
                    window.size = dim(w, h);
                }
                "Collapsed" => {
                    window.collapsed = match value {
                        "0" => false,
                        "1" => true,
                        _ => return Err(SettingsError::InvalidValue { line, field: field.to_string(), value: value.to_string() }),
                    }
                }
                _ => log::debug!("skipping unknown settings field `{}` of window `{}`", field, window.title),
            }
        }
        if let Some(done) = current.take() {
            self.set_window(done);
            count += 1;
        }
        Ok(count)
    }

    /// Serializes every window section.
    pub fn save_to_string(&self) -> String {
        let mut out = String::new();
        for settings in self.iter() {
            let _ = writeln!(out, "[Window][{}]", settings.title);
            let _ = writeln!(out, "Pos={},{}", settings.pos.x, settings.pos.y);
            let _ = writeln!(out, "Size={},{}", settings.size.width, settings.size.height);
            let _ = writeln!(out, "Collapsed={}", settings.collapsed as u8);
            out.push('\n');
        }
        out
    }

    /// Writes [`SettingsStore::save_to_string`] to `path`.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        fs::write(path, self.save_to_string())?;
        Ok(())
    }

    /// Settings of the window with id `id`.
    pub fn window(&self, id: Id) -> Option<&WindowSettings> { self.windows.get(&id) }

    /// Inserts or replaces the settings of a window.
    pub fn set_window(&mut self, settings: WindowSettings) {
        let id = settings.id();
        if self.windows.insert(id, settings).is_none() {
            self.order.push(id);
        }
    }

    /// Forgets a window.
    pub fn remove_window(&mut self, id: Id) -> bool {
        match self.windows.remove(&id) {
            Some(_) => {
                self.order.retain(|o| *o != id);
                true
            }
            None => false,
        }
    }

    /// Windows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowSettings> + '_ { self.order.iter().filter_map(|id| self.windows.get(id)) }

    /// Number of windows stored.
    pub fn len(&self) -> usize { self.windows.len() }

    /// Returns `true` when no window is stored.
    pub fn is_empty(&self) -> bool { self.windows.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[Window][Settings]\nPos=100,100\nSize=300,200\nCollapsed=0\n\n[Window][Log###log]\nPos=-5,7\nSize=10,20\nCollapsed=1\n";

    #[test]
    fn parses_windows() {
        let store = SettingsStore::load_from_str(SAMPLE).expect("valid settings");
        assert_eq!(store.len(), 2);
        let s = store.window(Id::from_label("Settings")).expect("window");
        assert_eq!((s.pos.x, s.pos.y, s.size.width, s.size.height, s.collapsed), (100, 100, 300, 200, false));
        let log = store.window(Id::from_label("Other title###log")).expect("window by ### id");
        assert!(log.collapsed);
        assert_eq!(log.pos.x, -5);
    }

    #[test]
    fn save_then_load_preserves_content() {
        let store = SettingsStore::load_from_str(SAMPLE).expect("valid settings");
        let text = store.save_to_string();
        assert_eq!(text, format!("{}\n", SAMPLE));
        let again = SettingsStore::load_from_str(&text).expect("valid settings");
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn skips_unknown_sections_and_fields() {
        let text = "; comment\n[Table][0x1234]\nColumns=3\n[Window][A]\nPos=1,2\nDockId=7\n";
        let store = SettingsStore::load_from_str(text).expect("valid settings");
        assert_eq!(store.len(), 1);
        assert_eq!(store.window(Id::from_label("A")).map(|w| w.pos.y), Some(2));
    }

    #[test]
    fn reports_malformed_input() {
        match SettingsStore::load_from_str("[Window]\n") {
            Err(SettingsError::MalformedHeader { line: 1, .. }) => (),
            _ => panic!("expected a header error"),
        }
        match SettingsStore::load_from_str("[Window][A]\nPos 1 2\n") {
            Err(SettingsError::MalformedEntry { line: 2, .. }) => (),
            _ => panic!("expected an entry error"),
        }
        match SettingsStore::load_from_str("[Window][A]\nSize=1,x\n") {
            Err(SettingsError::InvalidValue { line: 2, .. }) => (),
            _ => panic!("expected a value error"),
        }
    }

    #[test]
    fn failed_merge_leaves_store_untouched() {
        let mut store = SettingsStore::default();
        let text = "[Window][Good]\nPos=1,2\nSize=3,4\n\n[Window][Bad]\nPos=x\n";
        assert!(store.merge_from_str(text).is_err());
        assert_eq!(store.len(), 0);
        assert!(SettingsStore::load_from_str(text).is_err());
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("imcore-settings-{}.ini", std::process::id()));
        let store = SettingsStore::load_from_str(SAMPLE).expect("valid settings");
        store.save_to_file(&path).expect("write");
        let loaded = SettingsStore::load_from_file(&path).expect("read");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.len(), 2);
        match SettingsStore::load_from_file(&path) {
            Err(SettingsError::Io(_)) => (),
            _ => panic!("expected an io error"),
        }
    }
}

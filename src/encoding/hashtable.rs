//! Back-reference tables.
//!
//! Every text and blob that goes over the wire is remembered under the one-byte DJB hash of
//! its raw encoded bytes. A later `0x3c h` / `0x5c h` repeats the remembered value. Text and
//! blobs are kept in separate tables, and both live for one encode or decode call unless a
//! `0x70` clears them.

use bytes::Bytes;
use hashbrown::HashMap;

/// Folds `data` into the running DJB hash `h`: `h = (h << 5) + byte`, truncated to a byte.
pub fn djb_update(h: u8, data: &[u8]) -> u8 {
    data.iter().fold(h, |h, b| (h << 5).wrapping_add(*b))
}

/// DJB hash of `data`, starting from zero.
pub fn djb_hash(data: &[u8]) -> u8 { djb_update(0, data) }

#[derive(Debug, Default, Clone)]
pub struct HashTables {
    text: HashMap<u8, String>,
    blob: HashMap<u8, Bytes>,
}

impl HashTables {
    pub fn new() -> Self { Self::default() }

    pub fn remember_text(&mut self, hash: u8, text: String) { self.text.insert(hash, text); }

    pub fn text(&self, hash: u8) -> Option<&String> { self.text.get(&hash) }

    pub fn remember_blob(&mut self, hash: u8, blob: Bytes) { self.blob.insert(hash, blob); }

    pub fn blob(&self, hash: u8) -> Option<&Bytes> { self.blob.get(&hash) }

    /// Forgets everything, as a `0x70` control byte demands.
    pub fn clear(&mut self) {
        self.text.clear();
        self.blob.clear();
    }
}

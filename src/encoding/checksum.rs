//! Checksum wrappers.
//!
//! A checksum control byte encloses exactly one value. The low three bits pick the digest,
//! and bit 3 says whether the digest comes before (`0xf0..=0xf5`) or after (`0xf8..=0xfd`)
//! the value. The digest covers the enclosed value's bytes only.

use super::{
    constants::{CHECKSUM_PREFIX, CHECKSUM_SUFFIX},
    hashtable::djb_update,
};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::{fmt, str::FromStr};

/// Digest algorithms a checksum wrapper can name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChecksumKind {
    /// The one-byte DJB fold also used for back-references.
    Djb,
    /// CRC-32, stored big-endian.
    Crc32,
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

/// Where the digest sits relative to the value it protects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Digest first, so a reader knows what to expect before reading the value.
    Prefix,
    /// Digest last, so a writer can stream the value and hash as it goes.
    Suffix,
}

impl Default for Placement {
    fn default() -> Self { Placement::Suffix }
}

const KINDS: [ChecksumKind; 6] = [
    ChecksumKind::Djb,
    ChecksumKind::Crc32,
    ChecksumKind::Md5,
    ChecksumKind::Sha1,
    ChecksumKind::Sha256,
    ChecksumKind::Sha512,
];

impl ChecksumKind {
    /// Position of the algorithm in the low bits of the control byte.
    pub fn index(self) -> u8 {
        match self {
            ChecksumKind::Djb => 0,
            ChecksumKind::Crc32 => 1,
            ChecksumKind::Md5 => 2,
            ChecksumKind::Sha1 => 3,
            ChecksumKind::Sha256 => 4,
            ChecksumKind::Sha512 => 5,
        }
    }

    /// Size of the digest in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            ChecksumKind::Djb => 1,
            ChecksumKind::Crc32 => 4,
            ChecksumKind::Md5 => 16,
            ChecksumKind::Sha1 => 20,
            ChecksumKind::Sha256 => 32,
            ChecksumKind::Sha512 => 64,
        }
    }

    /// Control byte for a wrapper of this kind at `placement`.
    pub fn control(self, placement: Placement) -> u8 {
        match placement {
            Placement::Prefix => CHECKSUM_PREFIX | self.index(),
            Placement::Suffix => CHECKSUM_SUFFIX | self.index(),
        }
    }

    /// Parses a checksum control byte. `0xff` (no digest) and the unassigned slots
    /// `0xf6`, `0xf7`, `0xfe` give `None`.
    pub fn from_control(byte: u8) -> Option<(ChecksumKind, Placement)> {
        let placement = if byte & 0x08 == 0 {
            Placement::Prefix
        } else {
            Placement::Suffix
        };
        KINDS
            .get((byte & 0x07) as usize)
            .map(|kind| (*kind, placement))
            .filter(|_| byte & 0xf0 == CHECKSUM_PREFIX)
    }

    /// A fresh streaming hasher.
    pub fn hasher(self) -> Hasher {
        match self {
            ChecksumKind::Djb => Hasher::Djb(0),
            ChecksumKind::Crc32 => Hasher::Crc32(crc32fast::Hasher::new()),
            ChecksumKind::Md5 => Hasher::Md5(Md5::new()),
            ChecksumKind::Sha1 => Hasher::Sha1(Sha1::new()),
            ChecksumKind::Sha256 => Hasher::Sha256(Sha256::new()),
            ChecksumKind::Sha512 => Hasher::Sha512(Sha512::new()),
        }
    }

    /// One-shot digest of `data`.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize()
    }

    /// The lower-case name used by `Display` and `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            ChecksumKind::Djb => "djb",
            ChecksumKind::Crc32 => "crc32",
            ChecksumKind::Md5 => "md5",
            ChecksumKind::Sha1 => "sha1",
            ChecksumKind::Sha256 => "sha256",
            ChecksumKind::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for ChecksumKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let lower = s.to_ascii_lowercase();
        KINDS
            .iter()
            .copied()
            .find(|kind| kind.name() == lower || (lower == "crc-32" && *kind == ChecksumKind::Crc32))
            .ok_or_else(|| format!("unknown checksum algorithm {:?}", s))
    }
}

/// Streaming state for one of the [`ChecksumKind`]s.
pub enum Hasher {
    Djb(u8),
    Crc32(crc32fast::Hasher),
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Djb(h) => *h = djb_update(*h, data),
            Hasher::Crc32(h) => h.update(data),
            Hasher::Md5(h) => h.update(data),
            Hasher::Sha1(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self {
            Hasher::Djb(h) => vec![h],
            Hasher::Crc32(h) => h.finalize().to_be_bytes().to_vec(),
            Hasher::Md5(h) => h.finalize().to_vec(),
            Hasher::Sha1(h) => h.finalize().to_vec(),
            Hasher::Sha256(h) => h.finalize().to_vec(),
            Hasher::Sha512(h) => h.finalize().to_vec(),
        }
    }

    pub fn kind(&self) -> ChecksumKind {
        match self {
            Hasher::Djb(_) => ChecksumKind::Djb,
            Hasher::Crc32(_) => ChecksumKind::Crc32,
            Hasher::Md5(_) => ChecksumKind::Md5,
            Hasher::Sha1(_) => ChecksumKind::Sha1,
            Hasher::Sha256(_) => ChecksumKind::Sha256,
            Hasher::Sha512(_) => ChecksumKind::Sha512,
        }
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Hasher").field(&self.kind()).finish()
    }
}

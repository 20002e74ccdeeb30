//! Knobs for encoding and decoding.

use super::checksum::{ChecksumKind, Placement};
use std::{fmt, str::FromStr};

/// Default nesting limit for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default nesting depth below which arrays of objects are considered for the swapped form.
pub const DEFAULT_SWAP_DEPTH_LIMIT: usize = 8;

/// How text is put on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringEncoding {
    /// UTF-16 when it is strictly shorter than UTF-8, otherwise UTF-8.
    Auto,
    Utf8,
    Utf16,
}

impl Default for StringEncoding {
    fn default() -> Self { StringEncoding::Auto }
}

impl fmt::Display for StringEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            StringEncoding::Auto => "auto",
            StringEncoding::Utf8 => "utf8",
            StringEncoding::Utf16 => "utf16",
        })
    }
}

impl FromStr for StringEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(StringEncoding::Auto),
            "utf8" | "utf-8" => Ok(StringEncoding::Utf8),
            "utf16" | "utf-16" => Ok(StringEncoding::Utf16),
            _ => Err(format!("unknown string encoding {:?}", s)),
        }
    }
}

/// Options for [`encode_with`](crate::encoding::encode_with).
///
/// The defaults produce the most compact stream this encoder knows how to make, without a
/// header or checksum:
///
/// ```
/// use jksn::prelude::*;
///
/// let opts = EncodeOptions::default()
///     .checksum(ChecksumKind::Crc32, Placement::Prefix)
///     .header(true);
/// let bytes = encode(&Jksn::from(true), &opts).unwrap();
/// assert_eq!(&bytes[..4], b"!jk\xf1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub string_encoding: StringEncoding,
    /// Try the swapped (column-major) form for arrays of objects.
    pub swapped_arrays: bool,
    /// Arrays nested deeper than this are never swapped.
    pub swap_depth_limit: usize,
    /// Replace repeated integers by deltas and repeated text or blobs by back-references.
    pub optimize: bool,
    /// Wrap the whole stream in a checksum.
    pub checksum: Option<ChecksumKind>,
    pub checksum_placement: Placement,
    /// Emit the `!jk` magic header first.
    pub header: bool,
    /// Refuse values nested deeper than this.
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            string_encoding: StringEncoding::Auto,
            swapped_arrays: true,
            swap_depth_limit: DEFAULT_SWAP_DEPTH_LIMIT,
            optimize: true,
            checksum: None,
            checksum_placement: Placement::Suffix,
            header: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// The most literal encoding: every value in its own standalone form, no deltas,
    /// back-references or swapped arrays.
    pub fn plain() -> Self {
        EncodeOptions {
            swapped_arrays: false,
            optimize: false,
            ..Self::default()
        }
    }

    /// Sets how text is written.
    pub fn string_encoding(mut self, enc: StringEncoding) -> Self {
        self.string_encoding = enc;
        self
    }

    /// Enables or disables the swapped form for arrays of objects.
    pub fn swapped_arrays(mut self, on: bool) -> Self {
        self.swapped_arrays = on;
        self
    }

    /// Sets the deepest nesting level at which arrays may still be swapped.
    pub fn swap_depth_limit(mut self, limit: usize) -> Self {
        self.swap_depth_limit = limit;
        self
    }

    /// Enables or disables deltas and back-references.
    pub fn optimize(mut self, on: bool) -> Self {
        self.optimize = on;
        self
    }

    /// Wraps the stream in a `kind` checksum, with the digest at `placement`.
    pub fn checksum(mut self, kind: ChecksumKind, placement: Placement) -> Self {
        self.checksum = Some(kind);
        self.checksum_placement = placement;
        self
    }

    /// Emits the `!jk` header before the stream.
    pub fn header(mut self, on: bool) -> Self {
        self.header = on;
        self
    }

    /// Sets the nesting limit. A checksum wrapper counts as one level.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Options for [`decode_with`](crate::encoding::decode_with).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Skip a leading `!jk` if present.
    pub header: bool,
    /// Refuse streams nested deeper than this.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            header: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Skips a leading `!jk` header when one is present.
    pub fn header(mut self, on: bool) -> Self {
        self.header = on;
        self
    }

    /// Sets the nesting limit. A checksum wrapper counts as one level.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders() {
        let opts = EncodeOptions::default()
            .string_encoding(StringEncoding::Utf16)
            .swap_depth_limit(2)
            .max_depth(4);
        assert_eq!(opts.string_encoding, StringEncoding::Utf16);
        assert_eq!(opts.swap_depth_limit, 2);
        assert_eq!(opts.max_depth, 4);
        assert!(opts.optimize);

        let plain = EncodeOptions::plain();
        assert!(!plain.optimize && !plain.swapped_arrays);
        assert!(DecodeOptions::default().header);
    }

    #[test]
    fn parse_string_encoding() {
        assert_eq!("UTF-16".parse(), Ok(StringEncoding::Utf16));
        assert_eq!(StringEncoding::Utf8.to_string(), "utf8");
        assert!("latin1".parse::<StringEncoding>().is_err());
    }
}

/// Magic header that may precede a stream.
pub(crate) const HEADER: &[u8; 3] = b"!jk";

/// 0xf0, selects the region of a control byte
pub(crate) const MASK_REGION: u8 = 0b1111_0000;
/// 0x0f, sub-variant or inline length
pub(crate) const MASK_LOW: u8 = 0b0000_1111;

pub(crate) const REGION_SPECIAL: u8 = 0x00;
pub(crate) const REGION_INT: u8 = 0x10;
pub(crate) const REGION_FLOAT: u8 = 0x20;
pub(crate) const REGION_UTF16: u8 = 0x30;
pub(crate) const REGION_UTF8: u8 = 0x40;
pub(crate) const REGION_BLOB: u8 = 0x50;
pub(crate) const REGION_HASHTABLE: u8 = 0x70;
pub(crate) const REGION_ARRAY: u8 = 0x80;
pub(crate) const REGION_OBJECT: u8 = 0x90;
pub(crate) const REGION_SWAPPED: u8 = 0xa0;
pub(crate) const REGION_CONTROL: u8 = 0xc0;
pub(crate) const REGION_DELTA: u8 = 0xd0;
pub(crate) const REGION_CHECKSUM: u8 = 0xf0;

/// Legacy `undefined`, read as null.
pub(crate) const CON_UNDEFINED: u8 = 0x00;
pub(crate) const CON_NULL: u8 = 0x01;
pub(crate) const CON_FALSE: u8 = 0x02;
pub(crate) const CON_TRUE: u8 = 0x03;
/// Followed by a text value holding JSON.
pub(crate) const CON_JSON: u8 = 0x0f;

/// 0x10..=0x1a carry the integers 0 to 10 in the low nibble.
pub(crate) const INT_INLINE_MAX: u8 = 0x0a;
pub(crate) const INT_32: u8 = 0x1b;
pub(crate) const INT_16: u8 = 0x1c;
pub(crate) const INT_8: u8 = 0x1d;
pub(crate) const INT_NEG_VAR: u8 = 0x1e;
pub(crate) const INT_POS_VAR: u8 = 0x1f;

pub(crate) const FLOAT_NAN: u8 = 0x20;
pub(crate) const FLOAT_LONG_DOUBLE: u8 = 0x2b;
pub(crate) const FLOAT_DOUBLE: u8 = 0x2c;
pub(crate) const FLOAT_SINGLE: u8 = 0x2d;
pub(crate) const FLOAT_NEG_INF: u8 = 0x2e;
pub(crate) const FLOAT_POS_INF: u8 = 0x2f;

/// Low nibbles up to this value are inline lengths.
pub(crate) const LEN_INLINE_MAX: u8 = 0x0c;
/// Inline limit for UTF-16 text and blobs, whose 0x_c slot is a back-reference.
pub(crate) const LEN_INLINE_MAX_HASHED: u8 = 0x0b;
pub(crate) const LEN_U16: u8 = 0x0d;
pub(crate) const LEN_U8: u8 = 0x0e;
pub(crate) const LEN_VARINT: u8 = 0x0f;

/// Text back-reference, shared by UTF-16 and UTF-8 text.
pub(crate) const TEXT_HASH: u8 = 0x3c;
pub(crate) const BLOB_HASH: u8 = 0x5c;

pub(crate) const HASHTABLE_CLEAR: u8 = 0x70;

pub(crate) const UNSPECIFIED: u8 = 0xa0;

pub(crate) const LENGTHLESS_ARRAY: u8 = 0xc8;
pub(crate) const PADDING: u8 = 0xca;

/// 0xd0..=0xd5 add 0 to 5.
pub(crate) const DELTA_INLINE_POS_MAX: u8 = 0x05;
/// 0xd6..=0xda add -5 to -1 (low nibble minus 11).
pub(crate) const DELTA_INLINE_NEG_BIAS: i64 = 11;
pub(crate) const DELTA_32: u8 = 0xdb;
pub(crate) const DELTA_16: u8 = 0xdc;
pub(crate) const DELTA_8: u8 = 0xdd;
pub(crate) const DELTA_NEG_VAR: u8 = 0xde;
pub(crate) const DELTA_POS_VAR: u8 = 0xdf;

/// 0xf0..=0xf5 carry the digest before the value.
pub(crate) const CHECKSUM_PREFIX: u8 = 0xf0;
/// 0xf8..=0xfd carry the digest after the value.
pub(crate) const CHECKSUM_SUFFIX: u8 = 0xf8;
/// Wraps one value without any digest.
pub(crate) const CHECKSUM_NONE: u8 = 0xff;

/// Magnitudes below this fit a varint of at most three groups, which is never longer than
/// the 32-bit fixed form.
pub(crate) const VARINT_PREFERRED_BELOW: i64 = 0x20_0000;

//! # JKSN
//!
//! JKSN is a compact binary serialization of the JSON data
//! model. A value is a tree of nulls, booleans, integers, floats, text, blobs, arrays and
//! objects; every value starts with a one-byte *control byte* whose high nibble picks a
//! region and whose low nibble picks a sub-variant or carries a short length.
//!
//! On top of the straightforward encoding, JKSN can shrink typical JSON documents by
//!
//! * delta-encoding integers against the previous integer in the stream,
//! * replacing repeated text and blobs by one-byte back-references,
//! * laying out arrays of similar objects column by column ("swapped" arrays),
//!
//! and protect a value with a checksum wrapper (DJB, CRC-32, MD5, SHA-1, SHA-256 or
//! SHA-512).
//!
//! # Usage
//!
//! ```
//! use jksn::prelude::*;
//!
//! let doc = Jksn::from_json_str(r#"[{"name": "ada", "id": 1}, {"name": "bob", "id": 2}]"#)
//!     .unwrap();
//!
//! // the defaults pick the most compact encoding
//! let bytes = encode_full(&doc).unwrap();
//!
//! assert_eq!(decode_slice(&bytes).unwrap(), doc);
//! ```
//!
//! Options control the text encoding, the swapped layout, the optimizer, the magic header
//! and checksums:
//!
//! ```
//! use jksn::prelude::*;
//!
//! let opts = EncodeOptions::default()
//!     .string_encoding(StringEncoding::Utf8)
//!     .checksum(ChecksumKind::Sha256, Placement::Suffix);
//!
//! let bytes = encode(&Jksn::from("hello"), &opts).unwrap();
//! assert_eq!(bytes[0], 0xfc);
//!
//! let decoded = decode(&bytes[..], true).unwrap();
//! assert_eq!(decoded.as_str(), Some("hello"));
//! ```
//!
//! # Values
//!
//! [`Jksn`] is the value tree. Integers are [`Inum`]s, which fall back to big integers
//! outside the `i64` range. Floats are [`Float`]s, which remember whether they are single
//! or double precision. Objects are [`VecMap`]s keyed by arbitrary values, in stream order.
//!
//! [`Jksn::Unspecified`] is the wire's "no value here" marker. It terminates lengthless
//! arrays and fills the holes of swapped arrays, and is only returned to callers when it
//! appears on its own.
//!
//! # Format
//!
//! | Control byte  | Meaning                                                          |
//! | ---           | ---                                                              |
//! | `0x00`-`0x01` | null                                                             |
//! | `0x02`/`0x03` | false / true                                                     |
//! | `0x0f`        | the following text value is JSON                                 |
//! | `0x10`-`0x1a` | integers 0 to 10                                                 |
//! | `0x1b`-`0x1d` | signed 32, 16, 8 bit big-endian integer                          |
//! | `0x1e`/`0x1f` | negative / positive varint integer                               |
//! | `0x20`        | NaN                                                              |
//! | `0x2b`        | long double (not supported)                                      |
//! | `0x2c`/`0x2d` | big-endian double / single                                       |
//! | `0x2e`/`0x2f` | -Infinity / +Infinity                                            |
//! | `0x30`-`0x3f` | UTF-16LE text, length in units; `0x3c` is a text back-reference  |
//! | `0x40`-`0x4f` | UTF-8 text                                                       |
//! | `0x50`-`0x5f` | blob; `0x5c` is a blob back-reference                            |
//! | `0x70`        | clear the back-reference tables                                  |
//! | `0x71`-`0x7f` | decode and discard N values                                      |
//! | `0x80`-`0x8f` | array of N values                                                |
//! | `0x90`-`0x9f` | object of N key/value pairs                                      |
//! | `0xa0`        | unspecified                                                      |
//! | `0xa1`-`0xaf` | swapped array of N columns                                       |
//! | `0xc8`        | array terminated by an unspecified value                         |
//! | `0xca`        | padding                                                          |
//! | `0xd0`-`0xdf` | delta against the previous integer                               |
//! | `0xf0`-`0xf5` | checksum before the wrapped value                                |
//! | `0xf8`-`0xfd` | checksum after the wrapped value                                 |
//! | `0xff`        | wrapper without checksum                                         |
//!
//! Sized regions share one length rule on the low nibble: `0x0`-`0xc` are the length
//! itself, `0xd` is followed by a big-endian `u16`, `0xe` by a `u8`, and `0xf` by a varint.
//! Varints are big-endian groups of seven bits, with the high bit set on all groups but the
//! last. A stream may start with the magic `!jk`.

#![warn(
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

pub mod encoding;
pub mod errors;
pub mod float;
pub mod inum;
pub mod json;
pub mod prelude;
mod util;
pub mod vecmap;

use bytes::Bytes;
use errors::{JksnError, Result};
use num_bigint::BigInt;
use std::fmt;

pub use float::Float;
pub use inum::Inum;
pub use vecmap::VecMap;

/// A JKSN value.
///
/// # Example
///
/// ```
/// use jksn::prelude::*;
///
/// let v = Jksn::from(vec![Jksn::from(1), Jksn::from("two"), Jksn::Null]);
///
/// match &v {
///     Jksn::Array(items) => assert_eq!(items.len(), 3),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Jksn {
    Null,
    Bool(bool),
    /// Integer of any size.
    Jint(Inum),
    /// Floating point number.
    Jfloat(Float),
    /// Text.
    Str(String),
    /// Uninterpreted bytes.
    Blob(Bytes),
    Array(Vec<Jksn>),
    /// Object. Keys can be any value, although JSON documents only use text.
    Object(VecMap<Jksn, Jksn>),
    /// The wire's "no value" marker.
    Unspecified,
}

use Jksn::*;

impl Jksn {
    /// A blob from a byte literal.
    ///
    /// ```
    /// use jksn::Jksn;
    ///
    /// let blob = Jksn::from_static(b"\x00\x01");
    /// assert_eq!(blob.as_blob().map(|b| b.len()), Some(2));
    /// ```
    pub fn from_static(bytes: &'static [u8]) -> Jksn { Blob(Bytes::from_static(bytes)) }

    pub fn is_null(&self) -> bool {
        match self {
            Null => true,
            _ => false,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        match self {
            Unspecified => true,
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_inum(&self) -> Option<&Inum> {
        match self {
            Jint(i) => Some(i),
            _ => None,
        }
    }

    /// The value as an `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> { self.as_inum().and_then(Inum::to_i64) }

    pub fn as_float(&self) -> Option<Float> {
        match self {
            Jfloat(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Jksn>> {
        match self {
            Array(a) => Some(a),
            _ => None,
        }
    }

    /// Consumes the value, returning its elements.
    /// This will return a [`JksnError::Conversion`] if the value is not an array.
    pub fn into_array(self) -> Result<Vec<Jksn>> {
        match self {
            Array(a) => Ok(a),
            other => Err(JksnError::Conversion(format!(
                "expected an array, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn as_object(&self) -> Option<&VecMap<Jksn, Jksn>> {
        match self {
            Object(m) => Some(m),
            _ => None,
        }
    }

    /// Consumes the value, returning its entries.
    /// This will return a [`JksnError::Conversion`] if the value is not an object.
    pub fn into_object(self) -> Result<VecMap<Jksn, Jksn>> {
        match self {
            Object(m) => Ok(m),
            other => Err(JksnError::Conversion(format!(
                "expected an object, found {}",
                other.type_name()
            ))),
        }
    }

    /// Looks up a text key in an object.
    ///
    /// ```
    /// use jksn::prelude::*;
    ///
    /// let v = Jksn::from_json_str(r#"{"a": [1, 2]}"#).unwrap();
    /// assert_eq!(v.get("a"), Some(&Jksn::from(vec![1, 2])));
    /// assert_eq!(v.get("b"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&Jksn> {
        self.as_object()?.iter().find(|(k, _)| k.as_str() == Some(key)).map(|(_, v)| v)
    }

    /// Name of the value's kind, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Null => "null",
            Bool(_) => "bool",
            Jint(_) => "integer",
            Jfloat(_) => "float",
            Str(_) => "text",
            Blob(_) => "blob",
            Array(_) => "array",
            Object(_) => "object",
            Unspecified => "unspecified",
        }
    }
}

fn fmt_str(s: &str, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&serde_json::to_string(s).map_err(|_| fmt::Error)?)
}

/// Renders JSON-like text. Blobs show as `b"<hex>"`, and keys are rendered as values, so
/// non-text keys stay readable.
impl fmt::Display for Jksn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Null => f.write_str("null"),
            Bool(b) => write!(f, "{}", b),
            Jint(i) => write!(f, "{}", i),
            Jfloat(x) => write!(f, "{}", x),
            Str(s) => fmt_str(s, f),
            Blob(b) => write!(f, "b\"{}\"", hex::encode(b)),
            Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Object(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Unspecified => f.write_str("<unspecified>"),
        }
    }
}

impl From<&str> for Jksn {
    fn from(s: &str) -> Jksn { Str(s.to_string()) }
}

impl From<()> for Jksn {
    fn from(_: ()) -> Jksn { Null }
}

impl<T: Into<Jksn>> From<Option<T>> for Jksn {
    fn from(o: Option<T>) -> Jksn { o.map_or(Null, T::into) }
}

impl<T: Into<Jksn>> From<Vec<T>> for Jksn {
    fn from(v: Vec<T>) -> Jksn { Array(v.into_iter().map(T::into).collect()) }
}

impl<K: Into<Jksn>, V: Into<Jksn>> From<VecMap<K, V>> for Jksn {
    fn from(m: VecMap<K, V>) -> Jksn {
        Object(m.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

from_fn!(Jksn, bool, Bool);
try_from_ctor!(Jksn, bool, Bool);

from_fn!(Jksn, Inum, Jint);
try_from_ctor!(Jksn, Inum, Jint);

from_fn!(Jksn, Float, Jfloat);
try_from_ctor!(Jksn, Float, Jfloat);

from_fn!(Jksn, String, Str);
try_from_ctor!(Jksn, String, Str);

from_fn!(Jksn, Bytes, Blob);
try_from_ctor!(Jksn, Bytes, Blob);

try_from_ctor!(Jksn, Vec<Jksn>, Array);
try_from_ctor!(Jksn, VecMap<Jksn, Jksn>, Object);

// Integers
compose_from!(Jksn, Inum, BigInt);
compose_from!(Jksn, Inum, isize);
compose_from!(Jksn, Inum, usize);
compose_from!(Jksn, Inum, i64);
compose_from!(Jksn, Inum, u64);
compose_from!(Jksn, Inum, i128);
compose_from!(Jksn, Inum, u128);
from_prims!(Jksn);

// Floats
compose_from!(Jksn, Float, f32);
compose_from!(Jksn, Float, f64);

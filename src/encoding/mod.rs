//! # JKSN binary encoder and decoder
//!
//! Entry points for turning [`Jksn`] values into bytes and back.
//!
//! # Example
//!
//! ```
//! use jksn::prelude::*;
//!
//! let doc = Jksn::from(vec![Jksn::from("id"), Jksn::from(7), Jksn::Null]);
//!
//! // the most compact encoding, no header or checksum
//! let compact = encode_full(&doc).unwrap();
//!
//! // the same value, framed and checksummed
//! let opts = EncodeOptions::default()
//!     .header(true)
//!     .checksum(ChecksumKind::Sha1, Placement::Prefix);
//! let framed = encode(&doc, &opts).unwrap();
//! assert!(framed.len() > compact.len());
//!
//! // both decode to the same value
//! assert_eq!(decode_slice(&compact).unwrap(), doc);
//! assert_eq!(decode(&framed[..], true).unwrap(), doc);
//! ```

use crate::{errors::Result, Jksn};
use bytes::Buf;
use std::io::Read;
use tracing::trace;

pub mod checksum;
pub(crate) mod constants;
pub mod de;
pub mod hashtable;
pub mod io;
pub mod options;
pub mod ser;
pub mod varint;

pub use checksum::{ChecksumKind, Placement};
pub use de::Decoder;
pub use io::{Source, StrictReader};
pub use options::{DecodeOptions, EncodeOptions, StringEncoding};
pub use ser::{Encoder, Serializer};

/// Encodes `value` into a fresh buffer according to `opts`.
///
/// # Example
///
/// ```
/// use jksn::prelude::*;
///
/// let bytes = encode(&Jksn::from(3), &EncodeOptions::plain()).unwrap();
/// assert_eq!(bytes, vec![0x13]);
/// ```
pub fn encode(value: &Jksn, opts: &EncodeOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_with(value, opts, &mut out)?;
    Ok(out)
}

/// Encodes `value` into any [`Serializer`].
///
/// # Example
///
/// ```
/// use jksn::prelude::*;
/// use bytes::BytesMut;
///
/// let mut out = BytesMut::new();
/// encode_with(&Jksn::from("hi"), &EncodeOptions::default(), &mut out).unwrap();
/// assert_eq!(out.finalize(), Bytes::from_static(b"\x42hi"));
/// ```
pub fn encode_with<S: Serializer>(value: &Jksn, opts: &EncodeOptions, out: &mut S) -> Result<()> {
    Encoder::new(opts).encode(value, out)
}

/// Encodes `value` with the default options.
pub fn encode_full(value: &Jksn) -> Result<Vec<u8>> { encode(value, &EncodeOptions::default()) }

/// Decodes one value from `reader`. With `header` set, a leading `!jk` is skipped when
/// present.
pub fn decode<R: Read>(reader: R, header: bool) -> Result<Jksn> {
    decode_with(reader, &DecodeOptions::default().header(header))
}

/// Decodes one value from `reader` according to `opts`. Bytes after the value are left
/// unread.
pub fn decode_with<R: Read>(reader: R, opts: &DecodeOptions) -> Result<Jksn> {
    let mut src = StrictReader::new(reader);
    if opts.header && src.skip_header()? {
        trace!("skipped stream header");
    }
    Decoder::new(opts).decode(&mut src)
}

/// Decodes one value from a buffer, with the default options.
///
/// # Example
///
/// ```
/// use jksn::prelude::*;
///
/// let buf = Bytes::from_static(b"\x82\x11\x12");
/// assert_eq!(decode_full(buf).unwrap(), Jksn::from(vec![1, 2]));
/// ```
pub fn decode_full<B: Buf>(buf: B) -> Result<Jksn> {
    decode_with(buf.reader(), &DecodeOptions::default())
}

/// Decodes one value from a byte slice, with the default options.
pub fn decode_slice(bytes: &[u8]) -> Result<Jksn> { decode_with(bytes, &DecodeOptions::default()) }

use crate::encoding::checksum::ChecksumKind;
use failure::Fail;
use std::io;

/// Errors produced while encoding or decoding JKSN.
///
/// Decoding is all-or-nothing: any of these aborts the current call and no partial value is
/// returned. The variants are kept apart so that callers can tell a malformed stream from a
/// corrupted one, a truncated one, or one using a feature this decoder does not implement.
#[derive(Debug, Fail)]
pub enum JksnError {
    /// The stream is structurally malformed: an unknown control byte, a delta without a
    /// preceding integer, a back-reference to an empty hash slot, and so on.
    #[fail(display = "cannot decode JKSN at offset {}: {}", offset, reason)]
    Decode {
        /// Offset of the control byte that was being decoded.
        offset: u64,
        /// What was wrong.
        reason: String,
    },
    /// A checksum wrapper did not match the bytes it covers.
    #[fail(
        display = "JKSN {} checksum mismatch: stream carries {:02x?}, computed {:02x?}",
        algorithm, expected, computed
    )]
    Checksum {
        /// Digest algorithm named by the wrapper.
        algorithm: ChecksumKind,
        /// Digest stored in the stream.
        expected: Vec<u8>,
        /// Digest computed over the wrapped value.
        computed: Vec<u8>,
    },
    /// The stream is well formed but uses something this implementation cannot represent.
    #[fail(display = "unsupported JKSN feature: {}", _0)]
    Unsupported(String),
    /// The stream ended before a value was complete.
    #[fail(
        display = "JKSN stream ended at offset {} while reading {} more bytes",
        offset, wanted
    )]
    Eof {
        /// Offset at which the short read started.
        offset: u64,
        /// Number of bytes the read asked for.
        wanted: usize,
    },
    /// The underlying reader failed for a reason other than running out of bytes.
    #[fail(display = "I/O error while reading JKSN: {}", _0)]
    Io(#[cause] io::Error),
    /// The value cannot be encoded with the given options.
    #[fail(display = "cannot encode JKSN: {}", _0)]
    Encode(String),
    /// A conversion out of [`Jksn`](crate::Jksn) failed.
    #[fail(display = "conversion from JKSN failed: {}", _0)]
    Conversion(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JksnError>;

impl JksnError {
    /// Creates a [`JksnError::Decode`].
    pub fn decode<S: Into<String>>(offset: u64, reason: S) -> Self {
        JksnError::Decode {
            offset,
            reason: reason.into(),
        }
    }

    /// `true` for malformed-stream errors.
    pub fn is_structural(&self) -> bool {
        match self {
            JksnError::Decode { .. } => true,
            _ => false,
        }
    }

    /// `true` for checksum mismatches.
    pub fn is_integrity(&self) -> bool {
        match self {
            JksnError::Checksum { .. } => true,
            _ => false,
        }
    }

    /// `true` when the stream simply ran out; more bytes might make it decodable.
    pub fn is_truncation(&self) -> bool {
        match self {
            JksnError::Eof { .. } => true,
            _ => false,
        }
    }

    /// `true` when a receiver limitation rather than the stream is at fault.
    pub fn is_unsupported(&self) -> bool {
        match self {
            JksnError::Unsupported(_) => true,
            _ => false,
        }
    }
}

impl From<io::Error> for JksnError {
    fn from(e: io::Error) -> Self { JksnError::Io(e) }
}

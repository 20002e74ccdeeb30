//! Layered byte sources for the decoder.
//!
//! The decoder pulls bytes through [`Source`], a minimal "read exactly N bytes or fail"
//! interface. Two layers implement it:
//!
//! * [`StrictReader`] adapts any [`io::Read`], turns short reads into [`JksnError::Eof`] and
//!   can push back the bytes it consumed while probing for the magic header.
//! * [`HashedReader`] sits on top of another source and feeds every byte it hands out into a
//!   checksum [`Hasher`], which is how checksum wrappers verify the value they enclose.

use super::{checksum::Hasher, constants::HEADER};
use crate::errors::{JksnError, Result};
use smallvec::SmallVec;
use std::io::{self, Read};
use tracing::trace;

/// Reads are split into chunks of at most this size, so a forged length cannot make us
/// allocate more than the stream actually holds.
const READ_CHUNK: usize = 64 * 1024;

/// A source of bytes that either fills the whole buffer or fails.
pub trait Source {
    /// Fills `buf` completely, or fails with [`JksnError::Eof`] if the stream ends first.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Number of bytes consumed so far, for diagnostics.
    fn offset(&self) -> u64;
}

/// Convenience methods for [`Source`].
pub trait SourceExt: Source {
    /// Reads a single byte.
    fn take_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// Reads `len` bytes into a new vector.
    fn read_many(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len.min(READ_CHUNK));
        while out.len() < len {
            let start = out.len();
            let step = (len - start).min(READ_CHUNK);
            out.resize(start + step, 0);
            self.read_exact(&mut out[start..])?;
        }
        Ok(out)
    }
}

impl<S: Source + ?Sized> SourceExt for S {}

/// Adapts an [`io::Read`] into a [`Source`].
#[derive(Debug)]
pub struct StrictReader<R> {
    inner: R,
    /// Bytes handed back after header probing, stored in reverse.
    pushback: SmallVec<[u8; 4]>,
    offset: u64,
}

impl<R: Read> StrictReader<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        StrictReader {
            inner,
            pushback: SmallVec::new(),
            offset: 0,
        }
    }

    /// Consumes the `!jk` magic if the stream starts with it. Otherwise every probed byte is
    /// pushed back, so header-less streams (including ones shorter than the magic) decode
    /// unchanged. Returns whether the header was present.
    pub fn skip_header(&mut self) -> Result<bool> {
        let mut seen: SmallVec<[u8; 4]> = SmallVec::new();
        while seen.len() < HEADER.len() {
            match self.next_byte()? {
                Some(b) => seen.push(b),
                None => break,
            }
        }

        if seen[..] == HEADER[..] {
            trace!("consumed JKSN header");
            Ok(true)
        } else {
            self.offset -= seen.len() as u64;
            self.pushback.extend(seen.into_iter().rev());
            Ok(false)
        }
    }

    /// Returns the wrapped reader. Pushed back bytes are lost.
    pub fn into_inner(self) -> R { self.inner }

    /// Reads one byte, returning `None` at end of stream.
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pushback.pop() {
            self.offset += 1;
            return Ok(Some(b));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(JksnError::Io(e)),
            }
        }
    }
}

impl<R: Read> Source for StrictReader<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.pushback.pop() {
                Some(b) => {
                    buf[filled] = b;
                    filled += 1;
                }
                None => break,
            }
        }

        if filled < buf.len() {
            match self.inner.read_exact(&mut buf[filled..]) {
                Ok(()) => {}
                Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(JksnError::Eof {
                        offset: self.offset,
                        wanted: buf.len(),
                    });
                }
                Err(e) => return Err(JksnError::Io(e)),
            }
        }

        self.offset += buf.len() as u64;
        Ok(())
    }

    fn offset(&self) -> u64 { self.offset }
}

/// Passes bytes through from another source while accumulating a digest over them.
pub struct HashedReader<'a> {
    inner: &'a mut dyn Source,
    hasher: Hasher,
}

impl<'a> HashedReader<'a> {
    /// Starts hashing everything read from `inner` from now on.
    pub fn new(inner: &'a mut dyn Source, hasher: Hasher) -> Self { HashedReader { inner, hasher } }

    /// Stops hashing and returns the digest.
    pub fn finish(self) -> Vec<u8> { self.hasher.finalize() }
}

impl Source for HashedReader<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        self.hasher.update(buf);
        Ok(())
    }

    fn offset(&self) -> u64 { self.inner.offset() }
}

impl std::fmt::Debug for HashedReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("HashedReader")
            .field("offset", &self.inner.offset())
            .field("hasher", &self.hasher)
            .finish()
    }
}

//! The decoder engine.
//!
//! [`Decoder`] owns the state of one decoding session: the last integer seen (for deltas),
//! the back-reference tables, and the current nesting depth. It reads from a
//! [`Source`] trait object so that checksum wrappers can interpose a
//! [`HashedReader`] at any depth.

use super::{
    checksum::{ChecksumKind, Placement},
    constants::*,
    hashtable::{djb_hash, HashTables},
    io::{HashedReader, Source, SourceExt},
    options::DecodeOptions,
    varint::*,
};
use crate::{
    errors::{JksnError, Result},
    json::parse_embedded,
    Float, Inum, Jksn, VecMap,
};
use bytes::Bytes;
use tracing::{debug, trace};

/// Containers never preallocate more than this many slots up front; a forged count only
/// costs what the stream actually delivers.
const PREALLOC_LIMIT: usize = 1024;

/// Decoding session state.
#[derive(Debug)]
pub struct Decoder {
    lastint: Option<Inum>,
    tables: HashTables,
    depth: usize,
    max_depth: usize,
}

fn unknown(offset: u64, control: u8) -> JksnError {
    JksnError::decode(offset, format!("cannot decode JKSN from byte 0x{:02x}", control))
}

impl Decoder {
    pub fn new(opts: &DecodeOptions) -> Self {
        Decoder {
            lastint: None,
            tables: HashTables::new(),
            depth: 0,
            max_depth: opts.max_depth,
        }
    }

    /// Decodes one complete value. Session state carries over between calls, so several
    /// values read from the same stream can share back-references and deltas.
    pub fn decode(&mut self, src: &mut dyn Source) -> Result<Jksn> { self.decode_value(src) }

    fn decode_value(&mut self, src: &mut dyn Source) -> Result<Jksn> {
        if self.depth >= self.max_depth {
            return Err(JksnError::decode(
                src.offset(),
                format!("values nested deeper than {} levels", self.max_depth),
            ));
        }
        self.depth += 1;
        let res = self.read_value(src);
        self.depth -= 1;
        res
    }

    fn read_value(&mut self, src: &mut dyn Source) -> Result<Jksn> {
        loop {
            let offset = src.offset();
            let control = src.take_byte()?;
            let low = control & MASK_LOW;

            return match control & MASK_REGION {
                REGION_SPECIAL => match control {
                    CON_UNDEFINED | CON_NULL => Ok(Jksn::Null),
                    CON_FALSE => Ok(Jksn::Bool(false)),
                    CON_TRUE => Ok(Jksn::Bool(true)),
                    CON_JSON => self.read_json(src, offset),
                    _ => Err(unknown(offset, control)),
                },
                REGION_INT => {
                    let n = self.read_int(src, control)?;
                    self.lastint = Some(n.clone());
                    Ok(Jksn::Jint(n))
                }
                REGION_FLOAT => read_float(src, control, offset).map(Jksn::Jfloat),
                REGION_UTF16 => self.read_utf16(src, low, offset).map(Jksn::Str),
                REGION_UTF8 => self.read_utf8(src, low, offset).map(Jksn::Str),
                REGION_BLOB => self.read_blob(src, low).map(Jksn::Blob),
                REGION_HASHTABLE => {
                    if control == HASHTABLE_CLEAR {
                        trace!(offset, "clearing hash tables");
                        self.tables.clear();
                    } else {
                        let count = read_length(src, low)?;
                        trace!(offset, count, "priming hash tables");
                        for _ in 0..count {
                            self.decode_value(src)?;
                        }
                    }
                    continue;
                }
                REGION_ARRAY => {
                    let len = read_length(src, low)?;
                    let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                    for _ in 0..len {
                        items.push(self.decode_value(src)?);
                    }
                    Ok(Jksn::Array(items))
                }
                REGION_OBJECT => {
                    let len = read_length(src, low)?;
                    let mut map = VecMap::with_capacity(len.min(PREALLOC_LIMIT));
                    for _ in 0..len {
                        let key = self.decode_value(src)?;
                        let value = self.decode_value(src)?;
                        map.insert(key, value);
                    }
                    Ok(Jksn::Object(map))
                }
                REGION_SWAPPED => {
                    if control == UNSPECIFIED {
                        Ok(Jksn::Unspecified)
                    } else {
                        let columns = read_length(src, low)?;
                        self.read_swapped(src, columns)
                    }
                }
                REGION_CONTROL => match control {
                    LENGTHLESS_ARRAY => {
                        let mut items = Vec::new();
                        loop {
                            match self.decode_value(src)? {
                                Jksn::Unspecified => break,
                                item => items.push(item),
                            }
                        }
                        Ok(Jksn::Array(items))
                    }
                    PADDING => continue,
                    _ => Err(unknown(offset, control)),
                },
                REGION_DELTA => self.read_delta(src, control, offset).map(Jksn::Jint),
                REGION_CHECKSUM => self.read_checksummed(src, control, offset),
                _ => Err(unknown(offset, control)),
            };
        }
    }

    fn read_int(&mut self, src: &mut dyn Source, control: u8) -> Result<Inum> {
        Ok(match control {
            INT_32 => Inum::I64(read_signed(src, 4)?),
            INT_16 => Inum::I64(read_signed(src, 2)?),
            INT_8 => Inum::I64(read_signed(src, 1)?),
            INT_NEG_VAR => read_varint_signed(src, true)?,
            INT_POS_VAR => read_varint_signed(src, false)?,
            inline => Inum::I64((inline & MASK_LOW) as i64),
        })
    }

    fn read_delta(&mut self, src: &mut dyn Source, control: u8, offset: u64) -> Result<Inum> {
        let low = control & MASK_LOW;
        let delta = match control {
            DELTA_32 => Inum::I64(read_signed(src, 4)?),
            DELTA_16 => Inum::I64(read_signed(src, 2)?),
            DELTA_8 => Inum::I64(read_signed(src, 1)?),
            DELTA_NEG_VAR => read_varint_signed(src, true)?,
            DELTA_POS_VAR => read_varint_signed(src, false)?,
            _ if low <= DELTA_INLINE_POS_MAX => Inum::I64(low as i64),
            _ => Inum::I64(low as i64 - DELTA_INLINE_NEG_BIAS),
        };

        let n = match &self.lastint {
            Some(last) => last + &delta,
            None => {
                return Err(JksnError::decode(
                    offset,
                    "delta encoded integer without a preceding integer",
                ))
            }
        };
        self.lastint = Some(n.clone());
        Ok(n)
    }

    fn read_utf16(&mut self, src: &mut dyn Source, low: u8, offset: u64) -> Result<String> {
        if low == TEXT_HASH & MASK_LOW {
            return self.text_backref(src);
        }

        let units = read_length(src, low)?;
        let len = units
            .checked_mul(2)
            .ok_or_else(|| JksnError::decode(offset, "UTF-16 length overflows"))?;
        let raw = src.read_many(len)?;
        let wide: Vec<u16> = raw
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text = String::from_utf16(&wide)
            .map_err(|_| JksnError::decode(offset, "text is not valid UTF-16"))?;

        self.tables.remember_text(djb_hash(&raw), text.clone());
        Ok(text)
    }

    fn read_utf8(&mut self, src: &mut dyn Source, low: u8, offset: u64) -> Result<String> {
        let len = read_length(src, low)?;
        let raw = src.read_many(len)?;
        let hash = djb_hash(&raw);
        let text = String::from_utf8(raw)
            .map_err(|_| JksnError::decode(offset, "text is not valid UTF-8"))?;

        self.tables.remember_text(hash, text.clone());
        Ok(text)
    }

    fn text_backref(&mut self, src: &mut dyn Source) -> Result<String> {
        let offset = src.offset();
        let hash = src.take_byte()?;
        self.tables.text(hash).cloned().ok_or_else(|| {
            JksnError::decode(
                offset,
                format!("JKSN stream requires a non-existing text hash: 0x{:02x}", hash),
            )
        })
    }

    fn read_blob(&mut self, src: &mut dyn Source, low: u8) -> Result<Bytes> {
        if low == BLOB_HASH & MASK_LOW {
            let offset = src.offset();
            let hash = src.take_byte()?;
            return self.tables.blob(hash).cloned().ok_or_else(|| {
                JksnError::decode(
                    offset,
                    format!("JKSN stream requires a non-existing blob hash: 0x{:02x}", hash),
                )
            });
        }

        let len = read_length(src, low)?;
        let blob = Bytes::from(src.read_many(len)?);
        self.tables.remember_blob(djb_hash(&blob), blob.clone());
        Ok(blob)
    }

    fn read_json(&mut self, src: &mut dyn Source, offset: u64) -> Result<Jksn> {
        match self.decode_value(src)? {
            Jksn::Str(text) => parse_embedded(&text)
                .map_err(|e| JksnError::decode(offset, format!("embedded JSON is invalid: {}", e))),
            other => Err(JksnError::decode(
                offset,
                format!("embedded JSON must be text, found {}", other.type_name()),
            )),
        }
    }

    fn read_swapped(&mut self, src: &mut dyn Source, columns: usize) -> Result<Jksn> {
        let mut rows: Vec<VecMap<Jksn, Jksn>> = Vec::new();

        for _ in 0..columns {
            let name = self.decode_value(src)?;
            let offset = src.offset();
            let cells = match self.decode_value(src)? {
                Jksn::Array(cells) => cells,
                other => {
                    return Err(JksnError::decode(
                        offset,
                        format!(
                            "JKSN row-col swapped array requires an array but found {}",
                            other.type_name()
                        ),
                    ))
                }
            };

            for (i, cell) in cells.into_iter().enumerate() {
                if i == rows.len() {
                    rows.push(VecMap::new());
                }
                if cell != Jksn::Unspecified {
                    rows[i].insert(name.clone(), cell);
                }
            }
        }

        Ok(Jksn::Array(rows.into_iter().map(Jksn::Object).collect()))
    }

    fn read_checksummed(&mut self, src: &mut dyn Source, control: u8, offset: u64) -> Result<Jksn> {
        if control == CHECKSUM_NONE {
            return self.decode_value(src);
        }

        let (kind, placement) =
            ChecksumKind::from_control(control).ok_or_else(|| unknown(offset, control))?;

        let (value, expected, computed) = match placement {
            Placement::Prefix => {
                let expected = src.read_many(kind.digest_len())?;
                let mut hashed = HashedReader::new(&mut *src, kind.hasher());
                let value = self.decode_value(&mut hashed)?;
                (value, expected, hashed.finish())
            }
            Placement::Suffix => {
                let mut hashed = HashedReader::new(&mut *src, kind.hasher());
                let value = self.decode_value(&mut hashed)?;
                let computed = hashed.finish();
                (value, src.read_many(kind.digest_len())?, computed)
            }
        };

        if expected == computed {
            debug!(offset, algorithm = %kind, ?placement, "checksum verified");
            Ok(value)
        } else {
            Err(JksnError::Checksum {
                algorithm: kind,
                expected,
                computed,
            })
        }
    }
}

fn read_float(src: &mut dyn Source, control: u8, offset: u64) -> Result<Float> {
    match control {
        FLOAT_NAN => Ok(Float::nan()),
        FLOAT_LONG_DOUBLE => Err(JksnError::Unsupported(
            "this JKSN decoder does not support long double numbers".to_string(),
        )),
        FLOAT_DOUBLE => {
            let mut buf = [0u8; 8];
            src.read_exact(&mut buf)?;
            Ok(Float::Double(u64::from_be_bytes(buf)))
        }
        FLOAT_SINGLE => {
            let mut buf = [0u8; 4];
            src.read_exact(&mut buf)?;
            Ok(Float::Single(u32::from_be_bytes(buf)))
        }
        FLOAT_NEG_INF => Ok(Float::infinity(true)),
        FLOAT_POS_INF => Ok(Float::infinity(false)),
        _ => Err(unknown(offset, control)),
    }
}

//! The encoder engine.
//!
//! Encoding happens in three passes:
//!
//! 1. [`Encoder::stage`] turns the value tree into a tree of [`Staged`] nodes, each holding
//!    its control byte, the bytes that follow it, and its children. Arrays of objects are
//!    staged both straight and swapped, and the shorter layout is kept.
//! 2. [`Encoder::optimize`] walks the staged tree in wire order, replaying the decoder's
//!    session state, and rewrites integers into deltas and repeated text or blobs into
//!    back-references where that is shorter.
//! 3. [`Ser::ser`] writes the nodes out depth first.

use super::{
    checksum::Placement,
    constants::*,
    hashtable::{djb_hash, HashTables},
    options::{EncodeOptions, StringEncoding},
    varint::{length_field, push_varint_u64, varint, LenField},
};
use crate::{
    errors::{JksnError, Result},
    Float, Inum, Jksn,
};
use bytes::{BufMut, Bytes, BytesMut};
use indexmap::IndexSet;
use smallvec::smallvec;
use tracing::{debug, trace};

/// A sink for encoded bytes.
pub trait Serializer {
    /// The type of the output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

impl Serializer for Vec<u8> {
    type Out = Self;

    fn put_u8(&mut self, u: u8) { self.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn finalize(self) -> Self::Out { self }
}

impl Serializer for BytesMut {
    type Out = Bytes;

    fn put_u8(&mut self, u: u8) { BufMut::put_u8(self, u) }

    fn put_slice(&mut self, slice: &[u8]) { BufMut::put_slice(self, slice) }

    fn finalize(self) -> Bytes { self.freeze() }
}

/// A value that can be serialized.
pub trait Ser {
    fn ser<S: Serializer>(&self, s: &mut S);
}

/// Fills the holes of swapped array columns.
static UNSPECIFIED_CELL: Jksn = Jksn::Unspecified;

/// One node of the staged tree.
#[derive(Clone, Debug)]
pub struct Staged<'a> {
    /// The value this node encodes. Synthesized nodes (swapped columns) have none.
    origin: Option<&'a Jksn>,
    control: u8,
    /// Length field, or the number itself for integers.
    field: LenField,
    /// Raw text or blob bytes, or the float bits.
    payload: Vec<u8>,
    children: Vec<Staged<'a>>,
    /// DJB hash of the payload, for text and blobs.
    hash: Option<u8>,
}

impl<'a> Staged<'a> {
    fn leaf(origin: Option<&'a Jksn>, control: u8) -> Self {
        Staged {
            origin,
            control,
            field: LenField::new(),
            payload: Vec::new(),
            children: Vec::new(),
            hash: None,
        }
    }

    /// The node's control byte.
    pub fn control(&self) -> u8 { self.control }

    /// Size of this node alone, without children.
    fn own_len(&self) -> usize { 1 + self.field.len() + self.payload.len() }

    /// Encoded size of the whole subtree.
    pub fn encoded_len(&self) -> usize {
        self.own_len() + self.children.iter().map(Staged::encoded_len).sum::<usize>()
    }
}

impl Ser for Staged<'_> {
    fn ser<S: Serializer>(&self, s: &mut S) {
        s.put_u8(self.control);
        s.put_slice(&self.field);
        s.put_slice(&self.payload);
        for child in &self.children {
            child.ser(s);
        }
    }
}

/// Control bytes of one integer family: plain integers or deltas.
struct IntCodes {
    fixed32: u8,
    fixed16: u8,
    fixed8: u8,
    neg_var: u8,
    pos_var: u8,
}

const PLAIN_CODES: IntCodes = IntCodes {
    fixed32: INT_32,
    fixed16: INT_16,
    fixed8: INT_8,
    neg_var: INT_NEG_VAR,
    pos_var: INT_POS_VAR,
};

const DELTA_CODES: IntCodes = IntCodes {
    fixed32: DELTA_32,
    fixed16: DELTA_16,
    fixed8: DELTA_8,
    neg_var: DELTA_NEG_VAR,
    pos_var: DELTA_POS_VAR,
};

/// The shortest sized form of `n`: 8 or 16 bit, then a varint of at most three groups,
/// then 32 bit, then an unbounded varint.
fn sized_int(n: &Inum, codes: &IntCodes) -> (u8, LenField) {
    let mut field = LenField::new();
    let control = match n.to_i64() {
        Some(i) if i >= i8::min_value() as i64 && i <= i8::max_value() as i64 => {
            field.push(i as i8 as u8);
            codes.fixed8
        }
        Some(i) if i >= i16::min_value() as i64 && i <= i16::max_value() as i64 => {
            field.extend_from_slice(&(i as i16).to_be_bytes());
            codes.fixed16
        }
        Some(i) if i.unsigned_abs() < VARINT_PREFERRED_BELOW as u64 => {
            push_varint_u64(&mut field, i.unsigned_abs());
            if i < 0 {
                codes.neg_var
            } else {
                codes.pos_var
            }
        }
        Some(i) if i >= i32::min_value() as i64 && i <= i32::max_value() as i64 => {
            field.extend_from_slice(&(i as i32).to_be_bytes());
            codes.fixed32
        }
        _ => {
            field = varint(&n.magnitude());
            if n.is_negative() {
                codes.neg_var
            } else {
                codes.pos_var
            }
        }
    };
    (control, field)
}

/// Encoding of a plain integer.
pub(crate) fn int_encoding(n: &Inum) -> (u8, LenField) {
    match n.to_i64() {
        Some(i) if i >= 0 && i <= INT_INLINE_MAX as i64 => (REGION_INT | i as u8, LenField::new()),
        _ => sized_int(n, &PLAIN_CODES),
    }
}

/// Encoding of a delta against the previous integer.
pub(crate) fn delta_encoding(d: &Inum) -> (u8, LenField) {
    match d.to_i64() {
        Some(i) if i >= 0 && i <= DELTA_INLINE_POS_MAX as i64 => {
            (REGION_DELTA | i as u8, LenField::new())
        }
        Some(i) if i < 0 && i >= DELTA_INLINE_POS_MAX as i64 + 1 - DELTA_INLINE_NEG_BIAS => {
            (REGION_DELTA | (i + DELTA_INLINE_NEG_BIAS) as u8, LenField::new())
        }
        _ => sized_int(d, &DELTA_CODES),
    }
}

/// Encoding session state.
#[derive(Debug)]
pub struct Encoder {
    opts: EncodeOptions,
    depth: usize,
    lastint: Option<Inum>,
    tables: HashTables,
}

impl Encoder {
    pub fn new(opts: &EncodeOptions) -> Self {
        Encoder {
            opts: opts.clone(),
            depth: 0,
            lastint: None,
            tables: HashTables::new(),
        }
    }

    /// Encodes `value` into `out` according to the options: stage, optimize, then write the
    /// header and the (optionally checksummed) body.
    pub fn encode<S: Serializer>(&mut self, value: &Jksn, out: &mut S) -> Result<()> {
        let mut staged = self.stage(value)?;
        if self.opts.optimize {
            self.optimize(&mut staged);
        }

        if self.opts.header {
            out.put_slice(HEADER);
        }

        match self.opts.checksum {
            None => staged.ser(out),
            Some(kind) => {
                let mut body = Vec::with_capacity(staged.encoded_len());
                staged.ser(&mut body);
                let digest = kind.digest(&body);
                let placement = self.opts.checksum_placement;
                trace!(algorithm = %kind, ?placement, len = body.len(), "wrapping in checksum");

                out.put_u8(kind.control(placement));
                match placement {
                    Placement::Prefix => {
                        out.put_slice(&digest);
                        out.put_slice(&body);
                    }
                    Placement::Suffix => {
                        out.put_slice(&body);
                        out.put_slice(&digest);
                    }
                }
            }
        }
        Ok(())
    }

    /// Nesting levels available to the value. A checksum wrapper takes one of them, as it
    /// does on the decoding side.
    fn depth_limit(&self) -> usize {
        match self.opts.checksum {
            Some(_) => self.opts.max_depth.saturating_sub(1),
            None => self.opts.max_depth,
        }
    }

    fn inc_depth(&mut self) -> Result<()> {
        let limit = self.depth_limit();
        if self.depth >= limit {
            return Err(JksnError::Encode(format!("values nested deeper than {} levels", limit)));
        }
        self.depth += 1;
        Ok(())
    }

    fn dec_depth(&mut self) { self.depth -= 1; }

    /// Builds the staged tree for `value`.
    pub fn stage<'a>(&mut self, value: &'a Jksn) -> Result<Staged<'a>> {
        self.inc_depth()?;
        let staged = self.stage_value(value);
        self.dec_depth();
        staged
    }

    fn stage_value<'a>(&mut self, value: &'a Jksn) -> Result<Staged<'a>> {
        let origin = Some(value);
        Ok(match value {
            Jksn::Null => Staged::leaf(origin, CON_NULL),
            Jksn::Bool(false) => Staged::leaf(origin, CON_FALSE),
            Jksn::Bool(true) => Staged::leaf(origin, CON_TRUE),
            Jksn::Unspecified => Staged::leaf(origin, UNSPECIFIED),
            Jksn::Jint(n) => {
                let (control, field) = int_encoding(n);
                Staged {
                    field,
                    ..Staged::leaf(origin, control)
                }
            }
            Jksn::Jfloat(f) => stage_float(origin, *f),
            Jksn::Str(s) => self.stage_text(origin, s),
            Jksn::Blob(b) => {
                let (control, field) = length_field(REGION_BLOB, b.len(), LEN_INLINE_MAX_HASHED);
                Staged {
                    field,
                    payload: b.to_vec(),
                    hash: Some(djb_hash(b)),
                    ..Staged::leaf(origin, control)
                }
            }
            Jksn::Array(items) => self.stage_array(origin, items.iter())?,
            Jksn::Object(map) => {
                let (control, field) = length_field(REGION_OBJECT, map.len(), LEN_INLINE_MAX);
                let mut children = Vec::with_capacity(map.len() * 2);
                for (k, v) in map.iter() {
                    children.push(self.stage(k)?);
                    children.push(self.stage(v)?);
                }
                Staged {
                    field,
                    children,
                    ..Staged::leaf(origin, control)
                }
            }
        })
    }

    fn stage_text<'a>(&self, origin: Option<&'a Jksn>, s: &str) -> Staged<'a> {
        let wide = match self.opts.string_encoding {
            StringEncoding::Utf8 => false,
            StringEncoding::Utf16 => true,
            StringEncoding::Auto => s.encode_utf16().count() * 2 < s.len(),
        };

        let (control, field, payload) = if wide {
            let mut raw = Vec::with_capacity(s.len() * 2);
            for unit in s.encode_utf16() {
                raw.extend_from_slice(&unit.to_le_bytes());
            }
            let (control, field) = length_field(REGION_UTF16, raw.len() / 2, LEN_INLINE_MAX_HASHED);
            (control, field, raw)
        } else {
            let (control, field) = length_field(REGION_UTF8, s.len(), LEN_INLINE_MAX);
            (control, field, s.as_bytes().to_vec())
        };

        Staged {
            field,
            hash: Some(djb_hash(&payload)),
            payload,
            ..Staged::leaf(origin, control)
        }
    }

    fn stage_array<'a, I>(&mut self, origin: Option<&'a Jksn>, items: I) -> Result<Staged<'a>>
    where
        I: ExactSizeIterator<Item = &'a Jksn> + Clone,
    {
        let (control, field) = length_field(REGION_ARRAY, items.len(), LEN_INLINE_MAX);
        let mut children = Vec::with_capacity(items.len());
        for item in items.clone() {
            children.push(self.stage(item)?);
        }
        let straight = Staged {
            field,
            children,
            ..Staged::leaf(origin, control)
        };

        if !self.opts.swapped_arrays || self.depth > self.opts.swap_depth_limit {
            return Ok(straight);
        }
        match self.stage_swapped(origin, items)? {
            Some(swapped) if swapped.encoded_len() < straight.encoded_len() => {
                debug!(
                    depth = self.depth,
                    straight = straight.encoded_len(),
                    swapped = swapped.encoded_len(),
                    "using swapped array layout"
                );
                Ok(swapped)
            }
            _ => Ok(straight),
        }
    }

    /// Stages the column-major layout, or returns `None` if the rows do not allow it.
    fn stage_swapped<'a, I>(&mut self, origin: Option<&'a Jksn>, rows: I) -> Result<Option<Staged<'a>>>
    where
        I: Iterator<Item = &'a Jksn> + Clone,
    {
        let mut maps = Vec::new();
        for row in rows {
            match row {
                Jksn::Object(map) if map.values().all(|v| !v.is_unspecified()) => maps.push(map),
                _ => return Ok(None),
            }
        }
        if maps.iter().all(|map| map.is_empty()) {
            return Ok(None);
        }

        let columns: IndexSet<&'a Jksn> = maps.iter().flat_map(|&map| map.keys()).collect();

        let (control, field) = length_field(REGION_SWAPPED, columns.len(), LEN_INLINE_MAX);
        let mut children = Vec::with_capacity(columns.len() * 2);
        for column in columns {
            children.push(self.stage(column)?);

            let cells: Vec<&'a Jksn> = maps
                .iter()
                .map(|map| map.get(column).unwrap_or(&UNSPECIFIED_CELL))
                .collect();
            self.inc_depth()?;
            let staged = self.stage_array(None, cells.into_iter());
            self.dec_depth();
            children.push(staged?);
        }

        Ok(Some(Staged {
            field,
            children,
            ..Staged::leaf(origin, control)
        }))
    }

    /// Rewrites the staged tree in wire order: integers become deltas against the previous
    /// integer, and text or blobs already sitting in the decoder's tables become
    /// back-references, wherever that is shorter. The decoded value stays the same.
    pub fn optimize<'a>(&mut self, node: &mut Staged<'a>) {
        let origin: Option<&'a Jksn> = node.origin;
        match origin {
            Some(Jksn::Jint(n)) => {
                if let Some(last) = &self.lastint {
                    let (control, field) = delta_encoding(&(n - last));
                    if 1 + field.len() < node.own_len() {
                        trace!(value = %n, "delta encoding integer");
                        node.control = control;
                        node.field = field;
                    }
                }
                self.lastint = Some(n.clone());
            }
            Some(Jksn::Str(s)) => {
                if let Some(hash) = node.hash {
                    if node.payload.len() > 1 && self.tables.text(hash) == Some(s) {
                        trace!(hash, "text back-reference");
                        make_backref(node, TEXT_HASH, hash);
                    } else {
                        self.tables.remember_text(hash, s.clone());
                    }
                }
            }
            Some(Jksn::Blob(b)) => {
                if let Some(hash) = node.hash {
                    if node.payload.len() > 1 && self.tables.blob(hash) == Some(b) {
                        trace!(hash, "blob back-reference");
                        make_backref(node, BLOB_HASH, hash);
                    } else {
                        self.tables.remember_blob(hash, b.clone());
                    }
                }
            }
            _ => {
                for child in node.children.iter_mut() {
                    self.optimize(child);
                }
            }
        }
    }
}

fn make_backref(node: &mut Staged<'_>, control: u8, hash: u8) {
    node.control = control;
    node.field = smallvec![hash];
    node.payload.clear();
}

fn stage_float<'a>(origin: Option<&'a Jksn>, f: Float) -> Staged<'a> {
    if f.is_nan() {
        return Staged::leaf(origin, FLOAT_NAN);
    }
    if f.is_infinite() {
        let control = if f.to_f64() < 0.0 {
            FLOAT_NEG_INF
        } else {
            FLOAT_POS_INF
        };
        return Staged::leaf(origin, control);
    }
    match f {
        Float::Double(bits) => Staged {
            payload: bits.to_be_bytes().to_vec(),
            ..Staged::leaf(origin, FLOAT_DOUBLE)
        },
        Float::Single(bits) => Staged {
            payload: bits.to_be_bytes().to_vec(),
            ..Staged::leaf(origin, FLOAT_SINGLE)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::checksum::ChecksumKind, VecMap};
    use num_bigint::BigInt;

    fn plain(v: &Jksn) -> Vec<u8> {
        let mut out = Vec::new();
        Encoder::new(&EncodeOptions::plain()).encode(v, &mut out).unwrap();
        out
    }

    fn full(v: &Jksn) -> Vec<u8> {
        let mut out = Vec::new();
        Encoder::new(&EncodeOptions::default()).encode(v, &mut out).unwrap();
        out
    }

    fn obj(pairs: Vec<(&str, Jksn)>) -> Jksn {
        Jksn::Object(pairs.into_iter().map(|(k, v)| (Jksn::from(k), v)).collect())
    }

    #[test]
    fn constants() {
        assert_eq!(plain(&Jksn::Null), vec![0x01]);
        assert_eq!(plain(&Jksn::from(false)), vec![0x02]);
        assert_eq!(plain(&Jksn::from(true)), vec![0x03]);
        assert_eq!(plain(&Jksn::Unspecified), vec![0xa0]);
    }

    #[test]
    fn integer_widths() {
        assert_eq!(plain(&Jksn::from(0)), vec![0x10]);
        assert_eq!(plain(&Jksn::from(10)), vec![0x1a]);
        assert_eq!(plain(&Jksn::from(11)), vec![0x1d, 0x0b]);
        assert_eq!(plain(&Jksn::from(-1)), vec![0x1d, 0xff]);
        assert_eq!(plain(&Jksn::from(-128)), vec![0x1d, 0x80]);
        assert_eq!(plain(&Jksn::from(128)), vec![0x1c, 0x00, 0x80]);
        assert_eq!(plain(&Jksn::from(-32768)), vec![0x1c, 0x80, 0x00]);
        assert_eq!(plain(&Jksn::from(32768)), vec![0x1f, 0x82, 0x80, 0x00]);
        assert_eq!(plain(&Jksn::from(-0x1f_ffff)), vec![0x1e, 0xff, 0xff, 0x7f]);
        assert_eq!(plain(&Jksn::from(0x20_0000)), vec![0x1b, 0x00, 0x20, 0x00, 0x00]);
        assert_eq!(
            plain(&Jksn::from(i32::min_value())),
            vec![0x1b, 0x80, 0x00, 0x00, 0x00]
        );
        // 2^32 needs five groups
        assert_eq!(
            plain(&Jksn::from(1i64 << 32)),
            vec![0x1f, 0x90, 0x80, 0x80, 0x80, 0x00]
        );
        let big = Jksn::from(BigInt::from(u64::max_value()) + 1);
        assert_eq!(
            plain(&big),
            vec![0x1f, 0x82, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00]
        );
    }

    #[test]
    fn delta_widths() {
        let enc = |d: i64| {
            let (control, field) = delta_encoding(&Inum::from(d));
            let mut out = vec![control];
            out.extend_from_slice(&field);
            out
        };
        assert_eq!(enc(0), vec![0xd0]);
        assert_eq!(enc(5), vec![0xd5]);
        assert_eq!(enc(-1), vec![0xda]);
        assert_eq!(enc(-5), vec![0xd6]);
        assert_eq!(enc(-7), vec![0xdd, 0xf9]);
        assert_eq!(enc(6), vec![0xdd, 0x06]);
        assert_eq!(enc(-300), vec![0xdc, 0xfe, 0xd4]);
        assert_eq!(enc(40_000), vec![0xdf, 0x82, 0xb8, 0x40]);
        assert_eq!(enc(-0x20_0000), vec![0xdb, 0xff, 0xe0, 0x00, 0x00]);
    }

    #[test]
    fn floats() {
        let mut double = vec![0x2c];
        double.extend_from_slice(&2.5f64.to_be_bytes());
        assert_eq!(plain(&Jksn::from(2.5f64)), double);

        let mut single = vec![0x2d];
        single.extend_from_slice(&2.5f32.to_be_bytes());
        assert_eq!(plain(&Jksn::from(2.5f32)), single);

        assert_eq!(plain(&Jksn::from(std::f64::NAN)), vec![0x20]);
        assert_eq!(plain(&Jksn::from(std::f32::NAN)), vec![0x20]);
        assert_eq!(plain(&Jksn::from(std::f64::INFINITY)), vec![0x2f]);
        assert_eq!(plain(&Jksn::from(std::f32::NEG_INFINITY)), vec![0x2e]);
    }

    #[test]
    fn text_forms() {
        assert_eq!(plain(&Jksn::from("")), vec![0x40]);
        assert_eq!(plain(&Jksn::from("hi")), b"\x42hi".to_vec());

        let twelve = "a".repeat(12);
        assert_eq!(plain(&Jksn::from(twelve.as_str()))[0], 0x4c);
        let thirteen = "a".repeat(13);
        assert_eq!(&plain(&Jksn::from(thirteen.as_str()))[..2], &[0x4e, 13]);
        let long = "a".repeat(300);
        assert_eq!(&plain(&Jksn::from(long.as_str()))[..3], &[0x4d, 0x01, 0x2c]);

        // three CJK characters: 9 bytes in UTF-8, 6 in UTF-16
        assert_eq!(
            plain(&Jksn::from("中文字")),
            vec![0x33, 0x2d, 0x4e, 0x87, 0x65, 0x57, 0x5b]
        );

        let utf8 = EncodeOptions::plain().string_encoding(StringEncoding::Utf8);
        let mut out = Vec::new();
        Encoder::new(&utf8).encode(&Jksn::from("中"), &mut out).unwrap();
        assert_eq!(out, vec![0x43, 0xe4, 0xb8, 0xad]);

        let utf16 = EncodeOptions::plain().string_encoding(StringEncoding::Utf16);
        let mut out = Vec::new();
        Encoder::new(&utf16).encode(&Jksn::from("hi"), &mut out).unwrap();
        assert_eq!(out, vec![0x32, b'h', 0, b'i', 0]);

        // eleven units fit inline, twelve take a length byte
        let mut out = Vec::new();
        let twelve_units = "b".repeat(12);
        Encoder::new(&utf16).encode(&Jksn::from(twelve_units.as_str()), &mut out).unwrap();
        assert_eq!(&out[..2], &[0x3e, 12]);
    }

    #[test]
    fn blob_forms() {
        assert_eq!(plain(&Jksn::from_static(b"\x01\x02")), vec![0x52, 0x01, 0x02]);
        let twelve = Jksn::Blob(Bytes::from(vec![7u8; 12]));
        assert_eq!(&plain(&twelve)[..2], &[0x5e, 12]);
    }

    #[test]
    fn containers() {
        assert_eq!(plain(&Jksn::from(vec![1, 2])), vec![0x82, 0x11, 0x12]);
        assert_eq!(
            plain(&obj(vec![("a", Jksn::from(1))])),
            vec![0x91, 0x41, b'a', 0x11]
        );
        let thirteen = Jksn::from(vec![0; 13]);
        assert_eq!(&plain(&thirteen)[..2], &[0x8e, 13]);
    }

    #[test]
    fn deltas_and_backrefs() {
        // a two byte delta is no shorter than the plain form, so 93 stays plain
        let v = Jksn::from(vec![Jksn::from(100), Jksn::from(93), Jksn::from(98)]);
        assert_eq!(full(&v), vec![0x83, 0x1d, 100, 0x1d, 93, 0xd5]);

        let v = Jksn::from(vec!["abc", "abc", "x", "x"]);
        let hash = djb_hash(b"abc");
        assert_eq!(
            full(&v),
            vec![0x84, 0x43, b'a', b'b', b'c', 0x3c, hash, 0x41, b'x', 0x41, b'x']
        );

        let blob = Jksn::from_static(b"\x09\x08\x07");
        let v = Jksn::from(vec![blob.clone(), blob]);
        let hash = djb_hash(&[9, 8, 7]);
        assert_eq!(full(&v), vec![0x82, 0x53, 9, 8, 7, 0x5c, hash]);
    }

    #[test]
    fn backrefs_follow_the_latest_slot() {
        // only the low three bits of the first byte survive the shift
        assert_eq!(djb_hash(b"a!"), djb_hash(b"i!"));
        let v = Jksn::from(vec!["a!", "i!", "a!"]);
        let out = full(&v);
        // the last "a!" cannot refer back, its slot now holds "i!"
        assert_eq!(&out[out.len() - 3..], b"\x42a!");
    }

    #[test]
    fn swapped_layout() {
        let rows = Jksn::from(vec![
            obj(vec![("a", Jksn::from(1)), ("b", Jksn::from(2))]),
            obj(vec![("a", Jksn::from(3))]),
        ]);
        let swapped = EncodeOptions::plain().swapped_arrays(true);
        let mut out = Vec::new();
        Encoder::new(&swapped).encode(&rows, &mut out).unwrap();
        assert_eq!(
            out,
            vec![0xa2, 0x41, b'a', 0x82, 0x11, 0x13, 0x41, b'b', 0x82, 0x12, 0xa0]
        );
        assert!(out.len() < plain(&rows).len());
    }

    #[test]
    fn swapped_needs_objects() {
        let mixed = Jksn::from(vec![obj(vec![("a", Jksn::from(1))]), Jksn::from(1)]);
        let opts = EncodeOptions::plain().swapped_arrays(true);
        let mut out = Vec::new();
        Encoder::new(&opts).encode(&mixed, &mut out).unwrap();
        assert_eq!(out[0], 0x82);

        let empties = Jksn::from(vec![Jksn::Object(VecMap::new()), Jksn::Object(VecMap::new())]);
        let mut out = Vec::new();
        Encoder::new(&opts).encode(&empties, &mut out).unwrap();
        assert_eq!(out, vec![0x82, 0x90, 0x90]);
    }

    #[test]
    fn swapped_respects_depth_limit() {
        let rows = Jksn::from(vec![
            obj(vec![("a", Jksn::from(1)), ("b", Jksn::from(2))]),
            obj(vec![("a", Jksn::from(3)), ("b", Jksn::from(4))]),
        ]);
        let nested = Jksn::from(vec![Jksn::from(vec![rows])]);
        let opts = EncodeOptions::plain().swapped_arrays(true).swap_depth_limit(2);
        let mut out = Vec::new();
        Encoder::new(&opts).encode(&nested, &mut out).unwrap();
        assert_eq!(&out[..3], &[0x81, 0x81, 0x82]);

        let opts = opts.swap_depth_limit(3);
        let mut out = Vec::new();
        Encoder::new(&opts).encode(&nested, &mut out).unwrap();
        assert_eq!(&out[..3], &[0x81, 0x81, 0xa2]);
    }

    #[test]
    fn checksum_and_header() {
        let opts = EncodeOptions::plain()
            .header(true)
            .checksum(ChecksumKind::Djb, Placement::Prefix);
        let mut out = Vec::new();
        Encoder::new(&opts).encode(&Jksn::from("hi"), &mut out).unwrap();
        let digest = djb_hash(b"\x42hi");
        assert_eq!(out, vec![b'!', b'j', b'k', 0xf0, digest, 0x42, b'h', b'i']);

        let opts = EncodeOptions::plain().checksum(ChecksumKind::Crc32, Placement::Suffix);
        let mut out = BytesMut::new();
        Encoder::new(&opts).encode(&Jksn::from(true), &mut out).unwrap();
        let out = out.finalize();
        assert_eq!(out[..2], [0xf9, 0x03]);
        assert_eq!(out[2..], ChecksumKind::Crc32.digest(&[0x03])[..]);
    }

    #[test]
    fn depth_limit() {
        let mut v = Jksn::Null;
        for _ in 0..10 {
            v = Jksn::from(vec![v]);
        }
        let opts = EncodeOptions::default().max_depth(10);
        assert!(Encoder::new(&opts).encode(&v, &mut Vec::new()).is_err());
        let opts = EncodeOptions::default().max_depth(11);
        assert!(Encoder::new(&opts).encode(&v, &mut Vec::new()).is_ok());

        // the checksum wrapper is a level of its own
        let opts = opts.checksum(ChecksumKind::Crc32, Placement::Suffix);
        assert!(Encoder::new(&opts).encode(&v, &mut Vec::new()).is_err());
        let opts = opts.max_depth(12);
        assert!(Encoder::new(&opts).encode(&v, &mut Vec::new()).is_ok());
    }
}

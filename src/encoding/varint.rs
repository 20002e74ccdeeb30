//! Integer payload helpers: fixed-width big-endian fields, base-128 varints and the
//! length field shared by text, blobs, arrays, objects and swapped arrays.
//!
//! Varints are big-endian base-128: every group but the last has its high bit set.

use super::{
    constants::*,
    io::{Source, SourceExt},
};
use crate::{
    errors::{JksnError, Result},
    inum::Inum,
};
use byteorder::{BigEndian, ByteOrder};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use smallvec::SmallVec;

/// Bytes that sit between a control byte and its payload.
pub type LenField = SmallVec<[u8; 8]>;

/// Groups beyond this no longer fit a `u64` accumulator.
const U64_GROUPS: usize = 9;

/// Reads a big-endian two's complement integer of `width` bytes (1, 2 or 4).
pub fn read_signed(src: &mut dyn Source, width: usize) -> Result<i64> {
    let mut buf = [0u8; 4];
    src.read_exact(&mut buf[..width])?;
    Ok(BigEndian::read_int(&buf[..width], width))
}

/// Reads a big-endian unsigned integer of `width` bytes (1 or 2).
pub fn read_unsigned(src: &mut dyn Source, width: usize) -> Result<u64> {
    let mut buf = [0u8; 8];
    src.read_exact(&mut buf[..width])?;
    Ok(BigEndian::read_uint(&buf[..width], width))
}

/// Reads the groups of one varint, without interpreting them.
fn read_groups(src: &mut dyn Source) -> Result<SmallVec<[u8; 10]>> {
    let mut groups = SmallVec::new();
    loop {
        let b = src.take_byte()?;
        groups.push(b & 0x7f);
        if b & 0x80 == 0 {
            return Ok(groups);
        }
    }
}

/// Reads a varint of any size.
pub fn read_varint(src: &mut dyn Source) -> Result<BigUint> {
    let groups = read_groups(src)?;
    match fold_u64(&groups) {
        Some(n) => Ok(BigUint::from(n)),
        None => Ok(BigUint::from_radix_be(&groups, 128).unwrap_or_default()),
    }
}

/// Reads a varint magnitude and applies `negative`, as integer controls `0x1e`/`0x1f` and
/// delta controls `0xde`/`0xdf` do.
pub fn read_varint_signed(src: &mut dyn Source, negative: bool) -> Result<Inum> {
    let groups = read_groups(src)?;
    let magnitude = match fold_u64(&groups) {
        Some(n) => Inum::from(n),
        None => Inum::from_magnitude(false, BigUint::from_radix_be(&groups, 128).unwrap_or_default()),
    };
    Ok(if negative { -magnitude } else { magnitude })
}

/// Reads a varint that is used as a count or a byte length.
pub fn read_varint_len(src: &mut dyn Source) -> Result<usize> {
    let offset = src.offset();
    let groups = read_groups(src)?;
    fold_u64(&groups)
        .and_then(|n| n.to_usize())
        .ok_or_else(|| JksnError::decode(offset, "varint length does not fit in memory"))
}

fn fold_u64(groups: &[u8]) -> Option<u64> {
    let significant = groups.iter().skip_while(|g| **g == 0).count();
    if significant > U64_GROUPS + 1 {
        return None;
    }
    groups
        .iter()
        .try_fold(0u64, |acc, g| acc.checked_mul(128).map(|acc| acc | u64::from(*g)))
}

/// Reads the length selected by the low nibble of a sized control byte: inline for
/// `0x0..=0xc`, then `u16`, `u8` and varint for `0xd`, `0xe` and `0xf`.
pub fn read_length(src: &mut dyn Source, low: u8) -> Result<usize> {
    match low {
        LEN_U16 => Ok(read_unsigned(src, 2)? as usize),
        LEN_U8 => Ok(read_unsigned(src, 1)? as usize),
        LEN_VARINT => read_varint_len(src),
        inline => Ok(inline as usize),
    }
}

/// Appends the varint encoding of `n`.
pub fn push_varint_u64(out: &mut LenField, mut n: u64) {
    let mut groups: SmallVec<[u8; 10]> = SmallVec::new();
    loop {
        groups.push((n & 0x7f) as u8);
        n >>= 7;
        if n == 0 {
            break;
        }
    }
    let last = groups.len() - 1;
    for (i, g) in groups.iter().rev().enumerate() {
        out.push(if i == last { *g } else { *g | 0x80 });
    }
}

/// Varint encoding of an arbitrary magnitude.
pub fn varint(n: &BigUint) -> LenField {
    let mut out = LenField::new();
    match n.to_u64() {
        Some(small) => push_varint_u64(&mut out, small),
        None => {
            let groups = n.to_radix_be(128);
            let last = groups.len() - 1;
            for (i, g) in groups.iter().enumerate() {
                out.push(if i == last { *g } else { *g | 0x80 });
            }
        }
    }
    out
}

/// Picks the control byte and length bytes for a sized item in `region`. Lengths up to
/// `inline_max` go in the low nibble, then one byte, two bytes, and a varint.
pub fn length_field(region: u8, len: usize, inline_max: u8) -> (u8, LenField) {
    let mut field = LenField::new();
    let control = if len <= inline_max as usize {
        region | len as u8
    } else if len <= 0xff {
        field.push(len as u8);
        region | LEN_U8
    } else if len <= 0xffff {
        field.extend_from_slice(&(len as u16).to_be_bytes());
        region | LEN_U16
    } else {
        push_varint_u64(&mut field, len as u64);
        region | LEN_VARINT
    };
    (control, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::io::StrictReader;

    fn reader(bytes: &[u8]) -> StrictReader<&[u8]> { StrictReader::new(bytes) }

    #[test]
    fn varint_bytes() {
        let mut out = LenField::new();
        push_varint_u64(&mut out, 0);
        assert_eq!(&out[..], &[0x00]);

        let mut out = LenField::new();
        push_varint_u64(&mut out, 300);
        assert_eq!(&out[..], &[0x82, 0x2c]);

        let mut out = LenField::new();
        push_varint_u64(&mut out, 0x1f_ffff);
        assert_eq!(&out[..], &[0xff, 0xff, 0x7f]);
    }

    #[test]
    fn big_varint_round_trip() {
        let n = BigUint::from(u64::max_value()) * BigUint::from(1000u32) + BigUint::from(7u8);
        let bytes = varint(&n);
        assert_eq!(bytes.last().map(|b| b & 0x80), Some(0));
        assert!(bytes[..bytes.len() - 1].iter().all(|b| b & 0x80 != 0));
        assert_eq!(read_varint(&mut reader(&bytes)).unwrap(), n);
    }

    #[test]
    fn signed_varints() {
        // 2^63 as a magnitude, negated, is i64::MIN
        let bytes = varint(&BigUint::from(1u64 << 63));
        assert_eq!(
            read_varint_signed(&mut reader(&bytes), true).unwrap(),
            Inum::I64(i64::min_value())
        );
        assert!(matches!(
            read_varint_signed(&mut reader(&bytes), false).unwrap(),
            Inum::Int(_)
        ));
    }

    #[test]
    fn redundant_leading_groups() {
        assert_eq!(read_varint_len(&mut reader(&[0x80, 0x80, 0x05])).unwrap(), 5);
    }

    #[test]
    fn truncated_varint() {
        assert!(read_varint(&mut reader(&[0x81])).unwrap_err().is_truncation());
    }

    #[test]
    fn oversized_length() {
        let bytes = varint(&(BigUint::from(u64::max_value()) + BigUint::from(1u8)));
        assert!(read_varint_len(&mut reader(&bytes)).unwrap_err().is_structural());
    }

    #[test]
    fn fixed_width_sign_extends() {
        assert_eq!(read_signed(&mut reader(&[0xf9]), 1).unwrap(), -7);
        assert_eq!(read_signed(&mut reader(&[0x80, 0x00]), 2).unwrap(), -32768);
        assert_eq!(
            read_signed(&mut reader(&[0x7f, 0xff, 0xff, 0xff]), 4).unwrap(),
            i32::max_value() as i64
        );
    }

    #[test]
    fn length_fields() {
        assert_eq!(length_field(REGION_UTF8, 12, LEN_INLINE_MAX).0, 0x4c);
        assert_eq!(length_field(REGION_UTF16, 12, LEN_INLINE_MAX_HASHED).0, 0x3e);

        let (control, field) = length_field(REGION_ARRAY, 0x100, LEN_INLINE_MAX);
        assert_eq!(control, 0x8d);
        assert_eq!(&field[..], &[0x01, 0x00]);

        let (control, field) = length_field(REGION_BLOB, 0x1_0000, LEN_INLINE_MAX_HASHED);
        assert_eq!(control, 0x5f);
        assert_eq!(&field[..], &[0x84, 0x80, 0x00]);
    }

    #[test]
    fn lengths_by_nibble() {
        assert_eq!(read_length(&mut reader(&[]), 0x0c).unwrap(), 12);
        assert_eq!(read_length(&mut reader(&[0x01, 0x02]), LEN_U16).unwrap(), 0x102);
        assert_eq!(read_length(&mut reader(&[0xff]), LEN_U8).unwrap(), 0xff);
        assert_eq!(read_length(&mut reader(&[0x81, 0x00]), LEN_VARINT).unwrap(), 128);
    }
}

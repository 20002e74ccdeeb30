use std::{convert::TryFrom, fmt};

/// A floating point number, stored as its IEEE 754 bits so that values compare bitwise.
///
/// JKSN carries single and double precision on the wire. NaN and the infinities have
/// dedicated control bytes without a width, so they always decode as [`Float::Double`].
#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub enum Float {
    /// Single precision bits.
    Single(u32),
    /// Double precision bits.
    Double(u64),
}

use Float::*;

impl Float {
    /// The value widened to `f64`.
    pub fn to_f64(self) -> f64 {
        match self {
            Single(n) => f32::from_bits(n) as f64,
            Double(n) => f64::from_bits(n),
        }
    }

    /// Canonical NaN.
    pub fn nan() -> Float { Double(f64::NAN.to_bits()) }

    /// Positive or negative infinity.
    pub fn infinity(negative: bool) -> Float {
        if negative {
            Double(f64::NEG_INFINITY.to_bits())
        } else {
            Double(f64::INFINITY.to_bits())
        }
    }

    pub fn is_nan(self) -> bool { self.to_f64().is_nan() }

    pub fn is_infinite(self) -> bool { self.to_f64().is_infinite() }
}

impl From<f32> for Float {
    fn from(f: f32) -> Float { Single(f.to_bits()) }
}

impl From<f64> for Float {
    fn from(f: f64) -> Float { Double(f.to_bits()) }
}

impl TryFrom<Float> for f32 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> {
        match f {
            Single(n) => Ok(f32::from_bits(n)),
            _ => Err(f),
        }
    }
}

impl From<Float> for f64 {
    fn from(f: Float) -> f64 { f.to_f64() }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.to_f64();
        if v.is_nan() {
            write!(f, "NaN")
        } else if v.is_infinite() {
            write!(f, "{}Infinity", if v < 0.0 { "-" } else { "" })
        } else {
            match self {
                Single(n) => write!(f, "{}", f32::from_bits(*n)),
                Double(n) => write!(f, "{}", f64::from_bits(*n)),
            }
        }
    }
}

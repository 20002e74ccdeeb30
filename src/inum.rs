use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use std::{
    convert::TryFrom,
    fmt,
    ops::{Add, Neg, Sub},
};

use crate::{from_as, from_fn, from_prims};

/// `Inum`s are either `i64` or `BigInt`s (i.e., big integers).
///
/// The representation is normalized: a value that fits in an `i64` is always stored as
/// [`Inum::I64`], so derived equality is numeric equality.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub enum Inum {
    /// Machine-sized integer.
    I64(i64),
    /// Integer outside the `i64` range.
    Int(BigInt),
}

use Inum::*;

from_fn!(Inum, i64, I64);
from_fn!(Inum, u64, |u: u64| {
    if u <= i64::max_value() as u64 {
        I64(u as i64)
    } else {
        Int(BigInt::from(u))
    }
});
from_fn!(Inum, BigInt, |i: BigInt| i.to_i64().map_or_else(|| Int(i), I64));
from_fn!(Inum, i128, |i: i128| Inum::from(BigInt::from(i)));
from_fn!(Inum, u128, |i: u128| Inum::from(BigInt::from(i)));
from_fn!(Inum, isize, |i: isize| I64(i as i64));
from_fn!(Inum, usize, |u: usize| Inum::from(u as u64));

from_prims!(Inum);

impl From<Inum> for BigInt {
    fn from(i: Inum) -> BigInt { i.into_bigint() }
}

impl TryFrom<Inum> for i64 {
    type Error = BigInt;

    fn try_from(i: Inum) -> Result<Self, BigInt> {
        match i {
            I64(i) => Ok(i),
            Int(i) => Err(i),
        }
    }
}

impl TryFrom<Inum> for u64 {
    type Error = Inum;

    fn try_from(n: Inum) -> Result<Self, Inum> {
        match &n {
            I64(i) if *i >= 0 => Ok(*i as u64),
            Int(i) => i.to_u64().ok_or(n),
            _ => Err(n),
        }
    }
}

impl Inum {
    /// Builds an integer from a sign and a magnitude, as carried by the varint encodings.
    pub fn from_magnitude(negative: bool, magnitude: BigUint) -> Inum {
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Inum::from(BigInt::from_biguint(sign, magnitude))
    }

    /// Produces an `i64` if the value fits, otherwise returns `None`.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            I64(i) => Some(*i),
            Int(_) => None,
        }
    }

    /// Produces a `BigInt`.
    pub fn to_bigint(&self) -> BigInt {
        match self {
            I64(i) => BigInt::from(*i),
            Int(i) => i.clone(),
        }
    }

    /// Consumes `self` to produce a `BigInt`.
    pub fn into_bigint(self) -> BigInt {
        match self {
            I64(i) => BigInt::from(i),
            Int(i) => i,
        }
    }

    /// Whether the value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        match self {
            I64(i) => *i < 0,
            Int(i) => i.is_negative(),
        }
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            I64(i) => *i == 0,
            Int(i) => i.is_zero(),
        }
    }

    /// Absolute value.
    pub fn magnitude(&self) -> BigUint {
        match self {
            I64(i) => BigUint::from(i.unsigned_abs()),
            Int(i) => i.magnitude().clone(),
        }
    }
}

impl<'a, 'b> Add<&'b Inum> for &'a Inum {
    type Output = Inum;

    fn add(self, other: &'b Inum) -> Inum {
        if let (I64(a), I64(b)) = (self, other) {
            if let Some(sum) = a.checked_add(*b) {
                return I64(sum);
            }
        }
        Inum::from(self.to_bigint() + other.to_bigint())
    }
}

impl<'a, 'b> Sub<&'b Inum> for &'a Inum {
    type Output = Inum;

    fn sub(self, other: &'b Inum) -> Inum {
        if let (I64(a), I64(b)) = (self, other) {
            if let Some(diff) = a.checked_sub(*b) {
                return I64(diff);
            }
        }
        Inum::from(self.to_bigint() - other.to_bigint())
    }
}

impl Neg for Inum {
    type Output = Inum;

    fn neg(self) -> Inum {
        match self {
            I64(i) => i.checked_neg().map_or_else(|| Inum::from(-BigInt::from(i)), I64),
            Int(i) => Inum::from(-i),
        }
    }
}

impl PartialEq<i64> for Inum {
    fn eq(&self, other: &i64) -> bool {
        match self {
            I64(i) => i == other,
            Int(_) => false,
        }
    }
}

impl fmt::Display for Inum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            I64(i) => write!(f, "{}", i),
            Int(i) => write!(f, "{}", i),
        }
    }
}

//! Numbers restricted to multiples of one half.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A number that is an integer multiple of `1/2`.
///
/// Stored as twice its value so that arithmetic stays exact.
///
/// # Examples
///
/// ```
/// # use routing::HalfInt;
/// let a = HalfInt::new(3);
/// let b = HalfInt::from_dbl(3);
/// assert_eq!((a + b).to_string(), "4.5");
/// assert_eq!(b.floor(), 1);
/// assert_eq!(b.ceil(), 2);
/// ```
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct HalfInt {
    dbl: i64,
}

/// The error produced when converting a number that is not a multiple of `1/2`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("{0} is not a multiple of 0.5")]
pub struct NotHalfIntError(pub f64);

impl HalfInt {
    /// Creates a [`HalfInt`] equal to the integer `value`.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self { dbl: 2 * value }
    }

    /// Creates a [`HalfInt`] equal to `dbl / 2`.
    #[inline]
    pub const fn from_dbl(dbl: i64) -> Self {
        Self { dbl }
    }

    /// Twice the value of this number.
    #[inline]
    pub const fn dbl(&self) -> i64 {
        self.dbl
    }

    /// Returns `true` if the number is an integer.
    #[inline]
    pub const fn is_integer(&self) -> bool {
        self.dbl % 2 == 0
    }

    /// The largest integer less than or equal to this number.
    #[inline]
    pub const fn floor(&self) -> i64 {
        self.dbl.div_euclid(2)
    }

    /// The smallest integer greater than or equal to this number.
    #[inline]
    pub const fn ceil(&self) -> i64 {
        -(-self.dbl).div_euclid(2)
    }

    /// Converts to a floating point number.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.dbl as f64 / 2.
    }
}

impl Display for HalfInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.dbl / 2)
        } else if self.dbl < 0 && self.dbl > -2 {
            write!(f, "-0.5")
        } else {
            write!(f, "{}.5", self.dbl / 2)
        }
    }
}

impl From<i64> for HalfInt {
    #[inline]
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl TryFrom<f64> for HalfInt {
    type Error = NotHalfIntError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let dbl = value * 2.;
        if dbl.is_finite() && dbl.fract() == 0. {
            Ok(Self::from_dbl(dbl as i64))
        } else {
            Err(NotHalfIntError(value))
        }
    }
}

impl From<HalfInt> for f64 {
    #[inline]
    fn from(value: HalfInt) -> Self {
        value.to_f64()
    }
}

impl std::ops::Add for HalfInt {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::from_dbl(self.dbl + rhs.dbl)
    }
}

impl std::ops::Add<i64> for HalfInt {
    type Output = Self;
    fn add(self, rhs: i64) -> Self::Output {
        Self::from_dbl(self.dbl + 2 * rhs)
    }
}

impl std::ops::AddAssign for HalfInt {
    fn add_assign(&mut self, rhs: Self) {
        self.dbl += rhs.dbl;
    }
}

impl std::ops::Sub for HalfInt {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_dbl(self.dbl - rhs.dbl)
    }
}

impl std::ops::Sub<i64> for HalfInt {
    type Output = Self;
    fn sub(self, rhs: i64) -> Self::Output {
        Self::from_dbl(self.dbl - 2 * rhs)
    }
}

impl std::ops::Mul<i64> for HalfInt {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self::Output {
        Self::from_dbl(self.dbl * rhs)
    }
}

impl std::ops::Neg for HalfInt {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::from_dbl(-self.dbl)
    }
}

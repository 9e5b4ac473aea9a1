//! Exact rational arithmetic for the shrine simulation.
//!
//! Provisional attribute values during redistribution are fractions of
//! the point budget. Keeping them exact means the reduction-cap test
//! compares rationals, so the correction loop cannot oscillate on
//! floating-point drift.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A normalized rational number.
///
/// The denominator is always positive and shares no factor with the
/// numerator.
///
/// # Examples
///
/// ```rust
/// use shrinestat::numeric::Fraction;
///
/// let third = Fraction::new(1, 3);
/// let sum = third + third + third;
/// assert_eq!(sum, Fraction::from_int(1));
/// assert_eq!(Fraction::new(7, 2).floor(), 3);
/// assert_eq!(Fraction::new(-7, 2).floor(), -4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    numer: i128,
    denom: i128,
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Fraction {
    /// Build `numer / denom`.
    ///
    /// A zero denominator is a programming error inside this crate;
    /// callers check divisors before dividing.
    pub fn new(numer: i128, denom: i128) -> Self {
        debug_assert!(denom != 0, "fraction with zero denominator");
        let sign = if denom < 0 { -1 } else { 1 };
        let g = gcd(numer, denom).max(1);
        Self {
            numer: sign * numer / g,
            denom: sign * denom / g,
        }
    }

    pub fn zero() -> Self {
        Self { numer: 0, denom: 1 }
    }

    pub fn from_int(i: i64) -> Self {
        Self {
            numer: i as i128,
            denom: 1,
        }
    }

    pub fn numer(self) -> i128 {
        self.numer
    }

    pub fn denom(self) -> i128 {
        self.denom
    }

    /// Largest integer not greater than this value.
    pub fn floor(self) -> i64 {
        self.numer.div_euclid(self.denom) as i64
    }

    pub fn to_f64(self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Fraction {
    fn from(i: i64) -> Self {
        Self::from_int(i)
    }
}

impl Add for Fraction {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.numer * other.denom + other.numer * self.denom,
            self.denom * other.denom,
        )
    }
}

impl Sub for Fraction {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

impl Neg for Fraction {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl Mul for Fraction {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.numer * other.numer, self.denom * other.denom)
    }
}

impl Div for Fraction {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        Self::new(self.numer * other.denom, self.denom * other.numer)
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplying keeps the order.
        (self.numer * other.denom).cmp(&(other.numer * self.denom))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_normalizes() {
        let f = Fraction::new(6, -4);
        assert_eq!(f.numer(), -3);
        assert_eq!(f.denom(), 2);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Fraction::new(31, 2).to_f64(), 15.5);
        assert_eq!(Fraction::new(-1, 4).to_f64(), -0.25);
    }

    #[test]
    fn test_fraction_arithmetic() {
        let a = Fraction::new(100, 3);
        let b = Fraction::from_int(25);

        assert_eq!(a - b, Fraction::new(25, 3));
        assert_eq!(a * Fraction::from_int(3), Fraction::from_int(100));
        assert_eq!(a / Fraction::new(1, 3), Fraction::from_int(100));
    }

    #[test]
    fn test_fraction_ordering() {
        assert!(Fraction::new(1, 3) < Fraction::new(34, 100));
        assert!(Fraction::new(-1, 2) < Fraction::zero());
        assert_eq!(Fraction::new(2, 4).cmp(&Fraction::new(1, 2)), Ordering::Equal);
    }

    #[test]
    fn test_floor() {
        assert_eq!(Fraction::new(100, 3).floor(), 33);
        assert_eq!(Fraction::from_int(25).floor(), 25);
        assert_eq!(Fraction::new(-1, 3).floor(), -1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Fraction::new(5, 10).to_string(), "1/2");
        assert_eq!(Fraction::from_int(7).to_string(), "7");
    }
}

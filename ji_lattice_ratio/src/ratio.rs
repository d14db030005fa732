// The `Ratio` type: an exact, strictly positive rational in lowest terms.
//
// Pitch classes and intervals are both ratios. Pitch classes are kept in
// [1, 2) by `math::normalize`; intervals are unrestricted. The wrapped
// `num_rational::Ratio<u64>` is always reduced, so derived equality, hashing
// and ordering all compare by value.
//
// All construction goes through one validation policy: zero or negative
// components are rejected, never silently made positive. `IntoRatio` lets
// callers hand over integer pairs, `Rational64` values, strings, or existing
// ratios and get the same canonical result (`to_fraction`).
//
// Serialized as the string `"n/d"` so ratios can be used in JSON config and
// as JSON map keys.

use crate::error::RatioError;
use num_rational::{Ratio as Frac, Rational64};
use num_traits::{CheckedDiv, CheckedMul};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An exact positive rational number in lowest terms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ratio(Frac<u64>);

impl Ratio {
    /// 1/1, the fundamental.
    pub const UNISON: Ratio = Ratio(Frac::new_raw(1, 1));
    /// 2/1.
    pub const OCTAVE: Ratio = Ratio(Frac::new_raw(2, 1));

    /// Build a ratio from signed components, reducing to lowest terms.
    ///
    /// Returns `RatioError::NonPositive` if either component is zero or
    /// negative.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, RatioError> {
        if numerator <= 0 || denominator <= 0 {
            return Err(RatioError::NonPositive {
                numerator: numerator.into(),
                denominator: denominator.into(),
            });
        }
        Ok(Self(Frac::new(
            numerator.unsigned_abs(),
            denominator.unsigned_abs(),
        )))
    }

    /// Build a ratio from unsigned components. Only zero is rejected.
    pub fn from_unsigned(numerator: u64, denominator: u64) -> Result<Self, RatioError> {
        if numerator == 0 || denominator == 0 {
            return Err(RatioError::NonPositive {
                numerator: numerator.into(),
                denominator: denominator.into(),
            });
        }
        Ok(Self(Frac::new(numerator, denominator)))
    }

    /// Wrap components already known to be coprime and non-zero.
    pub(crate) fn from_reduced(numerator: u64, denominator: u64) -> Self {
        Self(Frac::new_raw(numerator, denominator))
    }

    pub fn numer(&self) -> u64 {
        *self.0.numer()
    }

    pub fn denom(&self) -> u64 {
        *self.0.denom()
    }

    /// Exact product, or `RatioError::Overflow`.
    pub fn checked_mul(self, other: Ratio) -> Result<Ratio, RatioError> {
        self.0
            .checked_mul(&other.0)
            .map(Ratio)
            .ok_or(RatioError::Overflow)
    }

    /// Exact quotient, or `RatioError::Overflow`.
    pub fn checked_div(self, other: Ratio) -> Result<Ratio, RatioError> {
        self.0
            .checked_div(&other.0)
            .map(Ratio)
            .ok_or(RatioError::Overflow)
    }

    /// The reciprocal. Always representable.
    pub fn recip(self) -> Ratio {
        Self::from_reduced(self.denom(), self.numer())
    }

    /// Approximate value, for display and cents only.
    pub fn to_f64(self) -> f64 {
        self.numer() as f64 / self.denom() as f64
    }

    /// Numerator and denominator with every factor of two removed.
    pub fn odd_part(self) -> (u64, u64) {
        let n = self.numer();
        let d = self.denom();
        (n >> n.trailing_zeros(), d >> d.trailing_zeros())
    }

    /// True if the two ratios differ only by a power of two, i.e. their
    /// quotient has prime limit 2 or no prime factors at all.
    ///
    /// Compares odd parts instead of dividing, so it cannot overflow.
    pub fn is_octave_equivalent(self, other: Ratio) -> bool {
        self.odd_part() == other.odd_part()
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numer(), self.denom())
    }
}

impl fmt::Debug for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ratio({self})")
    }
}

/// Accepts `n/d` or a bare integer `n`, with optional surrounding spaces.
impl FromStr for Ratio {
    type Err = RatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_part = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| RatioError::Parse(format!("'{s}' is not of the form n/d")))
        };
        match s.split_once('/') {
            Some((n, d)) => Ratio::new(parse_part(n)?, parse_part(d)?),
            None => Ratio::new(parse_part(s)?, 1),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Uniform conversion
// ---------------------------------------------------------------------------

/// Anything that can be turned into a canonical `Ratio`.
pub trait IntoRatio {
    fn into_ratio(self) -> Result<Ratio, RatioError>;
}

/// Convert any supported input to its canonical ratio, rejecting zero and
/// negative components the same way for every input form.
pub fn to_fraction(value: impl IntoRatio) -> Result<Ratio, RatioError> {
    value.into_ratio()
}

impl IntoRatio for Ratio {
    fn into_ratio(self) -> Result<Ratio, RatioError> {
        Ok(self)
    }
}

impl IntoRatio for (i64, i64) {
    fn into_ratio(self) -> Result<Ratio, RatioError> {
        Ratio::new(self.0, self.1)
    }
}

impl IntoRatio for (i32, i32) {
    fn into_ratio(self) -> Result<Ratio, RatioError> {
        Ratio::new(i64::from(self.0), i64::from(self.1))
    }
}

impl IntoRatio for (u64, u64) {
    fn into_ratio(self) -> Result<Ratio, RatioError> {
        Ratio::from_unsigned(self.0, self.1)
    }
}

impl IntoRatio for (u32, u32) {
    fn into_ratio(self) -> Result<Ratio, RatioError> {
        Ratio::from_unsigned(u64::from(self.0), u64::from(self.1))
    }
}

impl IntoRatio for Rational64 {
    fn into_ratio(self) -> Result<Ratio, RatioError> {
        Ratio::new(*self.numer(), *self.denom())
    }
}

impl IntoRatio for &str {
    fn into_ratio(self) -> Result<Ratio, RatioError> {
        self.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Ratio {
        Ratio::new(n, d).unwrap()
    }

    #[test]
    fn test_new_reduces_to_lowest_terms() {
        let x = r(6, 4);
        assert_eq!((x.numer(), x.denom()), (3, 2));
        assert_eq!(x, r(3, 2));
    }

    #[test]
    fn test_rejects_zero_and_negative_uniformly() {
        assert!(matches!(
            Ratio::new(0, 1),
            Err(RatioError::NonPositive { .. })
        ));
        assert!(Ratio::new(3, 0).is_err());
        assert!(Ratio::new(-3, 2).is_err());
        assert!(Ratio::new(3, -2).is_err());
        assert!(Ratio::new(-3, -2).is_err());
        assert!(to_fraction((-3i64, 2i64)).is_err());
        assert!(to_fraction(Rational64::new(-3, 2)).is_err());
        assert!(to_fraction((0u32, 5u32)).is_err());
    }

    #[test]
    fn test_to_fraction_agrees_across_input_forms() {
        let expected = r(3, 2);
        assert_eq!(to_fraction((3i32, 2i32)).unwrap(), expected);
        assert_eq!(to_fraction((6i64, 4i64)).unwrap(), expected);
        assert_eq!(to_fraction((9u64, 6u64)).unwrap(), expected);
        assert_eq!(to_fraction(Rational64::new(3, 2)).unwrap(), expected);
        assert_eq!(to_fraction("3/2").unwrap(), expected);
        assert_eq!(to_fraction(expected).unwrap(), expected);
    }

    #[test]
    fn test_parse() {
        assert_eq!("81/64".parse::<Ratio>().unwrap(), r(81, 64));
        assert_eq!(" 5 / 4 ".parse::<Ratio>().unwrap(), r(5, 4));
        assert_eq!("3".parse::<Ratio>().unwrap(), r(3, 1));
        assert!(matches!("x/2".parse::<Ratio>(), Err(RatioError::Parse(_))));
        assert!(matches!("".parse::<Ratio>(), Err(RatioError::Parse(_))));
        assert!(matches!(
            "-5/4".parse::<Ratio>(),
            Err(RatioError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_ordering_is_by_value() {
        assert!(r(9, 8) < r(8, 7));
        assert!(r(3, 2) > r(4, 3));
        assert!(Ratio::UNISON < Ratio::OCTAVE);
    }

    #[test]
    fn test_checked_arithmetic() {
        assert_eq!(r(3, 2).checked_mul(r(4, 3)).unwrap(), Ratio::OCTAVE);
        assert_eq!(r(3, 2).checked_div(r(3, 2)).unwrap(), Ratio::UNISON);
        let huge = Ratio::from_unsigned(u64::MAX, 1).unwrap();
        assert_eq!(huge.checked_mul(huge), Err(RatioError::Overflow));
        assert_eq!(r(3, 2).checked_mul(r(5, 4)).unwrap(), r(15, 8));
        assert_eq!(r(3, 2).checked_div(r(5, 4)).unwrap(), r(6, 5));
        assert_eq!(r(7, 4).recip(), r(4, 7));
    }

    #[test]
    fn test_octave_equivalence() {
        assert!(r(3, 2).is_octave_equivalent(r(3, 1)));
        assert!(r(3, 2).is_octave_equivalent(r(3, 8)));
        assert!(Ratio::UNISON.is_octave_equivalent(r(1, 4)));
        assert!(!r(3, 2).is_octave_equivalent(r(4, 3)));
        assert!(!r(9, 8).is_octave_equivalent(r(9, 5)));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(r(2, 1).to_string(), "2/1");
        assert_eq!(format!("{:?}", r(7, 4)), "Ratio(7/4)");
        let json = serde_json::to_string(&vec![r(3, 2), r(11, 8)]).unwrap();
        assert_eq!(json, r#"["3/2","11/8"]"#);
        let back: Vec<Ratio> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![r(3, 2), r(11, 8)]);
        assert!(serde_json::from_str::<Ratio>(r#""0/3""#).is_err());
    }
}

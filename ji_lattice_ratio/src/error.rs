// Error type for ratio construction and arithmetic.
//
// Every fallible operation in this crate returns `RatioError`. The lattice
// crate wraps it as `LatticeError::InvalidRatio`.

use thiserror::Error;

/// Failure to build or combine exact ratios.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatioError {
    /// A numerator or denominator was zero or negative. Ratios model
    /// frequencies, so only strictly positive values are meaningful.
    #[error("ratio {numerator}/{denominator} is not a positive rational")]
    NonPositive { numerator: i128, denominator: i128 },

    /// Text that does not look like `n/d` or `n`.
    #[error("cannot parse ratio: {0}")]
    Parse(String),

    /// A product, quotient, or octave shift does not fit in 64-bit components.
    #[error("ratio arithmetic overflowed 64-bit components")]
    Overflow,
}

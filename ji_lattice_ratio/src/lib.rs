// Exact ratio arithmetic for just-intonation tuning.
//
// Leaf crate shared by `ji_lattice` (classification, colour, matrix display,
// tuning graph). No terminal or config dependencies.
//
// Architecture:
// - `ratio.rs`: the `Ratio` type, validation, `IntoRatio` / `to_fraction`,
//   string and serde forms
// - `math.rs`: `normalize`, `to_cents`, `factorize`, `is_prime`, `prime_limit`,
//   `show_fraction`
// - `error.rs`: `RatioError`
//
// Everything that feeds further computation stays exact. Floating point is
// used only for cents, which are display values.

pub mod error;
pub mod math;
pub mod ratio;

pub use error::RatioError;
pub use math::{
    DEFAULT_FRACTION_WIDTH, factorize, is_prime, normalize, prime_limit, show_fraction, to_cents,
};
pub use ratio::{IntoRatio, Ratio, to_fraction};

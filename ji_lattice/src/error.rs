// Error taxonomy for the lattice crate.
//
// Only genuine failures live here. Tuning steps that land on an existing
// pitch, or that a reviewer declines, are ordinary outcomes reported through
// `tuning::TuneOutcome`, not errors.

use ji_lattice_ratio::{Ratio, RatioError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatticeError {
    /// A ratio was zero, negative, unparseable, or overflowed.
    #[error("invalid ratio: {0}")]
    InvalidRatio(#[from] RatioError),

    /// A tuning step started from a pitch class the system does not contain.
    #[error("base pitch {start} is absent from current pitches: [{}]", list_ratios(.present))]
    MissingBasePitch { start: Ratio, present: Vec<Ratio> },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LatticeError>;

fn list_ratios(ratios: &[Ratio]) -> String {
    ratios
        .iter()
        .map(Ratio::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

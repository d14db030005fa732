// Just-intonation lattice explorer.
//
// Renders interval matrices for a set of pitch classes, coloured so that
// octave-equivalent intervals share a colour and intervals of the same prime
// limit share a hue family. Also builds scales incrementally as a graph of
// tuning steps from 1/1. Exact ratio arithmetic lives in the
// `ji_lattice_ratio` crate; this crate adds everything above it.
//
// Architecture:
// - `classify.rs`: octave-equivalence classes and prime-limit grouping
// - `color.rs`: per-limit base hues, HLS sweeps, interval → colour mapping
// - `matrix.rs`: pairwise interval matrix and styled `Cell`s
// - `display.rs`: ANSI and plain-text rendering of a `RenderedMatrix`
// - `tuning.rs`: `TuningSystem`, edges, neighbour previews, tuning steps
// - `prompt.rs`: `ConfirmExtension` and the line-based terminal prompt
// - `config.rs`: JSON-backed `LatticeConfig` and `Palette`
// - `error.rs`: `LatticeError`
//
// Pipeline for a matrix: pitch classes → `IntervalMatrix` → `classify` →
// `delegates_by_prime_limit` → `assign_colors` → `RenderedMatrix` → text.

pub mod classify;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod matrix;
pub mod prompt;
pub mod tuning;

pub use classify::{EquivalenceClass, EquivalenceClasses, PrimeLimitGroups, classify};
pub use color::{Color, ColorAssignment, assign_colors, generate_colors};
pub use config::{ColorScheme, LatticeConfig, Palette};
pub use error::{LatticeError, Result};
pub use matrix::{Cell, IntervalMatrix, RenderedMatrix, Weight, render_matrix};
pub use prompt::{AcceptAll, ConfirmExtension, LinePrompt};
pub use tuning::{
    Direction, NeighborPreview, PitchCents, TuneOutcome, TuningEdge, TuningStep, TuningSystem,
};

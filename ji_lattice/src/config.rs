// Data-driven configuration for matrix display and tuning sessions.
//
// `LatticeConfig` is loaded from JSON, with every field optional: missing
// fields fall back to `Default`. The CLI layers its flags on top of whatever
// was loaded (see `main.rs`), then calls `validate()` once before use.
//
// Colour parameters are grouped in `Palette`, which is what `color.rs`
// consumes. The default `scale` is the 15-note 11-limit scale the tool was
// first built to inspect.

use crate::color::HUE_STEP;
use crate::error::{LatticeError, Result};
use ji_lattice_ratio::{DEFAULT_FRACTION_WIDTH, Ratio};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Narrowest accepted `hue_range`: below one 8-bit hue step the band
/// collapses to a single colour.
pub const MIN_HUE_RANGE: f64 = HUE_STEP;

/// How classes inside one prime-limit group are coloured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Each octave-equivalence class gets its own hue, spread across a band
    /// around the limit's base hue.
    #[default]
    Spread,
    /// Every class in a prime-limit group shares the flat base colour.
    Limit,
}

/// Colour generation parameters. Hue, saturation and lightness are all in
/// normalized [0, 1] units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Half-width of the hue band shared by one prime-limit group. Must be
    /// in [`MIN_HUE_RANGE`, 0.5); at 0.5 the two ends of the band wrap onto
    /// each other.
    pub hue_range: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub scheme: ColorScheme,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            hue_range: 0.05,
            saturation: 1.0,
            lightness: 0.5,
            scheme: ColorScheme::Spread,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub palette: Palette,
    /// Right-align fractions to `pad_width` so matrix columns line up.
    pub show_padding: bool,
    pub pad_width: usize,
    /// Ask for confirmation, with neighbouring pitches shown, before a
    /// tuning step is committed.
    pub check_neighbors: bool,
    /// Pitch classes rendered when none are given on the command line.
    pub scale: Vec<Ratio>,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            show_padding: true,
            pad_width: DEFAULT_FRACTION_WIDTH,
            check_neighbors: false,
            scale: default_scale(),
        }
    }
}

impl LatticeConfig {
    /// Parse from a JSON string. Absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LatticeConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Padding width to use for fraction cells, if padding is on.
    pub fn padding(&self) -> Option<usize> {
        self.show_padding.then_some(self.pad_width)
    }

    /// Reject values that would break colour generation or layout.
    pub fn validate(&self) -> Result<()> {
        let p = &self.palette;
        if !(MIN_HUE_RANGE..0.5).contains(&p.hue_range) {
            return Err(LatticeError::Config(format!(
                "hue_range must be in [{MIN_HUE_RANGE:.6}, 0.5), got {}",
                p.hue_range
            )));
        }
        for (name, value) in [("saturation", p.saturation), ("lightness", p.lightness)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LatticeError::Config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.pad_width == 0 {
            return Err(LatticeError::Config("pad_width must be positive".into()));
        }
        if self.scale.is_empty() {
            return Err(LatticeError::Config("scale must not be empty".into()));
        }
        Ok(())
    }
}

/// 1/1 88/81 12/11 9/8 32/27 11/9 4/3 11/8 16/11 3/2 18/11 27/16 16/9 11/6 81/44
fn default_scale() -> Vec<Ratio> {
    const PAIRS: [(u64, u64); 15] = [
        (1, 1),
        (88, 81),
        (12, 11),
        (9, 8),
        (32, 27),
        (11, 9),
        (4, 3),
        (11, 8),
        (16, 11),
        (3, 2),
        (18, 11),
        (27, 16),
        (16, 9),
        (11, 6),
        (81, 44),
    ];
    PAIRS
        .iter()
        .filter_map(|&(n, d)| Ratio::from_unsigned(n, d).ok())
        .collect()
}

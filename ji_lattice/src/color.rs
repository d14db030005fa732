// Colour assignment for octave-equivalence classes.
//
// Each prime limit has a fixed base hue (`base_hue`). Within a limit group,
// the n delegates get n colours swept evenly across
// `[base - hue_range, base + hue_range]` at fixed saturation and lightness;
// a single delegate gets exactly the base hue. Every member of a class then
// inherits its delegate's colour. So related intervals look alike (same hue
// family) while distinct classes in the same family stay distinguishable.
//
// Colours are quantized to 8-bit sRGB, so a crowded or narrow sweep can land
// two delegates on the same byte triple. `generate_colors` then nudges the
// later one along the hue circle (and, if the circle is exhausted, in
// lightness) to the nearest unused colour. Distinctness within a hued group
// holds for any group size the 8-bit space can hold.
//
// Limit 2 (octaves and the unison) is a hue-less dark grey, and limits with
// no table entry fall back to white. Neutral groups ignore n: all their
// classes share the one flat colour.
//
// Assignment walks groups and delegates in the order `classify.rs` produced
// them. Reordering either changes which class gets which shade.

use crate::classify::{EquivalenceClass, EquivalenceClasses, PrimeLimitGroups};
use crate::config::{ColorScheme, Palette};
use ji_lattice_ratio::Ratio;
use palette::{FromColor, Hsl, Srgb, encoding};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Smallest hue step that moves one 8-bit channel by one unit at full
/// saturation: the hue circle spans six ramps of 255 steps.
pub const HUE_STEP: f64 = 1.0 / (6.0 * 255.0);

const LIGHTNESS_STEP: f64 = 1.0 / 255.0;

/// A display colour. `Plain` means "no colour markup at all".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Plain,
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// `#rrggbb`, or `None` for `Plain`.
    pub fn to_hex(self) -> Option<String> {
        match self {
            Color::Plain => None,
            Color::Rgb { r, g, b } => Some(format!("#{r:02x}{g:02x}{b:02x}")),
        }
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Color::rgb(c.red, c.green, c.blue)
    }
}

/// Colour for limit 2: octaves and the unison.
pub const OCTAVE_GREY: Color = Color::rgb(90, 90, 90);
/// Colour for prime limits without a base hue.
pub const UNLISTED_WHITE: Color = Color::rgb(255, 255, 255);

/// Anchor for one prime-limit group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BaseHue {
    /// Normalized hue in [0, 1).
    Hue(f64),
    /// No hue: every class in the group gets this flat colour.
    Neutral(Color),
}

/// Base hue for a prime limit.
pub fn base_hue(limit: u64) -> BaseHue {
    match limit {
        2 => BaseHue::Neutral(OCTAVE_GREY),
        3 => BaseHue::Hue(0.50),  // cyan
        5 => BaseHue::Hue(0.33),  // green
        7 => BaseHue::Hue(0.83),  // magenta
        11 => BaseHue::Hue(0.0),  // red
        13 => BaseHue::Hue(0.16), // yellow
        17 => BaseHue::Hue(0.66), // blue
        19 => BaseHue::Hue(0.08), // orange
        _ => BaseHue::Neutral(UNLISTED_WHITE),
    }
}

/// 8-bit sRGB colour for normalized hue `h` at the given saturation and
/// lightness.
pub fn hsl_color(h: f64, saturation: f64, lightness: f64) -> Color {
    let hsl: Hsl<encoding::Srgb, f64> =
        Hsl::new(h.rem_euclid(1.0) * 360.0, saturation, lightness);
    Srgb::<f64>::from_color(hsl).into_format::<u8>().into()
}

/// Colour at hue `h` with the palette's saturation and lightness.
pub fn color_at_hue(h: f64, palette: &Palette) -> Color {
    hsl_color(h, palette.saturation, palette.lightness)
}

/// `n` pairwise distinct colours spread symmetrically around `base`.
///
/// For `n == 1` the colour is exactly the base hue. A neutral base yields
/// `n` copies of its flat colour.
pub fn generate_colors(base: BaseHue, n: usize, palette: &Palette) -> Vec<Color> {
    match base {
        BaseHue::Neutral(color) => vec![color; n],
        BaseHue::Hue(h) if n == 1 => vec![color_at_hue(h, palette)],
        BaseHue::Hue(h) => {
            let mut used = BTreeSet::new();
            (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    let hue = h + (t * 2.0 - 1.0) * palette.hue_range;
                    let color = nearest_unused(hue, palette, &used);
                    used.insert(color);
                    color
                })
                .collect()
        }
    }
}

/// The colour at hue `h`, or the first colour not in `used` found by walking
/// the hue circle in `HUE_STEP`s, then widening the lightness one step at a
/// time in alternating directions.
fn nearest_unused(h: f64, palette: &Palette, used: &BTreeSet<Color>) -> Color {
    let preferred = color_at_hue(h, palette);
    if !used.contains(&preferred) {
        return preferred;
    }
    let hue_steps = (1.0 / HUE_STEP).round() as u32;
    let lightness_offsets = std::iter::once(0).chain((1..=255i32).flat_map(|k| [k, -k]));
    for offset in lightness_offsets {
        let lightness = palette.lightness + f64::from(offset) * LIGHTNESS_STEP;
        if !(0.0..=1.0).contains(&lightness) {
            continue;
        }
        for k in 0..hue_steps {
            let hue = h + f64::from(k) * HUE_STEP;
            let candidate = hsl_color(hue, palette.saturation, lightness);
            if !used.contains(&candidate) {
                debug!(hue = h, nudged_by = k, offset, "colour collision nudged");
                return candidate;
            }
        }
    }
    preferred
}

/// Final interval → colour mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    by_ratio: BTreeMap<Ratio, Color>,
    by_delegate: BTreeMap<Ratio, Color>,
}

impl ColorAssignment {
    /// Colour of any classified interval.
    pub fn color_of(&self, ratio: Ratio) -> Option<Color> {
        self.by_ratio.get(&ratio).copied()
    }

    /// Colour chosen for a delegate.
    pub fn delegate_color(&self, delegate: Ratio) -> Option<Color> {
        self.by_delegate.get(&delegate).copied()
    }

    pub fn len(&self) -> usize {
        self.by_ratio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ratio.is_empty()
    }
}

/// Colour every delegate group, then spread each delegate's colour to the
/// members of its class.
pub fn assign_colors(
    classes: &EquivalenceClasses,
    groups: &PrimeLimitGroups,
    palette: &Palette,
) -> ColorAssignment {
    let by_delegate_class: BTreeMap<Ratio, &EquivalenceClass> =
        classes.iter().map(|c| (c.delegate, c)).collect();
    let mut assignment = ColorAssignment::default();

    for (&limit, delegates) in groups {
        let base = base_hue(limit);
        let colors = match palette.scheme {
            ColorScheme::Spread => generate_colors(base, delegates.len(), palette),
            ColorScheme::Limit => {
                let flat = generate_colors(base, 1, palette);
                flat.into_iter().cycle().take(delegates.len()).collect()
            }
        };
        debug!(limit, classes = delegates.len(), "colouring prime-limit group");

        for (&delegate, &color) in delegates.iter().zip(&colors) {
            assignment.by_delegate.insert(delegate, color);
            assignment.by_ratio.insert(delegate, color);
            if let Some(class) = by_delegate_class.get(&delegate) {
                for &member in &class.members {
                    assignment.by_ratio.insert(member, color);
                }
            }
        }
    }
    assignment
}

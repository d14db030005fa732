// Incremental tuning graph.
//
// A `TuningSystem` grows a scale one interval at a time from the fundamental
// 1/1. It has two views of the same set of pitch classes:
//
// - `recipe`: adjacency map from each pitch class to the ordered list of
//   `(TuningEdge, target)` steps taken from it. Keyed by exact ratio value,
//   so two paths arriving at the same pitch share one node and no reference
//   cycles are possible.
// - `scale`: the same pitch classes as a sorted set of `PitchCents`.
//
// Invariants: the keys of `recipe` and the pitches of `scale` are the same
// set; 1/1 is always present; nodes and edges are only ever added.
//
// `tune_interval` computes the target with `TuningEdge::target_pitch_class`,
// a pure function, so the pitch shown for review is exactly the pitch that
// gets committed. The candidate scale is built on a copy and only swapped in
// after the optional review accepts it, so a declined step leaves the system
// untouched.

use crate::error::{LatticeError, Result};
use crate::prompt::{AcceptAll, ConfirmExtension};
use ji_lattice_ratio::{IntoRatio, Ratio, RatioError, normalize, show_fraction, to_cents};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;
use tracing::info;

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// Whether an edge multiplies or divides by its interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = RatioError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            other => Err(RatioError::Parse(format!(
                "direction must be 'up' or 'down', got '{other}'"
            ))),
        }
    }
}

/// A directed, interval-labelled step between pitch classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningEdge {
    pub interval: Ratio,
    pub direction: Direction,
}

impl TuningEdge {
    pub fn new(interval: Ratio, direction: Direction) -> Self {
        Self {
            interval,
            direction,
        }
    }

    /// Pitch class reached by applying this edge to `start`, octave-normalized.
    pub fn target_pitch_class(&self, start: Ratio) -> std::result::Result<Ratio, RatioError> {
        let raw = match self.direction {
            Direction::Up => start.checked_mul(self.interval)?,
            Direction::Down => start.checked_div(self.interval)?,
        };
        normalize(raw)
    }
}

impl fmt::Display for TuningEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Up => write!(f, "---{}--->", self.interval),
            Direction::Down => write!(f, "<---{}---", self.interval),
        }
    }
}

// ---------------------------------------------------------------------------
// Scale entries
// ---------------------------------------------------------------------------

/// A pitch class with its size in cents. Ordered and compared by pitch only.
#[derive(Clone, Copy, Debug)]
pub struct PitchCents {
    pub pitch: Ratio,
    pub cents: i64,
}

impl PitchCents {
    pub fn new(pitch: Ratio) -> Self {
        Self {
            pitch,
            cents: to_cents(pitch),
        }
    }
}

impl PartialEq for PitchCents {
    fn eq(&self, other: &Self) -> bool {
        self.pitch == other.pitch
    }
}

impl Eq for PitchCents {}

impl PartialOrd for PitchCents {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PitchCents {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pitch.cmp(&other.pitch)
    }
}

impl fmt::Display for PitchCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}¢)", self.pitch, self.cents)
    }
}

// ---------------------------------------------------------------------------
// Review data and outcomes
// ---------------------------------------------------------------------------

/// What a reviewer sees before a new pitch is committed: the candidate and
/// up to one neighbour on each side in the extended scale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborPreview {
    pub start: Ratio,
    pub edge: TuningEdge,
    pub candidate: PitchCents,
    /// Ascending; contains `candidate` at `candidate_index`.
    pub window: Vec<PitchCents>,
    pub candidate_index: usize,
}

impl NeighborPreview {
    /// Tab-separated pitches of the window.
    pub fn pitch_line(&self, padding: Option<usize>) -> String {
        self.window
            .iter()
            .map(|pc| show_fraction(pc.pitch, padding))
            .collect::<Vec<_>>()
            .join("\t")
    }

    /// Tab-separated cents of the window, right-aligned.
    pub fn cents_line(&self) -> String {
        self.window
            .iter()
            .map(|pc| format!("{:>10}¢", pc.cents))
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// Result of a tuning step that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneOutcome {
    /// A new pitch class and edge were committed.
    Added(Ratio),
    /// The target already exists; nothing changed.
    AlreadyPresent(Ratio),
    /// The reviewer declined; nothing changed.
    Declined(Ratio),
}

impl TuneOutcome {
    pub fn pitch(self) -> Ratio {
        match self {
            TuneOutcome::Added(p) | TuneOutcome::AlreadyPresent(p) | TuneOutcome::Declined(p) => p,
        }
    }
}

/// A parsed `<start> <interval> [up|down]` instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuningStep {
    pub start: Ratio,
    pub interval: Ratio,
    pub direction: Direction,
}

impl FromStr for TuningStep {
    type Err = RatioError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let (start, interval, direction) = match parts.as_slice() {
            [start, interval] => (start, interval, Direction::Up),
            [start, interval, direction] => (start, interval, direction.parse()?),
            _ => {
                return Err(RatioError::Parse(format!(
                    "expected '<start> <interval> [up|down]', got '{s}'"
                )));
            }
        };
        Ok(Self {
            start: start.parse()?,
            interval: interval.parse()?,
            direction,
        })
    }
}

// ---------------------------------------------------------------------------
// Tuning system
// ---------------------------------------------------------------------------

/// Adjacency list of tuning steps: pitch class → `(edge, target)` in the
/// order they were taken.
pub type Recipe = BTreeMap<Ratio, Vec<(TuningEdge, Ratio)>>;

/// A scale grown from 1/1 by accepted tuning steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TuningSystem {
    recipe: Recipe,
    scale: BTreeSet<PitchCents>,
}

impl Default for TuningSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TuningSystem {
    /// A system containing only the fundamental.
    pub fn new() -> Self {
        Self {
            recipe: BTreeMap::from([(Ratio::UNISON, Vec::new())]),
            scale: BTreeSet::from([PitchCents::new(Ratio::UNISON)]),
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Pitch classes with cents, ascending.
    pub fn scale(&self) -> &BTreeSet<PitchCents> {
        &self.scale
    }

    /// Pitch classes, ascending.
    pub fn pitch_classes(&self) -> Vec<Ratio> {
        self.scale.iter().map(|pc| pc.pitch).collect()
    }

    pub fn contains(&self, pitch: Ratio) -> bool {
        self.recipe.contains_key(&pitch)
    }

    pub fn len(&self) -> usize {
        self.recipe.len()
    }

    /// Never true: the fundamental is always present.
    pub fn is_empty(&self) -> bool {
        self.recipe.is_empty()
    }

    /// Steps taken from `pitch`, in the order they were added.
    pub fn edges_from(&self, pitch: Ratio) -> &[(TuningEdge, Ratio)] {
        self.recipe
            .get(&pitch)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// One line per edge, `start ---interval---> target`, grouped by start
    /// pitch in ascending order.
    pub fn recipe_lines(&self) -> Vec<String> {
        self.recipe
            .iter()
            .flat_map(|(start, edges)| {
                edges
                    .iter()
                    .map(move |(edge, target)| format!("{start} {edge} {target}"))
            })
            .collect()
    }

    /// Apply `interval` from `start` and commit the result without review.
    pub fn tune_interval(
        &mut self,
        start: impl IntoRatio,
        interval: impl IntoRatio,
        direction: Direction,
    ) -> Result<TuneOutcome> {
        self.tune_interval_with(start, interval, direction, &mut AcceptAll)
    }

    /// Apply `interval` from `start`, letting `reviewer` inspect the new
    /// pitch and its neighbours before anything is committed.
    ///
    /// Fails with `LatticeError::MissingBasePitch` if `start` is not already
    /// in the system. A target that already exists, or a declined review,
    /// leaves the system unchanged and is reported through `TuneOutcome`.
    pub fn tune_interval_with(
        &mut self,
        start: impl IntoRatio,
        interval: impl IntoRatio,
        direction: Direction,
        reviewer: &mut dyn ConfirmExtension,
    ) -> Result<TuneOutcome> {
        let start = start.into_ratio()?;
        let interval = interval.into_ratio()?;

        if !self.recipe.contains_key(&start) {
            return Err(LatticeError::MissingBasePitch {
                start,
                present: self.recipe.keys().copied().collect(),
            });
        }

        let edge = TuningEdge::new(interval, direction);
        let target = edge.target_pitch_class(start)?;

        if self.recipe.contains_key(&target) {
            info!(%start, %edge, %target, "pitch already present in the system, skipping");
            return Ok(TuneOutcome::AlreadyPresent(target));
        }

        let candidate = PitchCents::new(target);
        let mut extended = self.scale.clone();
        extended.insert(candidate);

        let preview = neighbor_preview(&extended, start, edge, candidate);
        if !reviewer.confirm(&preview) {
            info!(%start, %edge, %target, "extension declined");
            return Ok(TuneOutcome::Declined(target));
        }

        if let Some(edges) = self.recipe.get_mut(&start) {
            edges.push((edge, target));
        }
        self.recipe.insert(target, Vec::new());
        self.scale = extended;
        info!(%start, %edge, %target, cents = candidate.cents, "pitch added");
        Ok(TuneOutcome::Added(target))
    }

    /// Run a parsed step.
    pub fn apply_step(
        &mut self,
        step: &TuningStep,
        reviewer: &mut dyn ConfirmExtension,
    ) -> Result<TuneOutcome> {
        self.tune_interval_with(step.start, step.interval, step.direction, reviewer)
    }
}

/// Candidate plus at most one neighbour on each side, clamped at the ends of
/// the scale.
fn neighbor_preview(
    extended: &BTreeSet<PitchCents>,
    start: Ratio,
    edge: TuningEdge,
    candidate: PitchCents,
) -> NeighborPreview {
    let below = extended.range(..candidate).next_back().copied();
    let above = extended
        .range((Bound::Excluded(candidate), Bound::Unbounded))
        .next()
        .copied();
    let window: Vec<PitchCents> = below
        .into_iter()
        .chain(std::iter::once(candidate))
        .chain(above)
        .collect();
    NeighborPreview {
        start,
        edge,
        candidate,
        window,
        candidate_index: usize::from(below.is_some()),
    }
}

/// Scale entries joined by tabs, e.g. `1/1 (0¢)\t3/2 (702¢)`.
impl fmt::Display for TuningSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.scale.iter().map(PitchCents::to_string).collect();
        write!(f, "{}", entries.join("\t"))
    }
}

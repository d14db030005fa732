// Octave-equivalence classification of intervals.
//
// `classify` scans intervals in input order and keeps a growing list of
// delegates. Each interval joins the first delegate it is octave-equivalent
// to (quotient with prime limit 2, or no prime factors), or becomes a new
// delegate itself. Delegate identity is therefore first-seen, not canonical:
// the same multiset in a different order can produce different delegates,
// and since colours are keyed by delegate, different colours.
//
// Classes keep delegate insertion order throughout. `color.rs` relies on that
// order for deterministic colour assignment, so do not swap the class list
// for a hash map.

use ji_lattice_ratio::{Ratio, prime_limit};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Prime limit used to bucket ratios that have no prime factors (1/1).
pub const UNISON_LIMIT: u64 = 2;

/// Delegates grouped by prime limit. Delegates keep first-seen order within
/// each group.
pub type PrimeLimitGroups = BTreeMap<u64, Vec<Ratio>>;

/// One octave-equivalence class: its delegate and every distinct member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquivalenceClass {
    pub delegate: Ratio,
    /// Includes the delegate itself. Repeated inputs collapse.
    pub members: BTreeSet<Ratio>,
}

impl EquivalenceClass {
    fn new(delegate: Ratio) -> Self {
        Self {
            delegate,
            members: BTreeSet::from([delegate]),
        }
    }

    /// Prime limit of the delegate, with 1/1 bucketed as limit 2.
    pub fn prime_limit(&self) -> u64 {
        prime_limit(self.delegate).unwrap_or(UNISON_LIMIT)
    }
}

/// The partition produced by `classify`, in delegate insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EquivalenceClasses {
    classes: Vec<EquivalenceClass>,
}

impl EquivalenceClasses {
    pub fn iter(&self) -> impl Iterator<Item = &EquivalenceClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Delegates in the order they were first seen.
    pub fn delegates(&self) -> Vec<Ratio> {
        self.classes.iter().map(|c| c.delegate).collect()
    }

    /// The class containing `ratio`, if it was part of the classified input.
    pub fn class_of(&self, ratio: Ratio) -> Option<&EquivalenceClass> {
        self.classes.iter().find(|c| c.members.contains(&ratio))
    }

    /// Group delegates by prime limit. A delegate of 1/1 lands in group 2,
    /// alongside the pure octaves it is equivalent to.
    pub fn delegates_by_prime_limit(&self) -> PrimeLimitGroups {
        let mut groups = PrimeLimitGroups::new();
        for class in &self.classes {
            groups.entry(class.prime_limit()).or_default().push(class.delegate);
        }
        groups
    }
}

/// Partition `intervals` into octave-equivalence classes.
pub fn classify(intervals: &[Ratio]) -> EquivalenceClasses {
    let mut classes: Vec<EquivalenceClass> = Vec::new();
    for &interval in intervals {
        match classes
            .iter_mut()
            .find(|c| interval.is_octave_equivalent(c.delegate))
        {
            Some(class) => {
                class.members.insert(interval);
            }
            None => {
                debug!(delegate = %interval, "new equivalence class");
                classes.push(EquivalenceClass::new(interval));
            }
        }
    }
    EquivalenceClasses { classes }
}

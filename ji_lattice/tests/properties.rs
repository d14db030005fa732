// Property tests for classification and colour assignment.

use std::collections::BTreeSet;

use ji_lattice::color::OCTAVE_GREY;
use ji_lattice::config::MIN_HUE_RANGE;
use ji_lattice::{ColorAssignment, Palette, PrimeLimitGroups, assign_colors, classify};
use ji_lattice_ratio::Ratio;
use proptest::prelude::*;

fn ratio_strategy() -> impl Strategy<Value = Ratio> {
    (1i64..2_000, 1i64..2_000).prop_map(|(n, d)| Ratio::new(n, d).unwrap())
}

fn colour_groups(intervals: &[Ratio], hue_range: f64) -> (PrimeLimitGroups, ColorAssignment) {
    let palette = Palette {
        hue_range,
        ..Palette::default()
    };
    let classes = classify(intervals);
    let groups = classes.delegates_by_prime_limit();
    let colors = assign_colors(&classes, &groups, &palette);
    (groups, colors)
}

/// Distinct colours inside every hued group, one shared grey for limit 2.
fn check_group_colors(groups: &PrimeLimitGroups, colors: &ColorAssignment) -> Result<(), String> {
    for (&limit, delegates) in groups {
        let shades: Vec<_> = delegates
            .iter()
            .map(|&d| colors.delegate_color(d))
            .collect();
        match limit {
            2 => {
                if !shades.iter().all(|&c| c == Some(OCTAVE_GREY)) {
                    return Err(format!("limit 2 not uniformly grey: {shades:?}"));
                }
            }
            3 | 5 | 7 | 11 | 13 | 17 | 19 => {
                let unique: BTreeSet<_> = shades.iter().collect();
                if unique.len() != delegates.len() {
                    return Err(format!(
                        "limit {limit}: {} delegates, {} colours",
                        delegates.len(),
                        unique.len()
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[test]
fn powers_of_three_stay_distinct_across_the_hue_range() {
    let powers: Vec<Ratio> = (0..40)
        .map(|k| Ratio::from_unsigned(3u64.pow(k), 1).unwrap())
        .collect();
    for hue_range in [MIN_HUE_RANGE, 0.05, 0.4999] {
        let (groups, colors) = colour_groups(&powers, hue_range);
        assert_eq!(groups[&3].len(), 39);
        check_group_colors(&groups, &colors).unwrap();
    }
}

proptest! {
    #[test]
    fn classify_partitions_input(intervals in prop::collection::vec(ratio_strategy(), 0..40)) {
        let classes = classify(&intervals);
        for &x in &intervals {
            let owners = classes.iter().filter(|c| c.members.contains(&x)).count();
            prop_assert_eq!(owners, 1);
        }
        for class in classes.iter() {
            for &member in &class.members {
                prop_assert!(member.is_octave_equivalent(class.delegate));
            }
        }
        let delegates = classes.delegates();
        for (i, &a) in delegates.iter().enumerate() {
            for &b in &delegates[i + 1..] {
                prop_assert!(!a.is_octave_equivalent(b));
            }
        }
    }

    #[test]
    fn delegates_in_a_hued_group_get_distinct_colors(
        intervals in prop::collection::vec(ratio_strategy(), 1..120),
        hue_range in MIN_HUE_RANGE..0.5,
    ) {
        let (groups, colors) = colour_groups(&intervals, hue_range);
        let checked = check_group_colors(&groups, &colors);
        prop_assert!(checked.is_ok(), "{:?}", checked);
    }
}

// Property tests for octave normalization and prime limits.

use ji_lattice_ratio::{Ratio, normalize, prime_limit};
use proptest::prelude::*;

fn ratio_strategy() -> impl Strategy<Value = Ratio> {
    (1i64..5_000, 1i64..5_000).prop_map(|(n, d)| Ratio::new(n, d).unwrap())
}

proptest! {
    #[test]
    fn normalized_ratio_lies_in_one_octave(r in ratio_strategy()) {
        let p = normalize(r).unwrap();
        prop_assert!(p >= Ratio::UNISON);
        prop_assert!(p < Ratio::OCTAVE);
    }

    #[test]
    fn normalize_only_moves_by_octaves(r in ratio_strategy()) {
        let p = normalize(r).unwrap();
        let quotient = p.checked_div(r).unwrap();
        prop_assert!(matches!(prime_limit(quotient), None | Some(2)));
        prop_assert!(quotient.numer().is_power_of_two());
        prop_assert!(quotient.denom().is_power_of_two());
    }

    #[test]
    fn normalize_is_idempotent(r in ratio_strategy()) {
        let once = normalize(r).unwrap();
        prop_assert_eq!(normalize(once).unwrap(), once);
    }

    #[test]
    fn prime_limit_ignores_inversion(r in ratio_strategy()) {
        prop_assert_eq!(prime_limit(r), prime_limit(r.recip()));
    }

    #[test]
    fn octave_equivalence_agrees_with_normal_form(a in ratio_strategy(), b in ratio_strategy()) {
        let same_class = normalize(a).unwrap() == normalize(b).unwrap();
        prop_assert_eq!(a.is_octave_equivalent(b), same_class);
    }
}

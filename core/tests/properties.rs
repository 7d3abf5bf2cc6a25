//! Property tests over randomly seeded generations

use compfig_core::{generate, Difficulty, GenConfig};
use proptest::prelude::*;

fn any_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generation_is_deterministic(seed in any::<u64>(), difficulty in any_difficulty()) {
        let config = GenConfig { difficulty, seed };
        let a = generate(config).description.to_json().unwrap();
        let b = generate(config).description.to_json().unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn total_area_matches_shape_sum(seed in any::<u64>(), difficulty in any_difficulty()) {
        let problem = generate(GenConfig { difficulty, seed });
        let sum: f64 = problem.figure.shapes.iter().map(|s| s.area).sum();
        prop_assert!((sum - problem.figure.total_area).abs() <= 0.1);
    }

    #[test]
    fn every_edge_has_one_or_two_owners(seed in any::<u64>()) {
        let problem = generate(GenConfig { difficulty: Difficulty::Hard, seed });
        for edge in problem.figure.edges.values() {
            prop_assert!((1..=2).contains(&edge.owners.len()));
        }
    }

    #[test]
    fn solution_reaches_target_when_solved(seed in any::<u64>()) {
        let problem = generate(GenConfig { difficulty: Difficulty::Medium, seed });
        if problem.solution.solved {
            prop_assert!(compfig_core::can_reach_targets(
                &problem.graph,
                &problem.solution.sources
            ));
        }
    }
}

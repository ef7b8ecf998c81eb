#[cfg(test)]
mod tests {
    use super::super::core::HouseholdType;
    use super::super::desirability::Desirability;
    use super::super::parameters::Parameters;
    use super::super::wheel::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_build_raises_desirability_to_exponent() {
        let wheel = SelectionWheel::build(&[0.5, 1.0, 0.0], 2.0);
        assert_eq!(wheel.scores(), &[0.25, 1.0, 0.0]);
        assert_eq!(wheel.cumulative(), &[0.25, 1.25, 1.25]);
        assert_eq!(wheel.total(), 1.25);
    }

    #[test]
    fn test_sample_finds_first_bucket_at_or_above_target() {
        let wheel = SelectionWheel::from_scores(vec![1.0, 1.0, 2.0]);
        assert_eq!(wheel.sample(0.0), 0);
        assert_eq!(wheel.sample(0.25), 0);
        assert_eq!(wheel.sample(0.3), 1);
        assert_eq!(wheel.sample(0.5), 1);
        assert_eq!(wheel.sample(0.99), 2);
    }

    #[test]
    fn test_sample_skips_zero_weight_cells() {
        let wheel = SelectionWheel::from_scores(vec![0.0, 0.0, 3.0, 0.0]);
        for draw in [0.01, 0.5, 0.999] {
            assert_eq!(wheel.sample(draw), 2);
        }
    }

    #[test]
    fn test_overshoot_takes_last_cell() {
        let wheel = SelectionWheel::from_scores(vec![1.0, 1.0]);
        assert_eq!(wheel.sample(1.5), 1);
    }

    #[test]
    #[should_panic(expected = "empty selection wheel")]
    fn test_empty_wheel_panics() {
        let wheel = SelectionWheel::from_scores(Vec::new());
        wheel.sample(0.5);
    }

    #[test]
    fn test_equal_weights_sample_uniformly() {
        let cells = 10;
        let draws = 100_000;
        let wheel = SelectionWheel::from_scores(vec![1.0; cells]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = vec![0usize; cells];
        for _ in 0..draws {
            counts[wheel.choose(&mut rng).0] += 1;
        }

        let expected = draws as f64 / cells as f64;
        for count in counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "bucket off by {:.3}", deviation);
        }
    }

    #[test]
    fn test_wheels_rebuild_counts_builds() {
        let params = Parameters::default();
        let desirability = Desirability::new(3);
        let mut wheels = Wheels::build(&desirability, &params);
        assert_eq!(wheels.builds(), 1);
        wheels.rebuild(&desirability, &params);
        wheels.rebuild(&desirability, &params);
        assert_eq!(wheels.builds(), 3);
        assert_eq!(wheels.get(HouseholdType::Urban).len(), 3);
        assert_eq!(wheels.get(HouseholdType::Rural).len(), 3);
    }

    proptest! {
        #[test]
        fn prop_cumulative_is_monotonic(
            desirability in prop::collection::vec(0.0f64..=1.0, 1..128),
            exponent in 0.5f64..5.0,
        ) {
            let wheel = SelectionWheel::build(&desirability, exponent);
            let cumulative = wheel.cumulative();
            for pair in cumulative.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
            prop_assert_eq!(cumulative[cumulative.len() - 1], wheel.total());
        }

        #[test]
        fn prop_sample_stays_in_bounds(
            scores in prop::collection::vec(0.0f64..10.0, 1..64),
            draw in 0.0f64..1.0,
        ) {
            let wheel = SelectionWheel::from_scores(scores);
            prop_assert!(wheel.sample(draw) < wheel.len());
        }
    }
}

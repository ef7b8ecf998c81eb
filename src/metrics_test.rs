#[cfg(test)]
mod tests {
    use super::super::collector::*;
    use super::super::core::HouseholdType;
    use super::super::metrics::*;

    #[test]
    fn test_gini_coefficient() {
        let values = vec![10.0, 10.0, 10.0, 10.0];
        let gini = MetricsCalculator::gini_coefficient(&values);
        assert!(gini < 0.01);

        let values = vec![100.0, 0.0, 0.0, 0.0];
        let gini = MetricsCalculator::gini_coefficient(&values);
        assert!(gini > 0.7);

        assert_eq!(MetricsCalculator::gini_coefficient(&[]), 0.0);
        assert_eq!(MetricsCalculator::gini_coefficient(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_gini_survives_saturated_wealth() {
        let saturated = MetricsCalculator::gini_coefficient(&[f64::MAX, f64::MAX, 0.0, 0.0]);
        let small = MetricsCalculator::gini_coefficient(&[1.0, 1.0, 0.0, 0.0]);
        assert!(saturated.is_finite());
        assert!((saturated - small).abs() < 1e-12);

        let skipped = MetricsCalculator::gini_coefficient(&[f64::INFINITY, 5.0, 5.0]);
        assert!(skipped.abs() < 1e-12);
    }

    #[test]
    fn test_mean_and_standard_deviation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(MetricsCalculator::mean(&values), 5.0);
        assert_eq!(MetricsCalculator::standard_deviation(&values), 2.0);
        assert_eq!(MetricsCalculator::mean(&[]), 0.0);
    }

    #[test]
    fn test_kurtosis_is_excess() {
        // A two-point distribution has kurtosis 1, excess -2.
        let values = [0.0, 1.0, 0.0, 1.0];
        assert!((MetricsCalculator::kurtosis(&values) + 2.0).abs() < 1e-12);
        assert_eq!(MetricsCalculator::kurtosis(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(MetricsCalculator::kurtosis(&[1.0]), 0.0);
    }

    #[test]
    fn test_moments_display() {
        let moments = Moments::of(&[0.0, 1.0]);
        assert_eq!(moments.mean, 0.5);
        let display = format!("{}", moments);
        assert!(display.contains("mean 0.5000"));
        assert!(display.contains("sd 0.5000"));
    }

    #[test]
    fn test_collector_publishes_and_resets_tallies() {
        let mut collector = DataCollector::new();
        {
            let tallies = collector.tallies_mut();
            tallies.increment_moved(HouseholdType::Urban);
            tallies.increment_moved(HouseholdType::Rural);
            tallies.increment_moved(HouseholdType::Rural);
            tallies.births = 2;
            tallies.increment_trapped(HouseholdType::Urban);
            tallies.increment_trapped(HouseholdType::Rural);
            tallies.add_distance(HouseholdType::Rural, 2.5);
            tallies
                .transitions
                .record(HouseholdType::Rural, HouseholdType::Urban);
        }

        let record = collector.publish(0, &[1.0, 1.0, 1.0], &[0.2, 0.4], 100.0);
        assert_eq!(record.tallies.households_moved[HouseholdType::Rural], 2);
        assert_eq!(record.tallies.total_moved(), 3);
        assert_eq!(record.tallies.total_trapped(), 2);
        assert_eq!(record.total_households, 3);
        assert!(record.wealth_gini.abs() < 1e-12);
        assert!((record.satisfaction.mean - 0.3).abs() < 1e-12);

        assert_eq!(collector.tallies().total_moved(), 0);
        assert_eq!(collector.tallies().transitions.total(), 0);
        assert_eq!(collector.history().len(), 1);
        assert_eq!(
            collector
                .latest()
                .unwrap()
                .tallies
                .transitions
                .get(HouseholdType::Rural, HouseholdType::Urban),
            1
        );
    }
}

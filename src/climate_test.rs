#[cfg(test)]
mod tests {
    use super::super::climate::*;
    use super::super::error::SimError;
    use super::super::types::FactorValues;

    fn model(source: TemperatureSourceConfig, base: &[f64], window: usize) -> ClimateModel {
        let source = source.build(base, 4).unwrap();
        ClimateModel::new(source, base, window, 12.0)
    }

    #[test]
    fn test_initial_factor_is_standardized_distance() {
        let climate = model(TemperatureSourceConfig::Static, &[12.0, 2.0], 4);
        let factors = climate.factors();
        // Distances 0 and -10 standardize to +1 and -1.
        assert!((factors[0] - 1.0).abs() < 1e-12);
        assert!((factors[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_temperatures_give_zero_factor() {
        let climate = model(TemperatureSourceConfig::Static, &[5.0, 5.0, 5.0], 4);
        assert!(climate.factors().iter().all(|f| *f == 0.0));
    }

    #[test]
    fn test_static_source_never_changes_average() {
        let base = [12.0, 2.0];
        let mut climate = model(TemperatureSourceConfig::Static, &base, 3);
        let mut factors = vec![FactorValues::default(); 2];
        for season in 1..50 {
            climate.advance(season, &mut factors).unwrap();
        }
        assert_eq!(climate.average(), &base);
        assert!((factors[0].temperature - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_series_moves_average_over_window() {
        let base = vec![10.0, 0.0];
        let layers = vec![vec![10.0, 0.0], vec![14.0, 4.0], vec![14.0, 4.0]];
        let source = SeriesTemperatures::new(layers, 2).unwrap();
        let mut climate = ClimateModel::new(Box::new(source), &base, 2, 12.0);
        let mut factors = vec![FactorValues::default(); 2];

        climate.advance(1, &mut factors).unwrap();
        assert!((climate.average()[0] - 12.0).abs() < 1e-12);
        assert!((climate.average()[1] - 2.0).abs() < 1e-12);

        climate.advance(2, &mut factors).unwrap();
        assert!((climate.average()[0] - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_series_exhaustion_is_reported() {
        let source = SeriesTemperatures::new(vec![vec![1.0], vec![2.0]], 1).unwrap();
        let mut climate = ClimateModel::new(Box::new(source), &[1.0], 2, 12.0);
        let mut factors = vec![FactorValues::default()];

        climate.advance(1, &mut factors).unwrap();
        match climate.advance(2, &mut factors) {
            Err(SimError::ClimateExhausted { step }) => assert_eq!(step, 2),
            other => panic!("expected exhaustion, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_series_rejects_mismatched_layers() {
        assert!(SeriesTemperatures::new(vec![vec![1.0, 2.0], vec![1.0]], 2).is_err());
    }

    #[test]
    fn test_warming_runs_out_after_configured_years() {
        let config = TemperatureSourceConfig::Warming {
            degrees_per_year: 1.0,
            seasonal_amplitude: 0.0,
            years: Some(2),
        };
        let mut source = config.build(&[0.0], 4).unwrap();
        assert_eq!(source.layer(4), Some(vec![1.0]));
        assert!(source.layer(7).is_some());
        assert_eq!(source.layer(8), None);
    }

    #[test]
    fn test_warming_without_limit_keeps_going() {
        let config = TemperatureSourceConfig::Warming {
            degrees_per_year: 0.5,
            seasonal_amplitude: 2.0,
            years: None,
        };
        let mut source = config.build(&[0.0, 1.0], 4).unwrap();
        let layer = source.layer(4000).unwrap();
        assert!((layer[0] - 500.0).abs() < 1e-9);
        assert!((layer[1] - layer[0] - 1.0).abs() < 1e-9);
    }
}

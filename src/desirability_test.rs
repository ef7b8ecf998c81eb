#[cfg(test)]
mod tests {
    use super::super::core::{CellId, CellIndex, Factor, HouseholdType};
    use super::super::desirability::*;
    use super::super::domain::{CellSeed, SpatialDomain};
    use super::super::parameters::{Parameters, TypeCoefficients};
    use super::super::types::{Cell, FactorValues};
    use proptest::prelude::*;

    fn row_domain(n: i32) -> (SpatialDomain, Vec<Cell>) {
        let seeds: Vec<CellSeed> = (0..n).map(|x| CellSeed::new(x, 0, 0, 10.0)).collect();
        let domain = SpatialDomain::new(&seeds).unwrap();
        let cells = seeds
            .iter()
            .map(|s| Cell::new(CellId::new(s.x, s.y), 0, 1))
            .collect();
        (domain, cells)
    }

    #[test]
    fn test_normalize_spans_unit_interval() {
        let mut values = vec![-3.0, 1.0, 5.0];
        normalize(&mut values);
        assert_eq!(values, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_degenerate_range_is_untouched() {
        let mut values = vec![0.4, 0.4, 0.4];
        normalize(&mut values);
        assert_eq!(values, vec![0.4, 0.4, 0.4]);

        let mut empty: Vec<f64> = Vec::new();
        normalize(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_score_cell_sums_terms_and_reports_major_factor() {
        let coeffs = TypeCoefficients::urban();
        let factors = FactorValues {
            temperature: 1.0,
            elevation: -4.0,
            port: 0.0,
            river: 2.0,
        };
        let (score, major) = score_cell(&coeffs, &factors, 1.0, 0.05);
        let expected = 0.1 * 1.0 - 0.1 * 4.0 + 0.1 * 2.0 + 0.01 * 1.0 + 0.05;
        assert!((score - expected).abs() < 1e-12);
        assert_eq!(major, Some(Factor::Elevation));
    }

    #[test]
    fn test_score_cell_tie_keeps_first_term() {
        let coeffs = TypeCoefficients::urban();
        let factors = FactorValues {
            temperature: 1.0,
            elevation: 1.0,
            port: -1.0,
            river: 0.0,
        };
        let (_, major) = score_cell(&coeffs, &factors, 0.0, 0.0);
        assert_eq!(major, Some(Factor::Temperature));
    }

    #[test]
    fn test_score_cell_all_zero_has_no_major_factor() {
        let coeffs = TypeCoefficients::urban();
        let (score, major) = score_cell(&coeffs, &FactorValues::default(), 0.0, 0.0);
        assert_eq!(score, 0.0);
        assert_eq!(major, None);
    }

    #[test]
    fn test_availability_is_zero_without_infrastructure() {
        let (_, mut cells) = row_domain(3);
        cells[0].households = 10;
        cells[0].infrastructure = 10.0;
        cells[1].households = 10;
        cells[1].infrastructure = 0.0;
        cells[2].households = 5;
        cells[2].infrastructure = 20.0;

        let availability = infrastructure_availability(&cells);
        assert_eq!(availability[1], 0.0);
        assert!(availability[2] > availability[0]);
    }

    #[test]
    fn test_social_weights_spill_to_neighbours() {
        let (domain, mut cells) = row_domain(3);
        cells[1].households = 100;

        let weights = social_weights(&domain, &cells, 0.1, 0.5);
        let own = 0.1 * 100f64.ln();
        assert!((weights[1] - own).abs() < 1e-12);
        assert!((weights[0] - own * 0.5).abs() < 1e-12);
        assert!((weights[2] - own * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_social_weights_empty_cells_contribute_nothing() {
        let (domain, cells) = row_domain(4);
        let weights = social_weights(&domain, &cells, 0.1, 0.5);
        assert!(weights.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn test_refresh_keeps_both_types_in_range() {
        let (domain, mut cells) = row_domain(5);
        for (i, cell) in cells.iter_mut().enumerate() {
            cell.households = (i as u32 + 1) * 20;
            cell.infrastructure = (i as f64) * 15.0;
            cell.factors.temperature = i as f64 - 2.0;
            cell.factors.river = -(i as f64);
        }
        let params = Parameters::default();
        let mut desirability = Desirability::new(domain.len());
        desirability.refresh(&domain, &cells, &params);

        for kind in HouseholdType::ALL {
            let values = desirability.values(kind);
            assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
            assert!(values.iter().any(|v| *v == 0.0));
            assert!(values.iter().any(|v| *v == 1.0));
        }
        assert!(desirability.major_factor(HouseholdType::Rural, CellIndex(4)).is_some());
    }

    proptest! {
        #[test]
        fn prop_normalize_is_bounded(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let mut normalized = values.clone();
            normalize(&mut normalized);
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if max > min {
                for v in &normalized {
                    prop_assert!((0.0..=1.0).contains(v));
                }
            } else {
                prop_assert_eq!(normalized, values);
            }
        }
    }
}

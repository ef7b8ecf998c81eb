#[cfg(test)]
mod tests {
    use super::super::census::*;
    use super::super::core::{CellId, CellIndex, HouseholdId, HouseholdType};
    use super::super::household::Household;
    use super::super::parameters::CensusParams;
    use super::super::types::Cell;

    #[test]
    fn test_census_years_switch_interval() {
        let params = CensusParams::default();
        let held: Vec<i32> = (0..(100 * params.ticks_per_year))
            .filter(|&step| census_held(&params, step))
            .filter_map(|step| year_of(&params, step))
            .collect();
        assert_eq!(
            &held[..7],
            &[1911, 1921, 1931, 1941, 1951, 1956, 1961]
        );
        assert!(!held.contains(&1946));
        assert!(!held.contains(&1958));
    }

    #[test]
    fn test_census_only_on_year_boundaries() {
        let params = CensusParams::default();
        let step_1921 = 10 * params.ticks_per_year;
        assert!(census_held(&params, step_1921));
        for offset in 1..params.ticks_per_year {
            assert!(!census_held(&params, step_1921 + offset));
        }
        assert_eq!(year_of(&params, step_1921 + 1), None);
    }

    #[test]
    fn test_model_time_counts_fractional_years() {
        let params = CensusParams::default();
        assert_eq!(model_time(&params, 0), 1911.0);
        assert_eq!(model_time(&params, 6), 1912.5);
    }

    fn cells() -> Vec<Cell> {
        vec![
            Cell::new(CellId::new(0, 0), 0, 1),
            Cell::new(CellId::new(1, 0), 0, 1),
            Cell::new(CellId::new(2, 0), 0, 2),
            Cell::new(CellId::new(3, 0), 0, 3),
        ]
    }

    fn household(id: u64, anchor: usize, now: usize) -> Household {
        let mut household = Household::new(
            HouseholdId(id),
            CellIndex(anchor),
            Some(HouseholdType::Rural),
            1.0,
        );
        household.cell = CellIndex(now);
        household
    }

    #[test]
    fn test_tally_counts_province_changes_only() {
        let cells = cells();
        let households = vec![
            household(0, 0, 1),
            household(1, 0, 2),
            household(2, 1, 3),
            household(3, 3, 2),
            household(4, 2, 2),
        ];

        let counts = tally_migration(&households, &cells, 4);
        assert_eq!(counts, vec![3, 0, 2, 1]);
    }

    #[test]
    fn test_reset_anchors_clears_next_tally() {
        let cells = cells();
        let mut households = vec![household(0, 0, 2), household(1, 3, 0)];
        assert_eq!(tally_migration(&households, &cells, 4)[0], 2);

        reset_anchors(&mut households);
        assert_eq!(tally_migration(&households, &cells, 4), vec![0, 0, 0, 0]);
        assert_eq!(households[0].census_cell, CellIndex(2));
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::CellId;
    use super::super::infrastructure::*;
    use super::super::parameters::{InfrastructureParams, LogisticParams};
    use super::super::types::Cell;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn shortage_params() -> InfrastructureParams {
        InfrastructureParams {
            increase_rate: 0.1,
            decrease_rate: 0.1,
            base_cost: 1.0,
            cost_exponent: 1.0,
            maintenance_coefficient: 0.05,
            permafrost_affects_infrastructure: false,
            ..InfrastructureParams::default()
        }
    }

    fn cell_with(households: u32, infrastructure: f64) -> Cell {
        let mut cell = Cell::new(CellId::new(0, 0), 0, 1);
        cell.households = households;
        cell.infrastructure = infrastructure;
        cell
    }

    #[test]
    fn test_cost_per_unit_is_concave_in_households() {
        assert_eq!(cost_per_unit(100, 1.0, 1.0), 1.0);
        assert_eq!(cost_per_unit(0, 2.0, 0.5), 0.0);
        assert!(cost_per_unit(1000, 100.0, 0.2) < cost_per_unit(10, 100.0, 0.2));
    }

    #[test]
    fn test_shortage_cell_builds_one_tenth() {
        let params = shortage_params();
        let mut cell = cell_with(100, 0.0);

        let charge = update_cell(&mut cell, &params);
        assert!((cell.infrastructure - 10.0).abs() < 1e-12);
        // 10 units at unit cost 1, no maintenance on an empty stock.
        assert!((charge - 10.0).abs() < 1e-12);
        assert!((cell.net_assets + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_shortage_charge_includes_maintenance_on_existing_stock() {
        let params = shortage_params();
        let mut cell = cell_with(100, 50.0);

        let charge = update_cell(&mut cell, &params);
        assert!((cell.infrastructure - 55.0).abs() < 1e-12);
        assert!((charge - (5.0 + 50.0 * 0.05)).abs() < 1e-12);
        assert!((cell.net_assets + charge).abs() < 1e-12);
    }

    #[test]
    fn test_surplus_decays_and_pays_maintenance_on_households() {
        let params = shortage_params();
        let mut cell = cell_with(10, 110.0);

        let charge = update_cell(&mut cell, &params);
        assert!((cell.infrastructure - 100.0).abs() < 1e-12);
        assert!((charge - 10.0 * 1.0 * 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_bearing_capacity_slows_construction_and_speeds_decay() {
        let mut params = shortage_params();
        params.permafrost_affects_infrastructure = true;

        let mut building = cell_with(100, 0.0);
        building.bearing_capacity = 0.5;
        update_cell(&mut building, &params);
        assert!((building.infrastructure - 5.0).abs() < 1e-12);

        let mut decaying = cell_with(0, 10.0);
        decaying.bearing_capacity = 0.5;
        update_cell(&mut decaying, &params);
        assert!((decaying.infrastructure - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_bearing_capacity_only_applies_to_permafrost() {
        let params = InfrastructureParams::default();
        let mut cells = vec![cell_with(1, 1.0), cell_with(1, 1.0)];
        cells[0].permafrost = true;
        cells[0].factors.temperature = 0.2;
        cells[1].factors.temperature = -3.0;

        update_bearing_capacity(&mut cells, &params);
        assert!((cells[0].bearing_capacity - 0.5).abs() < 1e-12);
        assert_eq!(cells[1].bearing_capacity, 1.0);
    }

    #[test]
    fn test_logistic_respects_floor() {
        let params = LogisticParams {
            a: 2.0,
            b: 0.0,
            c: 0.25,
        };
        assert!((logistic(0.0, &params) - 0.625).abs() < 1e-12);
        assert!(logistic(-100.0, &params) >= 0.25);
        assert!(logistic(100.0, &params) <= 1.0);
    }

    #[test]
    fn test_update_all_sums_charges() {
        let params = shortage_params();
        let mut cells = vec![cell_with(100, 0.0), cell_with(100, 0.0)];
        let total = update_all(&mut cells, &params);
        assert!((total - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_initial_stock_is_zero_for_empty_cells() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(initial_stock(&mut rng, 0, 0.1), 0.0);
        for _ in 0..100 {
            assert!(initial_stock(&mut rng, 5, 2.0) >= 0.0);
        }
    }

    proptest! {
        #[test]
        fn prop_infrastructure_never_negative(
            households in 0u32..10_000,
            stock in 0.0f64..20_000.0,
            increase in 0.0f64..1.0,
            decrease in 0.0f64..1.0,
            bearing in 0.0f64..=1.0,
            permafrost in any::<bool>(),
        ) {
            let params = InfrastructureParams {
                increase_rate: increase,
                decrease_rate: decrease,
                permafrost_affects_infrastructure: permafrost,
                ..InfrastructureParams::default()
            };
            let mut cell = cell_with(households, stock);
            cell.bearing_capacity = bearing;
            for _ in 0..5 {
                update_cell(&mut cell, &params);
                prop_assert!(cell.infrastructure >= 0.0);
            }
        }
    }
}

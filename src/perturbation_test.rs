#[cfg(test)]
mod tests {
    use super::super::core::{CellId, Factor};
    use super::super::perturbation::*;
    use super::super::types::{Cell, FactorValues};

    fn shock(name: &str, region: RegionSelector, factor: Factor, offset: f64) -> PerturbationConfig {
        PerturbationConfig {
            name: name.to_string(),
            start_step: 3,
            duration: 2,
            region,
            factor,
            offset,
        }
    }

    fn cells() -> Vec<Cell> {
        vec![
            Cell::new(CellId::new(0, 0), 0, 1),
            Cell::new(CellId::new(5, 5), 1, 2),
        ]
    }

    #[test]
    fn test_update_reports_start_and_end_once() {
        let mut schedule = PerturbationSchedule::new(vec![shock(
            "heat",
            RegionSelector::MegaCell { id: 0 },
            Factor::Temperature,
            1.0,
        )])
        .unwrap();

        assert!(schedule.update(2).is_empty());
        assert_eq!(
            schedule.update(3),
            vec![PerturbationChange::Started("heat".to_string())]
        );
        assert!(schedule.update(4).is_empty());
        assert_eq!(schedule.active_count(), 1);
        assert_eq!(
            schedule.update(5),
            vec![PerturbationChange::Ended("heat".to_string())]
        );
        assert_eq!(schedule.active_count(), 0);
    }

    #[test]
    fn test_apply_offsets_only_cells_in_region() {
        let mut schedule = PerturbationSchedule::new(vec![
            shock("wet", RegionSelector::Province { code: 2 }, Factor::River, 0.5),
            shock(
                "uplift",
                RegionSelector::Rect {
                    x0: 0,
                    y0: 0,
                    x1: 5,
                    y1: 5,
                },
                Factor::Elevation,
                -1.0,
            ),
        ])
        .unwrap();
        let base = vec![FactorValues::default(); 2];
        let mut cells = cells();

        schedule.update(3);
        schedule.apply(&base, &mut cells);
        assert_eq!(cells[0].factors.river, 0.0);
        assert_eq!(cells[1].factors.river, 0.5);
        assert_eq!(cells[0].factors.elevation, -1.0);
        assert_eq!(cells[1].factors.elevation, -1.0);

        schedule.update(5);
        schedule.apply(&base, &mut cells);
        assert_eq!(cells[1].factors, FactorValues::default());
    }

    #[test]
    fn test_overlapping_offsets_add_up() {
        let mut schedule = PerturbationSchedule::new(vec![
            shock("a", RegionSelector::MegaCell { id: 1 }, Factor::Port, 1.0),
            shock("b", RegionSelector::Province { code: 2 }, Factor::Port, 2.0),
        ])
        .unwrap();
        let base = vec![FactorValues::default(); 2];
        let mut cells = cells();
        schedule.update(4);
        schedule.apply(&base, &mut cells);
        assert_eq!(cells[1].factors.port, 3.0);
    }

    #[test]
    fn test_non_geographic_factors_are_rejected() {
        let social = shock("s", RegionSelector::MegaCell { id: 0 }, Factor::Social, 1.0);
        assert!(PerturbationSchedule::new(vec![social]).is_err());

        let mut empty = shock("e", RegionSelector::MegaCell { id: 0 }, Factor::Port, 1.0);
        empty.duration = 0;
        assert!(PerturbationSchedule::new(vec![empty]).is_err());
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::{CellId, CellIndex};
    use super::super::domain::*;
    use super::super::error::SimError;

    fn grid(width: i32, height: i32) -> Vec<CellSeed> {
        let mut seeds = Vec::new();
        for y in 0..height {
            for x in 0..width {
                seeds.push(CellSeed::new(x, y, 10, 0.0));
            }
        }
        seeds
    }

    #[test]
    fn test_interior_cell_has_eight_neighbours() {
        let domain = SpatialDomain::new(&grid(3, 3)).unwrap();
        let center = domain.index_of(CellId::new(1, 1)).unwrap();
        assert_eq!(domain.neighbors(center).len(), 8);
    }

    #[test]
    fn test_edges_do_not_wrap() {
        let domain = SpatialDomain::new(&grid(4, 3)).unwrap();
        let corner = domain.index_of(CellId::new(0, 0)).unwrap();
        let neighbours: Vec<CellId> = domain
            .neighbors(corner)
            .iter()
            .map(|&idx| domain.cell_id(idx))
            .collect();
        assert_eq!(neighbours.len(), 3);
        assert!(!neighbours.contains(&CellId::new(3, 0)));
        assert!(!neighbours.contains(&CellId::new(0, 2)));
    }

    #[test]
    fn test_ineligible_cells_are_not_neighbours() {
        let seeds: Vec<CellSeed> = grid(3, 3)
            .into_iter()
            .filter(|s| !(s.x == 1 && s.y == 0))
            .collect();
        let domain = SpatialDomain::new(&seeds).unwrap();
        let center = domain.index_of(CellId::new(1, 1)).unwrap();
        assert_eq!(domain.neighbors(center).len(), 7);
        assert_eq!(domain.index_of(CellId::new(1, 0)), None);
    }

    #[test]
    fn test_indices_follow_seed_order() {
        let seeds = grid(2, 2);
        let domain = SpatialDomain::new(&seeds).unwrap();
        for (i, seed) in seeds.iter().enumerate() {
            assert_eq!(domain.cell_id(CellIndex(i)), CellId::new(seed.x, seed.y));
        }
        assert_eq!(domain.width(), 2);
        assert_eq!(domain.height(), 2);
    }

    #[test]
    fn test_invalid_domains_are_rejected() {
        assert!(matches!(SpatialDomain::new(&[]), Err(SimError::Domain(_))));

        let duplicate = vec![CellSeed::new(0, 0, 1, 0.0), CellSeed::new(0, 0, 2, 0.0)];
        assert!(matches!(
            SpatialDomain::new(&duplicate),
            Err(SimError::Domain(_))
        ));

        let negative = vec![CellSeed::new(-1, 0, 1, 0.0)];
        assert!(SpatialDomain::new(&negative).is_err());

        let mut reserved = CellSeed::new(0, 0, 1, 0.0);
        reserved.province = 0;
        assert!(SpatialDomain::new(&[reserved]).is_err());
    }

    #[test]
    fn test_province_slots_reserve_total() {
        let mut seeds = grid(2, 1);
        seeds[1].province = 4;
        let domain = SpatialDomain::new(&seeds).unwrap();
        assert_eq!(domain.provinces(), &[1, 4]);
        assert_eq!(domain.province_slots(), 5);
    }

    #[test]
    fn test_synthetic_domain_is_reproducible() {
        let synthetic = SyntheticDomain {
            width: 12,
            height: 8,
            ..SyntheticDomain::default()
        };
        let a = synthetic.generate(99);
        let b = synthetic.generate(99);
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(a.iter().all(|s| s.province >= 1 && s.province <= synthetic.provinces));
        assert!(SpatialDomain::new(&a).is_ok());
    }

    #[test]
    fn test_synthetic_domain_never_empty() {
        let synthetic = SyntheticDomain {
            width: 3,
            height: 3,
            land_fraction: 0.0,
            ..SyntheticDomain::default()
        };
        assert_eq!(synthetic.generate(1).len(), 1);
    }
}

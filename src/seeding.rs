//! Initial placement of households on the domain.

use crate::core::CellIndex;
use crate::domain::{CellSeed, SpatialDomain};
use crate::wheel::SelectionWheel;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PopulationConfig {
    /// Households per cell straight from the raster.
    Raster,
    /// Province totals from the raster, redistributed by desirability and social pull.
    Sprinkle {
        batch: u32,
        social_weight: f64,
        spread: f64,
        exponent: f64,
    },
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self::Raster
    }
}

pub fn raster_households(seeds: &[CellSeed], household_size: u32) -> Vec<u32> {
    seeds
        .iter()
        .map(|s| s.population / household_size.max(1))
        .collect()
}

/// Place each province's raster total one batch at a time, visiting provinces round robin.
///
/// Within a batch every draw uses the same province-local wheel; each pick then adds
/// `social_weight` to the chosen cell and `social_weight * spread` to its same-province
/// neighbours before the next batch rebuilds the wheel.
pub fn sprinkle_households<R: Rng + ?Sized>(
    rng: &mut R,
    domain: &SpatialDomain,
    seeds: &[CellSeed],
    desirability: &[f64],
    household_size: u32,
    batch: u32,
    social_weight: f64,
    spread: f64,
    exponent: f64,
) -> Vec<u32> {
    let totals = raster_households(seeds, household_size);
    let mut counts = vec![0u32; seeds.len()];
    let mut scores: Vec<f64> = desirability.iter().map(|d| d.powf(exponent)).collect();

    let mut provinces: BTreeMap<u32, (Vec<usize>, u32)> = BTreeMap::new();
    for (i, seed) in seeds.iter().enumerate() {
        let entry = provinces.entry(seed.province).or_default();
        entry.0.push(i);
        entry.1 += totals[i];
    }

    let batch = batch.max(1);
    let mut remaining: u64 = provinces.values().map(|(_, n)| *n as u64).sum();
    while remaining > 0 {
        for (province, (members, left)) in provinces.iter_mut() {
            if *left == 0 {
                continue;
            }
            let take = batch.min(*left);
            let wheel =
                SelectionWheel::from_scores(members.iter().map(|&i| scores[i]).collect());
            for _ in 0..take {
                let cell = members[wheel.sample(rng.random::<f64>())];
                counts[cell] += 1;
                scores[cell] += social_weight;
                for neighbor in domain.neighbors(CellIndex(cell)) {
                    if seeds[neighbor.0].province == *province {
                        scores[neighbor.0] += social_weight * spread;
                    }
                }
            }
            *left -= take;
            remaining -= take as u64;
        }
    }
    counts
}

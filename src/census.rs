//! Census clock and inter-province migration counts.

use crate::household::Household;
use crate::parameters::CensusParams;
use crate::types::Cell;
use serde::{Deserialize, Serialize};

/// One census row: slot 0 is the total, slot `p` counts arrivals in province `p`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRow {
    pub time: f64,
    pub counts: Vec<i64>,
}

/// Model time in years at the start of `step`.
pub fn model_time(params: &CensusParams, step: usize) -> f64 {
    params.start_year as f64 + step as f64 / params.ticks_per_year.max(1) as f64
}

/// Calendar year of `step` if it falls on a year boundary.
pub fn year_of(params: &CensusParams, step: usize) -> Option<i32> {
    let per_year = params.ticks_per_year.max(1);
    (step % per_year == 0).then(|| params.start_year + (step / per_year) as i32)
}

pub fn census_held(params: &CensusParams, step: usize) -> bool {
    match year_of(params, step) {
        Some(year) if year <= params.switch_year => {
            year.rem_euclid(params.early_interval) == params.year_offset
        }
        Some(year) => year.rem_euclid(params.late_interval) == params.year_offset,
        None => false,
    }
}

/// Count households whose province differs from the one they occupied at the last census.
pub fn tally_migration(households: &[Household], cells: &[Cell], slots: usize) -> Vec<i64> {
    let mut counts = vec![0i64; slots.max(1)];
    for household in households {
        let from = cells[household.census_cell.0].province;
        let to = cells[household.cell.0].province;
        if from != to {
            if let Some(slot) = counts.get_mut(to as usize) {
                *slot += 1;
            }
            counts[0] += 1;
        }
    }
    counts
}

pub fn reset_anchors(households: &mut [Household]) {
    for household in households {
        household.census_cell = household.cell;
    }
}

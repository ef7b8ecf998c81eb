//! Mega-cell migration flows.

use crate::core::CellId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MegaCellTally {
    pub moved_in: u64,
    pub moved_out: u64,
    /// Sum of displacement vectors of households leaving this mega-cell.
    pub delta: (f64, f64),
}

/// Pending flows are written by households during a step and published by the aggregator step.
#[derive(Debug, Clone, Default)]
pub struct RegionLedger {
    pending: BTreeMap<u32, MegaCellTally>,
    published: BTreeMap<u32, MegaCellTally>,
}

impl RegionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a move if it crosses a mega-cell boundary. Returns whether it did.
    pub fn record_move(
        &mut self,
        from_region: u32,
        to_region: u32,
        from: CellId,
        to: CellId,
    ) -> bool {
        if from_region == to_region {
            return false;
        }
        let source = self.pending.entry(from_region).or_default();
        source.moved_out += 1;
        source.delta.0 += (to.x - from.x) as f64;
        source.delta.1 += (to.y - from.y) as f64;
        self.pending.entry(to_region).or_default().moved_in += 1;
        true
    }

    pub fn step(&mut self) {
        self.published = std::mem::take(&mut self.pending);
    }

    pub fn published(&self) -> &BTreeMap<u32, MegaCellTally> {
        &self.published
    }

    pub fn tally(&self, region: u32) -> MegaCellTally {
        self.published.get(&region).copied().unwrap_or_default()
    }
}

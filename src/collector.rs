//! Aggregate telemetry: counters buffered during a step and frozen into a record at its end.

use crate::core::{HouseholdType, PerType};
use crate::error::Result;
use crate::metrics::{MetricsCalculator, Moments};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    pub urban_to_urban: u64,
    pub urban_to_rural: u64,
    pub rural_to_urban: u64,
    pub rural_to_rural: u64,
}

impl TransitionMatrix {
    pub fn record(&mut self, from: HouseholdType, to: HouseholdType) {
        *self.slot_mut(from, to) += 1;
    }

    pub fn get(&self, from: HouseholdType, to: HouseholdType) -> u64 {
        match (from, to) {
            (HouseholdType::Urban, HouseholdType::Urban) => self.urban_to_urban,
            (HouseholdType::Urban, HouseholdType::Rural) => self.urban_to_rural,
            (HouseholdType::Rural, HouseholdType::Urban) => self.rural_to_urban,
            (HouseholdType::Rural, HouseholdType::Rural) => self.rural_to_rural,
        }
    }

    fn slot_mut(&mut self, from: HouseholdType, to: HouseholdType) -> &mut u64 {
        match (from, to) {
            (HouseholdType::Urban, HouseholdType::Urban) => &mut self.urban_to_urban,
            (HouseholdType::Urban, HouseholdType::Rural) => &mut self.urban_to_rural,
            (HouseholdType::Rural, HouseholdType::Urban) => &mut self.rural_to_urban,
            (HouseholdType::Rural, HouseholdType::Rural) => &mut self.rural_to_rural,
        }
    }

    pub fn total(&self) -> u64 {
        self.urban_to_urban + self.urban_to_rural + self.rural_to_urban + self.rural_to_rural
    }
}

/// Counters written by households and the world during one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepTallies {
    pub transitions: TransitionMatrix,
    /// Transitions that coincided with a tracked relocation.
    pub move_transitions: TransitionMatrix,
    pub distance: PerType<f64>,
    pub trapped: PerType<u64>,
    pub wealth: PerType<f64>,
    /// Relocations longer than the record distance, by the mover's type.
    pub households_moved: PerType<u64>,
    pub births: u64,
    pub cells_to_urban: u64,
    pub cells_to_rural: u64,
    pub infrastructure_expense: f64,
    pub urban_households: u64,
    pub rural_households: u64,
    pub population_change: i64,
}

impl StepTallies {
    pub fn add_distance(&mut self, kind: HouseholdType, distance: f64) {
        self.distance[kind] += distance;
    }

    pub fn increment_trapped(&mut self, kind: HouseholdType) {
        self.trapped[kind] += 1;
    }

    pub fn increment_moved(&mut self, kind: HouseholdType) {
        self.households_moved[kind] += 1;
    }

    pub fn total_moved(&self) -> u64 {
        self.households_moved.urban + self.households_moved.rural
    }

    pub fn add_wealth(&mut self, kind: HouseholdType, wealth: f64) {
        self.wealth[kind] += wealth;
    }

    pub fn total_trapped(&self) -> u64 {
        self.trapped.urban + self.trapped.rural
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub tallies: StepTallies,
    pub total_households: usize,
    pub wealth_gini: f64,
    pub satisfaction: Moments,
    pub urban_density: f64,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}: {} households ({} urban, {} rural), moved {}, trapped {}, births {}, gini {:.3}",
            self.step,
            self.total_households,
            self.tallies.urban_households,
            self.tallies.rural_households,
            self.tallies.total_moved(),
            self.tallies.total_trapped(),
            self.tallies.births,
            self.wealth_gini
        )
    }
}

#[derive(Debug, Default)]
pub struct DataCollector {
    current: StepTallies,
    history: Vec<StepRecord>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tallies(&self) -> &StepTallies {
        &self.current
    }

    pub fn tallies_mut(&mut self) -> &mut StepTallies {
        &mut self.current
    }

    /// Freeze this step's counters and start a fresh buffer.
    pub fn publish(
        &mut self,
        step: usize,
        wealth: &[f64],
        satisfaction: &[f64],
        urban_density: f64,
    ) -> &StepRecord {
        let record = StepRecord {
            step,
            tallies: std::mem::take(&mut self.current),
            total_households: wealth.len(),
            wealth_gini: MetricsCalculator::gini_coefficient(wealth),
            satisfaction: Moments::of(satisfaction),
            urban_density,
        };
        self.history.push(record);
        &self.history[self.history.len() - 1]
    }

    pub fn latest(&self) -> Option<&StepRecord> {
        self.history.last()
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn save_history(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.history)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

//! Scripted regional factor shocks.

use crate::core::Factor;
use crate::error::{Result, SimError};
use crate::types::{Cell, FactorValues};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegionSelector {
    MegaCell { id: u32 },
    Province { code: u32 },
    /// Inclusive grid rectangle.
    Rect { x0: i32, y0: i32, x1: i32, y1: i32 },
}

impl RegionSelector {
    pub fn contains(&self, cell: &Cell) -> bool {
        match self {
            RegionSelector::MegaCell { id } => cell.mega_cell == *id,
            RegionSelector::Province { code } => cell.province == *code,
            RegionSelector::Rect { x0, y0, x1, y1 } => {
                (*x0..=*x1).contains(&cell.id.x) && (*y0..=*y1).contains(&cell.id.y)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationConfig {
    pub name: String,
    pub start_step: usize,
    pub duration: usize,
    pub region: RegionSelector,
    pub factor: Factor,
    pub offset: f64,
}

impl PerturbationConfig {
    pub fn is_active(&self, step: usize) -> bool {
        step >= self.start_step && step < self.start_step + self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PerturbationChange {
    Started(String),
    Ended(String),
}

#[derive(Debug, Clone, Default)]
pub struct PerturbationSchedule {
    items: Vec<PerturbationConfig>,
    active: Vec<bool>,
}

impl PerturbationSchedule {
    pub fn new(items: Vec<PerturbationConfig>) -> Result<Self> {
        for item in &items {
            if matches!(item.factor, Factor::Infrastructure | Factor::Social) {
                return Err(SimError::Config(format!(
                    "perturbation {} targets {}, which is not a geographic factor",
                    item.name, item.factor
                )));
            }
            if item.duration == 0 {
                return Err(SimError::Config(format!(
                    "perturbation {} has zero duration",
                    item.name
                )));
            }
        }
        let active = vec![false; items.len()];
        Ok(Self { items, active })
    }

    /// Activate and retire perturbations for `step`, reporting each change.
    pub fn update(&mut self, step: usize) -> Vec<PerturbationChange> {
        let mut changes = Vec::new();
        for (item, active) in self.items.iter().zip(self.active.iter_mut()) {
            let now = item.is_active(step);
            if now != *active {
                *active = now;
                changes.push(if now {
                    PerturbationChange::Started(item.name.clone())
                } else {
                    PerturbationChange::Ended(item.name.clone())
                });
            }
        }
        changes
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    /// Effective factors: the unperturbed values plus every active offset covering the cell.
    pub fn apply(&self, base: &[FactorValues], cells: &mut [Cell]) {
        for (cell, base) in cells.iter_mut().zip(base) {
            cell.factors = *base;
            for (item, _) in self.items.iter().zip(&self.active).filter(|(_, a)| **a) {
                if item.region.contains(cell) {
                    if let Some(value) = cell.factors.get_mut(item.factor) {
                        *value += item.offset;
                    }
                }
            }
        }
    }
}

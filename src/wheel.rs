//! Roulette-wheel sampling over exponentiated desirability.

use crate::core::{CellIndex, HouseholdType, PerType};
use crate::desirability::Desirability;
use crate::parameters::Parameters;
use log::warn;
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct SelectionWheel {
    scores: Vec<f64>,
    cumulative: Vec<f64>,
    total: f64,
}

impl SelectionWheel {
    pub fn build(desirability: &[f64], exponent: f64) -> Self {
        let scores: Vec<f64> = desirability.iter().map(|d| d.powf(exponent)).collect();
        Self::from_scores(scores)
    }

    pub fn from_scores(scores: Vec<f64>) -> Self {
        let mut cumulative = Vec::with_capacity(scores.len());
        let mut running = 0.0;
        for score in &scores {
            running += score;
            cumulative.push(running);
        }
        Self {
            scores,
            cumulative,
            total: running,
        }
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Index of the first cumulative entry at or above `draw * total`.
    pub fn sample(&self, draw: f64) -> usize {
        assert!(!self.is_empty(), "sampling an empty selection wheel");
        let target = draw * self.total;
        let idx = self.cumulative.partition_point(|&c| c < target);
        if idx == self.cumulative.len() {
            warn!(
                "wheel draw {} overshot total {}, using last cell",
                target, self.total
            );
            self.cumulative.len() - 1
        } else {
            idx
        }
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> CellIndex {
        CellIndex(self.sample(rng.random::<f64>()))
    }
}

/// One wheel per household type. Rebuilds replace both wheels at once.
#[derive(Debug, Clone, Default)]
pub struct Wheels {
    wheels: PerType<SelectionWheel>,
    builds: usize,
}

impl Wheels {
    pub fn build(desirability: &Desirability, params: &Parameters) -> Self {
        Self {
            wheels: PerType::from_fn(|kind| {
                SelectionWheel::build(
                    desirability.values(kind),
                    params.coefficients(kind).desirability_exponent,
                )
            }),
            builds: 1,
        }
    }

    pub fn rebuild(&mut self, desirability: &Desirability, params: &Parameters) {
        let builds = self.builds + 1;
        *self = Self::build(desirability, params);
        self.builds = builds;
    }

    pub fn get(&self, kind: HouseholdType) -> &SelectionWheel {
        &self.wheels[kind]
    }

    /// Number of times the wheels have been built, including the first.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

//! Model coefficients, grouped by the subsystem that reads them.

use crate::core::{Factor, HouseholdType};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Desirability and behaviour coefficients for one household type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeCoefficients {
    pub temperature: f64,
    pub elevation: f64,
    pub port: f64,
    pub river: f64,
    pub infrastructure_availability: f64,
    pub social_weight: f64,
    /// Fraction of a cell's social weight passed to each neighbour.
    pub adjacent_social_discount: f64,
    pub desirability_exponent: f64,
    pub growth_rate: f64,
    pub movement_will: f64,
}

impl TypeCoefficients {
    pub fn urban() -> Self {
        Self {
            temperature: 0.1,
            elevation: 0.1,
            port: 0.1,
            river: 0.1,
            infrastructure_availability: 0.01,
            social_weight: 0.1,
            adjacent_social_discount: 0.5,
            desirability_exponent: 3.0,
            growth_rate: 0.0,
            movement_will: 0.02,
        }
    }

    pub fn rural() -> Self {
        Self {
            temperature: -1.5,
            elevation: -1.5,
            port: -1.5,
            river: -1.5,
            ..Self::urban()
        }
    }

    /// Coefficient of a factor term. Social weight is applied separately.
    pub fn factor(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Temperature => self.temperature,
            Factor::Elevation => self.elevation,
            Factor::Port => self.port,
            Factor::River => self.river,
            Factor::Infrastructure => self.infrastructure_availability,
            Factor::Social => self.social_weight,
        }
    }
}

impl Default for TypeCoefficients {
    fn default() -> Self {
        Self::urban()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdParams {
    pub household_size: u32,
    pub move_cost: f64,
    pub wealth_mu: f64,
    pub wealth_sigma: f64,
    pub wealth_adj_mu: f64,
    pub wealth_adj_sigma: f64,
    pub birth_wealth_mu: f64,
    pub birth_wealth_sigma: f64,
    /// Moves not longer than this are not counted as tracked moves.
    pub record_distance: f64,
    /// Steps between wealth drift updates.
    pub wealth_update_interval: usize,
}

impl Default for HouseholdParams {
    fn default() -> Self {
        Self {
            household_size: 4,
            move_cost: 100.0,
            wealth_mu: 10.1,
            wealth_sigma: 0.33,
            wealth_adj_mu: 0.05,
            wealth_adj_sigma: 0.005,
            birth_wealth_mu: 0.8,
            birth_wealth_sigma: 0.05,
            record_distance: 0.0,
            wealth_update_interval: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovePolicy {
    pub prevent_moves: bool,
    pub favor_closer_moves: bool,
    pub wealth_limits_moves: bool,
    pub shuffle_households: bool,
    /// Probability of taking each of the sampled candidates, in candidate order.
    pub selection_weights: Vec<f64>,
}

impl Default for MovePolicy {
    fn default() -> Self {
        Self {
            prevent_moves: false,
            favor_closer_moves: true,
            wealth_limits_moves: true,
            shuffle_households: true,
            selection_weights: vec![0.75, 0.25],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Steps between selection wheel rebuilds.
    pub recal_skip: usize,
    pub initial_urban_density: f64,
    pub density_increment: f64,
    pub density_increment_interval: usize,
    /// Steps between step summary events; 0 disables them.
    pub summary_interval: usize,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            recal_skip: 10,
            initial_urban_density: 100.0,
            density_increment: 5.0,
            density_increment_interval: 5,
            summary_interval: 20,
        }
    }
}

/// `c + (1 - c) / (1 + exp(-a * (x - b)))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.2,
            c: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureParams {
    pub increase_rate: f64,
    pub decrease_rate: f64,
    /// Relative spread of the initial infrastructure around the household count.
    pub initial_deviation: f64,
    pub base_cost: f64,
    pub cost_exponent: f64,
    pub maintenance_coefficient: f64,
    pub permafrost_affects_infrastructure: bool,
    pub bearing: LogisticParams,
}

impl Default for InfrastructureParams {
    fn default() -> Self {
        Self {
            increase_rate: 0.01,
            decrease_rate: 0.005,
            initial_deviation: 0.1,
            base_cost: 100.0,
            cost_exponent: 0.2,
            maintenance_coefficient: 0.05,
            permafrost_affects_infrastructure: true,
            bearing: LogisticParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentParams {
    pub attachment_time: u32,
    pub detachment_time: u32,
    pub strength: f64,
}

impl Default for AttachmentParams {
    fn default() -> Self {
        Self {
            attachment_time: 100,
            detachment_time: 50,
            strength: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CensusParams {
    pub tracking: bool,
    pub start_year: i32,
    pub ticks_per_year: usize,
    /// Last year counted on the early interval.
    pub switch_year: i32,
    pub early_interval: i32,
    pub late_interval: i32,
    pub year_offset: i32,
}

impl Default for CensusParams {
    fn default() -> Self {
        Self {
            tracking: false,
            start_year: 1911,
            ticks_per_year: 4,
            switch_year: 1951,
            early_interval: 10,
            late_interval: 5,
            year_offset: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub urban: TypeCoefficients,
    pub rural: TypeCoefficients,
    pub household: HouseholdParams,
    pub policy: MovePolicy,
    pub world: WorldParams,
    pub infrastructure: InfrastructureParams,
    pub attachment: AttachmentParams,
    pub census: CensusParams,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            urban: TypeCoefficients::urban(),
            rural: TypeCoefficients::rural(),
            household: HouseholdParams::default(),
            policy: MovePolicy::default(),
            world: WorldParams::default(),
            infrastructure: InfrastructureParams::default(),
            attachment: AttachmentParams::default(),
            census: CensusParams::default(),
        }
    }
}

impl Parameters {

    pub fn coefficients(&self, kind: HouseholdType) -> &TypeCoefficients {
        match kind {
            HouseholdType::Urban => &self.urban,
            HouseholdType::Rural => &self.rural,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for kind in HouseholdType::ALL {
            let c = self.coefficients(kind);
            if !(0.0..=1.0).contains(&c.growth_rate) {
                return Err(SimError::Config(format!(
                    "{} growth rate must lie in [0, 1], got {}",
                    kind, c.growth_rate
                )));
            }
            if c.movement_will < 0.0 {
                return Err(SimError::Config(format!(
                    "{} movement will must not be negative",
                    kind
                )));
            }
            if c.desirability_exponent <= 0.0 {
                return Err(SimError::Config(format!(
                    "{} desirability exponent must be positive",
                    kind
                )));
            }
        }

        let weights = &self.policy.selection_weights;
        if weights.is_empty() {
            return Err(SimError::Config(
                "selection weights must name at least one candidate".to_string(),
            ));
        }
        if weights.iter().any(|w| *w < 0.0) {
            return Err(SimError::Config(
                "selection weights must not be negative".to_string(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(SimError::Config(format!(
                "selection weights must sum to 1, got {}",
                sum
            )));
        }

        if self.household.household_size == 0 {
            return Err(SimError::Config("household size must be positive".to_string()));
        }
        if self.household.wealth_update_interval == 0 {
            return Err(SimError::Config(
                "wealth update interval must be positive".to_string(),
            ));
        }
        if self.world.recal_skip == 0 {
            return Err(SimError::Config("recal_skip must be positive".to_string()));
        }
        if self.world.density_increment_interval == 0 {
            return Err(SimError::Config(
                "density increment interval must be positive".to_string(),
            ));
        }
        if self.census.ticks_per_year == 0 {
            return Err(SimError::Config("ticks per year must be positive".to_string()));
        }
        if self.census.early_interval <= 0 || self.census.late_interval <= 0 {
            return Err(SimError::Config("census intervals must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.attachment.strength) {
            return Err(SimError::Config(
                "attachment strength must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

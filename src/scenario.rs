use crate::climate::{ClimateConfig, TemperatureSourceConfig};
use crate::core::Factor;
use crate::domain::{DomainConfig, SyntheticDomain};
use crate::error::{Result, SimError};
use crate::parameters::Parameters;
use crate::perturbation::{PerturbationConfig, RegionSelector};
use crate::seeding::PopulationConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub steps: usize,
    pub random_seed: Option<u64>,
    pub parameters: Parameters,
    pub domain: DomainConfig,
    pub climate: ClimateConfig,
    pub population: PopulationConfig,
    pub perturbations: Vec<PerturbationConfig>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new("default".to_string())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Scenario {
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: String::new(),
            steps: 200,
            random_seed: None,
            parameters: Parameters::default(),
            domain: DomainConfig::default(),
            climate: ClimateConfig::default(),
            population: PopulationConfig::default(),
            perturbations: Vec::new(),
        }
    }

    pub fn add_perturbation(&mut self, perturbation: PerturbationConfig) {
        self.perturbations.push(perturbation);
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let text = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load from YAML when the extension says so, JSON otherwise.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let scenario = if is_yaml(path) {
            serde_yaml::from_str(&text)?
        } else {
            serde_json::from_str(&text)?
        };
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(SimError::Config(
                "scenario must simulate at least one step".to_string(),
            ));
        }
        self.parameters.validate()?;

        if let DomainConfig::Synthetic(synthetic) = &self.domain {
            if synthetic.width <= 0 || synthetic.height <= 0 {
                return Err(SimError::Config(format!(
                    "synthetic domain must have positive size, got {}x{}",
                    synthetic.width, synthetic.height
                )));
            }
            if !(0.0..=1.0).contains(&synthetic.land_fraction) {
                return Err(SimError::Config(
                    "land fraction must lie in [0, 1]".to_string(),
                ));
            }
        }
        if self.climate.window == 0 {
            return Err(SimError::Config(
                "temperature window must span at least one season".to_string(),
            ));
        }
        if let PopulationConfig::Sprinkle { batch, exponent, .. } = &self.population {
            if *batch == 0 || *exponent <= 0.0 {
                return Err(SimError::Config(
                    "sprinkling needs a positive batch and exponent".to_string(),
                ));
            }
        }
        for perturbation in &self.perturbations {
            if perturbation.duration == 0 {
                return Err(SimError::Config(format!(
                    "perturbation {} must last at least one step",
                    perturbation.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.parameters;
        writeln!(f, "Scenario: {}", self.name)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "\nParameters:")?;
        writeln!(f, "  Steps to simulate: {}", self.steps)?;
        if let Some(seed) = self.random_seed {
            writeln!(f, "  Seed: {}", seed)?;
        }
        writeln!(
            f,
            "  Wheel rebuild every {} steps, urban density {} (+{} every {} steps)",
            p.world.recal_skip,
            p.world.initial_urban_density,
            p.world.density_increment,
            p.world.density_increment_interval
        )?;
        writeln!(
            f,
            "  Movement will: urban {}, rural {}",
            p.urban.movement_will, p.rural.movement_will
        )?;
        writeln!(
            f,
            "  Move cost {}, wealth limits moves: {}, favor closer moves: {}",
            p.household.move_cost, p.policy.wealth_limits_moves, p.policy.favor_closer_moves
        )?;
        writeln!(
            f,
            "  Moves prevented: {}, census tracking: {}",
            p.policy.prevent_moves, p.census.tracking
        )?;
        writeln!(
            f,
            "  Infrastructure: +{} / -{} per step, permafrost effects: {}",
            p.infrastructure.increase_rate,
            p.infrastructure.decrease_rate,
            p.infrastructure.permafrost_affects_infrastructure
        )?;

        writeln!(f, "\nDomain: {:?}", self.domain)?;
        writeln!(f, "Climate: {:?}", self.climate.source)?;
        writeln!(f, "Population: {:?}", self.population)?;
        if !self.perturbations.is_empty() {
            writeln!(f, "\nPerturbations:")?;
            for perturbation in &self.perturbations {
                writeln!(
                    f,
                    "  {}: {} {:+} from step {} for {} steps",
                    perturbation.name,
                    perturbation.factor,
                    perturbation.offset,
                    perturbation.start_step,
                    perturbation.duration
                )?;
            }
        }

        Ok(())
    }
}

pub fn create_standard_scenarios() -> HashMap<String, Scenario> {
    let mut scenarios = HashMap::new();

    let mut baseline = Scenario::new("baseline".to_string());
    baseline.description = "Synthetic landscape under a constant climate".to_string();
    scenarios.insert("baseline".to_string(), baseline);

    let mut warming = Scenario::new("warming".to_string());
    warming.description = "Linear warming with a seasonal cycle; stops when the series ends".to_string();
    warming.steps = 480;
    warming.climate.source = TemperatureSourceConfig::Warming {
        degrees_per_year: 0.03,
        seasonal_amplitude: 1.5,
        years: Some(100),
    };
    scenarios.insert("warming".to_string(), warming);

    let mut frozen = Scenario::new("frozen".to_string());
    frozen.description = "Control run: households never relocate".to_string();
    frozen.parameters.policy.prevent_moves = true;
    scenarios.insert("frozen".to_string(), frozen);

    let mut thaw = Scenario::new("thaw".to_string());
    thaw.description = "A northern band warms for twenty years".to_string();
    thaw.steps = 240;
    let north = SyntheticDomain::default();
    thaw.add_perturbation(PerturbationConfig {
        name: "northern_thaw".to_string(),
        start_step: 40,
        duration: 80,
        region: RegionSelector::Rect {
            x0: 0,
            y0: north.height * 3 / 4,
            x1: north.width - 1,
            y1: north.height - 1,
        },
        factor: Factor::Temperature,
        offset: 1.0,
    });
    scenarios.insert("thaw".to_string(), thaw);

    let mut census = Scenario::new("census".to_string());
    census.description = "Moves counted only between censuses".to_string();
    census.steps = 400;
    census.parameters.census.tracking = true;
    scenarios.insert("census".to_string(), census);

    let mut sprinkled = Scenario::new("sprinkled".to_string());
    sprinkled.description =
        "Province totals placed by desirability and social pull instead of the raster".to_string();
    sprinkled.population = PopulationConfig::Sprinkle {
        batch: 50,
        social_weight: 0.05,
        spread: 0.5,
        exponent: 2.0,
    };
    scenarios.insert("sprinkled".to_string(), sprinkled);

    let mut unlimited = Scenario::new("unlimited".to_string());
    unlimited.description = "Moves are free of wealth limits and favor sorted candidates".to_string();
    unlimited.parameters.policy.wealth_limits_moves = false;
    unlimited.parameters.policy.favor_closer_moves = false;
    scenarios.insert("unlimited".to_string(), unlimited);

    scenarios
}

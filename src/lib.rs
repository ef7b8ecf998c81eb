pub mod analysis;
pub mod census;
pub mod cli;
pub mod climate;
pub mod collector;
pub mod core;
pub mod desirability;
pub mod domain;
pub mod error;
pub mod events;
pub mod experiment;
pub mod household;
pub mod infrastructure;
pub mod metrics;
pub mod migration_log;
pub mod parameters;
pub mod perturbation;
pub mod regions;
pub mod scenario;
pub mod seeding;
pub mod simulation;
pub mod types;
pub mod wheel;
pub mod world;

pub use error::{Result, SimError};
pub use scenario::Scenario;
pub use simulation::{RunSummary, Simulation};

#[cfg(test)]
mod census_test;
#[cfg(test)]
mod climate_test;
#[cfg(test)]
mod desirability_test;
#[cfg(test)]
mod domain_test;
#[cfg(test)]
mod infrastructure_test;
#[cfg(test)]
mod metrics_test;
#[cfg(test)]
mod perturbation_test;
#[cfg(test)]
mod wheel_test;

//! A single simulation run: world, households, telemetry and the per-tick schedule.
//!
//! Each tick runs households (in shuffled order), then the world orchestrator, then the census
//! and the mega-cell aggregators, and finally publishes telemetry. Children born during a tick
//! join the schedule on the next one.

use crate::census::{self, MigrationRow};
use crate::climate::ClimateModel;
use crate::collector::{DataCollector, StepRecord};
use crate::core::{CellId, CellIndex, HouseholdId, HouseholdType, lognormal, zscore_in_place};
use crate::desirability::Desirability;
use crate::domain::SpatialDomain;
use crate::error::Result;
use crate::events::{EventLogger, EventType, RebuildReason, StopReason};
use crate::household::{Birth, Household, StepContext};
use crate::infrastructure;
use crate::migration_log::{MigrationSink, NullMigrationLog};
use crate::parameters::Parameters;
use crate::perturbation::{PerturbationChange, PerturbationSchedule};
use crate::regions::RegionLedger;
use crate::scenario::Scenario;
use crate::seeding::{self, PopulationConfig};
use crate::types::{Cell, FactorValues};
use crate::world::World;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Totals over a finished (or stopped) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub scenario: String,
    pub seed: u64,
    pub steps: usize,
    pub stop_reason: StopReason,
    pub initial_households: usize,
    pub final_households: usize,
    pub urban_households: u64,
    pub rural_households: u64,
    pub total_moves: u64,
    pub total_trapped: u64,
    pub total_births: u64,
    pub final_wealth_gini: f64,
    pub census_rows: usize,
    pub sink_failures: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Run Summary: {} ===", self.scenario)?;
        writeln!(f, "Seed: {}", self.seed)?;
        writeln!(f, "Steps: {} ({})", self.steps, self.stop_reason)?;
        writeln!(
            f,
            "Households: {} -> {} ({} urban, {} rural)",
            self.initial_households,
            self.final_households,
            self.urban_households,
            self.rural_households
        )?;
        writeln!(f, "Total Moves: {}", self.total_moves)?;
        writeln!(f, "Total Trapped: {}", self.total_trapped)?;
        writeln!(f, "Total Births: {}", self.total_births)?;
        writeln!(f, "Wealth Inequality (Gini): {:.3}", self.final_wealth_gini)?;
        writeln!(f, "Census Rows: {}", self.census_rows)?;
        if self.sink_failures > 0 {
            writeln!(f, "Migration Log Failures: {}", self.sink_failures)?;
        }
        Ok(())
    }
}

pub struct Simulation {
    scenario: String,
    params: Parameters,
    world: World,
    households: Vec<Household>,
    order: Vec<usize>,
    regions: RegionLedger,
    collector: DataCollector,
    events: EventLogger,
    sink: Box<dyn MigrationSink>,
    rng: StdRng,
    seed: u64,
    step: usize,
    next_id: u64,
    initial_households: usize,
    census_rows: usize,
    sink_failures: usize,
}

impl Simulation {
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        scenario.validate()?;
        let params = scenario.parameters.clone();
        let seed = scenario
            .random_seed
            .unwrap_or_else(|| rand::rng().random::<u64>());
        let mut rng = StdRng::seed_from_u64(seed);

        let seeds = scenario.domain.load_seeds(seed)?;
        let domain = SpatialDomain::new(&seeds)?;

        let temperatures: Vec<f64> = seeds.iter().map(|s| s.temperature).collect();
        let source = scenario
            .climate
            .source
            .build(&temperatures, params.census.ticks_per_year)?;
        let climate = ClimateModel::new(
            source,
            &temperatures,
            scenario.climate.window,
            scenario.climate.ideal_temperature,
        );

        let mut elevation: Vec<f64> = seeds.iter().map(|s| s.elevation).collect();
        let mut port: Vec<f64> = seeds.iter().map(|s| s.port).collect();
        let mut river: Vec<f64> = seeds.iter().map(|s| s.river).collect();
        zscore_in_place(&mut elevation);
        zscore_in_place(&mut port);
        zscore_in_place(&mut river);
        let base_factors: Vec<FactorValues> = climate
            .factors()
            .into_iter()
            .enumerate()
            .map(|(i, temperature)| FactorValues {
                temperature,
                elevation: elevation[i],
                port: port[i],
                river: river[i],
            })
            .collect();

        let mut cells: Vec<Cell> = seeds
            .iter()
            .zip(&base_factors)
            .map(|(seed, factors)| {
                let mut cell = Cell::new(
                    CellId::new(seed.x, seed.y),
                    seed.mega_cell,
                    seed.province,
                );
                cell.permafrost = seed.permafrost;
                cell.factors = *factors;
                cell
            })
            .collect();

        let household_size = params.household.household_size;
        let counts = match &scenario.population {
            PopulationConfig::Raster => seeding::raster_households(&seeds, household_size),
            PopulationConfig::Sprinkle {
                batch,
                social_weight,
                spread,
                exponent,
            } => {
                let mut initial = Desirability::new(domain.len());
                initial.refresh(&domain, &cells, &params);
                seeding::sprinkle_households(
                    &mut rng,
                    &domain,
                    &seeds,
                    initial.values(HouseholdType::Rural),
                    household_size,
                    *batch,
                    *social_weight,
                    *spread,
                    *exponent,
                )
            }
        };
        for (cell, &n) in cells.iter_mut().zip(&counts) {
            cell.households = n;
            cell.infrastructure =
                infrastructure::initial_stock(&mut rng, n, params.infrastructure.initial_deviation);
        }

        let perturbations = PerturbationSchedule::new(scenario.perturbations.clone())?;
        let world = World::new(domain, cells, base_factors, climate, perturbations, &params);

        let mut households = Vec::with_capacity(counts.iter().map(|&n| n as usize).sum());
        let mut next_id = 0u64;
        for (i, &n) in counts.iter().enumerate() {
            let kind = world.cells()[i].kind;
            for _ in 0..n {
                let wealth = lognormal(
                    &mut rng,
                    params.household.wealth_mu,
                    params.household.wealth_sigma,
                );
                households.push(Household::new(
                    HouseholdId(next_id),
                    CellIndex(i),
                    Some(kind),
                    wealth,
                ));
                next_id += 1;
            }
        }

        let mut events = EventLogger::new();
        events.log(
            0,
            EventType::RunStarted {
                scenario: scenario.name.clone(),
                cells: world.domain().len(),
                households: households.len(),
                seed,
            },
        );
        info!(
            "starting {} with {} households on {} cells (seed {})",
            scenario.name,
            households.len(),
            world.domain().len(),
            seed
        );

        Ok(Self {
            scenario: scenario.name.clone(),
            params,
            initial_households: households.len(),
            world,
            households,
            order: Vec::new(),
            regions: RegionLedger::new(),
            collector: DataCollector::new(),
            events,
            sink: Box::new(NullMigrationLog),
            rng,
            seed,
            step: 0,
            next_id,
            census_rows: 0,
            sink_failures: 0,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn MigrationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Advance one tick. Returns a stop reason when the world asks to end the run.
    pub fn step(&mut self) -> Option<StopReason> {
        let step = self.step;
        let census_held = census::census_held(&self.params.census, step);

        let births = self.step_households(step, census_held);

        let report = self
            .world
            .step(step, &self.params, self.collector.tallies_mut(), census_held);
        if let Some(threshold) = report.density_raised {
            self.events
                .log(step, EventType::DensityThresholdRaised { threshold });
        }
        for change in &report.perturbations {
            let event_type = match change {
                PerturbationChange::Started(name) => {
                    EventType::PerturbationStarted { name: name.clone() }
                }
                PerturbationChange::Ended(name) => {
                    EventType::PerturbationEnded { name: name.clone() }
                }
            };
            self.events.log(step, event_type);
        }
        if report.rebuilt == Some(RebuildReason::Perturbation) {
            self.events.log(
                step,
                EventType::WheelsRebuilt {
                    reason: RebuildReason::Perturbation,
                },
            );
        }

        if census_held {
            self.take_census(step);
        }

        self.regions.step();
        self.publish(step);

        for birth in births {
            self.enroll(birth);
        }
        self.step += 1;
        report.stop
    }

    fn step_households(&mut self, step: usize, census_held: bool) -> Vec<Birth> {
        self.order.clear();
        self.order.extend(0..self.households.len());
        if self.params.policy.shuffle_households {
            self.order.shuffle(&mut self.rng);
        }

        let (domain, desirability, wheels, cells) = self.world.split_for_households();
        let mut ctx = StepContext {
            step,
            params: &self.params,
            domain,
            desirability,
            wheels,
            cells,
            tallies: self.collector.tallies_mut(),
            regions: &mut self.regions,
            rng: &mut self.rng,
            census_held,
        };

        let mut births = Vec::new();
        for &i in &self.order {
            if let Some(birth) = self.households[i].step(&mut ctx).birth {
                births.push(birth);
            }
        }
        births
    }

    fn take_census(&mut self, step: usize) {
        let counts = census::tally_migration(
            &self.households,
            self.world.cells(),
            self.world.domain().province_slots(),
        );
        let row = MigrationRow {
            time: census::model_time(&self.params.census, step),
            counts,
        };
        let total = row.counts[0];
        match self.sink.write_row(&row) {
            Ok(()) => self.census_rows += 1,
            Err(e) => {
                warn!("failed to write census row at {}: {}", row.time, e);
                self.sink_failures += 1;
                self.events.log(
                    step,
                    EventType::SinkFailure {
                        message: e.to_string(),
                    },
                );
            }
        }
        info!("census at {}: {} inter-province migrants", row.time, total);
        self.events.log(
            step,
            EventType::CensusTaken {
                time: row.time,
                total_migrants: total,
            },
        );
        census::reset_anchors(&mut self.households);
    }

    fn publish(&mut self, step: usize) {
        let wealth: Vec<f64> = self.households.iter().map(|h| h.wealth).collect();
        let satisfaction: Vec<f64> = self.households.iter().map(|h| h.satisfaction).collect();
        let record = self.collector.publish(
            step,
            &wealth,
            &satisfaction,
            self.world.urban_density(),
        );

        let interval = self.params.world.summary_interval;
        if interval > 0 && step % interval == 0 {
            let t = &record.tallies;
            let summary = EventType::StepSummary {
                urban_households: t.urban_households,
                rural_households: t.rural_households,
                moved: t.total_moved(),
                trapped: t.total_trapped(),
                births: t.births,
                infrastructure_expense: t.infrastructure_expense,
                wealth_gini: record.wealth_gini,
                mean_satisfaction: record.satisfaction.mean,
            };
            self.events.log(step, summary);
        }
    }

    fn enroll(&mut self, birth: Birth) {
        let id = HouseholdId(self.next_id);
        self.next_id += 1;
        self.households
            .push(Household::new(id, birth.cell, birth.kind, birth.wealth));
    }

    /// Step until `max_steps` ticks have run or the world stops the run.
    pub fn run(&mut self, max_steps: usize) -> RunSummary {
        let mut reason = StopReason::StepLimit;
        while self.step < max_steps {
            if let Some(stop) = self.step() {
                reason = stop;
                break;
            }
        }

        self.events.log(
            self.step,
            EventType::RunStopped {
                reason,
                households: self.households.len(),
            },
        );
        info!("{} stopped after {} steps: {}", self.scenario, self.step, reason);
        self.summary(reason)
    }

    pub fn summary(&self, stop_reason: StopReason) -> RunSummary {
        let history = self.collector.history();
        let last = history.last();
        RunSummary {
            scenario: self.scenario.clone(),
            seed: self.seed,
            steps: self.step,
            stop_reason,
            initial_households: self.initial_households,
            final_households: self.households.len(),
            urban_households: last.map_or(0, |r| r.tallies.urban_households),
            rural_households: last.map_or(0, |r| r.tallies.rural_households),
            total_moves: history.iter().map(|r| r.tallies.total_moved()).sum(),
            total_trapped: history.iter().map(|r| r.tallies.total_trapped()).sum(),
            total_births: history.iter().map(|r| r.tallies.births).sum(),
            final_wealth_gini: last.map_or(0.0, |r| r.wealth_gini),
            census_rows: self.census_rows,
            sink_failures: self.sink_failures,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Coefficients may be changed between steps; they are re-read every tick.
    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    pub fn households_mut(&mut self) -> &mut [Household] {
        &mut self.households
    }

    pub fn history(&self) -> &[StepRecord] {
        self.collector.history()
    }

    pub fn collector(&self) -> &DataCollector {
        &self.collector
    }

    pub fn events(&self) -> &EventLogger {
        &self.events
    }

    pub fn regions(&self) -> &RegionLedger {
        &self.regions
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Build a run from a scenario, run it to its step budget and return the summary.
pub fn run_scenario(
    scenario: &Scenario,
    sink: Box<dyn MigrationSink>,
) -> Result<(Simulation, RunSummary)> {
    let mut simulation = Simulation::from_scenario(scenario)?.with_sink(sink);
    let summary = simulation.run(scenario.steps);
    Ok((simulation, summary))
}

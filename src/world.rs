//! The world orchestrator: per-step cell bookkeeping, infrastructure, climate and wheel upkeep.

use crate::climate::ClimateModel;
use crate::collector::StepTallies;
use crate::core::HouseholdType;
use crate::desirability::Desirability;
use crate::domain::SpatialDomain;
use crate::error::SimError;
use crate::events::{RebuildReason, StopReason};
use crate::infrastructure;
use crate::parameters::Parameters;
use crate::perturbation::{PerturbationChange, PerturbationSchedule};
use crate::types::{Cell, FactorValues};
use crate::wheel::Wheels;
use log::{debug, error, info};

/// What happened during one world step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldStepReport {
    pub density_raised: Option<f64>,
    pub perturbations: Vec<PerturbationChange>,
    pub rebuilt: Option<RebuildReason>,
    pub stop: Option<StopReason>,
}

pub struct World {
    domain: SpatialDomain,
    cells: Vec<Cell>,
    base_factors: Vec<FactorValues>,
    desirability: Desirability,
    wheels: Wheels,
    climate: ClimateModel,
    perturbations: PerturbationSchedule,
    urban_density: f64,
    counter: usize,
    previous_population: Vec<u32>,
    census_population: Vec<u32>,
    census_change: Vec<i64>,
}

impl World {
    pub fn new(
        domain: SpatialDomain,
        mut cells: Vec<Cell>,
        base_factors: Vec<FactorValues>,
        climate: ClimateModel,
        perturbations: PerturbationSchedule,
        params: &Parameters,
    ) -> Self {
        assert_eq!(cells.len(), domain.len(), "one cell state per eligible cell");
        assert_eq!(base_factors.len(), domain.len(), "one factor set per eligible cell");

        let urban_density = params.world.initial_urban_density;
        for cell in cells.iter_mut() {
            cell.reclassify(urban_density);
        }
        if params.infrastructure.permafrost_affects_infrastructure {
            infrastructure::update_bearing_capacity(&mut cells, &params.infrastructure);
        }

        let mut desirability = Desirability::new(domain.len());
        desirability.refresh(&domain, &cells, params);
        let wheels = Wheels::build(&desirability, params);
        let population: Vec<u32> = cells.iter().map(|c| c.households).collect();

        Self {
            domain,
            cells,
            base_factors,
            desirability,
            wheels,
            climate,
            perturbations,
            urban_density,
            counter: 0,
            previous_population: population.clone(),
            census_population: population,
            census_change: Vec::new(),
        }
    }

    /// Advance the world after the household phase of simulation tick `step`.
    ///
    /// Perturbation windows are keyed on `step`. The density, climate and wheel cadences run on
    /// the internal counter, which is 1 on the first call.
    pub fn step(
        &mut self,
        step: usize,
        params: &Parameters,
        tallies: &mut StepTallies,
        census_held: bool,
    ) -> WorldStepReport {
        let mut report = WorldStepReport::default();
        self.counter += 1;

        if self.counter % params.world.density_increment_interval.max(1) == 0 {
            self.urban_density += params.world.density_increment;
            debug!("urban density threshold now {}", self.urban_density);
            report.density_raised = Some(self.urban_density);
        }

        report.perturbations = self.perturbations.update(step);
        for change in &report.perturbations {
            match change {
                PerturbationChange::Started(name) => info!("perturbation {} started", name),
                PerturbationChange::Ended(name) => info!("perturbation {} ended", name),
            }
        }

        self.update_residence(tallies, census_held);

        if params.infrastructure.permafrost_affects_infrastructure {
            infrastructure::update_bearing_capacity(&mut self.cells, &params.infrastructure);
        }
        tallies.infrastructure_expense =
            infrastructure::update_all(&mut self.cells, &params.infrastructure);

        match self.climate.advance(self.counter, &mut self.base_factors) {
            Ok(()) => {}
            Err(SimError::ClimateExhausted { step }) => {
                info!("temperature input exhausted at season {}", step);
                report.stop = Some(StopReason::ClimateExhausted);
            }
            Err(e) => {
                error!("climate update failed: {}", e);
                report.stop = Some(StopReason::ClimateExhausted);
            }
        }
        self.perturbations.apply(&self.base_factors, &mut self.cells);

        self.desirability.refresh(&self.domain, &self.cells, params);

        let reason = if !report.perturbations.is_empty() {
            Some(RebuildReason::Perturbation)
        } else if self.counter % params.world.recal_skip.max(1) == 0 {
            Some(RebuildReason::Scheduled)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.wheels.rebuild(&self.desirability, params);
            debug!(
                "selection wheels rebuilt at world step {} ({:?})",
                self.counter, reason
            );
            report.rebuilt = Some(reason);
        }
        report
    }

    /// Reclassify every cell and record flips, totals and population change.
    fn update_residence(&mut self, tallies: &mut StepTallies, census_held: bool) {
        let mut urban = 0u64;
        let mut rural = 0u64;
        let mut change = 0i64;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let previous = cell.reclassify(self.urban_density);
            match (previous, cell.kind) {
                (HouseholdType::Rural, HouseholdType::Urban) => tallies.cells_to_urban += 1,
                (HouseholdType::Urban, HouseholdType::Rural) => tallies.cells_to_rural += 1,
                _ => {}
            }
            match cell.kind {
                HouseholdType::Urban => urban += cell.households as u64,
                HouseholdType::Rural => rural += cell.households as u64,
            }
            change += cell.households as i64 - self.previous_population[i] as i64;
            self.previous_population[i] = cell.households;
        }
        tallies.urban_households = urban;
        tallies.rural_households = rural;
        tallies.population_change = change;

        if census_held {
            self.census_change = self
                .cells
                .iter()
                .zip(&self.census_population)
                .map(|(cell, before)| cell.households as i64 - *before as i64)
                .collect();
            self.census_population = self.cells.iter().map(|c| c.households).collect();
        }
    }

    /// Disjoint borrows for the household phase of a step.
    pub fn split_for_households(
        &mut self,
    ) -> (&SpatialDomain, &Desirability, &Wheels, &mut [Cell]) {
        (
            &self.domain,
            &self.desirability,
            &self.wheels,
            &mut self.cells,
        )
    }

    pub fn domain(&self) -> &SpatialDomain {
        &self.domain
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn desirability(&self) -> &Desirability {
        &self.desirability
    }

    pub fn wheels(&self) -> &Wheels {
        &self.wheels
    }

    pub fn urban_density(&self) -> f64 {
        self.urban_density
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn total_households(&self) -> u64 {
        self.cells.iter().map(|c| c.households as u64).sum()
    }

    /// Per-cell household change between the last two censuses.
    pub fn census_change(&self) -> &[i64] {
        &self.census_change
    }

    pub fn active_perturbations(&self) -> usize {
        self.perturbations.active_count()
    }
}

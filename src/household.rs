//! Household agents and their per-step relocation protocol.

use crate::collector::StepTallies;
use crate::core::{CellIndex, HouseholdId, HouseholdType, gaussian};
use crate::desirability::Desirability;
use crate::domain::SpatialDomain;
use crate::parameters::Parameters;
use crate::regions::RegionLedger;
use crate::types::Cell;
use crate::wheel::Wheels;
use log::{trace, warn};
use rand::Rng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    pub id: HouseholdId,
    /// `None` until the first step assigns a type.
    pub kind: Option<HouseholdType>,
    pub cell: CellIndex,
    pub previous_cell: CellIndex,
    /// Cell occupied at the last census.
    pub census_cell: CellIndex,
    pub attached: Option<CellIndex>,
    pub wealth: f64,
    pub satisfaction: f64,
    pub stay_count: u32,
    pub time_away: u32,
    /// Last recorded move distance.
    pub distance: f64,
    pub trapped: bool,
}

/// Everything a household reads or writes during its step.
pub struct StepContext<'a> {
    pub step: usize,
    pub params: &'a Parameters,
    pub domain: &'a SpatialDomain,
    pub desirability: &'a Desirability,
    pub wheels: &'a Wheels,
    pub cells: &'a mut [Cell],
    pub tallies: &'a mut StepTallies,
    pub regions: &'a mut RegionLedger,
    pub rng: &'a mut StdRng,
    pub census_held: bool,
}

/// A child produced by a successful birth draw. Its cell already counts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Birth {
    pub cell: CellIndex,
    pub kind: Option<HouseholdType>,
    pub wealth: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub wanted_to_move: bool,
    pub relocated: bool,
    pub birth: Option<Birth>,
}

impl Household {
    pub fn new(id: HouseholdId, cell: CellIndex, kind: Option<HouseholdType>, wealth: f64) -> Self {
        Self {
            id,
            kind,
            cell,
            previous_cell: cell,
            census_cell: cell,
            attached: None,
            wealth: wealth.max(0.0),
            satisfaction: 0.0,
            stay_count: 0,
            time_away: 0,
            distance: 0.0,
            trapped: false,
        }
    }

    pub fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        self.clamp_wealth();
        let kind = self.update_kind(ctx);
        self.previous_cell = self.cell;
        self.refresh_satisfaction(ctx.desirability, kind);

        let interval = ctx.params.household.wealth_update_interval.max(1);
        if ctx.step % interval == 0 {
            self.drift_wealth(ctx, kind);
        }

        let mut outcome = StepOutcome::default();
        if !ctx.params.policy.prevent_moves {
            let probability = self.move_probability(ctx.params, kind);
            if ctx.rng.random::<f64>() < probability {
                outcome.wanted_to_move = true;
                let destination = self.choose_destination(ctx, kind);
                outcome.relocated = self.relocate(ctx, kind, destination);

                if self.cell != self.previous_cell
                    && self.distance > ctx.params.household.record_distance
                {
                    ctx.tallies.increment_moved(kind);
                }
            }
        }

        self.update_attachment(ctx.params);
        outcome.birth = self.try_birth(ctx, kind);

        if self.wealth.is_infinite() && self.wealth > 0.0 {
            self.wealth = f64::MAX;
        }
        self.clamp_wealth();
        outcome
    }

    fn clamp_wealth(&mut self) {
        if !(self.wealth >= 0.0) {
            self.wealth = 0.0;
        }
    }

    /// Adopt the current cell's classification and record the transition.
    fn update_kind(&mut self, ctx: &mut StepContext<'_>) -> HouseholdType {
        let current = ctx.cells[self.cell.0].kind;
        let previous = self.kind.replace(current);
        let tracking = ctx.params.census.tracking;

        if let Some(previous) = previous {
            ctx.tallies.transitions.record(previous, current);
            let relocated = !tracking && self.previous_cell != self.cell;
            let relocated_since_census = ctx.census_held && self.census_cell != self.cell;
            if (relocated || relocated_since_census)
                && self.distance > ctx.params.household.record_distance
            {
                ctx.tallies.move_transitions.record(previous, current);
            }
        }

        if !tracking || ctx.census_held {
            self.distance = 0.0;
        }
        current
    }

    fn refresh_satisfaction(&mut self, desirability: &Desirability, kind: HouseholdType) {
        let satisfaction = desirability.get(kind, self.cell);
        assert!(
            (0.0..=1.0).contains(&satisfaction),
            "household {} has satisfaction {} outside [0, 1]",
            self.id,
            satisfaction
        );
        self.satisfaction = satisfaction;
    }

    fn drift_wealth(&mut self, ctx: &mut StepContext<'_>, kind: HouseholdType) {
        let hp = &ctx.params.household;
        self.wealth += self.wealth * gaussian(ctx.rng, hp.wealth_adj_mu, hp.wealth_adj_sigma);
        self.clamp_wealth();
        ctx.tallies.add_wealth(kind, self.wealth);
    }

    pub fn move_probability(&self, params: &Parameters, kind: HouseholdType) -> f64 {
        let attachment_coeff = if self.attached == Some(self.cell) {
            1.0 - params.attachment.strength
        } else {
            1.0
        };
        attachment_coeff * params.coefficients(kind).movement_will * (1.0 - self.satisfaction)
    }

    /// Sample candidates from the type's wheel and apply the selection policy.
    fn choose_destination(&self, ctx: &mut StepContext<'_>, kind: HouseholdType) -> CellIndex {
        let wheel = ctx.wheels.get(kind);
        let origin = ctx.domain.cell_id(self.cell);
        let weights = &ctx.params.policy.selection_weights;

        let mut candidates: Vec<(CellIndex, f64)> = (0..weights.len())
            .map(|_| {
                let idx = wheel.choose(ctx.rng);
                (idx, origin.distance_squared(&ctx.domain.cell_id(idx)))
            })
            .collect();
        if !ctx.params.policy.favor_closer_moves {
            candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        }

        let pick = pick_candidate(weights, ctx.rng.random::<f64>());
        candidates[pick].0
    }

    /// Pay for and perform the move, or become trapped. Returns whether the household moved.
    fn relocate(
        &mut self,
        ctx: &mut StepContext<'_>,
        kind: HouseholdType,
        destination: CellIndex,
    ) -> bool {
        let from = ctx.domain.cell_id(self.cell);
        let to = ctx.domain.cell_id(destination);
        let distance = from.distance_squared(&to).sqrt();
        let cost = move_cost(ctx.params.household.move_cost, distance);

        if ctx.params.policy.wealth_limits_moves && !(cost < self.wealth) {
            ctx.tallies.increment_trapped(kind);
            self.trapped = true;
            return false;
        }

        self.trapped = false;
        let from_region = ctx.cells[self.cell.0].mega_cell;
        let to_region = ctx.cells[destination.0].mega_cell;
        ctx.cells[self.cell.0].remove_household();
        ctx.cells[destination.0].add_household();
        self.cell = destination;

        self.wealth -= cost;
        self.clamp_wealth();

        if !ctx.params.census.tracking || distance > self.distance {
            self.distance = distance;
        }
        ctx.tallies.add_distance(kind, distance);
        ctx.regions.record_move(from_region, to_region, from, to);
        trace!(
            "household {} moved {} -> {} ({:.2} cells, cost {:.2})",
            self.id, from, to, distance, cost
        );
        true
    }

    fn update_attachment(&mut self, params: &Parameters) {
        if self.cell == self.previous_cell {
            self.stay_count += 1;
        } else {
            self.stay_count = 0;
        }
        if self.stay_count > params.attachment.attachment_time {
            self.attached = Some(self.cell);
        }

        match self.attached {
            Some(home) if home != self.cell => self.time_away += 1,
            _ => self.time_away = 0,
        }
        if self.time_away > params.attachment.detachment_time {
            self.attached = None;
        }
    }

    fn try_birth(&mut self, ctx: &mut StepContext<'_>, kind: HouseholdType) -> Option<Birth> {
        if !(ctx.rng.random::<f64>() < ctx.params.coefficients(kind).growth_rate) {
            return None;
        }
        let hp = &ctx.params.household;
        let kept = gaussian(ctx.rng, hp.birth_wealth_mu, hp.birth_wealth_sigma).clamp(0.0, 1.0);
        let given = self.wealth * (1.0 - kept);
        self.wealth -= given;
        self.clamp_wealth();

        ctx.cells[self.cell.0].add_household();
        ctx.tallies.births += 1;
        Some(Birth {
            cell: self.cell,
            kind: self.kind,
            wealth: given,
        })
    }
}

pub fn move_cost(coefficient: f64, distance: f64) -> f64 {
    coefficient * (distance + 1.0).ln()
}

/// Map a uniform draw through the cumulative selection weights.
pub fn pick_candidate(weights: &[f64], draw: f64) -> usize {
    let mut sum = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        sum += weight;
        if draw <= sum {
            return i;
        }
    }
    warn!(
        "selection draw {} exceeded cumulative weight {}, taking last candidate",
        draw, sum
    );
    weights.len() - 1
}

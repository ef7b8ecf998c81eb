//! Infrastructure build-out and decay, charged against each cell's asset ledger.

use crate::core::gaussian;
use crate::parameters::{InfrastructureParams, LogisticParams};
use crate::types::Cell;
use rand::Rng;

/// Concave per-unit cost: falls as the cell grows.
pub fn cost_per_unit(households: u32, base_cost: f64, cost_exponent: f64) -> f64 {
    let n = households as f64;
    base_cost * n.powf(cost_exponent) / n.max(1.0)
}

pub fn logistic(x: f64, params: &LogisticParams) -> f64 {
    params.c + (1.0 - params.c) / (1.0 + (-params.a * (x - params.b)).exp())
}

/// Recompute bearing capacity from the temperature factor. Cells without permafrost bear fully.
pub fn update_bearing_capacity(cells: &mut [Cell], params: &InfrastructureParams) {
    for cell in cells.iter_mut() {
        cell.bearing_capacity = if cell.permafrost {
            logistic(cell.factors.temperature, &params.bearing)
        } else {
            1.0
        };
    }
}

/// Move one cell's infrastructure toward its household count. Returns the amount charged.
pub fn update_cell(cell: &mut Cell, params: &InfrastructureParams) -> f64 {
    let households = cell.households as f64;
    let unit_cost = cost_per_unit(cell.households, params.base_cost, params.cost_exponent);
    let mut diff = households - cell.infrastructure;

    let charge = if diff > 0.0 {
        diff *= params.increase_rate;
        if params.permafrost_affects_infrastructure {
            diff *= cell.bearing_capacity;
        }
        let cost = diff * unit_cost;
        let maintenance = cell.infrastructure * unit_cost * params.maintenance_coefficient;
        cost + maintenance
    } else {
        diff *= params.decrease_rate;
        if params.permafrost_affects_infrastructure && cell.bearing_capacity > 0.0 {
            diff /= cell.bearing_capacity;
        }
        households * unit_cost * params.maintenance_coefficient
    };

    cell.net_assets -= charge;
    cell.infrastructure = (cell.infrastructure + diff).max(0.0);
    charge
}

/// Update every cell and return the total expense for the step.
pub fn update_all(cells: &mut [Cell], params: &InfrastructureParams) -> f64 {
    cells.iter_mut().map(|cell| update_cell(cell, params)).sum()
}

/// Initial stock scattered around the household count.
pub fn initial_stock<R: Rng + ?Sized>(rng: &mut R, households: u32, deviation: f64) -> f64 {
    if households == 0 {
        return 0.0;
    }
    let n = households as f64;
    gaussian(rng, n, n * deviation).max(0.0)
}

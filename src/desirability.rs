//! Per-cell urban and rural desirability.

use crate::core::{CellIndex, Factor, HouseholdType, PerType, log_or_zero, zscore_in_place};
use crate::domain::SpatialDomain;
use crate::parameters::{Parameters, TypeCoefficients};
use crate::types::{Cell, FactorValues};

/// Normalized desirability for both household types, one entry per eligible cell.
#[derive(Debug, Clone)]
pub struct Desirability {
    values: PerType<Vec<f64>>,
    major: PerType<Vec<Option<Factor>>>,
    availability: Vec<f64>,
}

impl Desirability {
    pub fn new(cell_count: usize) -> Self {
        Self {
            values: PerType::from_fn(|_| vec![0.0; cell_count]),
            major: PerType::from_fn(|_| vec![None; cell_count]),
            availability: vec![0.0; cell_count],
        }
    }

    /// Rescore every eligible cell from its current state.
    pub fn refresh(&mut self, domain: &SpatialDomain, cells: &[Cell], params: &Parameters) {
        assert_eq!(
            cells.len(),
            domain.len(),
            "cell state is out of step with the spatial domain"
        );
        self.availability = infrastructure_availability(cells);

        for kind in HouseholdType::ALL {
            let coeffs = params.coefficients(kind);
            let social = social_weights(
                domain,
                cells,
                coeffs.social_weight,
                coeffs.adjacent_social_discount,
            );

            let values = &mut self.values[kind];
            let major = &mut self.major[kind];
            for (i, cell) in cells.iter().enumerate() {
                let (raw, factor) =
                    score_cell(coeffs, &cell.factors, self.availability[i], social[i]);
                values[i] = raw;
                major[i] = factor;
            }
            normalize(values);
        }
    }

    pub fn get(&self, kind: HouseholdType, idx: CellIndex) -> f64 {
        self.values[kind][idx.0]
    }

    pub fn values(&self, kind: HouseholdType) -> &[f64] {
        &self.values[kind]
    }

    /// The largest-magnitude term of the cell's raw score, for reporting only.
    pub fn major_factor(&self, kind: HouseholdType, idx: CellIndex) -> Option<Factor> {
        self.major[kind][idx.0]
    }

    pub fn availability(&self) -> &[f64] {
        &self.availability
    }
}

/// Raw weighted score of a cell and its major factor.
///
/// Terms are visited in a fixed order and a later term only replaces the major factor when its
/// magnitude is strictly greater, so the first maximal term wins ties.
pub fn score_cell(
    coeffs: &TypeCoefficients,
    factors: &FactorValues,
    availability: f64,
    social: f64,
) -> (f64, Option<Factor>) {
    let terms = [
        (Factor::Temperature, coeffs.temperature * factors.temperature),
        (Factor::Elevation, coeffs.elevation * factors.elevation),
        (Factor::Port, coeffs.port * factors.port),
        (Factor::River, coeffs.river * factors.river),
        (
            Factor::Infrastructure,
            coeffs.infrastructure_availability * availability,
        ),
        (Factor::Social, social),
    ];

    let mut score = 0.0;
    let mut max = 0.0;
    let mut major = None;
    for (factor, term) in terms {
        if term.abs() > max {
            max = term.abs();
            major = Some(factor);
        }
        score += term;
    }
    (score, major)
}

/// Min-max normalize into [0, 1]. A zero range leaves the values untouched.
pub fn normalize(values: &mut [f64]) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if values.is_empty() || range == 0.0 {
        return;
    }
    for v in values.iter_mut() {
        *v = (*v - min) / range;
    }
}

/// `log(infrastructure) - log(households)`, z-scored, then zeroed where there is no infrastructure.
pub fn infrastructure_availability(cells: &[Cell]) -> Vec<f64> {
    let mut values: Vec<f64> = cells
        .iter()
        .map(|c| log_or_zero(c.infrastructure) - log_or_zero(c.households as f64))
        .collect();
    zscore_in_place(&mut values);
    for (v, cell) in values.iter_mut().zip(cells) {
        if cell.infrastructure == 0.0 {
            *v = 0.0;
        }
    }
    values
}

/// Own plus adjacent social weight for every cell.
pub fn social_weights(
    domain: &SpatialDomain,
    cells: &[Cell],
    coefficient: f64,
    discount: f64,
) -> Vec<f64> {
    let own: Vec<f64> = cells
        .iter()
        .map(|c| coefficient * log_or_zero(c.households as f64))
        .collect();
    let mut total = own.clone();
    if discount != 0.0 {
        for idx in domain.indices() {
            let spill = own[idx.0] * discount;
            for neighbor in domain.neighbors(idx) {
                total[neighbor.0] += spill;
            }
        }
    }
    total
}

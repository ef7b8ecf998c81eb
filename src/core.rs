use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Grid coordinates of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub x: i32,
    pub y: i32,
}

impl CellId {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean grid distance.
    pub fn distance_squared(&self, other: &CellId) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx * dx + dy * dy
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Stable position of an eligible cell, assigned once when the domain is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseholdId(pub u64);

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HouseholdType {
    Urban,
    Rural,
}

impl HouseholdType {
    pub const ALL: [HouseholdType; 2] = [HouseholdType::Urban, HouseholdType::Rural];

    /// Classification of a cell holding `households` under the given density threshold.
    pub fn classify(households: u32, urban_density: f64) -> Self {
        if households as f64 >= urban_density {
            HouseholdType::Urban
        } else {
            HouseholdType::Rural
        }
    }

    pub fn index(self) -> usize {
        match self {
            HouseholdType::Urban => 0,
            HouseholdType::Rural => 1,
        }
    }
}

impl fmt::Display for HouseholdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseholdType::Urban => write!(f, "urban"),
            HouseholdType::Rural => write!(f, "rural"),
        }
    }
}

/// A desirability term. Social covers both own-cell and adjacent social weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Temperature,
    Elevation,
    Port,
    River,
    Infrastructure,
    Social,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Factor::Temperature => "temperature",
            Factor::Elevation => "elevation",
            Factor::Port => "port",
            Factor::River => "river",
            Factor::Infrastructure => "infrastructure",
            Factor::Social => "social",
        };
        write!(f, "{}", name)
    }
}

/// One value per household type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerType<T> {
    pub urban: T,
    pub rural: T,
}

impl<T> PerType<T> {
    pub fn new(urban: T, rural: T) -> Self {
        Self { urban, rural }
    }

    pub fn from_fn(mut f: impl FnMut(HouseholdType) -> T) -> Self {
        Self {
            urban: f(HouseholdType::Urban),
            rural: f(HouseholdType::Rural),
        }
    }
}

impl<T> Index<HouseholdType> for PerType<T> {
    type Output = T;

    fn index(&self, kind: HouseholdType) -> &T {
        match kind {
            HouseholdType::Urban => &self.urban,
            HouseholdType::Rural => &self.rural,
        }
    }
}

impl<T> IndexMut<HouseholdType> for PerType<T> {
    fn index_mut(&mut self, kind: HouseholdType) -> &mut T {
        match kind {
            HouseholdType::Urban => &mut self.urban,
            HouseholdType::Rural => &mut self.rural,
        }
    }
}

/// Standard normal draw via the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> f64 {
    mean + sigma * standard_normal(rng)
}

pub fn lognormal<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64) -> f64 {
    gaussian(rng, mu, sigma).exp()
}

/// Natural log with `log(0) := 0`.
pub fn log_or_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value.ln() }
}

/// Standardize in place using the population standard deviation. A zero deviation yields zeros.
pub fn zscore_in_place(values: &mut [f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let sd = variance.sqrt();
    for v in values.iter_mut() {
        *v = if sd > 0.0 { (*v - mean) / sd } else { 0.0 };
    }
    (mean, sd)
}

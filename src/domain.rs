//! Spatial domain: the fixed list of eligible cells and their adjacency.

use crate::core::{CellId, CellIndex, gaussian};
use crate::error::{Result, SimError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Raw description of one eligible cell, as supplied by a population raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSeed {
    pub x: i32,
    pub y: i32,
    pub population: u32,
    /// Raw temperature in degrees.
    pub temperature: f64,
    #[serde(default)]
    pub elevation: f64,
    #[serde(default)]
    pub port: f64,
    #[serde(default)]
    pub river: f64,
    #[serde(default)]
    pub mega_cell: u32,
    #[serde(default = "default_province")]
    pub province: u32,
    #[serde(default)]
    pub permafrost: bool,
}

fn default_province() -> u32 {
    1
}

impl CellSeed {
    /// A plain cell in province 1 with zeroed geography.
    pub fn new(x: i32, y: i32, population: u32, temperature: f64) -> Self {
        Self {
            x,
            y,
            population,
            temperature,
            elevation: 0.0,
            port: 0.0,
            river: 0.0,
            mega_cell: 0,
            province: default_province(),
            permafrost: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainConfig {
    Synthetic(SyntheticDomain),
    Inline { cells: Vec<CellSeed> },
    File { path: PathBuf },
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self::Synthetic(SyntheticDomain::default())
    }
}

impl DomainConfig {
    pub fn load_seeds(&self, seed: u64) -> Result<Vec<CellSeed>> {
        match self {
            DomainConfig::Synthetic(synthetic) => Ok(synthetic.generate(seed)),
            DomainConfig::Inline { cells } => Ok(cells.clone()),
            DomainConfig::File { path } => {
                let json = std::fs::read_to_string(path)?;
                let cells: Vec<CellSeed> = serde_json::from_str(&json)?;
                Ok(cells)
            }
        }
    }
}

/// Parameters for a generated landscape: warm south, cold north, a river down the middle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticDomain {
    pub width: i32,
    pub height: i32,
    pub mega_cell_size: i32,
    pub provinces: u32,
    pub land_fraction: f64,
    pub mean_population: f64,
    pub warm_temperature: f64,
    pub cold_temperature: f64,
    pub permafrost_below: f64,
}

impl Default for SyntheticDomain {
    fn default() -> Self {
        Self {
            width: 48,
            height: 32,
            mega_cell_size: 8,
            provinces: 4,
            land_fraction: 0.85,
            mean_population: 160.0,
            warm_temperature: 14.0,
            cold_temperature: -12.0,
            permafrost_below: -4.0,
        }
    }
}

impl SyntheticDomain {
    pub fn generate(&self, seed: u64) -> Vec<CellSeed> {
        let mut rng = StdRng::seed_from_u64(seed);
        let width = self.width.max(1);
        let height = self.height.max(1);
        let block = self.mega_cell_size.max(1);
        let blocks_per_row = (width + block - 1) / block;
        let river_column = width / 2;
        let provinces = self.provinces.max(1);

        let mut seeds = Vec::new();
        for y in 0..height {
            let latitude = if height > 1 {
                y as f64 / (height - 1) as f64
            } else {
                0.0
            };
            for x in 0..width {
                if rng.random::<f64>() >= self.land_fraction {
                    continue;
                }
                let temperature = self.warm_temperature
                    - (self.warm_temperature - self.cold_temperature) * latitude
                    + gaussian(&mut rng, 0.0, 1.0);
                let coast = x.min(y).min(width - 1 - x).min(height - 1 - y);
                let elevation = ((x as f64) * 0.3).sin() * ((y as f64) * 0.2).cos() * 200.0
                    + 300.0 * latitude
                    + gaussian(&mut rng, 0.0, 20.0);
                let warmth = 1.0 - latitude;
                let population =
                    (self.mean_population * warmth * 2.0 * gaussian(&mut rng, 1.0, 0.3).max(0.0))
                        .round()
                        .max(0.0) as u32;

                seeds.push(CellSeed {
                    x,
                    y,
                    population,
                    temperature,
                    elevation,
                    port: -(coast as f64),
                    river: -((x - river_column).abs() as f64),
                    mega_cell: ((y / block) * blocks_per_row + x / block) as u32,
                    province: 1 + (x as u32 * provinces) / width as u32,
                    permafrost: temperature < self.permafrost_below,
                });
            }
        }

        if seeds.is_empty() {
            seeds.push(CellSeed {
                x: 0,
                y: 0,
                population: self.mean_population.round() as u32,
                temperature: self.warm_temperature,
                elevation: 0.0,
                port: 0.0,
                river: 0.0,
                mega_cell: 0,
                province: 1,
                permafrost: false,
            });
        }
        seeds
    }
}

/// The fixed, ordered set of eligible cells with precomputed 8-neighbour adjacency.
#[derive(Debug, Clone)]
pub struct SpatialDomain {
    width: i32,
    height: i32,
    cells: Vec<CellId>,
    index: HashMap<CellId, CellIndex>,
    neighbors: Vec<Vec<CellIndex>>,
    provinces: Vec<u32>,
}

impl SpatialDomain {
    pub fn new(seeds: &[CellSeed]) -> Result<Self> {
        if seeds.is_empty() {
            return Err(SimError::Domain("no eligible cells".to_string()));
        }

        let mut cells = Vec::with_capacity(seeds.len());
        let mut index = HashMap::with_capacity(seeds.len());
        let mut width = 0;
        let mut height = 0;
        for seed in seeds {
            if seed.x < 0 || seed.y < 0 {
                return Err(SimError::Domain(format!(
                    "cell ({}, {}) has negative coordinates",
                    seed.x, seed.y
                )));
            }
            if seed.province == 0 {
                return Err(SimError::Domain(format!(
                    "cell ({}, {}) uses reserved province code 0",
                    seed.x, seed.y
                )));
            }
            let id = CellId::new(seed.x, seed.y);
            if index.insert(id, CellIndex(cells.len())).is_some() {
                return Err(SimError::Domain(format!("duplicate cell {}", id)));
            }
            cells.push(id);
            width = width.max(seed.x + 1);
            height = height.max(seed.y + 1);
        }

        let mut domain = Self {
            width,
            height,
            cells,
            index,
            neighbors: Vec::new(),
            provinces: seeds
                .iter()
                .map(|s| s.province)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };
        domain.neighbors = domain
            .cells
            .iter()
            .map(|id| domain.adjacent(*id))
            .collect();
        Ok(domain)
    }

    fn adjacent(&self, id: CellId) -> Vec<CellIndex> {
        let mut result = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (x, y) = (id.x + dx, id.y + dy);
                if x < 0 || y < 0 || x >= self.width || y >= self.height {
                    continue;
                }
                if let Some(&idx) = self.index.get(&CellId::new(x, y)) {
                    result.push(idx);
                }
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_id(&self, idx: CellIndex) -> CellId {
        self.cells[idx.0]
    }

    pub fn index_of(&self, id: CellId) -> Option<CellIndex> {
        self.index.get(&id).copied()
    }

    /// Eligible in-bounds neighbours. Never wraps around the grid edge.
    pub fn neighbors(&self, idx: CellIndex) -> &[CellIndex] {
        &self.neighbors[idx.0]
    }

    pub fn indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (0..self.cells.len()).map(CellIndex)
    }

    /// Distinct province codes in ascending order.
    pub fn provinces(&self) -> &[u32] {
        &self.provinces
    }

    /// Length of a per-province row; slot 0 is reserved for the total.
    pub fn province_slots(&self) -> usize {
        self.provinces.iter().copied().max().unwrap_or(0) as usize + 1
    }
}

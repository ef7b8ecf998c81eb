//! Temperature inputs and the moving-average temperature factor.

use crate::error::{Result, SimError};
use crate::types::FactorValues;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub ideal_temperature: f64,
    /// Seasons in the temperature moving average.
    pub window: usize,
    pub source: TemperatureSourceConfig,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            ideal_temperature: 12.0,
            window: 40,
            source: TemperatureSourceConfig::Static,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TemperatureSourceConfig {
    Static,
    Warming {
        degrees_per_year: f64,
        seasonal_amplitude: f64,
        /// Years of data available; unlimited when absent.
        years: Option<usize>,
    },
    /// JSON array of layers, one raw temperature per eligible cell.
    Series { path: PathBuf },
}

impl TemperatureSourceConfig {
    pub fn build(
        &self,
        base: &[f64],
        seasons_per_year: usize,
    ) -> Result<Box<dyn TemperatureSource>> {
        match self {
            TemperatureSourceConfig::Static => Ok(Box::new(StaticTemperatures {
                base: base.to_vec(),
            })),
            TemperatureSourceConfig::Warming {
                degrees_per_year,
                seasonal_amplitude,
                years,
            } => Ok(Box::new(WarmingTemperatures {
                base: base.to_vec(),
                degrees_per_year: *degrees_per_year,
                seasonal_amplitude: *seasonal_amplitude,
                seasons_per_year: seasons_per_year.max(1),
                seasons: years.map(|y| y * seasons_per_year.max(1)),
            })),
            TemperatureSourceConfig::Series { path } => {
                let json = std::fs::read_to_string(path)?;
                let layers: Vec<Vec<f64>> = serde_json::from_str(&json)?;
                SeriesTemperatures::new(layers, base.len())
                    .map(|s| Box::new(s) as Box<dyn TemperatureSource>)
            }
        }
    }
}

pub trait TemperatureSource: Send {
    /// Raw temperature of every cell for a season, or `None` once the input is exhausted.
    fn layer(&mut self, season: usize) -> Option<Vec<f64>>;
}

pub struct StaticTemperatures {
    base: Vec<f64>,
}

impl TemperatureSource for StaticTemperatures {
    fn layer(&mut self, _season: usize) -> Option<Vec<f64>> {
        Some(self.base.clone())
    }
}

/// Linear trend plus a seasonal cycle on top of the initial raster.
pub struct WarmingTemperatures {
    base: Vec<f64>,
    degrees_per_year: f64,
    seasonal_amplitude: f64,
    seasons_per_year: usize,
    seasons: Option<usize>,
}

impl TemperatureSource for WarmingTemperatures {
    fn layer(&mut self, season: usize) -> Option<Vec<f64>> {
        if self.seasons.is_some_and(|limit| season >= limit) {
            return None;
        }
        let years = season as f64 / self.seasons_per_year as f64;
        let phase = 2.0 * std::f64::consts::PI * (season % self.seasons_per_year) as f64
            / self.seasons_per_year as f64;
        let shift = self.degrees_per_year * years + self.seasonal_amplitude * phase.sin();
        Some(self.base.iter().map(|t| t + shift).collect())
    }
}

pub struct SeriesTemperatures {
    layers: Vec<Vec<f64>>,
}

impl SeriesTemperatures {
    pub fn new(layers: Vec<Vec<f64>>, cell_count: usize) -> Result<Self> {
        if let Some((i, layer)) = layers
            .iter()
            .enumerate()
            .find(|(_, layer)| layer.len() != cell_count)
        {
            return Err(SimError::Config(format!(
                "temperature layer {} has {} values for {} cells",
                i,
                layer.len(),
                cell_count
            )));
        }
        Ok(Self { layers })
    }
}

impl TemperatureSource for SeriesTemperatures {
    fn layer(&mut self, season: usize) -> Option<Vec<f64>> {
        self.layers.get(season).cloned()
    }
}

/// Moving average of raw temperature, turned into a standardized distance from the ideal.
pub struct ClimateModel {
    source: Box<dyn TemperatureSource>,
    ideal: f64,
    window: VecDeque<Vec<f64>>,
    average: Vec<f64>,
    mean: f64,
    sd: f64,
}

impl ClimateModel {
    pub fn new(source: Box<dyn TemperatureSource>, base: &[f64], window: usize, ideal: f64) -> Self {
        let window_len = window.max(1);
        let distances = distance_from_ideal(base, ideal);
        let n = distances.len().max(1) as f64;
        let mean = distances.iter().sum::<f64>() / n;
        let sd = (distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt();

        Self {
            source,
            ideal,
            window: std::iter::repeat_n(base.to_vec(), window_len).collect(),
            average: base.to_vec(),
            mean,
            sd,
        }
    }

    /// Temperature factor implied by the current moving average.
    pub fn factors(&self) -> Vec<f64> {
        distance_from_ideal(&self.average, self.ideal)
            .into_iter()
            .map(|d| if self.sd > 0.0 { (d - self.mean) / self.sd } else { 0.0 })
            .collect()
    }

    pub fn average(&self) -> &[f64] {
        &self.average
    }

    /// Fold in the layer for `season` and rewrite the temperature factor of every cell.
    pub fn advance(&mut self, season: usize, factors: &mut [FactorValues]) -> Result<()> {
        let layer = self
            .source
            .layer(season)
            .ok_or(SimError::ClimateExhausted { step: season })?;
        let len = self.window.len() as f64;
        if let Some(oldest) = self.window.pop_front() {
            for ((avg, new), old) in self.average.iter_mut().zip(&layer).zip(&oldest) {
                *avg += (new - old) / len;
            }
        }
        self.window.push_back(layer);

        for (values, factor) in factors.iter_mut().zip(self.factors()) {
            values.temperature = factor;
        }
        Ok(())
    }
}

fn distance_from_ideal(temperatures: &[f64], ideal: f64) -> Vec<f64> {
    temperatures.iter().map(|t| -(ideal - t).abs()).collect()
}

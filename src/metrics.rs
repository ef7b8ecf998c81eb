use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean, spread and shape of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    pub standard_deviation: f64,
    /// Excess kurtosis; 0 for a sample with no spread.
    pub kurtosis: f64,
}

impl Moments {
    pub fn of(values: &[f64]) -> Self {
        Self {
            mean: MetricsCalculator::mean(values),
            standard_deviation: MetricsCalculator::standard_deviation(values),
            kurtosis: MetricsCalculator::kurtosis(values),
        }
    }
}

impl fmt::Display for Moments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean {:.4}, sd {:.4}, kurtosis {:.3}",
            self.mean, self.standard_deviation, self.kurtosis
        )
    }
}

pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Population standard deviation.
    pub fn standard_deviation(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let mean = Self::mean(values);
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }

    pub fn kurtosis(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let n = values.len() as f64;
        let mean = Self::mean(values);
        let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        if m2 == 0.0 {
            return 0.0;
        }
        let m4 = values.iter().map(|v| (v - mean).powi(4)).sum::<f64>() / n;
        m4 / (m2 * m2) - 3.0
    }

    pub fn gini_coefficient(values: &[f64]) -> f64 {
        if values.is_empty() || values.iter().all(|&v| v == 0.0) {
            return 0.0;
        }

        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        // Scale by the largest value so saturated inputs cannot overflow the sums.
        let scale = sorted.last().map_or(0.0, |v| v.abs());
        if scale == 0.0 {
            return 0.0;
        }
        for value in sorted.iter_mut() {
            *value /= scale;
        }

        let n = sorted.len() as f64;
        let total: f64 = sorted.iter().sum();

        if total == 0.0 {
            return 0.0;
        }

        let sum: f64 = sorted
            .iter()
            .enumerate()
            .map(|(i, &value)| (i as f64 + 1.0) * value)
            .sum();

        2.0 * sum / (n * total) - (n + 1.0) / n
    }
}

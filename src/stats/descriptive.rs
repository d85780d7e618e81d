// Descriptive statistics for one variant's ratings on one metric

use super::StatsError;
use serde::Serialize;

/// Mean, spread and size of one group of observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    /// Arithmetic mean
    pub mean: f64,

    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,

    /// Number of observations
    pub n: usize,

    /// Standard error of the mean (std_dev / sqrt(n))
    pub std_error: f64,
}

impl MetricSummary {
    /// Sample variance (n - 1 denominator)
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }
}

/// Summarize a group of observations
///
/// Requires at least two observations so the sample standard deviation is
/// defined. A single observation yields `StatsError::InsufficientSamples`
/// rather than a NaN spread.
pub fn summarize(values: &[f64]) -> Result<MetricSummary, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyGroup);
    }
    if values.len() < 2 {
        return Err(StatsError::InsufficientSamples {
            required: 2,
            actual: values.len(),
        });
    }

    let m = mean(values);
    let var = sample_variance(values, m);
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;

    Ok(MetricSummary {
        mean: m,
        std_dev: var.sqrt(),
        n: values.len(),
        std_error: (var / n).sqrt(),
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    values.iter().sum::<f64>() / n
}

pub(crate) fn sample_variance(values: &[f64], mean: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let dof = (values.len() - 1) as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / dof
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_basic() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.n, 8);
        assert!((summary.mean - 5.0).abs() < 1e-12);
        // Sample variance = 32 / 7
        assert!((summary.variance() - 32.0 / 7.0).abs() < 1e-12);
        assert!((summary.std_error - (32.0 / 7.0 / 8.0_f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_constant_has_zero_spread() {
        let summary = summarize(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), Err(StatsError::EmptyGroup));
    }

    #[test]
    fn test_summarize_single_point() {
        assert_eq!(
            summarize(&[4.0]),
            Err(StatsError::InsufficientSamples {
                required: 2,
                actual: 1
            })
        );
    }
}

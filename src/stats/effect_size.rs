// Cohen's d standardized effect size

use super::descriptive::{summarize, MetricSummary};
use super::StatsError;
use serde::Serialize;
use std::fmt;

/// Conventional magnitude bands for |d| (Cohen, 1988)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    /// Reference thresholds drawn on the effect-size chart
    pub const THRESHOLDS: [(f64, EffectMagnitude); 3] = [
        (0.2, EffectMagnitude::Small),
        (0.5, EffectMagnitude::Medium),
        (0.8, EffectMagnitude::Large),
    ];

    /// Classify an effect size; the sign is ignored
    pub fn classify(d: f64) -> Self {
        let d = d.abs();
        if d >= 0.8 {
            Self::Large
        } else if d >= 0.5 {
            Self::Medium
        } else if d >= 0.2 {
            Self::Small
        } else {
            Self::Negligible
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Negligible => "Negligible",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cohen's d for two raw samples: (mean(A) - mean(B)) / pooled sd
pub fn cohens_d(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    let sa = summarize(a)?;
    let sb = summarize(b)?;
    cohens_d_from_summaries(&sa, &sb)
}

/// Cohen's d from precomputed group summaries
///
/// The pooled standard deviation weights each group's variance by its
/// degrees of freedom. With equal group sizes it reduces to
/// `sqrt((var_a + var_b) / 2)`.
pub fn cohens_d_from_summaries(a: &MetricSummary, b: &MetricSummary) -> Result<f64, StatsError> {
    let pooled = pooled_std_dev(a, b)?;
    Ok((a.mean - b.mean) / pooled)
}

/// Pooled standard deviation of two groups
pub fn pooled_std_dev(a: &MetricSummary, b: &MetricSummary) -> Result<f64, StatsError> {
    if a.n < 2 || b.n < 2 {
        return Err(StatsError::InsufficientSamples {
            required: 2,
            actual: a.n.min(b.n),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let (na, nb) = (a.n as f64, b.n as f64);
    let pooled_var = ((na - 1.0) * a.variance() + (nb - 1.0) * b.variance()) / (na + nb - 2.0);

    if pooled_var == 0.0 {
        return Err(StatsError::ZeroVariance { group: "pooled" });
    }
    Ok(pooled_var.sqrt())
}

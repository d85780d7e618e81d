// Welch's independent two-sample t-test
//
// Does not assume equal variances between the two groups. Degrees of freedom
// come from the Welch–Satterthwaite approximation, which is also used for the
// confidence interval of the mean difference so both agree.

use super::descriptive::{summarize, MetricSummary};
use super::distributions::{student_t_critical, student_t_two_sided};
use super::StatsError;
use serde::Serialize;

/// Result of Welch's t-test for group A versus group B
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WelchTest {
    /// t statistic, positive when mean(A) > mean(B)
    pub statistic: f64,

    /// Welch–Satterthwaite degrees of freedom
    pub df: f64,

    /// Two-sided p-value
    pub p_value: f64,
}

/// Confidence interval for mean(A) - mean(B)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence level, e.g. 0.95
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether the interval contains `value`
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Run Welch's t-test on two raw samples
///
/// # Example
/// ```
/// use abreport::stats::welch_t_test;
///
/// let checklist = [5.0, 4.0, 5.0, 4.0, 5.0];
/// let calendar = [3.0, 3.0, 2.0, 4.0, 3.0];
///
/// let test = welch_t_test(&checklist, &calendar).unwrap();
/// assert!(test.statistic > 0.0);
/// assert!(test.p_value < 0.05);
/// ```
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<WelchTest, StatsError> {
    let sa = summarize(a)?;
    let sb = summarize(b)?;
    welch_from_summaries(&sa, &sb)
}

/// Run Welch's t-test from precomputed group summaries
pub fn welch_from_summaries(
    a: &MetricSummary,
    b: &MetricSummary,
) -> Result<WelchTest, StatsError> {
    let (se, df) = welch_se_df(a, b)?;
    let statistic = (a.mean - b.mean) / se;

    Ok(WelchTest {
        statistic,
        df,
        p_value: student_t_two_sided(statistic, df),
    })
}

/// Confidence interval for the difference of means using Welch's df
pub fn mean_difference_ci(
    a: &MetricSummary,
    b: &MetricSummary,
    confidence: f64,
) -> Result<ConfidenceInterval, StatsError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(StatsError::InvalidConfidence(confidence));
    }

    let (se, df) = welch_se_df(a, b)?;
    let critical = student_t_critical(1.0 - confidence, df);
    let diff = a.mean - b.mean;

    Ok(ConfidenceInterval {
        lower: diff - critical * se,
        upper: diff + critical * se,
        level: confidence,
    })
}

/// Standard error of the difference and Welch–Satterthwaite df
fn welch_se_df(a: &MetricSummary, b: &MetricSummary) -> Result<(f64, f64), StatsError> {
    for (group, summary) in [("A", a), ("B", b)] {
        if summary.n < 2 {
            return Err(StatsError::InsufficientSamples {
                required: 2,
                actual: summary.n,
            });
        }
        if summary.std_dev == 0.0 {
            return Err(StatsError::ZeroVariance { group });
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let (na, nb) = (a.n as f64, b.n as f64);
    let va = a.variance() / na;
    let vb = b.variance() / nb;

    let se = (va + vb).sqrt();
    let df = (va + vb).powi(2) / (va.powi(2) / (na - 1.0) + vb.powi(2) / (nb - 1.0));

    Ok((se, df))
}

// Statistical core for two-variant survey comparisons
//
// Provides the building blocks used by the analysis pipeline:
// - Descriptive summaries (mean, sample sd, standard error)
// - Welch's t-test and the matching confidence interval for the mean difference
// - Cohen's d effect size with conventional magnitude bands
// - Pearson chi-square test of independence on a 2x2 table
//
// All routines are pure functions over f64 slices. Degenerate input (empty,
// single-point, or zero-variance groups) is reported as a `StatsError`
// instead of leaking NaN into results.

mod chi_square;
mod descriptive;
pub mod distributions;
mod effect_size;
mod ttest;

pub use chi_square::{chi_square_2x2, ChiSquareTest, ContingencyTable};
pub use descriptive::{summarize, MetricSummary};
pub use effect_size::{cohens_d, cohens_d_from_summaries, pooled_std_dev, EffectMagnitude};
pub use ttest::{
    mean_difference_ci, welch_from_summaries, welch_t_test, ConfidenceInterval, WelchTest,
};

use thiserror::Error;

/// Reasons a statistic cannot be computed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("group is empty")]
    EmptyGroup,

    #[error("insufficient data: need at least {required} observations per group, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("group {group} has zero variance; the test is undefined")]
    ZeroVariance { group: &'static str },

    #[error("contingency table has an empty row or column; expected counts would be zero")]
    DegenerateContingency,

    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidence(f64),
}

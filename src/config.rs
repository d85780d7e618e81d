// Configuration for the A/B analysis
//
// Values can come from a TOML file (`--config abreport.toml`) and be
// overridden from the command line. Every field has a default so an empty
// file is a valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Analysis configuration
///
/// # Example
/// ```
/// use abreport::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.expected_group_size, 40);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Statistical significance level (alpha) for every hypothesis test
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter, fewer false positives
    pub significance_level: f64,

    /// Confidence level for mean-difference intervals
    ///
    /// Default: 0.95
    pub confidence_level: f64,

    /// Participants per variant called for by the experimental design
    ///
    /// Power assumptions only hold for balanced groups of this size.
    /// A mismatch is reported, not rejected.
    ///
    /// Default: 40
    pub expected_group_size: usize,

    /// Apply Yates' continuity correction to the 2x2 chi-square test
    ///
    /// Default: false (plain Pearson statistic)
    pub yates_correction: bool,

    /// Recommendation rate drawn as the "good" benchmark line (0.0 - 1.0)
    ///
    /// Default: 0.75
    pub recommend_benchmark: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            confidence_level: 0.95,
            expected_group_size: 40,
            yates_correction: false,
            recommend_benchmark: 0.75,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            ));
        }

        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            ));
        }

        if self.expected_group_size < 2 {
            return Err(format!(
                "expected_group_size must be >= 2, got {}",
                self.expected_group_size
            ));
        }

        if !(0.0..=1.0).contains(&self.recommend_benchmark) {
            return Err(format!(
                "recommend_benchmark must be in [0, 1], got {}",
                self.recommend_benchmark
            ));
        }

        Ok(())
    }
}

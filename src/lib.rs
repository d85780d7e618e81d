//! abreport - Statistical analysis and reporting for UI A/B tests
//!
//! This library loads survey responses from a checklist vs calendar A/B test,
//! compares the variants with Welch's t-test, Cohen's d and a chi-square test
//! of recommendation rates, and renders SVG charts plus Markdown, CSV and JSON
//! reports.

pub mod analysis;
pub mod charts;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod json_output;
pub mod report;
pub mod stats;
pub mod survey;

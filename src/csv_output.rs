//! CSV output format for analysis results
//!
//! One row per rated metric plus one row for the recommendation test, for
//! spreadsheet analysis alongside the Markdown report.

use crate::analysis::{AnalysisReport, MetricComparison, RecommendationComparison};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_FILE: &str = "summary.csv";

const HEADER: [&str; 16] = [
    "metric",
    "test",
    "checklist_mean",
    "checklist_sd",
    "checklist_n",
    "calendar_mean",
    "calendar_sd",
    "calendar_n",
    "difference",
    "statistic",
    "df",
    "p_value",
    "cohens_d",
    "effect",
    "ci_lower",
    "ci_upper",
];

/// CSV summary formatter
#[derive(Debug)]
pub struct CsvSummaryOutput<'a> {
    report: &'a AnalysisReport,
}

impl<'a> CsvSummaryOutput<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_metric(m: &MetricComparison) -> String {
        [
            Self::escape_field(m.metric.label()),
            "welch_t".to_string(),
            m.checklist.mean.to_string(),
            m.checklist.std_dev.to_string(),
            m.checklist.n.to_string(),
            m.calendar.mean.to_string(),
            m.calendar.std_dev.to_string(),
            m.calendar.n.to_string(),
            m.difference.to_string(),
            m.welch.statistic.to_string(),
            m.welch.df.to_string(),
            m.welch.p_value.to_string(),
            m.cohens_d.to_string(),
            m.magnitude.label().to_ascii_lowercase(),
            m.confidence_interval.lower.to_string(),
            m.confidence_interval.upper.to_string(),
        ]
        .join(",")
    }

    /// Rates stand in for means; fields with no counterpart stay empty
    fn format_recommendation(rec: &RecommendationComparison) -> String {
        let test = if rec.chi_square.yates_corrected {
            "chi_square_yates"
        } else {
            "chi_square"
        };
        [
            "Recommend".to_string(),
            test.to_string(),
            rec.checklist_rate.to_string(),
            String::new(),
            rec.table.row_total(0).to_string(),
            rec.calendar_rate.to_string(),
            String::new(),
            rec.table.row_total(1).to_string(),
            (rec.checklist_rate - rec.calendar_rate).to_string(),
            rec.chi_square.statistic.to_string(),
            rec.chi_square.df.to_string(),
            rec.chi_square.p_value.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = HEADER.join(",");
        output.push('\n');

        for m in &self.report.metrics {
            output.push_str(&Self::format_metric(m));
            output.push('\n');
        }
        output.push_str(&Self::format_recommendation(&self.report.recommendation));
        output.push('\n');

        output
    }

    /// Write `summary.csv` into `out_dir`
    pub fn write_to(&self, out_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
        let path = out_dir.join(CSV_FILE);
        fs::write(&path, self.to_csv())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "summary CSV written");
        Ok(path)
    }
}

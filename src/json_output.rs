//! JSON output format for analysis results
//!
//! Used for `--format json` on stdout and for `analysis.json` next to the
//! charts. The analysis structures serialize directly; this module adds
//! the envelope (format version, input, configuration, verdict).

use crate::analysis::AnalysisReport;
use crate::config::AnalysisConfig;
use crate::report::business_recommendation;
use crate::survey::Variant;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const JSON_FILE: &str = "analysis.json";

/// Top-level JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Tool version that produced the document
    pub version: String,
    /// Format name
    pub format: String,
    /// Input dataset path, if read from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub config: AnalysisConfig,
    /// Variant preferred on the overall score (None when not significant)
    pub winner: Option<Variant>,
    pub recommendation: Vec<String>,
    pub analysis: AnalysisReport,
}

impl JsonOutput {
    /// Wrap an analysis result
    pub fn new(report: &AnalysisReport, config: &AnalysisConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "abreport-json-v1".to_string(),
            input: None,
            config: config.clone(),
            winner: report.winner(),
            recommendation: business_recommendation(report),
            analysis: report.clone(),
        }
    }

    /// Record the input path
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `analysis.json` into `out_dir`
    pub fn write_to(&self, out_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
        let path = out_dir.join(JSON_FILE);
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "analysis JSON written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::survey::SurveyDataset;

    fn report() -> AnalysisReport {
        let csv = "ParticipantID,Variant,EaseOfUse,LikelyToUse,Clarity,Recommend
1,Checklist,5,4,5,Y
2,Checklist,4,5,4,Y
3,Checklist,5,5,4,N
4,Calendar,3,2,3,N
5,Calendar,2,3,3,Y
6,Calendar,2,3,2,N
";
        analyze(
            &SurveyDataset::from_csv_str(csv).unwrap(),
            &AnalysisConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_json_envelope() {
        let output = JsonOutput::new(&report(), &AnalysisConfig::default());
        assert_eq!(output.format, "abreport-json-v1");
        assert_eq!(output.version, env!("CARGO_PKG_VERSION"));
        assert!(output.input.is_none());
    }

    #[test]
    fn test_json_serialization() {
        let json = JsonOutput::new(&report(), &AnalysisConfig::default())
            .with_input("survey.csv")
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["input"], "survey.csv");
        assert_eq!(value["analysis"]["participants"], 6);
        assert_eq!(value["analysis"]["metrics"].as_array().unwrap().len(), 4);
        assert_eq!(value["analysis"]["metrics"][0]["metric"], "EaseOfUse");
        assert_eq!(value["analysis"]["metrics"][3]["magnitude"], "large");
        assert_eq!(value["config"]["significance_level"], 0.05);
    }

    #[test]
    fn test_json_names_calendar_winner() {
        let csv = "ParticipantID,Variant,EaseOfUse,LikelyToUse,Clarity,Recommend
1,Checklist,3,2,3,N
2,Checklist,2,3,3,Y
3,Checklist,3,3,2,N
4,Checklist,3,2,2,N
5,Calendar,5,4,5,Y
6,Calendar,4,5,4,Y
7,Calendar,5,5,4,N
8,Calendar,4,4,5,Y
";
        let report = analyze(
            &SurveyDataset::from_csv_str(csv).unwrap(),
            &AnalysisConfig::default(),
        )
        .unwrap();
        let json = JsonOutput::new(&report, &AnalysisConfig::default())
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["winner"], "Calendar");
        assert_eq!(value["recommendation"][0], "IMPLEMENT: Calendar View for the MVP");
        assert!(value["analysis"]["metrics"][3]["difference"].as_f64().unwrap() < 0.0);
    }

    #[test]
    fn test_json_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = JsonOutput::new(&report(), &AnalysisConfig::default())
            .write_to(dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join(JSON_FILE));
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["format"], "abreport-json-v1");
    }

    #[test]
    fn test_input_omitted_when_unset() {
        let json = JsonOutput::new(&report(), &AnalysisConfig::default())
            .to_json()
            .unwrap();
        assert!(!json.contains("\"input\""));
    }
}

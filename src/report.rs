//! Markdown report for the A/B test
//!
//! Summarizes methodology, per-metric results, the recommendation-rate
//! comparison and the resulting business recommendation.

use crate::analysis::{format_p_value, significance_stars, AnalysisReport, MetricComparison};
use crate::charts::ChartKind;
use crate::stats::EffectMagnitude;
use crate::survey::{Metric, Variant};
use anyhow::{Context, Result};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "report.md";

/// Lines of the business recommendation, shared by the report and the dashboard
pub fn business_recommendation(report: &AnalysisReport) -> Vec<String> {
    let overall = report.overall();
    let rec = &report.recommendation;

    let Some(winner) = report.winner() else {
        return vec![
            format!(
                "NO CLEAR WINNER: overall difference of {:+.2} points is not significant ({})",
                overall.difference,
                format_p_value(overall.welch.p_value)
            ),
            "NEXT STEP: iterate on both designs or collect a larger sample".to_string(),
        ];
    };

    let advantage = overall.difference.abs();
    let uplift = (rec.rate(winner) - rec.rate(winner.other())) * 100.0;

    vec![
        format!("IMPLEMENT: {} for the MVP", winner.view_label()),
        format!(
            "IMPACT: +{advantage:.2} point UX advantage with {uplift:+.1} points recommendation rate"
        ),
        confidence_line(report, winner),
    ]
}

/// Evidence behind the recommendation, limited to metrics that favour `winner`
fn confidence_line(report: &AnalysisReport, winner: Variant) -> String {
    let agreeing: Vec<&MetricComparison> = report
        .metrics
        .iter()
        .filter(|m| m.winner(report.significance_level) == Some(winner))
        .collect();
    let weakest = agreeing
        .iter()
        .map(|m| m.magnitude)
        .min()
        .unwrap_or(EffectMagnitude::Negligible);
    let max_p = agreeing
        .iter()
        .map(|m| m.welch.p_value)
        .fold(0.0_f64, f64::max);
    let p_text = if max_p < 0.001 {
        "all p < 0.001".to_string()
    } else {
        format!("max p = {max_p:.3}")
    };

    if agreeing.len() == report.metrics.len() {
        format!("CONFIDENCE: {weakest} or larger effect sizes across all metrics ({p_text})")
    } else {
        let labels: Vec<&str> = agreeing.iter().map(|m| m.metric.label()).collect();
        format!(
            "CONFIDENCE: significant {} advantage on {} of {} metrics: {} ({weakest} or larger, {p_text})",
            winner.name(),
            agreeing.len(),
            report.metrics.len(),
            labels.join(", ")
        )
    }
}

/// Render the full Markdown report
///
/// `charts` lists the chart files to link; pass an empty slice when charts
/// were not rendered.
pub fn render_markdown(report: &AnalysisReport, charts: &[ChartKind]) -> String {
    let mut md = String::new();
    let overall = report.overall();
    let rec = &report.recommendation;
    let ci_pct = report.confidence_level * 100.0;

    let _ = writeln!(md, "# A/B Test Report: Checklist vs Calendar View\n");

    // Executive summary
    let _ = writeln!(md, "## Executive Summary\n");
    match report.winner() {
        Some(winner) => {
            let _ = writeln!(
                md,
                "The **{}** significantly outperforms the {} on overall user experience \
                 ({:.2} vs {:.2}, advantage {:.2}, {}, Cohen's d = {:.2}).\n",
                winner.view_label(),
                winner.other().view_label(),
                overall.summary(winner).mean,
                overall.summary(winner.other()).mean,
                overall.difference.abs(),
                format_p_value(overall.welch.p_value),
                overall.cohens_d.abs()
            );
        }
        None => {
            let _ = writeln!(
                md,
                "Neither design is significantly better on overall user experience \
                 ({:.2} vs {:.2}, {}).\n",
                overall.checklist.mean,
                overall.calendar.mean,
                format_p_value(overall.welch.p_value)
            );
        }
    }
    for line in business_recommendation(report) {
        let _ = writeln!(md, "- {line}");
    }
    md.push('\n');

    // Methodology
    let _ = writeln!(md, "## Methodology\n");
    let _ = writeln!(
        md,
        "- **Design:** between-subjects A/B test, {} participants ({} checklist, {} calendar){}",
        report.participants,
        report.checklist_n,
        report.calendar_n,
        if report.balanced {
            ""
        } else {
            ". **Groups are not balanced as designed; power assumptions may not hold.**"
        }
    );
    let _ = writeln!(
        md,
        "- **Measures:** Ease of Use, Likely to Use and Clarity on a 1-5 Likert scale; \
         the Overall Score is the composite of the three unless rated directly; \
         a yes/no \"would recommend\" question"
    );
    let _ = writeln!(
        md,
        "- **Tests:** Welch's two-sample t-test per metric, Cohen's d with pooled standard deviation, \
         {ci_pct:.0}% confidence intervals for mean differences, and a chi-square test of independence \
         for recommendation{}",
        if rec.chi_square.yates_corrected {
            " (Yates-corrected)"
        } else {
            ""
        }
    );
    let _ = writeln!(
        md,
        "- **Significance level:** alpha = {}\n",
        report.significance_level
    );

    // Results
    let _ = writeln!(md, "## Results\n");
    let _ = writeln!(md, "### Rating Metrics\n");
    let _ = writeln!(
        md,
        "| Metric | Checklist M (SD) | Calendar M (SD) | Difference | {ci_pct:.0}% CI | t (df) | p | Cohen's d | Effect |"
    );
    let _ = writeln!(md, "|---|---|---|---|---|---|---|---|---|");
    for m in &report.metrics {
        let name = if m.metric == Metric::Overall {
            format!("**{}**", m.metric.label())
        } else {
            m.metric.label().to_string()
        };
        let _ = writeln!(
            md,
            "| {} | {:.2} ({:.2}) | {:.2} ({:.2}) | {:+.2} | [{:.2}, {:.2}] | {:.2} ({:.1}) | {} | {:.2} | {} |",
            name,
            m.checklist.mean,
            m.checklist.std_dev,
            m.calendar.mean,
            m.calendar.std_dev,
            m.difference,
            m.confidence_interval.lower,
            m.confidence_interval.upper,
            m.welch.statistic,
            m.welch.df,
            format_table_p(m.welch.p_value),
            m.cohens_d,
            m.magnitude
        );
    }
    md.push('\n');
    let _ = writeln!(md, "Significance: *** p < 0.001, ** p < 0.01, * p < 0.05\n");

    let _ = writeln!(md, "### Recommendation Rate\n");
    let _ = writeln!(md, "| Variant | Would recommend | Would not | Rate |");
    let _ = writeln!(md, "|---|---|---|---|");
    for (row, variant) in Variant::ALL.iter().enumerate() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {:.1}% |",
            variant.view_label(),
            rec.table.counts[row][0],
            rec.table.counts[row][1],
            rec.rate(*variant) * 100.0
        );
    }
    md.push('\n');
    let _ = writeln!(
        md,
        "Difference: {:+.1} percentage points; chi-square({}) = {:.2}, {}.\n",
        rec.difference_points,
        rec.chi_square.df,
        rec.chi_square.statistic,
        format_p_value(rec.chi_square.p_value)
    );

    if !charts.is_empty() {
        let _ = writeln!(md, "## Charts\n");
        for chart in charts {
            let _ = writeln!(md, "![{}]({})\n", chart.title(), chart.file_name());
        }
    }

    // Conclusions
    let _ = writeln!(md, "## Conclusions\n");
    let significant: Vec<&str> = report
        .significant_metrics()
        .map(|m| m.metric.label())
        .collect();
    if significant.is_empty() {
        let _ = writeln!(md, "No metric differed significantly between the designs.");
    } else {
        let _ = writeln!(
            md,
            "{} of {} metrics differ significantly: {}.",
            significant.len(),
            report.metrics.len(),
            significant.join(", ")
        );
    }
    if rec.chi_square.p_value < report.significance_level {
        let _ = writeln!(
            md,
            "Recommendation rates differ significantly ({:.1}% vs {:.1}%).",
            rec.checklist_rate * 100.0,
            rec.calendar_rate * 100.0
        );
    } else {
        let _ = writeln!(
            md,
            "The recommendation-rate difference is not statistically significant ({}).",
            format_p_value(rec.chi_square.p_value)
        );
    }

    md
}

/// Write `report.md` into `out_dir`
pub fn write_report(report: &AnalysisReport, charts: &[ChartKind], out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let path = out_dir.join(REPORT_FILE);
    fs::write(&path, render_markdown(report, charts))
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

fn format_table_p(p_value: f64) -> String {
    let stars = significance_stars(p_value);
    if p_value < 0.001 {
        format!("< 0.001{stars}")
    } else {
        format!("{p_value:.3}{stars}")
    }
}

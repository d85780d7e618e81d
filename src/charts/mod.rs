//! Static SVG charts for the A/B test results
//!
//! Renders the fixed chart set (main finding, detailed metrics,
//! recommendation rates, effect sizes) and the executive dashboard with
//! `plotters` on its SVG backend. Charts are purely presentational: every
//! number comes from an `AnalysisReport`.

mod panels;

use crate::analysis::{format_p_value, significance_stars, AnalysisReport};
use crate::config::AnalysisConfig;
use crate::report::business_recommendation;
use crate::stats::EffectMagnitude;
use crate::survey::{Metric, Variant};
use anyhow::{Context, Result};
use panels::{
    bar_rows, bold, callout, column_chart, font, text_block, Bar, Category, Marker, ValueAxis,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Drawing surface every chart renders onto
pub type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;

pub const CHECKLIST_COLOR: RGBColor = RGBColor(0x2E, 0x7D, 0x32);
pub const CALENDAR_COLOR: RGBColor = RGBColor(0xD8, 0x43, 0x15);
pub const ACCENT_COLOR: RGBColor = RGBColor(0x15, 0x65, 0xC0);
pub const NEUTRAL_COLOR: RGBColor = RGBColor(0x66, 0x66, 0x66);
pub const GRID_COLOR: RGBColor = RGBColor(0xE6, 0xE6, 0xE6);

/// Highest value on the Likert rating axis
const RATING_MAX: f64 = 5.0;

fn variant_color(variant: Variant) -> RGBColor {
    match variant {
        Variant::Checklist => CHECKLIST_COLOR,
        Variant::Calendar => CALENDAR_COLOR,
    }
}

/// Highlight for the winning arm, neutral without one
fn winner_color(winner: Option<Variant>) -> RGBColor {
    winner.map_or(NEUTRAL_COLOR, variant_color)
}

/// The charts produced for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    MainFinding,
    DetailedMetrics,
    Recommendation,
    EffectSizes,
    ExecutiveDashboard,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::MainFinding,
        ChartKind::DetailedMetrics,
        ChartKind::Recommendation,
        ChartKind::EffectSizes,
        ChartKind::ExecutiveDashboard,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::MainFinding => "main_finding.svg",
            Self::DetailedMetrics => "detailed_metrics.svg",
            Self::Recommendation => "recommendation.svg",
            Self::EffectSizes => "effect_sizes.svg",
            Self::ExecutiveDashboard => "executive_dashboard.svg",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::MainFinding => "Main Finding",
            Self::DetailedMetrics => "Detailed Metrics",
            Self::Recommendation => "Recommendation Rates",
            Self::EffectSizes => "Effect Sizes",
            Self::ExecutiveDashboard => "Executive Dashboard",
        }
    }

    /// Canvas size in pixels
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::DetailedMetrics => (1100, 600),
            Self::ExecutiveDashboard => (1600, 1000),
            _ => (1000, 600),
        }
    }

    /// Render this chart to an SVG document
    pub fn render(&self, report: &AnalysisReport, config: &AnalysisConfig) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size()).into_drawing_area();
            root.fill(&WHITE)?;
            let drawn = match self {
                Self::MainFinding => main_finding(&root, report),
                Self::DetailedMetrics => detailed_metrics(&root, report),
                Self::Recommendation => recommendation(&root, report, config.recommend_benchmark),
                Self::EffectSizes => effect_sizes(&root, report),
                Self::ExecutiveDashboard => executive_dashboard(&root, report),
            };
            drawn.with_context(|| format!("Failed to draw {}", self.title()))?;
            root.present()?;
        }
        Ok(svg)
    }
}

/// Render every chart into `out_dir`, returning the written paths
pub fn render_all(
    report: &AnalysisReport,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    ChartKind::ALL
        .iter()
        .map(|kind| -> Result<PathBuf> {
            let path = out_dir.join(kind.file_name());
            fs::write(&path, kind.render(report, config)?)
                .with_context(|| format!("Failed to write chart {}", path.display()))?;
            tracing::info!(chart = kind.title(), path = %path.display(), "chart written");
            Ok(path)
        })
        .collect()
}

/// Headline and subtitle; returns the area below them
fn titled<'a>(root: &Canvas<'a>, headline: &str, subtitle: &str) -> Result<Canvas<'a>> {
    let body = root
        .titled(headline, bold(22))?
        .titled(subtitle, bold(16).color(&NEUTRAL_COLOR))?;
    Ok(body)
}

/// One swatch per variant, left to right
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn legend(area: &Canvas<'_>, size: u32) -> Result<()> {
    let side = size as i32;
    let mut x = 70;
    for variant in Variant::ALL {
        area.draw(&Rectangle::new(
            [(x, 6), (x + side, 6 + side)],
            variant_color(variant).mix(0.9).filled(),
        ))?;
        area.draw_text(variant.view_label(), &font(size), (x + side + 6, 6))?;
        x += side * 2 + variant.view_label().len() as i32 * side * 3 / 5;
    }
    Ok(())
}

fn headline(report: &AnalysisReport) -> &'static str {
    match report.winner() {
        Some(Variant::Checklist) => "Checklist View Significantly Outperforms Calendar View",
        Some(Variant::Calendar) => "Calendar View Significantly Outperforms Checklist View",
        None => "No Significant Difference Between Designs",
    }
}

/// Size of the overall gap, credited to the winner when there is one
fn advantage_line(report: &AnalysisReport) -> String {
    let gap = report.overall().difference.abs();
    match report.winner() {
        Some(variant) => format!("{}: {gap:.2} point advantage", variant.view_label()),
        None => format!("{gap:.2} point difference (not significant)"),
    }
}

fn overall_bars(report: &AnalysisReport, with_error: bool) -> Vec<Category> {
    let overall = report.overall();
    Variant::ALL
        .iter()
        .map(|&variant| {
            let summary = overall.summary(variant);
            Category {
                label: variant.view_label().to_string(),
                bars: vec![Bar {
                    value: summary.mean,
                    error: with_error.then_some(summary.std_dev),
                    color: variant_color(variant),
                    value_label: format!("{:.2}", summary.mean),
                }],
                note: None,
            }
        })
        .collect()
}

fn detailed_groups(report: &AnalysisReport, with_error: bool, short: bool) -> Vec<Category> {
    Metric::DETAILED
        .iter()
        .map(|&metric| {
            let cmp = report.metric(metric);
            let stars = significance_stars(cmp.welch.p_value);
            Category {
                label: if short {
                    metric.short_label().to_string()
                } else {
                    metric.label().to_string()
                },
                bars: Variant::ALL
                    .iter()
                    .map(|&variant| {
                        let summary = cmp.summary(variant);
                        Bar {
                            value: summary.mean,
                            error: with_error.then_some(summary.std_dev),
                            color: variant_color(variant),
                            value_label: format!("{:.2}", summary.mean),
                        }
                    })
                    .collect(),
                note: (with_error && !stars.is_empty()).then(|| stars.to_string()),
            }
        })
        .collect()
}

fn recommendation_bars(report: &AnalysisReport) -> Vec<(Variant, Bar)> {
    Variant::ALL
        .iter()
        .map(|&variant| {
            let pct = report.recommendation.rate(variant) * 100.0;
            (
                variant,
                Bar {
                    value: pct,
                    error: None,
                    color: variant_color(variant),
                    value_label: format!("{pct:.1}%"),
                },
            )
        })
        .collect()
}

/// Variant with the higher recommendation rate
fn recommendation_leader(report: &AnalysisReport) -> Variant {
    if report.recommendation.difference_points >= 0.0 {
        Variant::Checklist
    } else {
        Variant::Calendar
    }
}

/// Overall score per variant with ±1 sd error bars
pub fn main_finding(root: &Canvas<'_>, report: &AnalysisReport) -> Result<()> {
    let overall = report.overall();
    let body = titled(root, "A/B Test Results", headline(report))?;
    let (banner, plot) = body.split_vertically(70);

    callout(
        &banner,
        380,
        &[
            advantage_line(report),
            format!("({})", format_p_value(overall.welch.p_value)),
        ],
        &winner_color(report.winner()),
    )?;

    let axis = ValueAxis::rating("Overall User Experience Score");
    column_chart(
        &plot.margin(0, 0, 140, 140),
        &overall_bars(report, true),
        &axis,
        14,
    )
}

/// Grouped bars for the three rated dimensions with significance stars
pub fn detailed_metrics(root: &Canvas<'_>, report: &AnalysisReport) -> Result<()> {
    let alpha = report.significance_level;
    let subtitle = match report.winner() {
        Some(winner)
            if Metric::DETAILED
                .iter()
                .all(|&m| report.metric(m).winner(alpha) == Some(winner)) =>
        {
            format!("{} Superior Across All Dimensions", winner.view_label())
        }
        _ => "Per-Dimension Comparison".to_string(),
    };
    let body = titled(root, "User Experience Metrics Comparison", &subtitle)?;
    let (legend_area, plot) = body.split_vertically(30);

    legend(&legend_area, 14)?;
    let axis = ValueAxis::rating("Rating Score (1-5)");
    column_chart(&plot, &detailed_groups(report, true, false), &axis, 12)
}

/// Horizontal recommendation-rate bars with a benchmark line
pub fn recommendation(root: &Canvas<'_>, report: &AnalysisReport, benchmark: f64) -> Result<()> {
    let rec = &report.recommendation;
    let subtitle = match report.winner() {
        Some(variant) => format!("{} Drives Higher Satisfaction", variant.view_label()),
        None => "Share of Participants Who Would Recommend".to_string(),
    };
    let body = titled(root, "User Recommendation Rates", &subtitle)?;
    let (banner, plot) = body.split_vertically(56);

    let leader = recommendation_leader(report);
    callout(
        &banner,
        480,
        &[format!(
            "{}: {:.1} percentage points higher ({})",
            leader.view_label(),
            rec.difference_points.abs(),
            format_p_value(rec.chi_square.p_value)
        )],
        &variant_color(leader),
    )?;

    let rows: Vec<(String, Bar)> = recommendation_bars(report)
        .into_iter()
        .map(|(variant, bar)| (variant.view_label().to_string(), bar))
        .collect();
    let markers = [Marker {
        value: benchmark * 100.0,
        label: format!("Good Benchmark ({:.0}%)", benchmark * 100.0),
        dash: (0.08, 0.06),
    }];
    bar_rows(
        &plot.margin(0, 0, 0, 60),
        &rows,
        &ValueAxis::percent("Recommendation Rate (%)"),
        &markers,
        14,
    )
}

/// |Cohen's d| per metric with small/medium/large reference lines
pub fn effect_sizes(root: &Canvas<'_>, report: &AnalysisReport) -> Result<()> {
    let all_large = report
        .metrics
        .iter()
        .all(|m| m.magnitude == EffectMagnitude::Large);
    let subtitle = if all_large {
        "All Differences Show Large Effects"
    } else {
        "Standardized Mean Differences"
    };
    let body = titled(root, "Statistical Effect Sizes", subtitle)?;
    let (plot, side) = body.split_horizontally(760);

    let largest = report
        .metrics
        .iter()
        .map(|m| m.cohens_d.abs())
        .fold(0.0_f64, f64::max);
    let axis = ValueAxis::linear((largest * 1.2).max(1.0).ceil(), "Effect Size (Cohen's d)");

    let rows: Vec<(String, Bar)> = report
        .metrics
        .iter()
        .map(|m| {
            (
                m.metric.label().to_string(),
                Bar {
                    value: m.cohens_d.abs(),
                    error: None,
                    color: ACCENT_COLOR,
                    value_label: format!("{:.2}", m.cohens_d.abs()),
                },
            )
        })
        .collect();
    let markers: Vec<Marker> = EffectMagnitude::THRESHOLDS
        .iter()
        .map(|(threshold, magnitude)| Marker {
            value: *threshold,
            label: magnitude.label().to_string(),
            dash: (0.03, 0.05),
        })
        .collect();
    bar_rows(&plot, &rows, &axis, &markers, 12)?;

    let weakest = report
        .metrics
        .iter()
        .map(|m| m.magnitude)
        .min()
        .unwrap_or(EffectMagnitude::Negligible);
    let significant = report.significant_metrics().count();
    let (_, rest) = side.split_vertically(180);
    let (card, _) = rest.split_vertically(110);
    callout(
        &card,
        210,
        &[
            format!("Weakest effect: {weakest}"),
            format!("{significant} of {} metrics", report.metrics.len()),
            "statistically significant".to_string(),
        ],
        &ACCENT_COLOR,
    )
}

/// Key-figure cards: overall gap, recommendation uplift, significance
fn key_figures(report: &AnalysisReport) -> [(Vec<String>, RGBColor); 3] {
    let overall = report.overall();
    let rec = &report.recommendation;
    let winner = report.winner();

    let (score, uplift) = match winner {
        Some(variant) => (
            vec![
                format!("{:.2}", overall.difference.abs()),
                format!("Score Advantage: {}", variant.name()),
            ],
            vec![
                format!(
                    "{:+.1} pts",
                    (rec.rate(variant) - rec.rate(variant.other())) * 100.0
                ),
                format!("Recommendation Rate: {}", variant.name()),
            ],
        ),
        None => (
            vec![
                format!("{:.2}", overall.difference.abs()),
                "Score Difference".to_string(),
            ],
            vec![
                format!("{:.1} pts", rec.difference_points.abs()),
                "Recommendation Gap".to_string(),
            ],
        ),
    };
    let significance = vec![
        format_p_value(overall.welch.p_value),
        if overall.is_significant(report.significance_level) {
            "Statistically Significant".to_string()
        } else {
            "Not Significant".to_string()
        },
    ];

    [
        (score, winner_color(winner)),
        (uplift, winner_color(winner)),
        (significance, ACCENT_COLOR),
    ]
}

/// Composite executive summary
pub fn executive_dashboard(root: &Canvas<'_>, report: &AnalysisReport) -> Result<()> {
    let body = root.titled("A/B Test: Executive Summary", bold(28))?;
    let (cards, rest) = body.split_vertically(110);
    let (panels, footer) = rest.split_vertically(560);

    for (card, (lines, color)) in cards.split_evenly((1, 3)).iter().zip(&key_figures(report)) {
        callout(&card.margin(10, 10, 0, 0), 300, lines, color)?;
    }

    let columns = panels.split_evenly((1, 3));
    let score_axis = ValueAxis::rating("Score (1-5)");

    let overall_panel = columns[0].titled("Overall Score", bold(16))?;
    column_chart(&overall_panel, &overall_bars(report, false), &score_axis, 12)?;

    let detail_panel = columns[1].titled("Detailed Metrics", bold(16))?;
    let (legend_area, detail_plot) = detail_panel.split_vertically(28);
    legend(&legend_area, 12)?;
    column_chart(
        &detail_plot,
        &detailed_groups(report, false, true),
        &score_axis,
        10,
    )?;

    let rec_panel = columns[2].titled("Recommendation Rate", bold(16))?;
    let rec_columns: Vec<Category> = recommendation_bars(report)
        .into_iter()
        .map(|(variant, bar)| Category {
            label: variant.name().to_string(),
            bars: vec![bar],
            note: None,
        })
        .collect();
    column_chart(&rec_panel, &rec_columns, &ValueAxis::percent("Rate (%)"), 12)?;

    let footer = footer.titled("Business Recommendation", bold(20))?;
    text_block(&footer, &business_recommendation(report), &font(15), 1.6)
}

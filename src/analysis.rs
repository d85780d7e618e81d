//! Checklist vs. calendar comparison over a loaded survey
//!
//! Runs every metric through Welch's t-test, Cohen's d and a confidence
//! interval, then compares recommendation rates with a chi-square test.
//! The result is a plain data structure consumed by the chart, report,
//! JSON and CSV writers.

use crate::config::AnalysisConfig;
use crate::stats::{
    chi_square_2x2, cohens_d_from_summaries, mean_difference_ci, summarize,
    welch_from_summaries, ChiSquareTest, ConfidenceInterval, ContingencyTable, EffectMagnitude,
    MetricSummary, WelchTest,
};
use crate::survey::{Metric, SurveyDataset, Variant};
use anyhow::{Context, Result};
use serde::Serialize;

/// Statistical comparison of one metric between the two variants
///
/// All signed quantities are checklist minus calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: Metric,
    pub checklist: MetricSummary,
    pub calendar: MetricSummary,
    pub difference: f64,
    pub welch: WelchTest,
    pub cohens_d: f64,
    pub magnitude: EffectMagnitude,
    pub confidence_interval: ConfidenceInterval,
}

impl MetricComparison {
    pub fn summary(&self, variant: Variant) -> &MetricSummary {
        match variant {
            Variant::Checklist => &self.checklist,
            Variant::Calendar => &self.calendar,
        }
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.welch.p_value < alpha
    }

    /// Variant with the higher mean, if the difference is significant
    pub fn winner(&self, alpha: f64) -> Option<Variant> {
        if !self.is_significant(alpha) {
            return None;
        }
        if self.difference > 0.0 {
            Some(Variant::Checklist)
        } else {
            Some(Variant::Calendar)
        }
    }
}

/// Recommendation rates and their chi-square comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationComparison {
    pub table: ContingencyTable,
    pub checklist_rate: f64,
    pub calendar_rate: f64,
    /// Checklist rate minus calendar rate, in percentage points
    pub difference_points: f64,
    pub chi_square: ChiSquareTest,
}

impl RecommendationComparison {
    pub fn rate(&self, variant: Variant) -> f64 {
        match variant {
            Variant::Checklist => self.checklist_rate,
            Variant::Calendar => self.calendar_rate,
        }
    }
}

/// Full result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub participants: usize,
    pub checklist_n: usize,
    pub calendar_n: usize,
    /// Both groups match the configured design size
    pub balanced: bool,
    pub significance_level: f64,
    pub confidence_level: f64,
    /// One entry per metric, in `Metric::ALL` order
    pub metrics: [MetricComparison; Metric::COUNT],
    pub recommendation: RecommendationComparison,
}

impl AnalysisReport {
    pub fn metric(&self, metric: Metric) -> &MetricComparison {
        &self.metrics[metric.index()]
    }

    /// Overall UX comparison
    pub fn overall(&self) -> &MetricComparison {
        self.metric(Metric::Overall)
    }

    /// Metrics whose difference is significant at the configured alpha
    pub fn significant_metrics(&self) -> impl Iterator<Item = &MetricComparison> {
        self.metrics
            .iter()
            .filter(move |m| m.is_significant(self.significance_level))
    }

    /// Variant preferred on the overall score, if significantly better
    pub fn winner(&self) -> Option<Variant> {
        self.overall().winner(self.significance_level)
    }

    /// Generate human-readable summary for the terminal
    pub fn to_summary_string(&self) -> String {
        let mut out = String::new();
        let overall = self.overall();

        out.push_str("=== A/B Test Results: Checklist vs Calendar ===\n\n");
        out.push_str(&format!(
            "Participants: {} (checklist {}, calendar {}){}\n",
            self.participants,
            self.checklist_n,
            self.calendar_n,
            if self.balanced { "" } else { " [unbalanced]" }
        ));
        match self.winner() {
            Some(variant) => out.push_str(&format!("Winner: {}\n", variant.view_label())),
            None => out.push_str("Winner: none (no significant overall difference)\n"),
        }
        out.push_str(&format!(
            "Overall advantage: {:+.2} points ({})\n",
            overall.difference,
            format_p_value(overall.welch.p_value)
        ));
        out.push_str(&format!(
            "Effect size: Cohen's d = {:.2} ({})\n",
            overall.cohens_d.abs(),
            overall.magnitude
        ));
        out.push_str(&format!(
            "Recommendation: {:.1}% vs {:.1}% ({:+.1} points, chi2 = {:.2}, {})\n",
            self.recommendation.checklist_rate * 100.0,
            self.recommendation.calendar_rate * 100.0,
            self.recommendation.difference_points,
            self.recommendation.chi_square.statistic,
            format_p_value(self.recommendation.chi_square.p_value)
        ));

        out.push_str("\nMetric            Checklist  Calendar   Diff      t        p          d\n");
        out.push_str("----------------  ---------  --------  ------  -------  ---------  ------\n");
        for m in &self.metrics {
            out.push_str(&format!(
                "{:<16}  {:>9.2}  {:>8.2}  {:>+6.2}  {:>7.2}  {:>9}  {:>6.2}{}\n",
                m.metric.label(),
                m.checklist.mean,
                m.calendar.mean,
                m.difference,
                m.welch.statistic,
                format_p_short(m.welch.p_value),
                m.cohens_d,
                significance_stars(m.welch.p_value)
            ));
        }

        out
    }
}

/// Conventional significance stars: *** p<0.001, ** p<0.01, * p<0.05
pub fn significance_stars(p_value: f64) -> &'static str {
    if p_value < 0.001 {
        "***"
    } else if p_value < 0.01 {
        "**"
    } else if p_value < 0.05 {
        "*"
    } else {
        ""
    }
}

/// "p < 0.001" or "p = 0.023"
pub fn format_p_value(p_value: f64) -> String {
    if p_value < 0.001 {
        "p < 0.001".to_string()
    } else {
        format!("p = {p_value:.3}")
    }
}

fn format_p_short(p_value: f64) -> String {
    if p_value < 0.001 {
        "<0.001".to_string()
    } else {
        format!("{p_value:.3}")
    }
}

/// Analyze a survey dataset
///
/// # Errors
/// Fails when a variant group is empty, has a single respondent, or has
/// zero variance on any metric, and when the recommendation table is
/// degenerate (for instance, every participant recommends).
///
/// # Example
/// ```
/// use abreport::analysis::analyze;
/// use abreport::config::AnalysisConfig;
/// use abreport::survey::{Metric, SurveyDataset};
///
/// let csv = "ParticipantID,Variant,EaseOfUse,LikelyToUse,Clarity,Recommend
/// 1,Checklist,5,4,5,Y
/// 2,Checklist,4,5,4,Y
/// 3,Checklist,5,5,4,N
/// 4,Calendar,3,2,3,N
/// 5,Calendar,2,3,3,Y
/// 6,Calendar,2,3,2,N
/// ";
/// let dataset = SurveyDataset::from_csv_str(csv).unwrap();
/// let report = analyze(&dataset, &AnalysisConfig::default()).unwrap();
///
/// assert!(report.metric(Metric::Overall).difference > 0.0);
/// assert!(!report.balanced);
/// ```
pub fn analyze(dataset: &SurveyDataset, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let checklist_n = dataset.count(Variant::Checklist);
    let calendar_n = dataset.count(Variant::Calendar);
    tracing::info!(
        participants = dataset.len(),
        checklist = checklist_n,
        calendar = calendar_n,
        "analyzing survey"
    );

    let balanced =
        checklist_n == config.expected_group_size && calendar_n == config.expected_group_size;
    if !balanced {
        tracing::warn!(
            "unbalanced design: checklist {}, calendar {} (expected {} each); power assumptions may not hold",
            checklist_n,
            calendar_n,
            config.expected_group_size
        );
    }

    let compare = |metric: Metric| {
        compare_metric(dataset, metric, config.confidence_level)
            .with_context(|| format!("Failed to compare {}", metric.label()))
    };
    let metrics = [
        compare(Metric::EaseOfUse)?,
        compare(Metric::LikelyToUse)?,
        compare(Metric::Clarity)?,
        compare(Metric::Overall)?,
    ];

    let recommendation = compare_recommendation(dataset, config.yates_correction)
        .context("Failed to compare recommendation rates")?;

    Ok(AnalysisReport {
        participants: dataset.len(),
        checklist_n,
        calendar_n,
        balanced,
        significance_level: config.significance_level,
        confidence_level: config.confidence_level,
        metrics,
        recommendation,
    })
}

fn compare_metric(
    dataset: &SurveyDataset,
    metric: Metric,
    confidence: f64,
) -> Result<MetricComparison> {
    let summarize_variant = |variant: Variant| {
        summarize(&dataset.metric_values(variant, metric))
            .with_context(|| format!("{} group", variant.name()))
    };
    let checklist = summarize_variant(Variant::Checklist)?;
    let calendar = summarize_variant(Variant::Calendar)?;

    let welch = welch_from_summaries(&checklist, &calendar)
        .map_err(|e| name_groups(e.into()))?;
    let cohens_d = cohens_d_from_summaries(&checklist, &calendar)?;
    let confidence_interval = mean_difference_ci(&checklist, &calendar, confidence)?;

    tracing::debug!(
        metric = metric.label(),
        t = welch.statistic,
        df = welch.df,
        p = welch.p_value,
        d = cohens_d,
        "metric compared"
    );

    Ok(MetricComparison {
        metric,
        difference: checklist.mean - calendar.mean,
        checklist,
        calendar,
        welch,
        cohens_d,
        magnitude: EffectMagnitude::classify(cohens_d),
        confidence_interval,
    })
}

/// Attach variant names to the A/B group labels used by the stats core
fn name_groups(err: anyhow::Error) -> anyhow::Error {
    err.context(format!(
        "group A = {}, group B = {}",
        Variant::Checklist,
        Variant::Calendar
    ))
}

fn compare_recommendation(dataset: &SurveyDataset, yates: bool) -> Result<RecommendationComparison> {
    let (checklist_yes, checklist_no) = dataset.recommend_counts(Variant::Checklist);
    let (calendar_yes, calendar_no) = dataset.recommend_counts(Variant::Calendar);
    let table = ContingencyTable::new([[checklist_yes, checklist_no], [calendar_yes, calendar_no]]);

    let chi_square = chi_square_2x2(&table, yates)?;

    let rate = |yes: u64, no: u64| {
        #[allow(clippy::cast_precision_loss)]
        let r = yes as f64 / (yes + no) as f64;
        r
    };
    let checklist_rate = rate(checklist_yes, checklist_no);
    let calendar_rate = rate(calendar_yes, calendar_no);

    tracing::debug!(
        checklist_rate,
        calendar_rate,
        chi2 = chi_square.statistic,
        p = chi_square.p_value,
        "recommendation compared"
    );

    Ok(RecommendationComparison {
        table,
        checklist_rate,
        calendar_rate,
        difference_points: (checklist_rate - calendar_rate) * 100.0,
        chi_square,
    })
}

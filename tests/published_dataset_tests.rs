//! Published study: 80 participants, 40 per variant
//!
//! Reference values computed with an arbitrary-precision statistics library.
//! t, df and d agree to 1e-6; p-values to 1e-6 relative.

use abreport::analysis::analyze;
use abreport::config::AnalysisConfig;
use abreport::stats::EffectMagnitude;
use abreport::survey::{Metric, SurveyDataset, Variant};

const FIXTURE: &str = "tests/fixtures/visa_survey.csv";

struct Expected {
    metric: Metric,
    checklist_mean: f64,
    checklist_sd: f64,
    calendar_mean: f64,
    calendar_sd: f64,
    t: f64,
    df: f64,
    p: f64,
    d: f64,
    ci: (f64, f64),
}

#[allow(clippy::unreadable_literal)]
const EXPECTED: [Expected; 4] = [
    Expected {
        metric: Metric::EaseOfUse,
        checklist_mean: 4.475,
        checklist_sd: 0.554122082263,
        calendar_mean: 3.1,
        calendar_sd: 0.496138938357,
        t: 11.6920212269222,
        df: 77.0661241665495,
        p: 9.50220626477752e-19,
        d: 2.61441542577686,
        ci: (1.14082857229, 1.60917142771),
    },
    Expected {
        metric: Metric::LikelyToUse,
        checklist_mean: 4.475,
        checklist_sd: 0.505736325341,
        calendar_mean: 3.175,
        calendar_sd: 0.446496331854,
        t: 12.1872711246115,
        df: 76.819890435367,
        p: 1.23981293946261e-19,
        d: 2.72515666948516,
        ci: (1.08758759464, 1.51241240536),
    },
    Expected {
        metric: Metric::Clarity,
        checklist_mean: 4.425,
        checklist_sd: 0.500640615253,
        calendar_mean: 3.125,
        calendar_sd: 0.607115922695,
        t: 10.4483348847246,
        df: 75.2691466083151,
        p: 2.65301579674418e-16,
        d: 2.33631870539267,
        ci: (1.05215371131, 1.54784628869),
    },
    Expected {
        metric: Metric::Overall,
        checklist_mean: 4.45833333333,
        checklist_sd: 0.351533068964,
        calendar_mean: 3.13333333333,
        calendar_sd: 0.352443646866,
        t: 16.8345771959013,
        df: 77.9994780031796,
        p: 1.08620128958482e-27,
        d: 3.76432589825031,
        ci: (1.16830627294, 1.48169372706),
    },
];

fn load() -> SurveyDataset {
    SurveyDataset::from_file(FIXTURE).unwrap()
}

fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() < tol,
        "{what}: expected {expected}, got {actual}"
    );
}

#[test]
fn test_fixture_shape() {
    let dataset = load();
    assert_eq!(dataset.len(), 80);
    assert_eq!(dataset.count(Variant::Checklist), 40);
    assert_eq!(dataset.count(Variant::Calendar), 40);
    assert_eq!(dataset.recommend_counts(Variant::Checklist), (36, 4));
    assert_eq!(dataset.recommend_counts(Variant::Calendar), (27, 13));
}

#[test]
fn test_metric_comparisons_match_reference() {
    let report = analyze(&load(), &AnalysisConfig::default()).unwrap();
    assert!(report.balanced);

    for e in &EXPECTED {
        let m = report.metric(e.metric);
        let name = e.metric.label();

        assert_close(m.checklist.mean, e.checklist_mean, 1e-9, name);
        assert_close(m.checklist.std_dev, e.checklist_sd, 1e-9, name);
        assert_close(m.calendar.mean, e.calendar_mean, 1e-9, name);
        assert_close(m.calendar.std_dev, e.calendar_sd, 1e-9, name);
        assert_close(m.welch.statistic, e.t, 1e-6, name);
        assert_close(m.welch.df, e.df, 1e-6, name);
        assert!(
            ((m.welch.p_value - e.p) / e.p).abs() < 1e-6,
            "{name}: expected p {}, got {}",
            e.p,
            m.welch.p_value
        );
        assert_close(m.cohens_d, e.d, 1e-6, name);
        assert_close(m.confidence_interval.lower, e.ci.0, 1e-6, name);
        assert_close(m.confidence_interval.upper, e.ci.1, 1e-6, name);
        assert_eq!(m.magnitude, EffectMagnitude::Large);
    }
}

#[test]
fn test_headline_figures() {
    let report = analyze(&load(), &AnalysisConfig::default()).unwrap();
    let overall = report.overall();

    assert!((overall.checklist.mean - 4.46).abs() < 0.005);
    assert!((overall.calendar.mean - 3.13).abs() < 0.005);
    assert!((overall.difference - 1.33).abs() < 0.01);
    assert!(overall.welch.p_value < 0.001);
    assert!((overall.cohens_d - 3.76).abs() < 0.01);
    assert_eq!(report.winner(), Some(Variant::Checklist));
    assert_eq!(report.significant_metrics().count(), 4);
}

#[test]
fn test_recommendation_chi_square() {
    let report = analyze(&load(), &AnalysisConfig::default()).unwrap();
    let rec = &report.recommendation;

    assert_close(rec.checklist_rate, 0.9, 1e-12, "checklist rate");
    assert_close(rec.calendar_rate, 0.675, 1e-12, "calendar rate");
    assert_close(rec.difference_points, 22.5, 1e-9, "difference");
    assert_close(rec.chi_square.statistic, 6.05042016806723, 1e-9, "chi2");
    assert_close(rec.chi_square.p_value, 0.0139029881643843, 1e-9, "p");
    assert_eq!(rec.chi_square.df, 1);
}

#[test]
fn test_recommendation_chi_square_yates() {
    let config = AnalysisConfig {
        yates_correction: true,
        ..AnalysisConfig::default()
    };
    let report = analyze(&load(), &config).unwrap();
    let chi = &report.recommendation.chi_square;

    assert!(chi.yates_corrected);
    assert_close(chi.statistic, 4.78057889822596, 1e-9, "chi2");
    assert_close(chi.p_value, 0.0287824432999275, 1e-9, "p");
}

#[test]
fn test_analysis_is_idempotent() {
    let config = AnalysisConfig::default();
    let first = analyze(&load(), &config).unwrap();
    let second = analyze(&load(), &config).unwrap();
    assert_eq!(first, second);
}

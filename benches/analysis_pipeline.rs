/// Analysis pipeline benchmarks
///
/// Measures parsing, statistical analysis and rendering of the 80-participant
/// survey fixture so regressions in the numeric routines show up early.
use abreport::analysis::analyze;
use abreport::charts::ChartKind;
use abreport::config::AnalysisConfig;
use abreport::report::render_markdown;
use abreport::stats::distributions::student_t_two_sided;
use abreport::stats::welch_t_test;
use abreport::survey::{Metric, SurveyDataset, Variant};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const FIXTURE: &str = include_str!("../tests/fixtures/visa_survey.csv");

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_survey_csv", |b| {
        b.iter(|| SurveyDataset::from_csv_str(black_box(FIXTURE)).unwrap());
    });
}

fn bench_analyze(c: &mut Criterion) {
    let dataset = SurveyDataset::from_csv_str(FIXTURE).unwrap();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_survey", |b| {
        b.iter(|| analyze(black_box(&dataset), &config).unwrap());
    });
}

fn bench_welch(c: &mut Criterion) {
    let dataset = SurveyDataset::from_csv_str(FIXTURE).unwrap();
    let checklist = dataset.metric_values(Variant::Checklist, Metric::Overall);
    let calendar = dataset.metric_values(Variant::Calendar, Metric::Overall);

    c.bench_function("welch_t_test_overall", |b| {
        b.iter(|| welch_t_test(black_box(&checklist), black_box(&calendar)).unwrap());
    });
}

fn bench_t_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("student_t_two_sided");
    for t in [0.5, 2.0, 16.8] {
        group.bench_with_input(BenchmarkId::from_parameter(t), &t, |b, &t| {
            b.iter(|| student_t_two_sided(black_box(t), black_box(78.0)));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let dataset = SurveyDataset::from_csv_str(FIXTURE).unwrap();
    let config = AnalysisConfig::default();
    let report = analyze(&dataset, &config).unwrap();

    let mut group = c.benchmark_group("render");
    group.bench_function("markdown", |b| {
        b.iter(|| render_markdown(black_box(&report), &ChartKind::ALL));
    });
    group.bench_function("executive_dashboard", |b| {
        b.iter(|| ChartKind::ExecutiveDashboard.render(black_box(&report), &config));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_analyze,
    bench_welch,
    bench_t_distribution,
    bench_render
);
criterion_main!(benches);

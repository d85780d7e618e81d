use abreport::{
    analysis,
    charts::{self, ChartKind},
    cli::{Cli, OutputFormat},
    config::AnalysisConfig,
    csv_output::CsvSummaryOutput,
    json_output::JsonOutput,
    report,
    survey::SurveyDataset,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber
///
/// `RUST_LOG` is honoured with a warn default; `-v` and `--debug` raise the
/// level to info and trace but never lower what `RUST_LOG` enables.
fn init_tracing(verbose: bool, debug: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let requested = if debug {
        Some(LevelFilter::TRACE)
    } else if verbose {
        Some(LevelFilter::INFO)
    } else {
        None
    };
    if let Some(level) = requested {
        if filter.max_level_hint().map_or(true, |hint| hint < level) {
            filter = filter.add_directive(level.into());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file (if any) and apply command-line overrides
fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(alpha) = args.alpha {
        config.significance_level = alpha;
    }
    if let Some(confidence) = args.confidence {
        config.confidence_level = confidence;
    }
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid analysis configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.verbose, args.debug);

    let config = load_config(&args)?;

    let dataset = SurveyDataset::from_file(&args.input)
        .with_context(|| format!("Failed to load survey data from {}", args.input.display()))?;

    let result = analysis::analyze(&dataset, &config)
        .with_context(|| format!("Analysis of {} failed", args.input.display()))?;

    let rendered: &[ChartKind] = if args.no_charts {
        &[]
    } else {
        charts::render_all(&result, &config, &args.output_dir)
            .context("Failed to render charts")?;
        &ChartKind::ALL
    };

    report::write_report(&result, rendered, &args.output_dir)?;
    CsvSummaryOutput::new(&result).write_to(&args.output_dir)?;

    let json = JsonOutput::new(&result, &config).with_input(args.input.display().to_string());
    json.write_to(&args.output_dir)?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", result.to_summary_string());
            println!("\nArtifacts written to {}", args.output_dir.display());
        }
        OutputFormat::Json => println!("{}", json.to_json()?),
    }

    Ok(())
}

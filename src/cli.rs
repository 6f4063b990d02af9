//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::bundle::{build_bundle, AnalyticsConfig, DEFAULT_BIN_WIDTH};
use crate::domain::config_validation::{parse_windows, validate_analytics_config};
use crate::domain::date_key::DateKey;
use crate::domain::error::TradelensError;
use crate::domain::markers::LabelLayout;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradelens", about = "Backtest analytics and chart alignment")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the render-ready bundle for one backtest run
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Backtest service JSON payload
        #[arg(short, long, conflicts_with = "csv_dir")]
        input: Option<PathBuf>,
        /// Directory holding <run>_prices.csv, <run>_equity.csv, <run>_trades.csv
        #[arg(long, requires = "run")]
        csv_dir: Option<PathBuf>,
        #[arg(long)]
        run: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the canonical date key for each input
    Normalize { dates: Vec<String> },
    /// Validate an analytics configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Where the run's data comes from, after CLI flags and config are merged.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Json(PathBuf),
    Csv { dir: PathBuf, run: String },
}

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Analyze {
            config,
            input,
            csv_dir,
            run,
            output,
            pretty,
        } => run_analyze(
            config.as_deref(),
            input,
            csv_dir,
            run,
            output,
            pretty,
        ),
        Command::Normalize { dates } => {
            for line in normalize_lines(&dates) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradelensError> {
    FileConfigAdapter::from_file(path).map_err(|e| TradelensError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// One canonical key per input, in input order.
pub fn normalize_lines(dates: &[String]) -> Vec<String> {
    dates
        .iter()
        .map(|d| DateKey::normalize(d).to_string())
        .collect()
}

pub fn build_analytics_config(config: &dyn ConfigPort) -> Result<AnalyticsConfig, TradelensError> {
    let defaults = AnalyticsConfig::default();

    let ma_windows = match config.get_string("analytics", "ma_windows") {
        Some(value) => parse_windows(&value)?,
        None => defaults.ma_windows,
    };

    Ok(AnalyticsConfig {
        ma_windows,
        bin_width: config.get_double("analytics", "bin_width", DEFAULT_BIN_WIDTH),
        label_layout: LabelLayout {
            base_offset: config.get_double(
                "analytics",
                "label_base_offset",
                defaults.label_layout.base_offset,
            ),
            step: config.get_double("analytics", "label_step", defaults.label_layout.step),
        },
    })
}

/// CLI flags win over the `[input]` section.
pub fn resolve_input(
    input: Option<PathBuf>,
    csv_dir: Option<PathBuf>,
    run: Option<String>,
    config: &dyn ConfigPort,
) -> Result<InputSource, TradelensError> {
    if let Some(path) = input {
        return Ok(InputSource::Json(path));
    }
    if let Some(dir) = csv_dir {
        let run = run.ok_or_else(|| TradelensError::ConfigMissing {
            section: "input".into(),
            key: "run".into(),
        })?;
        return Ok(InputSource::Csv { dir, run });
    }

    let path = config
        .get_string("input", "path")
        .ok_or_else(|| TradelensError::ConfigMissing {
            section: "input".into(),
            key: "path".into(),
        })?;
    let format = config
        .get_string("input", "format")
        .unwrap_or_else(|| "json".to_string());

    match format.trim() {
        "json" => Ok(InputSource::Json(PathBuf::from(path))),
        "csv" => {
            let run = run
                .or_else(|| config.get_string("input", "run"))
                .ok_or_else(|| TradelensError::ConfigMissing {
                    section: "input".into(),
                    key: "run".into(),
                })?;
            Ok(InputSource::Csv {
                dir: PathBuf::from(path),
                run,
            })
        }
        other => Err(TradelensError::ConfigInvalid {
            section: "input".into(),
            key: "format".into(),
            reason: format!("unknown format '{}', expected json or csv", other),
        }),
    }
}

/// `--output` and `--pretty` win over the `[output]` section.
pub fn resolve_output(
    output: Option<PathBuf>,
    pretty: bool,
    config: &dyn ConfigPort,
) -> (Option<PathBuf>, bool) {
    let output = output.or_else(|| config.get_string("output", "path").map(PathBuf::from));
    let pretty = pretty || config.get_bool("output", "pretty", false);
    (output, pretty)
}

pub fn open_source(source: &InputSource) -> Result<Box<dyn DataPort>, TradelensError> {
    match source {
        InputSource::Json(path) => Ok(Box::new(JsonAdapter::from_file(path)?)),
        InputSource::Csv { dir, run } => Ok(Box::new(CsvAdapter::new(dir.clone(), run.clone()))),
    }
}

pub fn run_analyze(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    csv_dir: Option<PathBuf>,
    run: Option<String>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), TradelensError> {
    let adapter = match config_path {
        Some(path) => {
            tracing::info!(config = %path.display(), "loading config");
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_analytics_config(&adapter)?;
    let analytics = build_analytics_config(&adapter)?;

    let source = resolve_input(input, csv_dir, run, &adapter)?;
    tracing::info!(source = ?source, "loading backtest run");
    let data = open_source(&source)?.fetch_run()?;

    let bundle = build_bundle(&data, &analytics);
    tracing::info!(
        prices = bundle.prices.len(),
        equity = bundle.equity.len(),
        buy_markers = bundle.price_markers.buy.len(),
        sell_markers = bundle.price_markers.sell.len(),
        unmatched = bundle.price_markers.unmatched.len(),
        max_drawdown_pct = bundle.drawdown.as_ref().map(|d| d.magnitude_pct),
        "bundle built"
    );

    let (output, pretty) = resolve_output(output, pretty, &adapter);
    JsonReportAdapter::new(output, pretty).write(&bundle)
}

fn run_validate(config_path: &Path) -> Result<(), TradelensError> {
    let adapter = load_config(config_path)?;
    validate_analytics_config(&adapter)?;
    println!("{}: OK", config_path.display());
    Ok(())
}

//! CLI definition and dispatch.

use std::fmt::{Display, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::adapters::csv_adapter::{CsvSeriesAdapter, read_series_file};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::adapters::terminal_progress::TerminalProgress;
use crate::domain::allocation;
use crate::domain::catalogue::{
    self, DEFAULT_METHOD, DEFAULT_PORTFOLIO, OptimizationMethod, Philosophy, PortfolioProfile,
};
use crate::domain::config_validation::{job_stage_from_config, validate_config};
use crate::domain::drawdown;
use crate::domain::error::FoliolabError;
use crate::domain::job::{JobStage, JobState};
use crate::domain::series::ValueSeries;
use crate::domain::simulated_job::SimulatedJob;
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::progress_port::ProgressPort;
use crate::ports::report_port::{DrawdownReport, ReportPort};
use crate::ports::series_port::SeriesPort;

#[derive(Parser, Debug)]
#[command(name = "foliolab", about = "Portfolio drawdown analytics and simulated optimization")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the pre-built portfolios
    Portfolios {
        #[arg(long)]
        philosophy: Option<Philosophy>,
    },
    /// List the optimization methods
    Methods,
    /// Compute the drawdown series of a value series
    Drawdown {
        /// CSV file with a date,value header
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Use a catalogue portfolio's sample path
        #[arg(short, long)]
        portfolio: Option<String>,
        /// Series name under [series] data_dir
        #[arg(long)]
        series: Option<String>,
        /// Write the drawdown rows as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write an SVG chart
        #[arg(long)]
        svg: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the simulated optimization for a portfolio and show the results
    Simulate {
        #[arg(short, long, default_value = DEFAULT_PORTFOLIO)]
        portfolio: String,
        #[arg(short, long, default_value = DEFAULT_METHOD)]
        method: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Cancel the run after this many milliseconds
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },
    /// List the series available under [series] data_dir
    ListSeries {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Command::Drawdown { config, .. } | Command::Simulate { config, .. } => config.as_ref(),
            Command::ListSeries { config } | Command::Validate { config } => Some(config),
            Command::Portfolios { .. } | Command::Methods => None,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match cli.command.config_path().map(load_config).transpose() {
        Ok(c) => c,
        Err(code) => return code,
    };

    let env_format = std::env::var(logging::FORMAT_ENV).ok();
    let config_format = config
        .as_ref()
        .and_then(|c| c.get_string("logging", "format"));
    let format = match logging::resolve_format(env_format.as_deref(), config_format.as_deref()) {
        Ok(format) => format,
        Err(err) => {
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    logging::init(format);

    let config = config.as_ref().map(|c| c as &dyn ConfigPort);
    let result = match cli.command {
        Command::Portfolios { philosophy } => {
            print!("{}", render_portfolios(philosophy));
            Ok(())
        }
        Command::Methods => {
            print!("{}", render_methods());
            Ok(())
        }
        Command::Drawdown {
            input,
            portfolio,
            series,
            output,
            svg,
            ..
        } => match DrawdownSource::resolve(input, portfolio, series) {
            Ok(source) => run_drawdown(source, output.as_deref(), svg.as_deref(), config),
            Err(code) => return code,
        },
        Command::Simulate {
            portfolio,
            method,
            cancel_after_ms,
            ..
        } => run_simulate(&portfolio, &method, config, cancel_after_ms),
        Command::ListSeries { .. } => run_list_series(config),
        Command::Validate { .. } => run_validate(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Where the `drawdown` command reads its series from.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawdownSource {
    File(PathBuf),
    Portfolio(String),
    Named(String),
}

impl DrawdownSource {
    pub fn resolve(
        input: Option<PathBuf>,
        portfolio: Option<String>,
        series: Option<String>,
    ) -> Result<Self, ExitCode> {
        match (input, portfolio, series) {
            (Some(path), None, None) => Ok(DrawdownSource::File(path)),
            (None, Some(id), None) => Ok(DrawdownSource::Portfolio(id)),
            (None, None, Some(name)) => Ok(DrawdownSource::Named(name)),
            _ => {
                eprintln!("error: give exactly one of --input, --portfolio or --series");
                Err(ExitCode::from(2))
            }
        }
    }
}

pub fn run_drawdown(
    source: DrawdownSource,
    output: Option<&Path>,
    svg: Option<&Path>,
    config: Option<&dyn ConfigPort>,
) -> Result<(), FoliolabError> {
    let report = match &source {
        DrawdownSource::File(path) => {
            info!(path = %path.display(), "loading series");
            let series = read_series_file(path)?;
            drawdown_report(&path.display().to_string(), &series)?
        }
        DrawdownSource::Portfolio(id) => {
            let profile = catalogue::find_portfolio(id)?;
            drawdown_report(profile.name, &profile.sample_series()?)?
        }
        DrawdownSource::Named(name) => {
            let config = config.ok_or_else(|| FoliolabError::ConfigMissing {
                section: "series".into(),
                key: "data_dir".into(),
            })?;
            let adapter = series_adapter(config)?;
            info!(series = %name, "loading series");
            drawdown_report(name, &adapter.load_series(name)?)?
        }
    };

    print!("{}", render_drawdown_table(&report));

    if let Some(path) = output {
        let path = resolve_output(path, config);
        CsvReportAdapter.write_drawdown(&report, &path.display().to_string())?;
        eprintln!("Drawdown CSV written to: {}", path.display());
    }
    if let Some(path) = svg {
        let path = resolve_output(path, config);
        SvgChartAdapter.write_drawdown(&report, &path.display().to_string())?;
        eprintln!("Drawdown chart written to: {}", path.display());
    }
    Ok(())
}

pub fn drawdown_report<K: Ord + Clone + Display>(
    title: &str,
    series: &ValueSeries<K>,
) -> Result<DrawdownReport, FoliolabError> {
    let points = drawdown::compute(series)?;
    Ok(DrawdownReport::build(title, series, &points))
}

/// Relative output paths land under `[report] output_dir` when configured.
pub fn resolve_output(path: &Path, config: Option<&dyn ConfigPort>) -> PathBuf {
    match config.and_then(|c| c.get_string("report", "output_dir")) {
        Some(dir) if path.is_relative() && !dir.trim().is_empty() => Path::new(dir.trim()).join(path),
        _ => path.to_path_buf(),
    }
}

fn series_adapter(config: &dyn ConfigPort) -> Result<CsvSeriesAdapter, FoliolabError> {
    let data_dir = config.require_string("series", "data_dir")?;
    Ok(CsvSeriesAdapter::new(PathBuf::from(data_dir.trim())))
}

fn run_list_series(config: Option<&dyn ConfigPort>) -> Result<(), FoliolabError> {
    let config = config.ok_or_else(|| FoliolabError::ConfigMissing {
        section: "series".into(),
        key: "data_dir".into(),
    })?;
    let names = series_adapter(config)?.list_series()?;
    if names.is_empty() {
        eprintln!("No series found");
    }
    for name in &names {
        println!("{name}");
    }
    Ok(())
}

fn run_validate(config: Option<&dyn ConfigPort>) -> Result<(), FoliolabError> {
    let config = config.ok_or_else(|| FoliolabError::ConfigMissing {
        section: "job".into(),
        key: "milestones".into(),
    })?;
    validate_config(config)?;
    let stage = job_stage_from_config(config)?;
    eprintln!("Milestones: {stage}");
    eprintln!("Config validated successfully");
    Ok(())
}

fn run_simulate(
    portfolio_id: &str,
    method_id: &str,
    config: Option<&dyn ConfigPort>,
    cancel_after_ms: Option<u64>,
) -> Result<(), FoliolabError> {
    let profile = catalogue::find_portfolio(portfolio_id)?;

    if !profile.requires_optimization() {
        info!(portfolio = profile.id, "portfolio is not optimized; showing results directly");
        print!("{}", render_results(profile, None)?);
        return Ok(());
    }

    let method = catalogue::find_method(method_id)?;
    let stage = match config {
        Some(c) => job_stage_from_config(c)?,
        None => JobStage::default(),
    };

    info!(portfolio = profile.id, method = method.id, milestones = %stage, "starting optimization");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let final_state = runtime.block_on(simulate_optimization(
        stage,
        TerminalProgress::stderr(profile.id),
        cancel_after_ms.map(Duration::from_millis),
    ))?;

    match final_state {
        JobState::Completed => print!("{}", render_results(profile, Some(method))?),
        other => {
            warn!(state = %other, "optimization did not complete");
            eprintln!("Optimization {other}; no results");
        }
    }
    Ok(())
}

/// Run one simulated job to a terminal state, cancelling it after
/// `cancel_after` if it is still running.
pub async fn simulate_optimization<P: ProgressPort>(
    stage: JobStage,
    observer: P,
    cancel_after: Option<Duration>,
) -> Result<JobState, FoliolabError> {
    let mut job = SimulatedJob::new(stage, observer);
    job.start()?;

    match cancel_after {
        Some(after) => {
            let timed_out = tokio::select! {
                _ = job.wait() => false,
                _ = tokio::time::sleep(after) => true,
            };
            if timed_out {
                job.cancel();
            }
        }
        None => {
            job.wait().await;
        }
    }
    Ok(job.state())
}

pub fn render_portfolios(philosophy: Option<Philosophy>) -> String {
    let mut out = String::new();
    for p in catalogue::by_philosophy(philosophy) {
        let _ = writeln!(
            out,
            "{:<14} {:<14} {:<12} risk={:<7} return={}-{}%",
            p.id,
            p.name,
            p.philosophy.to_string(),
            p.risk.to_string(),
            p.expected_return.0,
            p.expected_return.1
        );
    }
    out
}

pub fn render_methods() -> String {
    let mut out = String::new();
    for m in catalogue::methods() {
        let _ = writeln!(
            out,
            "{:<16} {:<22} {:<9} +{}-{}%",
            m.id,
            m.name,
            m.complexity.to_string(),
            m.expected_improvement.0,
            m.expected_improvement.1
        );
    }
    out
}

pub fn render_drawdown_table(report: &DrawdownReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", report.title);
    let _ = writeln!(
        out,
        "{:<12} {:>12} {:>12} {:>10}",
        "timestamp", "value", "peak", "drawdown"
    );
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:<12} {:>12.2} {:>12.2} {:>9.2}%",
            row.timestamp, row.value, row.running_peak, row.drawdown_pct
        );
    }
    if let Some(max) = report.max_drawdown_pct {
        let _ = writeln!(out, "Max Drawdown: {max:.2}%");
    }
    out
}

/// Allocation comparison plus the drawdown profile of the sample path.
pub fn render_results(
    profile: &PortfolioProfile,
    method: Option<&OptimizationMethod>,
) -> Result<String, FoliolabError> {
    let original = profile.original_allocation()?;
    let optimized = profile.optimized_allocation()?;
    let points = drawdown::compute(&profile.sample_series()?)?;

    let mut out = String::new();
    let _ = writeln!(out, "=== Results: {} ===", profile.name);
    if let Some(m) = method {
        let _ = writeln!(out, "Method: {} ({})", m.name, m.complexity);
    }
    let _ = writeln!(out, "\n{:<12} {:>9} {:>10} {:>8}", "asset", "original", "optimized", "change");
    for row in allocation::compare(&original, &optimized) {
        let _ = writeln!(
            out,
            "{:<12} {:>8.1}% {:>9.1}% {:>+7.1}%",
            row.asset.to_string(),
            row.original,
            row.optimized,
            row.change
        );
    }

    if let Some(summary) = drawdown::summarize(&points) {
        let _ = writeln!(out, "\nMax Drawdown:       {:.2}%", summary.max_drawdown_pct);
        let _ = writeln!(out, "Trough at step:     {}", summary.trough);
        let _ = writeln!(out, "Longest underwater: {} steps", summary.longest_underwater);
    }
    Ok(out)
}

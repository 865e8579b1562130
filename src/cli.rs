//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::synthetic_adapter::{SyntheticAdapter, SyntheticConfig};
use crate::domain::config_validation::{validate_simulation_config, validate_synthetic_config};
use crate::domain::error::ReviewError;
use crate::domain::price::PricePoint;
use crate::domain::report::Report;
use crate::domain::simulation::{self, SimulationConfig};
use crate::domain::strategy::StrategySpec;
use crate::domain::workshop::{self, Answers, Template};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stratreview", about = "Strategy simulation and performance review")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a strategy over a price series and write the review report
    Simulate {
        #[arg(short, long)]
        strategy: PathBuf,
        /// CSV price file (label,price[,factor...])
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// Use the seeded random-walk generator instead of real prices
        #[arg(long)]
        synthetic: bool,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        days: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a strategy document
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Print a built-in strategy template
    Template {
        #[arg(short, long)]
        name: String,
    },
    /// Author a strategy from questionnaire answers
    Create {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        risk: Option<String>,
        #[arg(long)]
        horizon: Option<String>,
    },
}

/// Where the price series comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceSource {
    File(PathBuf),
    Directory { path: PathBuf, symbol: String },
    Synthetic(SyntheticConfig),
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate {
            strategy,
            prices,
            synthetic,
            config,
            days,
            seed,
            output,
        } => run_simulate(&SimulateArgs {
            strategy,
            prices,
            synthetic,
            config,
            days,
            seed,
            output,
        }),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::Template { name } => run_template(&name),
        Command::Create {
            user,
            style,
            risk,
            horizon,
        } => run_create(&user, style.as_deref(), risk.as_deref(), horizon.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.category());
            if let Some(hint) = error_hint(&e) {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(&e)
        }
    }
}

/// Extra guidance for errors the caller can fix by editing their input.
pub fn error_hint(err: &ReviewError) -> Option<&'static str> {
    err.is_client_error()
        .then_some("check the strategy document and the settings file")
}

#[derive(Debug, Clone, Default)]
pub struct SimulateArgs {
    pub strategy: PathBuf,
    pub prices: Option<PathBuf>,
    pub synthetic: bool,
    pub config: Option<PathBuf>,
    pub days: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ReviewError> {
    match path {
        Some(p) => {
            info!("loading config from {}", p.display());
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn load_strategy(path: &Path) -> Result<StrategySpec, ReviewError> {
    info!("loading strategy from {}", path.display());
    let content = fs::read_to_string(path)?;
    StrategySpec::from_json(&content)
}

pub fn build_simulation_config(config: &dyn ConfigPort) -> Result<SimulationConfig, ReviewError> {
    validate_simulation_config(config)?;
    let defaults = SimulationConfig::default();
    let excerpt_len = usize::try_from(config.get_int("simulation", "excerpt_len", 5))
        .map_err(|_| ReviewError::ConfigInvalid {
            section: "simulation".into(),
            key: "excerpt_len".into(),
            reason: "excerpt_len out of range".into(),
        })?;
    Ok(SimulationConfig {
        initial_cash: config.get_double("simulation", "initial_cash", defaults.initial_cash),
        excerpt_len,
    })
}

/// Flags win over settings; the generator is only used when asked for.
pub fn resolve_price_source(
    args: &SimulateArgs,
    config: &dyn ConfigPort,
) -> Result<PriceSource, ReviewError> {
    if let Some(path) = &args.prices {
        return Ok(PriceSource::File(path.clone()));
    }

    let wants_synthetic = args.synthetic
        || config
            .get_string("data", "source")
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("synthetic"));

    if !wants_synthetic {
        if let Some(path) = config.get_string("data", "prices") {
            return Ok(PriceSource::File(PathBuf::from(path.trim())));
        }
        if let Some(dir) = config.get_string("data", "directory") {
            let symbol = config
                .get_string("data", "symbol")
                .ok_or_else(|| ReviewError::ConfigMissing {
                    section: "data".into(),
                    key: "symbol".into(),
                })?;
            return Ok(PriceSource::Directory {
                path: PathBuf::from(dir.trim()),
                symbol: symbol.trim().to_string(),
            });
        }
        return Err(ReviewError::data_source(
            "no price source: pass --prices, --synthetic, or set [data] in the config",
        ));
    }

    validate_synthetic_config(config)?;
    let mut synthetic = SyntheticConfig::from_config(config);
    if let Some(days) = args.days {
        synthetic.days = days;
    }
    if let Some(seed) = args.seed {
        synthetic.seed = seed;
    }
    if synthetic.days == 0 {
        return Err(ReviewError::configuration("days must be at least 1"));
    }
    Ok(PriceSource::Synthetic(synthetic))
}

pub fn load_series(source: &PriceSource) -> Result<Vec<PricePoint>, ReviewError> {
    match source {
        PriceSource::File(path) => {
            info!("reading prices from {}", path.display());
            CsvAdapter::read_file(path)
        }
        PriceSource::Directory { path, symbol } => {
            info!("reading {} prices from {}", symbol, path.display());
            CsvAdapter::new(path.clone()).fetch_series(symbol)
        }
        PriceSource::Synthetic(config) => {
            info!(
                days = config.days,
                seed = config.seed,
                "generating synthetic prices"
            );
            SyntheticAdapter::new(config.clone()).generate()
        }
    }
}

pub fn simulate(args: &SimulateArgs) -> Result<(Report, FileConfigAdapter), ReviewError> {
    // Stage 1: settings
    let config = load_config(args.config.as_ref())?;
    let sim_config = build_simulation_config(&config)?;

    // Stage 2: strategy, rejected before any data is touched
    let spec = load_strategy(&args.strategy)?;
    info!("strategy: {}", spec.name);

    // Stage 3: prices
    let source = resolve_price_source(args, &config)?;
    let series = load_series(&source)?;
    info!("processing {} periods", series.len());

    // Stage 4: simulate and review
    let report = simulation::simulate_and_review(&spec, &series, &sim_config)?;
    Ok((report, config))
}

fn run_simulate(args: &SimulateArgs) -> Result<(), ReviewError> {
    let (report, config) = simulate(args)?;

    print_summary(&report);

    let adapter = JsonReportAdapter::new(config.get_bool("report", "pretty", true));
    match &args.output {
        Some(path) => {
            adapter.write(&report, &path.display().to_string())?;
            eprintln!("\nReport written to: {}", path.display());
        }
        None => println!("{}", adapter.render(&report)?),
    }
    Ok(())
}

pub fn print_summary(report: &Report) {
    let m = &report.performance_metrics;
    eprintln!("\n=== {} ===", report.strategy_name);
    eprintln!(
        "Period:           {} to {}",
        report.simulation_period.start, report.simulation_period.end
    );
    eprintln!("Final Value:      {:.2}", m.final_value);
    eprintln!("Total Return:     {:.2}%", m.total_return_percent);
    eprintln!("Total Trades:     {}", m.total_trades);
    eprintln!("Win Rate:         {:.2}%", m.win_rate_percent);

    if !report.ai_coaching_insights.is_empty() {
        eprintln!("\n=== Insights ===");
        for insight in &report.ai_coaching_insights {
            eprintln!("  - {}", insight);
        }
    }

    if !report.transaction_history.is_empty() {
        eprintln!("\n=== First Transactions ===");
        for tx in &report.transaction_history {
            eprintln!("  {}", tx);
        }
    }
}

fn run_validate(strategy_path: &Path) -> Result<(), ReviewError> {
    eprintln!("Validating strategy: {}", strategy_path.display());
    let spec = load_strategy(strategy_path)?;

    eprintln!("\nName: {}", spec.name);
    eprintln!("Entry: {}", spec.entry_conditions);
    eprintln!("Exit:  {}", spec.exit_conditions);
    eprintln!(
        "Sizing: {} (max {} positions), rebalancing {}",
        spec.position_sizing.sizing_method, spec.position_sizing.max_positions, spec.rebalancing
    );

    let factors = spec.custom_factors();
    if !factors.is_empty() {
        let names: Vec<&str> = factors.into_iter().collect();
        eprintln!("Required price factors: {}", names.join(", "));
    }

    eprintln!("\nStrategy is valid.");
    Ok(())
}

fn run_template(name: &str) -> Result<(), ReviewError> {
    let which: Template = name.parse()?;
    println!("{}", workshop::template(which).to_json_pretty()?);
    Ok(())
}

fn run_create(
    user: &str,
    style: Option<&str>,
    risk: Option<&str>,
    horizon: Option<&str>,
) -> Result<(), ReviewError> {
    let answers = Answers::parse(style, risk, horizon)?;
    let doc = workshop::build_strategy(&answers, user)?;
    println!("{}", doc.to_json_pretty()?);
    Ok(())
}

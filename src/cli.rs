//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{
    validate_backtest_config, validate_live_config, validate_portfolio_config,
    validate_strategy_config,
};
use crate::domain::error::ActiveDcaError;
use crate::domain::metrics::BacktestSummary;
use crate::domain::portfolio::PortfolioState;
use crate::domain::strategy::{Decision, StrategyConfig, StrategyEngine};
use crate::domain::valuation::LiveIndicator;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::SeriesPort;
use crate::ports::indicator_port::IndicatorProvider;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;
pub const DEFAULT_DATA_FILE: &str = "historical_data.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "backtest_results.csv";

#[derive(Parser, Debug)]
#[command(name = "activedca", about = "Indicator-driven Bitcoin DCA backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a historical series
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Input series CSV (overrides [backtest] data_file)
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Ledger CSV to write (overrides [backtest] output_file)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Starting cash (overrides [backtest] initial_cash)
        #[arg(long)]
        cash: Option<f64>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch the live indicator and report today's decision
    Live {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            output,
            cash,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, data.as_deref(), output.as_deref(), cash)
            } else {
                run_backtest_command(&config, data.as_deref(), output.as_deref(), cash)
            }
        }
        Command::Live { config } => run_live(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: ActiveDcaError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    log::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(fail)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSettings {
    pub initial_cash: f64,
    pub data_file: PathBuf,
    pub output_file: PathBuf,
}

pub fn build_strategy_config(adapter: &dyn ConfigPort) -> Result<StrategyConfig, ActiveDcaError> {
    validate_strategy_config(adapter)
}

pub fn build_backtest_settings(
    adapter: &dyn ConfigPort,
    data_override: Option<&Path>,
    output_override: Option<&Path>,
    cash_override: Option<f64>,
) -> Result<BacktestSettings, ActiveDcaError> {
    let initial_cash = match cash_override {
        Some(cash) => cash,
        None => adapter.require_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH)?,
    };
    if !initial_cash.is_finite() || initial_cash < 0.0 {
        return Err(ActiveDcaError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be non-negative".to_string(),
        });
    }

    let data_file = data_override.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("backtest", "data_file")
                .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()),
        )
    });
    let output_file = output_override.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("backtest", "output_file")
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string()),
        )
    });

    Ok(BacktestSettings {
        initial_cash,
        data_file,
        output_file,
    })
}

pub fn build_portfolio(adapter: &dyn ConfigPort) -> Result<PortfolioState, ActiveDcaError> {
    validate_portfolio_config(adapter)?;
    Ok(PortfolioState::with_position(
        adapter.require_double("portfolio", "cash", 0.0)?,
        adapter.require_double("portfolio", "position", 0.0)?,
    ))
}

/// Load the series, run it, write the ledger. Returns the end-of-run summary.
pub fn run_backtest_pipeline(
    series: &dyn SeriesPort,
    report: &dyn ReportPort,
    engine: &StrategyEngine,
    settings: &BacktestSettings,
) -> Result<BacktestSummary, ActiveDcaError> {
    let samples = series.load_series()?;
    if samples.is_empty() {
        return Err(ActiveDcaError::NoData {
            path: settings.data_file.display().to_string(),
        });
    }
    log::info!("Loaded {} samples", samples.len());

    let mut state = PortfolioState::new(settings.initial_cash);
    log::info!(
        "Running backtest: {} to {}, initial cash {:.2}",
        samples[0].date,
        samples[samples.len() - 1].date,
        settings.initial_cash
    );
    let records = run_backtest(&samples, engine, &mut state)?;

    report.write(&records, &settings.output_file)?;
    log::info!("Ledger written to {}", settings.output_file.display());

    Ok(BacktestSummary::compute(settings.initial_cash, &records))
}

pub fn print_summary(summary: &BacktestSummary) {
    eprintln!("\n=== Backtest Results ===");
    eprintln!("Days:                  {}", summary.days);
    eprintln!(
        "Actions:               {} buy, {} dip-buy, {} sell, {} hold",
        summary.buys, summary.dip_buys, summary.sells, summary.holds
    );
    eprintln!("Initial Cash:          {:.2}", summary.initial_cash);
    eprintln!("Cumulative Investment: {:.2}", summary.cumulative_investment);
    eprintln!("Final Cash:            {:.2}", summary.final_cash);
    eprintln!("Final Position:        {:.5} BTC", summary.final_position);
    eprintln!("Portfolio Value:       {:.2}", summary.final_value);
    eprintln!("Total Return:          {:.2}%", summary.total_return * 100.0);
    eprintln!("Peak Value:            {:.2}", summary.peak_value);
    eprintln!("Max Drawdown:          -{:.1}%", summary.max_drawdown * 100.0);
}

fn run_backtest_command(
    config_path: &Path,
    data_override: Option<&Path>,
    output_override: Option<&Path>,
    cash_override: Option<f64>,
) -> ExitCode {
    // Stage 1: Load config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate and build strategy
    if let Err(e) = validate_backtest_config(&adapter) {
        return fail(e);
    }
    let engine = match build_strategy_config(&adapter).and_then(StrategyEngine::new) {
        Ok(e) => e,
        Err(e) => return fail(e),
    };

    // Stage 3: Resolve input/output
    let settings =
        match build_backtest_settings(&adapter, data_override, output_override, cash_override) {
            Ok(s) => s,
            Err(e) => return fail(e),
        };

    // Stage 4: Run
    let series = CsvAdapter::new(settings.data_file.clone());
    match run_backtest_pipeline(&series, &CsvReportAdapter, &engine, &settings) {
        Ok(summary) => {
            print_summary(&summary);
            eprintln!("\nLedger written to: {}", settings.output_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

pub fn run_dry_run(
    config_path: &Path,
    data_override: Option<&Path>,
    output_override: Option<&Path>,
    cash_override: Option<f64>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        return fail(e);
    }
    let strategy = match build_strategy_config(&adapter) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let settings =
        match build_backtest_settings(&adapter, data_override, output_override, cash_override) {
            Ok(s) => s,
            Err(e) => return fail(e),
        };
    eprintln!("Config validated successfully");

    print_strategy(&strategy);
    eprintln!("\nBacktest:");
    eprintln!("  initial_cash:       {}", settings.initial_cash);
    eprintln!("  data_file:          {}", settings.data_file.display());
    eprintln!("  output_file:        {}", settings.output_file.display());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn print_strategy(strategy: &StrategyConfig) {
    eprintln!("\nStrategy:");
    eprintln!("  stop_investing:     {}", strategy.stop_investing);
    eprintln!("  sell_threshold:     {}", strategy.sell_threshold);
    eprintln!("  dip_buy_threshold:  {}", strategy.dip_buy_threshold);
    eprintln!("  invest_percentage:  {}", strategy.invest_percentage);
    eprintln!("  daily_investment:   {}", strategy.daily_investment);
    eprintln!("  weight_coefficient: {}", strategy.weight_coefficient);
}

/// Fetch a live reading and, only if it succeeds, apply one decision to `state`.
pub fn run_live_decision(
    provider: &dyn IndicatorProvider,
    engine: &StrategyEngine,
    state: &mut PortfolioState,
) -> Result<(LiveIndicator, Decision), ActiveDcaError> {
    let reading = provider.fetch_current_indicator()?;
    log::info!(
        "Live indicator {:.3} at price {:.2}",
        reading.indicator,
        reading.price
    );
    let decision = engine.decide(reading.indicator, reading.price, state)?;
    Ok((reading, decision))
}

fn run_live(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let engine = match build_strategy_config(&adapter).and_then(StrategyEngine::new) {
        Ok(e) => e,
        Err(e) => return fail(e),
    };
    let mut state = match build_portfolio(&adapter) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    if let Err(e) = validate_live_config(&adapter) {
        return fail(e);
    }

    #[cfg(feature = "live")]
    {
        use crate::adapters::http_indicator_adapter::HttpIndicatorAdapter;

        let provider = match HttpIndicatorAdapter::from_config(&adapter) {
            Ok(p) => p,
            Err(e) => return fail(e),
        };

        match run_live_decision(&provider, &engine, &mut state) {
            Ok((reading, decision)) => {
                println!("indicator: {:.3}", reading.indicator);
                println!("price:     {:.2}", reading.price);
                println!("action:    {}", decision.action);
                println!("amount:    {:.2}", decision.operation_amount);
                println!("cash:      {:.2}", state.cash());
                println!("position:  {:.5}", state.position());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                eprintln!("no decision made; holdings unchanged");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "live"))]
    {
        let _ = (&engine, &mut state);
        eprintln!("error: live feature is required for live");
        ExitCode::from(1)
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_strategy_config(&adapter) {
        Ok(strategy) => print_strategy(&strategy),
        Err(e) => return fail(e),
    }
    eprintln!("\nStrategy configuration is valid.");
    ExitCode::SUCCESS
}

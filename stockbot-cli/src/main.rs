//! Stockbot CLI: RSI + candlestick signals from the command line.
//!
//! Commands:
//! - `analyze`: signal for one ticker
//! - `compare`: signals for a comma-separated list plus rebased closes
//! - `scan`: market summary over a ticker list (default: 12 large caps)
//! - `portfolio`: P/L for a cost-basis ledger
//! - `config`: print the effective configuration as TOML

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use stockbot_core::data::{DataProvider, Interval, Period};
use stockbot_core::SignalEngine;
use stockbot_runner::reporting::summary::detail;
use stockbot_runner::{
    analyze_batch, analyze_ticker, build_provider, default_universe, export_json, load_ledger,
    logging, normalize_ticker, parse_ticker_list, render_portfolio, run_portfolio, BatchOptions,
    MarketSummary, Preset, ProviderKind, StockbotConfig,
};

#[derive(Parser)]
#[command(
    name = "stockbot",
    version,
    about = "Stockbot: RSI + candlestick trading signals"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Named preset: service, scanner, portfolio. Defaults per command.
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Data provider: yahoo, csv, synthetic.
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Directory of <TICKER>.csv files (implies --provider csv).
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    /// Look-back period (1mo, 6mo, 1y, ...).
    #[arg(long, global = true)]
    period: Option<String>,

    /// Bar interval (1d, 1wk, 1mo).
    #[arg(long, global = true)]
    interval: Option<String>,

    /// Worker threads for multi-ticker commands (1 = sequential).
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Print JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Also write the JSON result to this file.
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG wins.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Signal for a single ticker.
    Analyze {
        /// Ticker symbol (e.g., AAPL).
        ticker: String,
    },
    /// Signals for several tickers plus a rebased comparison.
    Compare {
        /// Comma-separated tickers (e.g., AAPL,MSFT,NVDA).
        tickers: String,
    },
    /// Market scan grouped into BUY / SELL / HOLD / SKIPPED.
    Scan {
        /// Tickers to scan. Defaults to the built-in 12-ticker universe.
        tickers: Vec<String>,
    },
    /// Unrealized P/L for a portfolio ledger.
    Portfolio {
        /// CSV with header ticker,buy_price,shares.
        #[arg(long, default_value = "portfolio.csv")]
        ledger: PathBuf,
    },
    /// Print the effective configuration as TOML.
    Config,
}

impl Commands {
    fn default_preset(&self) -> Preset {
        match self {
            Commands::Analyze { .. } | Commands::Compare { .. } | Commands::Config => {
                Preset::Service
            }
            Commands::Scan { .. } => Preset::Scanner,
            Commands::Portfolio { .. } => Preset::Portfolio,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli.common, cli.command.default_preset())?;
    logging::init(&config.logging.level, config.logging.json);

    let common = &cli.common;
    match cli.command {
        Commands::Analyze { ticker } => run_analyze(&config, common, &ticker),
        Commands::Compare { tickers } => run_compare(&config, common, &tickers),
        Commands::Scan { tickers } => run_scan(&config, common, tickers),
        Commands::Portfolio { ledger } => run_portfolio_cmd(&config, common, ledger),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// File or preset, then command-line overrides, then validation.
fn resolve_config(args: &CommonArgs, default_preset: Preset) -> Result<StockbotConfig> {
    let mut config = match (&args.config, &args.preset) {
        (Some(_), Some(_)) => bail!("--config and --preset are mutually exclusive"),
        (Some(path), None) => StockbotConfig::from_file(path)?,
        (None, Some(name)) => StockbotConfig::preset(name.parse()?),
        (None, None) => StockbotConfig::preset(default_preset),
    };

    if let Some(p) = &args.provider {
        config.data.provider = p.parse()?;
    }
    if let Some(dir) = &args.csv_dir {
        config.data.csv_dir = Some(dir.clone());
        if args.provider.is_none() {
            config.data.provider = ProviderKind::Csv;
        }
    }
    if let Some(p) = &args.period {
        config.data.period = p.parse::<Period>()?;
    }
    if let Some(i) = &args.interval {
        config.data.interval = i.parse::<Interval>()?;
    }
    if let Some(w) = args.workers {
        config.batch.workers = w;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn provider_and_engine(config: &StockbotConfig) -> Result<(Arc<dyn DataProvider>, SignalEngine)> {
    let provider = build_provider(&config.data).context("setting up data provider")?;
    tracing::info!(
        provider = provider.name(),
        policy = ?config.engine.policy,
        period = %config.data.period,
        interval = %config.data.interval,
        "starting"
    );
    Ok((provider, SignalEngine::new(config.engine.clone())))
}

fn emit_json<T: serde::Serialize>(common: &CommonArgs, value: &T) -> Result<()> {
    if let Some(path) = &common.output {
        export_json(path, value)?;
    }
    if common.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

fn run_analyze(config: &StockbotConfig, common: &CommonArgs, ticker: &str) -> Result<()> {
    let ticker = normalize_ticker(ticker)?;
    let (provider, engine) = provider_and_engine(config)?;
    let (signal, _) = analyze_ticker(
        provider.as_ref(),
        &engine,
        &ticker,
        config.data.period,
        config.data.interval,
    );

    emit_json(common, &signal)?;
    if !common.json {
        print!("{}", detail(&signal));
    }
    Ok(())
}

fn run_compare(config: &StockbotConfig, common: &CommonArgs, tickers: &str) -> Result<()> {
    let tickers = parse_ticker_list(tickers)?;
    let (provider, engine) = provider_and_engine(config)?;
    let report = analyze_batch(
        provider.as_ref(),
        &engine,
        &tickers,
        &BatchOptions::from_config(config),
    );

    emit_json(common, &report)?;
    if !common.json {
        for signal in &report.results {
            print!("{}", detail(signal));
        }
        println!("\nRebased closes (first = 100):");
        for (ticker, series) in &report.comparison.series {
            let last = series.values.last().copied().unwrap_or(100.0);
            println!("  {ticker:<8} {:>5} points, last {last:>8.2}", series.values.len());
        }
    }
    Ok(())
}

fn run_scan(config: &StockbotConfig, common: &CommonArgs, tickers: Vec<String>) -> Result<()> {
    let tickers = if tickers.is_empty() {
        default_universe()
    } else {
        tickers
    };
    let (provider, engine) = provider_and_engine(config)?;
    let report = analyze_batch(
        provider.as_ref(),
        &engine,
        &tickers,
        &BatchOptions::from_config(config),
    );

    emit_json(common, &report)?;
    if !common.json {
        print!("{}", MarketSummary::from_signals(&report.results).render());
    }
    Ok(())
}

fn run_portfolio_cmd(config: &StockbotConfig, common: &CommonArgs, ledger: PathBuf) -> Result<()> {
    let ledger = load_ledger(&ledger)?;
    if ledger.positions.is_empty() && ledger.errors.is_empty() {
        bail!("ledger has no positions");
    }
    for e in &ledger.errors {
        tracing::warn!(error = %e, "ledger row skipped");
    }

    let (provider, engine) = provider_and_engine(config)?;
    let report = run_portfolio(
        provider.as_ref(),
        &engine,
        &ledger,
        &BatchOptions::from_config(config),
    );

    emit_json(common, &report)?;
    if !common.json {
        print!("{}", render_portfolio(&report));
    }
    Ok(())
}

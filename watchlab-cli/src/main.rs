//! WatchLab CLI: analyze, scan, and regime commands.
//!
//! Commands:
//! - `analyze`: full indicator snapshot and scores for one symbol
//! - `scan`: entry/exit gate sweep over a watchlist
//! - `regime`: market regime gauge over SPY, QQQ, and the VIX

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use watchlab_core::analysis::PriceSide;
use watchlab_scan::{
    AnalysisReport, BarProvider, CsvBarProvider, RegimeReport, ScanConfig, Scanner, SignalSweep,
    SyntheticBarProvider,
};

#[derive(Parser)]
#[command(name = "watchlab", about = "WatchLab CLI: watchlist technical scanner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full indicator snapshot and scores for one symbol.
    Analyze {
        /// Symbol to analyze (e.g. AAPL).
        symbol: String,

        /// Print the full snapshot as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory with {SYMBOL}.csv history files. Defaults to ./data.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Entry/exit gate sweep over a watchlist.
    Scan {
        /// Symbols to sweep (comma-separated). Defaults to the config watchlist.
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Print the sweep as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory with {SYMBOL}.csv history files. Defaults to ./data.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Market regime gauge over SPY, QQQ, and the VIX.
    Regime {
        /// Symbol whose history stands in for the S&P 500.
        #[arg(long, default_value = "SPY")]
        spy: String,

        /// Symbol whose history stands in for the Nasdaq 100.
        #[arg(long, default_value = "QQQ")]
        qqq: String,

        /// Symbol whose history stands in for the volatility index.
        #[arg(long, default_value = "VIX")]
        vix: String,

        /// Print the report as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory with {SYMBOL}.csv history files. Defaults to ./data.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            json,
            config,
            data_dir,
            synthetic,
        } => {
            let scanner = build_scanner(config, data_dir, synthetic)?;
            run_analyze(&scanner, &symbol, json)
        }
        Commands::Scan {
            symbols,
            json,
            config,
            data_dir,
            synthetic,
        } => {
            let scanner = build_scanner(config, data_dir, synthetic)?;
            run_scan(&scanner, symbols, json)
        }
        Commands::Regime {
            spy,
            qqq,
            vix,
            json,
            config,
            data_dir,
            synthetic,
        } => {
            let scanner = build_scanner(config, data_dir, synthetic)?;
            run_regime(&scanner, &spy, &qqq, &vix, json)
        }
    }
}

fn build_scanner(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    synthetic: bool,
) -> Result<Scanner> {
    let mut config = match config_path {
        Some(path) => ScanConfig::from_path(path)?,
        None => ScanConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.data_dir = Some(dir);
    }

    let provider: Box<dyn BarProvider> = if synthetic {
        Box::new(SyntheticBarProvider::default())
    } else {
        let dir = config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"));
        Box::new(CsvBarProvider::new(dir))
    };

    Ok(Scanner::new(provider, config))
}

fn run_analyze(scanner: &Scanner, symbol: &str, json: bool) -> Result<()> {
    let report = scanner.analyze_symbol(symbol)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_analysis(&report);
    Ok(())
}

fn run_scan(scanner: &Scanner, symbols: Vec<String>, json: bool) -> Result<()> {
    let symbols = if symbols.is_empty() {
        scanner.config().watchlist.clone()
    } else {
        symbols
    };
    if symbols.is_empty() {
        bail!("no symbols: pass --symbols or set a watchlist in the config");
    }

    let sweep = scanner.scan_signals(&symbols)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sweep)?);
        return Ok(());
    }

    print_sweep(&sweep);
    Ok(())
}

fn run_regime(scanner: &Scanner, spy: &str, qqq: &str, vix: &str, json: bool) -> Result<()> {
    let report = scanner.market_regime_for(spy, qqq, vix)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_regime(&report);
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn print_analysis(report: &AnalysisReport) {
    let s = &report.result;
    println!();
    println!("=== {} ===", s.symbol);
    println!("Price:          {:.2} ({:+.2}%)", s.price, s.change);
    println!("Scanned:        {}", report.scanned_at);
    println!();
    println!("--- Trend ---");
    println!(
        "SMA200/50/20:   {:.2} / {:.2} / {:.2}",
        s.moving_averages.sma200, s.moving_averages.sma50, s.moving_averages.sma20
    );
    println!(
        "EMA21/8:        {:.2} / {:.2}",
        s.moving_averages.ema21, s.moving_averages.ema8
    );
    println!(
        "Golden cross:   {} (trend score {:+})",
        yes_no(s.moving_averages.golden_cross),
        s.moving_averages.trend_score
    );
    println!(
        "Vs SMA200:      {}",
        match s.moving_averages.price_vs_200 {
            PriceSide::Above => "above",
            PriceSide::Below => "below",
        }
    );
    println!("Structure:      {:?}", s.smc.trend);
    println!(
        "Darvas:         {:?} (top {:.2}, bottom {:.2}, {} days)",
        s.darvas_box.status, s.darvas_box.top, s.darvas_box.bottom, s.darvas_box.formation_days
    );
    println!();
    println!("--- Momentum ---");
    println!(
        "MACD:           {:.4} / signal {:.4} / hist {:.4}",
        s.macd.line, s.macd.signal, s.macd.histogram
    );
    println!("MACD posture:   {}", s.macd.trend.label());
    println!("RSI:            {:.2} ({:?})", s.rsi.value, s.rsi.status);
    println!(
        "ADX:            {:.2} ({:?})",
        s.adx.value, s.adx.trend_strength
    );
    println!(
        "Bollinger:      {:.2} / {:.2} / {:.2} ({:?}, width {:.2}%)",
        s.bollinger.upper,
        s.bollinger.middle,
        s.bollinger.lower,
        s.bollinger.position,
        s.bollinger.width
    );
    println!(
        "Squeeze:        {} (momentum {:.5}, {:?})",
        yes_no(s.ttm_squeeze.squeeze_on),
        s.ttm_squeeze.momentum,
        s.ttm_squeeze.direction
    );
    println!(
        "Volume:         {} vs avg {} ({:.2}x)",
        s.volume.current, s.volume.avg20, s.volume.ratio
    );
    println!();
    println!("--- Signals ---");
    println!(
        "Stop-falling:   {}/{}",
        s.stop_falling.count, s.stop_falling.total
    );
    for signal in &s.stop_falling.signals {
        println!("  - {signal}");
    }
    println!(
        "Bottom:         {}/{}",
        s.bottom_signals.count, s.bottom_signals.total
    );
    for signal in &s.bottom_signals.signals {
        println!("  - {signal}");
    }
    println!(
        "Strategies:     {} entry / {} exit",
        s.strategies.entry_count, s.strategies.exit_count
    );
    println!();
    println!("--- Risk ---");
    println!(
        "Stop loss:      {:.2} (risk {:.2}%)",
        s.stop_loss.recommended, s.stop_loss.risk_percent
    );
    println!();
    println!("--- Scores ---");
    println!(
        "Mimi:           {} (trend {} / momentum {} / technical {})",
        s.mimi_score.total, s.mimi_score.trend, s.mimi_score.momentum, s.mimi_score.technical
    );
    println!("Verdict:        {}", s.mimi_score.verdict);
    println!(
        "Overall:        {:+.1} ({})",
        s.overall_score.score, s.overall_score.rating
    );
    for reason in &s.overall_score.reasons {
        println!("  - {reason}");
    }
    println!();
}

fn print_sweep(sweep: &SignalSweep) {
    println!();
    println!("=== Signal Sweep ===");
    println!("Scanned:        {}", sweep.scanned_at);
    println!("Symbols:        {}", sweep.results.len());
    println!();
    println!(
        "{:<8} {:>10} {:>8} {:<6} {:>7} {:>6} {:>7}",
        "Symbol", "Price", "Chg%", "Trend", "Entries", "Exits", "RSI"
    );
    println!("{}", "-".repeat(58));
    for row in &sweep.results {
        println!(
            "{:<8} {:>10.2} {:>8.2} {:<6} {:>7} {:>6} {:>7.1}",
            row.symbol,
            row.price,
            row.change,
            format!("{:?}", row.trend),
            row.entry_count,
            row.exit_count,
            row.signals.rsi.value
        );
    }
    println!();
}

fn print_regime(report: &RegimeReport) {
    let overall = &report.overall;
    println!();
    println!("=== Market Regime ===");
    println!("Scanned:        {}", report.scanned_at);
    println!(
        "Score:          {:+} ({})",
        overall.score,
        overall.stance.label()
    );
    println!("Suggestion:     {}", overall.suggestion);
    println!();
    println!(
        "VIX:            {:.2} ({:?}, {:?}) ma20 {:.2} / ma50 {:.2}",
        report.vix.current, report.vix.status, report.vix.trend, report.vix.ma20, report.vix.ma50
    );
    for (name, index) in [("SPY", &report.spy), ("QQQ", &report.qqq)] {
        println!(
            "{}:            {:.2} ({:+.2}%) RSI {:.1}, {:+.1}% vs SMA200",
            name, index.price, index.change_percent, index.rsi, index.dist_from_200
        );
    }
    println!();
    println!("--- Breakdown ---");
    for factor in &overall.breakdown {
        println!("{:<14} {:+2}  {}", factor.label, factor.score, factor.note);
    }
    println!();
}

//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_export::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::SvgChartAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    read_data_dir, read_date_range, read_risk_free_rate, read_spans, read_symbol,
    validate_backtest_config,
};
use crate::domain::error::MacdError;
use crate::domain::indicator::MacdParams;
use crate::domain::metrics::PerformanceReport;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "macdtrader", about = "MACD crossover backtester")]
pub struct Cli {
    /// Show debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        fast: Option<usize>,
        #[arg(long)]
        slow: Option<usize>,
        #[arg(long)]
        signal: Option<usize>,
        /// Write an SVG chart of prices with buy/sell markers
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Write the per-bar indicator/signal/return table as CSV
        #[arg(long)]
        export: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols available in the data directory
    Symbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub symbol: Option<String>,
    pub fast: Option<usize>,
    pub slow: Option<usize>,
    pub signal: Option<usize>,
}

/// Output locations for the report collaborators.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub chart: Option<PathBuf>,
    pub export: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            fast,
            slow,
            signal,
            chart,
            export,
            dry_run,
        } => {
            let overrides = Overrides {
                symbol,
                fast,
                slow,
                signal,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest_command(&config, &overrides, Outputs { chart, export })
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Symbols { config } => run_symbols(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn fail(err: &MacdError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

/// Resolve a backtest from the config with CLI values taking precedence.
///
/// Keys an override supplies are never read from the config, and the spans
/// are validated once, after merging.
pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestConfig, MacdError> {
    let symbol = match &overrides.symbol {
        Some(s) => s.trim().to_uppercase(),
        None => read_symbol(adapter)?,
    };
    if symbol.is_empty() {
        return Err(MacdError::invalid_parameter("symbol", "symbol must not be empty"));
    }

    let from_config = read_spans(adapter)?;
    let params = MacdParams {
        fast: overrides.fast.unwrap_or(from_config.fast),
        slow: overrides.slow.unwrap_or(from_config.slow),
        signal: overrides.signal.unwrap_or(from_config.signal),
    };
    params.validate()?;

    let (start_date, end_date) = read_date_range(adapter)?;

    Ok(BacktestConfig {
        symbol,
        start_date,
        end_date,
        params,
        risk_free_rate: read_risk_free_rate(adapter)?,
    })
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, MacdError> {
    read_data_dir(config).map(CsvAdapter::new)
}

fn run_backtest_command(config_path: &Path, overrides: &Overrides, outputs: Outputs) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Resolve and validate parameters, CLI flags first
    let bt_config = match build_backtest_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    // Stage 3: Report destinations, CLI flags first
    let outputs = Outputs {
        chart: outputs
            .chart
            .or_else(|| adapter.get_string("report", "chart_path").map(PathBuf::from)),
        export: outputs
            .export
            .or_else(|| adapter.get_string("report", "export_path").map(PathBuf::from)),
    };

    let data_port = match data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    run_backtest_pipeline(&data_port, &bt_config, &outputs)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    outputs: &Outputs,
) -> ExitCode {
    // Stage 4: Fetch prices
    eprintln!(
        "Fetching {} from {} to {} (exclusive)",
        bt_config.symbol, bt_config.start_date, bt_config.end_date
    );
    let prices = match data_port.fetch_prices(
        &bt_config.symbol,
        bt_config.start_date,
        bt_config.end_date,
    ) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    // Stage 5: Run the pipeline
    eprintln!("Running {} over {} bars", bt_config.params, prices.len());
    let result = match run_backtest(&prices, &bt_config.params, bt_config.risk_free_rate) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    // Stage 6: Console summary
    eprintln!("\n=== {} Results ===", bt_config.symbol);
    eprint!("{}", format_report(&result.report));
    eprintln!(
        "Trades:                {} buys, {} sells",
        result.trades(),
        result.signals.sell_count()
    );

    // Stage 7: Reports
    write_reports(&result, &bt_config.symbol, outputs)
}

/// Render the report the way the console summary prints it.
pub fn format_report(report: &PerformanceReport) -> String {
    let sharpe = match report.sharpe_ratio {
        Some(s) => format!("{:.3}", s),
        None => "undefined (zero variance)".to_string(),
    };
    format!(
        "Total Market Return:   {:.2}%\n\
         Total Strategy Return: {:.2}%\n\
         Sharpe Ratio:          {}\n\
         Max Drawdown:          {:.2}%\n",
        report.total_market_return_pct,
        report.total_strategy_return_pct,
        sharpe,
        report.max_drawdown_pct
    )
}

fn write_reports(result: &BacktestResult<'_>, symbol: &str, outputs: &Outputs) -> ExitCode {
    let writers: [(&Option<PathBuf>, &dyn ReportPort, &str); 2] = [
        (&outputs.chart, &SvgChartAdapter, "Chart"),
        (&outputs.export, &CsvExportAdapter, "Export"),
    ];

    for (path, writer, label) in writers {
        let Some(path) = path else { continue };
        if let Err(e) = writer.write(result, symbol, path) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return (&e).into();
        }
        eprintln!("{} written to: {}", label, path.display());
    }
    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let bt_config = match build_backtest_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let data_dir = match read_data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    eprintln!("\nBacktest plan:");
    eprintln!("  symbol:         {}", bt_config.symbol);
    eprintln!(
        "  period:         {} to {} (exclusive)",
        bt_config.start_date, bt_config.end_date
    );
    eprintln!("  indicator:      {}", bt_config.params);
    eprintln!("  risk-free rate: {} daily", bt_config.risk_free_rate);
    eprintln!("  data:           {}", data_dir.display());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    match validate_backtest_config(&adapter) {
        Ok(()) => {
            eprintln!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = match symbol
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
    {
        Some(s) => s.trim().to_uppercase(),
        None => {
            eprintln!("error: symbol is required (use --symbol or set in config)");
            return ExitCode::from(2);
        }
    };

    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    match adapter.get_data_range(&symbol) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", symbol, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", symbol);
            ExitCode::from(5)
        }
        Err(e) => fail(&e),
    }
}

fn run_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    match adapter.list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

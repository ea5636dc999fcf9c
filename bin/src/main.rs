//! Ronda CLI binary.
//!
//! Provides a command-line interface for the rolling PCA factor strategy
//! evaluator: a walk-forward backtest over a wide price table and a
//! mean-variance frontier report for the same universe.

mod data;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use ronda_eval::{BacktestConfig, backtest_with_config};
use ronda_portfolio::{
    efficient_frontier, estimate_delta_from_market, global_min_variance,
    implied_equilibrium_returns, max_sharpe, portfolio_return, portfolio_volatility,
};
use ronda_strategy::{StrategyConfig, generate_positions};
use ronda_traits::Panel;
use ronda_traits::stats::{nan_covariance, nan_mean};

#[derive(Parser)]
#[command(name = "ronda")]
#[command(about = "Rolling PCA factor strategy evaluator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the walk-forward factor strategy backtest on a price table
    Backtest {
        /// Price table (CSV; .tsv/.txt are read tab-separated). First column
        /// is the date, remaining columns are per-asset prices.
        data: PathBuf,

        /// Trailing estimation window in trading days
        #[arg(long, default_value_t = 252)]
        lookback: usize,

        /// Number of principal components retained as factors
        #[arg(long, default_value_t = 5)]
        factors: usize,

        /// Assets held on each side of the long-short book
        #[arg(long, default_value_t = 50)]
        top_n: usize,

        /// Trading periods per year used for annualization
        #[arg(long, default_value_t = 252)]
        periods_per_year: usize,

        /// Annualized risk-free rate for the Sharpe ratio
        #[arg(long, default_value_t = 0.0)]
        risk_free: f64,

        /// Run the per-asset regressions on a single thread
        #[arg(long)]
        serial: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the daily equity curve to this CSV file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Mean-variance frontier for the assets in a price table
    Frontier {
        /// Price table (CSV; .tsv/.txt are read tab-separated)
        data: PathBuf,

        /// Annualized risk-free rate for the tangency portfolio
        #[arg(long, default_value_t = 0.0)]
        risk_free: f64,

        /// Number of points swept along the frontier
        #[arg(long, default_value_t = 20)]
        points: usize,

        /// Trading periods per year used for annualization
        #[arg(long, default_value_t = 252)]
        periods_per_year: usize,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            data,
            lookback,
            factors,
            top_n,
            periods_per_year,
            risk_free,
            serial,
            format,
            out,
        } => {
            let strategy = StrategyConfig {
                lookback,
                num_factors: factors,
                top_n,
                parallel: !serial,
            };
            let engine = BacktestConfig {
                periods_per_year,
                risk_free_rate: risk_free,
            };
            run_backtest(&data, &strategy, &engine, &format, out.as_deref())?;
        }
        Commands::Frontier {
            data,
            risk_free,
            points,
            periods_per_year,
        } => {
            run_frontier(&data, risk_free, points, periods_per_year)?;
        }
    }

    Ok(())
}

fn run_backtest(
    data: &Path,
    strategy: &StrategyConfig,
    engine: &BacktestConfig,
    format: &str,
    out: Option<&Path>,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Factor Strategy Backtest                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Data:     {}", data.display());
    println!("Lookback: {} days", strategy.lookback);
    println!("Factors:  {}", strategy.num_factors);
    println!("Top N:    {} per side", strategy.top_n);
    println!();

    let prices = data::load_price_panel(data)
        .with_context(|| format!("failed to load price table {}", data.display()))?;
    println!(
        "Loaded {} dates for {} assets",
        prices.n_dates(),
        prices.n_assets()
    );
    println!();

    println!("Generating positions...");
    let positions = generate_positions(&prices, strategy)?;

    let held_days = positions
        .values()
        .outer_iter()
        .filter(|row| row.iter().any(|&v| v != 0.0))
        .count();
    println!("Positions held on {} of {} dates", held_days, prices.n_dates());
    println!();

    let result = backtest_with_config(&prices, &positions, engine)?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("BACKTEST RESULTS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if format == "json" {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| anyhow::anyhow!("JSON serialization error: {}", e))?;
        println!("{}", json);
    } else {
        let total_return = result.cum_returns.last().copied().unwrap_or(0.0);

        println!("Performance Metrics:");
        println!("  Total Return:      {:>10.2}%", total_return * 100.0);
        println!("  Annualized Return: {:>10.2}%", result.ann_return * 100.0);
        println!("  Annualized Vol:    {:>10.2}%", result.ann_vol * 100.0);
        if result.sharpe.is_finite() {
            println!("  Sharpe Ratio:      {:>10.2}", result.sharpe);
        } else {
            println!("  Sharpe Ratio:             N/A");
        }
        println!();

        println!("Drawdown:");
        println!(
            "  Max Drawdown:      {:>10.2}%",
            result.max_drawdown * 100.0
        );
        println!(
            "  Max DD Duration:   {:>10} periods",
            result.max_drawdown_duration
        );
        if let Some(trough) = result.dates.get(result.max_dd_index) {
            println!("  Trough Date:       {:>10}", trough);
        }
        println!();
    }

    if let Some(out_path) = out {
        write_equity_curve(out_path, &result)?;
        println!("Equity curve written to {}", out_path.display());
        println!();
    }

    Ok(())
}

fn write_equity_curve(path: &Path, result: &ronda_eval::BacktestResult) -> Result<()> {
    let dates: Vec<String> = result.dates.iter().map(ToString::to_string).collect();
    let mut frame = df!(
        "date" => dates,
        "daily_return" => result.daily_returns.clone(),
        "cum_return" => result.cum_returns.clone(),
    )?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(file).finish(&mut frame)?;
    Ok(())
}

fn run_frontier(data: &Path, risk_free: f64, points: usize, periods_per_year: usize) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Mean-Variance Frontier                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Data:      {}", data.display());
    println!("Risk-free: {:.2}%", risk_free * 100.0);
    println!();

    let prices = data::load_price_panel(data)
        .with_context(|| format!("failed to load price table {}", data.display()))?;
    println!(
        "Loaded {} dates for {} assets",
        prices.n_dates(),
        prices.n_assets()
    );
    println!();

    let returns = prices.sorted_by_date().ffill().simple_returns();
    let (mu, cov) = annualized_moments(&returns, periods_per_year);

    if mu.iter().any(|v| !v.is_finite()) || cov.iter().any(|v| !v.is_finite()) {
        bail!("some assets have too little overlapping history for moment estimates");
    }

    let gmv = global_min_variance(&cov)?;
    let tangency = max_sharpe(&mu, &cov, risk_free)?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("PORTFOLIO WEIGHTS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!("{:<12} {:>12} {:>12}", "Symbol", "GMV", "Tangency");
    println!("{}", "─".repeat(38));
    for (a, sym) in prices.symbols().iter().enumerate() {
        println!("{:<12} {:>12.4} {:>12.4}", sym, gmv[a], tangency[a]);
    }
    println!();

    println!(
        "GMV:      return {:>7.2}%  vol {:>7.2}%",
        portfolio_return(&gmv, &mu) * 100.0,
        portfolio_volatility(&gmv, &cov) * 100.0
    );
    println!(
        "Tangency: return {:>7.2}%  vol {:>7.2}%",
        portfolio_return(&tangency, &mu) * 100.0,
        portfolio_volatility(&tangency, &cov) * 100.0
    );
    println!();

    let frontier = efficient_frontier(&mu, &cov, points)?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("EFFICIENT FRONTIER ({} points)", points);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!("{:>12} {:>12} {:>12}", "Return", "Vol", "Sharpe");
    println!("{}", "─".repeat(38));
    for (r, v) in frontier
        .target_returns
        .iter()
        .zip(frontier.volatilities.iter())
    {
        let sharpe = if *v > 0.0 {
            format!("{:>12.2}", (r - risk_free) / v)
        } else {
            format!("{:>12}", "N/A")
        };
        println!("{:>11.2}% {:>11.2}% {}", r * 100.0, v * 100.0, sharpe);
    }
    println!();

    // Equilibrium view: what returns an equal-weight market implies
    let n = mu.len();
    let w_mkt = Array1::from_elem(n, 1.0 / n as f64);
    let mu_mkt = portfolio_return(&w_mkt, &mu);
    let var_mkt = portfolio_volatility(&w_mkt, &cov).powi(2);
    let delta = estimate_delta_from_market(mu_mkt, var_mkt, risk_free)?;
    let pi = implied_equilibrium_returns(delta, &cov, &w_mkt)?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("IMPLIED EQUILIBRIUM RETURNS (equal-weight market, delta = {:.2})", delta);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!("{:<12} {:>12}", "Symbol", "Implied");
    println!("{}", "─".repeat(25));
    for (a, sym) in prices.symbols().iter().enumerate() {
        println!("{:<12} {:>11.2}%", sym, pi[a] * 100.0);
    }
    println!();

    Ok(())
}

/// Annualized mean vector and covariance matrix of a daily return panel.
fn annualized_moments(returns: &Panel, periods_per_year: usize) -> (Array1<f64>, Array2<f64>) {
    let ppy = periods_per_year as f64;
    let mut mu = Array1::zeros(returns.n_assets());
    for a in 0..returns.n_assets() {
        let col: Vec<f64> = returns.values().column(a).to_vec();
        mu[a] = nan_mean(&col) * ppy;
    }
    let cov = nan_covariance(returns.values().view()) * ppy;
    (mu, cov)
}

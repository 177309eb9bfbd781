use anyhow::Context;
use backtester::{Backtester, DEFAULT_THRESHOLD};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, DataSource};
use core_types::Sample;
use indicatif::{ProgressBar, ProgressStyle};
use optimizer::{Optimization, Optimizer};
use std::path::PathBuf;
use std::time::Duration;

mod report;

/// The main entry point for the Sentinel backtesting tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard =
        configuration::init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Simulate(args) => handle_simulate(args, &config).await,
        Commands::Optimize(args) => handle_optimize(args, &config).await,
        Commands::Sweep(args) => handle_sweep(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backtests a sentiment-driven two-asset rebalancing strategy.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to ./sentinel.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation at a fixed threshold.
    Simulate(SimulateArgs),
    /// Find the threshold with the highest historical return.
    Optimize(OptimizeArgs),
    /// Print the return of every candidate threshold.
    Sweep(SourceArgs),
}

/// Where to read samples from. Overrides `[data_source]` in the configuration.
#[derive(Args)]
struct SourceArgs {
    /// Local JSON file of samples.
    #[arg(long, conflicts_with = "url")]
    data: Option<PathBuf>,

    /// HTTP endpoint returning a JSON array of samples.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args)]
struct SimulateArgs {
    /// Sentiment at or above which the strategy holds the volatile asset.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    threshold: f64,

    #[command(flatten)]
    source: SourceArgs,

    /// Print the result as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OptimizeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the result as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_simulate(args: SimulateArgs, config: &Config) -> anyhow::Result<()> {
    let samples = load_samples(&args.source, &config.data_source).await?;

    let backtester =
        Backtester::new(config.simulation).context("Invalid simulation parameters")?;
    let result = backtester
        .run(&samples, args.threshold)
        .context("Simulation failed")?;

    tracing::info!(
        threshold = args.threshold,
        trades = result.num_trades,
        strategy_return_pct = result.strategy_return_pct,
        "simulation complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", report::summary_table(&result));
        if !result.trades.is_empty() {
            println!("{}", report::trades_table(&result.trades));
        }
    }

    Ok(())
}

async fn handle_optimize(args: OptimizeArgs, config: &Config) -> anyhow::Result<()> {
    let samples = load_samples(&args.source, &config.data_source).await?;
    let optimization = run_optimizer(samples, config).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report::OptimizeReport::from(&optimization))?
        );
    } else {
        println!("Optimal threshold: {}", optimization.best_threshold);
        if let Some(best) = &optimization.best_result {
            println!("{}", report::summary_table(best));
        }
    }

    Ok(())
}

async fn handle_sweep(args: SourceArgs, config: &Config) -> anyhow::Result<()> {
    let samples = load_samples(&args, &config.data_source).await?;
    let optimization = run_optimizer(samples, config).await?;

    println!("{}", report::sweep_table(&optimization));
    Ok(())
}

/// Runs the sweep off the async runtime; it is pure CPU work.
async fn run_optimizer(samples: Vec<Sample>, config: &Config) -> anyhow::Result<Optimization> {
    let optimizer = Optimizer::new(config.simulation, config.optimizer.clone())
        .context("Invalid simulation parameters")?;

    let optimization = tokio::task::spawn_blocking(move || optimizer.optimize(&samples))
        .await
        .context("Optimizer task panicked")?
        .context("Threshold optimization failed")?;

    Ok(optimization)
}

/// Resolves the sample source from CLI flags, falling back to configuration.
async fn load_samples(args: &SourceArgs, configured: &DataSource) -> anyhow::Result<Vec<Sample>> {
    let mut data_source = configured.clone();
    if let Some(url) = &args.url {
        data_source.url = Some(url.clone());
        data_source.file = None;
    }
    if let Some(path) = &args.data {
        data_source.url = None;
        data_source.file = Some(path.clone());
    }

    let source = api_client::source_from_config(&data_source)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Loading samples from {}...", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let fetched = source.fetch_samples().await;
    spinner.finish_and_clear();

    let samples =
        fetched.with_context(|| format!("Failed to load samples from {}", source.describe()))?;
    tracing::info!(source = %source.describe(), count = samples.len(), "samples loaded");

    Ok(samples)
}

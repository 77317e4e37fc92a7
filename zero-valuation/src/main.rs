//! Zero Valuation - batch CLI for the valuation engine.
//!
//! Reads a JSON `ValuationInput` document and prints the requested result
//! as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use zero_common::config::Config;
use zero_common::config_loader::load_json_file;
use zero_common::logging::init_logging_with_exclusions;
use zero_valuation::monte_carlo::SimulationParams;
use zero_valuation::{
    compute_scorecard, recommend_method, run_monte_carlo, ValuationInput, ValuationService,
};

/// Startup valuation engine.
#[derive(Parser, Debug)]
#[command(name = "zero-valuation")]
#[command(version)]
#[command(about = "Scorecard, DCF, multiples and Monte Carlo valuation for startups", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.zero-valuation/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every method and print the full report
    Evaluate {
        /// Path to the input JSON
        input: String,
    },

    /// Seven-factor scorecard valuation
    Scorecard {
        /// Path to the input JSON
        input: String,
    },

    /// Monte Carlo simulation around a base value
    Simulate {
        /// Path to the input JSON
        input: String,

        /// Base valuation (defaults to the scorecard valuation)
        #[arg(long)]
        base_value: Option<f64>,

        /// Iteration count (overrides configuration)
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Seed for a reproducible run (overrides configuration)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Rank valuation methods for the available data
    Recommend {
        /// Path to the input JSON
        input: String,
    },
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config: Config = load_json_file(path)?;
            config.apply_env_overrides();
            config
        }
        None => Config::load_with_env()?,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );
    tracing::debug!("Zero Valuation v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Evaluate { input } => {
            let input: ValuationInput = load_json_file(&input)?;
            let report = ValuationService::new(&config).evaluate(input).await?;
            print_json(&report, cli.pretty)
        }
        Commands::Scorecard { input } => {
            let input: ValuationInput = load_json_file(&input)?;
            print_json(&compute_scorecard(&input)?, cli.pretty)
        }
        Commands::Simulate {
            input,
            base_value,
            iterations,
            seed,
        } => {
            let input: ValuationInput = load_json_file(&input)?;
            let base_value = match base_value {
                Some(v) => v,
                None => compute_scorecard(&input)
                    .context("No --base-value given and the scorecard could not produce one")?
                    .valuation,
            };
            let params = SimulationParams {
                iterations: iterations.unwrap_or(config.engine.iterations),
                seed: seed.or(config.engine.seed),
                chunk_size: config.engine.chunk_size,
                ..Default::default()
            };
            let result = tokio::task::spawn_blocking(move || {
                run_monte_carlo(&input, base_value, &params)
            })
            .await??;
            print_json(&result, cli.pretty)
        }
        Commands::Recommend { input } => {
            let input: ValuationInput = load_json_file(&input)?;
            print_json(&recommend_method(&input), cli.pretty)
        }
    }
}

//! salary-predictor - Data science salary estimator
//!
//! Serves the prediction dashboard and JSON API, or answers one-off
//! questions from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Start the dashboard on 0.0.0.0:8080
//! cargo run --release
//!
//! # Estimate one salary
//! ./salary-predictor predict --job-title "Data Scientist" --job-state CA \
//!     --rating 4.0 --age 10 --python --aws
//!
//! # Project growth
//! ./salary-predictor growth --base 100000 --rate 5 --years 5
//! ```
//!
//! # Environment Variables
//!
//! - `SALARY_CONFIG`: Path to the TOML config file
//! - `SALARY_SERVER_ADDR`: Bind address override
//! - `SALARY_CORS_ORIGINS`: Comma-separated CORS allow-list (development)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use salary_predictor::api::{create_app, DashboardState};
use salary_predictor::config::AppConfig;
use salary_predictor::encoder::{ToolFlags, UserSelection};
use salary_predictor::format::format_usd;
use salary_predictor::growth::project;
use salary_predictor::model::ModelBundle;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "salary-predictor")]
#[command(about = "Data science salary prediction dashboard and CLI")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides SALARY_CONFIG and ./salary_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the HTTP dashboard and API (default)
    Serve {
        /// Override the server address (default: "0.0.0.0:8080")
        #[arg(short, long, value_name = "HOST:PORT")]
        addr: Option<String>,
    },

    /// List the job titles and states the model was trained on
    Categories,

    /// Estimate a salary for one selection
    Predict {
        #[arg(long)]
        job_title: String,
        /// Two-letter state code, e.g. CA
        #[arg(long)]
        job_state: String,
        /// Company rating (0-5)
        #[arg(long)]
        rating: f64,
        /// Company age in years
        #[arg(long)]
        age: u32,
        #[arg(long)]
        python: bool,
        #[arg(long)]
        r: bool,
        #[arg(long)]
        spark: bool,
        #[arg(long)]
        aws: bool,
        #[arg(long)]
        excel: bool,
        /// Also print the encoded feature row
        #[arg(long)]
        show_row: bool,
    },

    /// Project a salary forward at a fixed yearly growth rate
    Growth {
        #[arg(long)]
        base: f64,
        /// Yearly growth in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
    },
}

// ============================================================================
// Startup Helpers
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => AppConfig::load().context("Failed to load configuration"),
    }
}

fn load_model(config: &AppConfig) -> Result<ModelBundle> {
    ModelBundle::load(&config.model.artifact_path, &config.model.features_path)
        .context("Failed to load model artifacts")
}

// ============================================================================
// Commands
// ============================================================================

async fn run_server(config: AppConfig, model: ModelBundle, addr: Option<String>) -> Result<()> {
    let server_addr = addr.unwrap_or_else(|| config.server_addr());

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Salary Predictor v{}", env!("CARGO_PKG_VERSION"));
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "📦 Model {} | {} features | {} job titles | {} states",
        model.version(),
        model.schema().len(),
        model.categories().job_titles.len(),
        model.categories().job_states.len()
    );

    let state = DashboardState::new(Arc::new(model), Arc::new(config));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;

    info!("✓ HTTP server listening on {}", server_addr);
    info!("🎯 Dashboard available at: http://{}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    if let Err(e) = result {
        error!("[HttpServer] Server error: {}", e);
        return Err(anyhow::anyhow!("HTTP server error: {e}"));
    }

    info!("✓ Salary predictor shutdown complete");
    Ok(())
}

fn print_categories(model: &ModelBundle) {
    let categories = model.categories();
    println!("Job titles ({}):", categories.job_titles.len());
    for title in &categories.job_titles {
        println!("  {title}");
    }
    println!("Job states ({}):", categories.job_states.len());
    for state in &categories.job_states {
        println!("  {state}");
    }
}

fn print_estimate(
    config: &AppConfig,
    model: &ModelBundle,
    selection: &UserSelection,
    show_row: bool,
) -> Result<()> {
    config
        .inputs
        .check(selection)
        .map_err(|msg| anyhow::anyhow!("Invalid input: {msg}"))?;

    let prediction = model.estimate(selection)?;
    if !prediction.estimate.is_finite() {
        anyhow::bail!("Model returned a non-finite estimate");
    }

    if show_row {
        for (name, value) in prediction.row.iter() {
            println!("{name:<40} {value}");
        }
        println!();
    }
    println!("Estimated salary: {}", format_usd(prediction.estimate));
    Ok(())
}

fn print_growth(config: &AppConfig, base: f64, rate: f64, years: u32) -> Result<()> {
    config
        .growth
        .check(base, rate, years)
        .map_err(|msg| anyhow::anyhow!("Invalid input: {msg}"))?;

    let projection = project(base, rate, years);
    println!("{:>4}  {:>16}", "Year", "Salary");
    for point in &projection.points {
        println!("{:>4}  {:>16}", point.year, format_usd(point.salary));
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(args.config.as_ref())?;

    match args.command.unwrap_or(SubCommand::Serve { addr: None }) {
        SubCommand::Serve { addr } => {
            let model = load_model(&config)?;
            run_server(config, model, addr).await
        }
        SubCommand::Categories => {
            let model = load_model(&config)?;
            print_categories(&model);
            Ok(())
        }
        SubCommand::Predict {
            job_title,
            job_state,
            rating,
            age,
            python,
            r,
            spark,
            aws,
            excel,
            show_row,
        } => {
            let model = load_model(&config)?;
            let selection = UserSelection {
                job_title,
                job_state,
                rating,
                company_age: age,
                tools: ToolFlags {
                    python,
                    r,
                    spark,
                    aws,
                    excel,
                },
            };
            print_estimate(&config, &model, &selection, show_row)
        }
        SubCommand::Growth { base, rate, years } => print_growth(&config, base, rate, years),
    }
}

//! Wayfarer: travel dataset generator and browser.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wayfarer_core::{DatasetId, WayfarerConfig};
use wayfarer_runtime::GenerationRequest;

mod jobs;
mod routes;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(name = "wayfarer")]
#[command(about = "Generate, enrich and browse travel datasets")]
struct Cli {
    /// Directory holding the dataset files.
    #[arg(long, env = "WAYFARER_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default)
    Serve,

    /// List stored datasets
    List,

    /// Print the unified view of a dataset as JSON
    Show { name: String },

    /// Generate a dataset for a location and keyword
    Generate {
        #[arg(long)]
        location: String,
        #[arg(long)]
        keyword: String,
        /// Search radius in km
        #[arg(long, default_value_t = 50)]
        radius: u32,
        /// Number of locations to request
        #[arg(long, default_value_t = 10)]
        results: usize,
    },

    /// Generate detailed ratings for a dataset
    Rate { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Data directory: {}", cli.data_dir.display());

    let config = WayfarerConfig::from_env(&cli.data_dir)
        .with_context(|| format!("Failed to prepare data directory {}", cli.data_dir.display()))?;
    let state = Arc::new(AppState::from_config(config)?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(state).await?,
        Commands::List => {
            for name in state.adapter.list()? {
                println!("{}", name);
            }
        }
        Commands::Show { name } => {
            let view = state.adapter.require(&DatasetId::from_display(&name))?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Generate {
            location,
            keyword,
            radius,
            results,
        } => {
            let request = GenerationRequest::new(location, keyword, radius, results)?;
            let files = state
                .pipeline()?
                .generate(&request, |p| info!("{}", p.message()))
                .await?;
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
        Commands::Rate { name } => {
            let ratings = state
                .pipeline()?
                .deepen(&DatasetId::from_display(&name))
                .await?;
            println!("{}", serde_json::to_string_pretty(&ratings)?);
        }
    }

    Ok(())
}

async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let port = state.config.port;

    jobs::start_generation_worker(state.clone());
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Wayfarer server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

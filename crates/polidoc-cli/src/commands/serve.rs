//! Web server command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use polidoc_graph::{GraphClient, GraphConfig, QueryGateway};
use polidoc_web::{state::AppState, ServerConfig, DEFAULT_API_PREFIX};
use tracing::warn;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "POLIDOC_PORT", default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "POLIDOC_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Path prefix for the graph routes
    #[arg(long, env = "POLIDOC_API_PREFIX", default_value = DEFAULT_API_PREFIX)]
    pub api_prefix: String,

    /// Environment name reported by /health
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to logs/polidoc.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, graph: &GraphConfig) -> Result<()> {
    let client = GraphClient::connect(graph)
        .await
        .context("Failed to create Neo4j client")?;

    // The API still starts when Neo4j is down; each request reports the
    // failure on its own.
    if let Err(e) = client.verify_connectivity().await {
        warn!("Neo4j is not reachable at {}: {}", graph.uri, e);
    }

    let state = AppState::new(QueryGateway::new(Arc::new(client)), &args.environment);
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        api_prefix: args.api_prefix,
    };

    println!();
    println!("  {} {}", "PoliDoc".cyan().bold(), "API Server".bold());
    println!();
    println!(
        "  {}      http://{}:{}{}",
        "API".green(),
        config.host,
        config.port,
        config.api_prefix
    );
    println!(
        "  {}   http://{}:{}/health",
        "Health".green(),
        config.host,
        config.port
    );
    println!("  {}    {} ({})", "Neo4j".green(), graph.uri, graph.database);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    polidoc_web::run_server(state, &config).await
}

//! Connectivity check against the configured Neo4j instance.

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use polidoc_graph::{GraphClient, GraphConfig, QueryGateway};

pub async fn execute(config: &GraphConfig) -> Result<()> {
    println!("{}", "Checking Neo4j connection...".bold());
    println!("  URI:      {}", config.uri);
    println!("  User:     {}", config.user);
    println!("  Database: {}", config.database);
    println!();

    let result = run_checks(config).await;
    if result.is_err() {
        println!();
        println!("{}", "Please check:".yellow().bold());
        println!("  1. Is the Neo4j instance running?");
        println!("  2. Can you connect with Neo4j Browser?");
        println!("  3. Are NEO4J_USER and NEO4J_PASSWORD correct?");
        println!("  4. Is NEO4J_URI correct?");
    }
    result
}

async fn run_checks(config: &GraphConfig) -> Result<()> {
    let client = GraphClient::connect(config)
        .await
        .context("Failed to create Neo4j client")?;

    client
        .verify_connectivity()
        .await
        .context("Connectivity check failed")?;
    println!("{} Connection verified", "✓".green());

    let gateway = QueryGateway::new(Arc::new(client));
    let forms = gateway.list_forms().await.context("Forms query failed")?;
    match forms.first() {
        Some(form) => {
            println!("{} Found {} Form node(s), first:", "✓".green(), forms.len());
            println!("{}", serde_json::to_string_pretty(form)?);
        }
        None => println!("{} Query successful but no Form nodes found", "✓".green()),
    }

    println!();
    println!("{}", "All checks passed.".green().bold());
    Ok(())
}

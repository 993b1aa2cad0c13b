//! CLI command definitions and handlers.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use polidoc_graph::GraphConfig;

pub mod check;
pub mod query;
pub mod serve;

/// PoliDoc - insurance policy document graph API
#[derive(Parser)]
#[command(name = "polidoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub graph: GraphArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Neo4j connection settings, read once at startup.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Neo4j bolt URI
    #[arg(long, env = "NEO4J_URI", default_value = "bolt://localhost:7687", global = true)]
    pub neo4j_uri: String,

    /// Neo4j user
    #[arg(long, env = "NEO4J_USER", default_value = "neo4j", global = true)]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    pub neo4j_password: String,

    /// Database name
    #[arg(long, env = "NEO4J_DATABASE", default_value = "neo4j", global = true)]
    pub neo4j_database: String,

    /// Seconds before a graph query fails
    #[arg(long, env = "NEO4J_QUERY_TIMEOUT", default_value = "30", global = true)]
    pub query_timeout: u64,

    /// Upper bound on pooled bolt connections
    #[arg(long, env = "NEO4J_MAX_CONNECTIONS", default_value = "16", global = true)]
    pub max_connections: usize,
}

impl GraphArgs {
    pub fn to_config(&self) -> GraphConfig {
        GraphConfig {
            uri: self.neo4j_uri.clone(),
            user: self.neo4j_user.clone(),
            password: self.neo4j_password.clone(),
            database: self.neo4j_database.clone(),
            max_connections: self.max_connections.max(1),
            query_timeout: Duration::from_secs(self.query_timeout.max(1)),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve(serve::ServeArgs),

    /// Verify Neo4j connectivity and sample the Form nodes
    Check,

    /// List policy forms
    Forms {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// List coverages linked to a form
    Coverages {
        /// Form number
        #[arg(long)]
        form: String,
        #[arg(long)]
        json: bool,
    },

    /// List mapped terms of a coverage within a form
    Terms {
        /// Form number
        #[arg(long)]
        form: String,
        /// Coverage code
        #[arg(long)]
        coverage: String,
        #[arg(long)]
        json: bool,
    },

    /// Show the CCQ term list of a form
    Ccq {
        /// Policy form (defaults to HO00030511)
        #[arg(long)]
        form: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.graph.to_config();

        match self.command {
            Commands::Serve(args) => serve::execute(args, &config).await,
            Commands::Check => check::execute(&config).await,
            Commands::Forms { json } => query::forms(&config, json).await,
            Commands::Coverages { form, json } => query::coverages(&config, &form, json).await,
            Commands::Terms { form, coverage, json } => {
                query::terms(&config, &form, &coverage, json).await
            }
            Commands::Ccq { form, json } => query::ccq(&config, form.as_deref(), json).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_graph_args_build_config() {
        let cli = Cli::try_parse_from([
            "polidoc",
            "--neo4j-uri",
            "neo4j+s://example.databases.neo4j.io",
            "--query-timeout",
            "5",
            "forms",
        ])
        .unwrap();
        let config = cli.graph.to_config();
        assert_eq!(config.uri, "neo4j+s://example.databases.neo4j.io");
        assert_eq!(config.query_timeout, Duration::from_secs(5));
        assert!(matches!(cli.command, Commands::Forms { json: false }));
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["polidoc", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.api_prefix, polidoc_web::DEFAULT_API_PREFIX);
        assert!(!args.log);
    }
}

//! PoliDoc Web Server
//!
//! Axum-based REST API over the policy document graph.

pub mod error;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Path prefix the graph routes are mounted under by default.
pub const DEFAULT_API_PREFIX: &str = "/api/v1/graph";

/// Listener settings for [`run_server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

/// Create the application router.
pub fn create_router(state: AppState, api_prefix: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let graph_routes = Router::new()
        .route("/test-connection", get(routes::graph::test_connection))
        .route("/forms", get(routes::graph::list_forms))
        .route("/policy-types", get(routes::graph::list_policy_types))
        .route("/coverages", get(routes::graph::list_coverages))
        .route(
            "/form-policy-type/{form_number}",
            get(routes::graph::get_policy_type_by_form),
        )
        .route(
            "/form-coverages/{form_number}",
            get(routes::graph::list_coverages_by_form),
        )
        .route(
            "/form-coverage-terms/{form_number}/{coverage_code}",
            get(routes::graph::list_coverage_terms),
        )
        .route("/ccq-list", get(routes::graph::get_ccq_list))
        .route("/all-paragraphs", get(routes::graph::list_all_paragraphs))
        .route("/query", post(routes::graph::query_paragraphs))
        .with_state(state.clone());

    // nest() rejects an empty or "/" prefix
    let prefix = api_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(graph_routes)
    } else {
        Router::new().nest(prefix, graph_routes)
    };

    router
        .route("/health", get(routes::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_router(state, &config.api_prefix);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "PoliDoc API listening on http://{}{}",
        addr,
        config.api_prefix
    );

    axum::serve(listener, app).await?;
    Ok(())
}

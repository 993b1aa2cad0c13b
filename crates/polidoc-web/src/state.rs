//! Application state.

use polidoc_graph::QueryGateway;

/// Application state shared across handlers.
///
/// Holds nothing mutable; each request runs its own query through the
/// gateway.
#[derive(Clone)]
pub struct AppState {
    pub gateway: QueryGateway,
    pub environment: String,
}

impl AppState {
    pub fn new(gateway: QueryGateway, environment: impl Into<String>) -> Self {
        Self {
            gateway,
            environment: environment.into(),
        }
    }
}

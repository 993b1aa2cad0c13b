//! The seam between the query catalogue and whatever executes Cypher.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::GraphResult;

/// A single result row, keyed by the statement's column names.
pub type Record = Map<String, Value>;

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    TextList(Vec<String>),
}

/// A fixed Cypher statement plus its bound parameters.
///
/// Query text is always a compile-time constant; caller input only ever
/// travels through `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub cypher: &'static str,
    pub columns: &'static [&'static str],
    pub params: Vec<(&'static str, Param)>,
}

impl Statement {
    pub fn new(cypher: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            cypher,
            columns,
            params: Vec::new(),
        }
    }

    /// Bind a string parameter.
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, Param::Text(value.into())));
        self
    }

    /// Bind a list-of-strings parameter.
    pub fn param_list(mut self, name: &'static str, values: Vec<String>) -> Self {
        self.params.push((name, Param::TextList(values)));
        self
    }

    /// Look up a bound parameter by name.
    pub fn get_param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, p)| p)
    }
}

/// Executes catalogue statements against a graph store.
///
/// Implementations own connection acquisition: every call must check out its
/// own connection and hand it back before returning, on success or failure.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a read query and collect every row.
    async fn fetch(&self, statement: &Statement) -> GraphResult<Vec<Record>>;

    /// Cheap liveness probe that touches no data.
    async fn ping(&self) -> GraphResult<()>;
}

//! Neo4j connection client.

use std::time::Duration;

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{GraphError, GraphResult};
use crate::store::{GraphStore, Param, Record, Statement};

/// Configuration for connecting to Neo4j.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub query_timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            max_connections: 16,
            query_timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the policy document graph.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    timeout: Duration,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs builds its pool lazily, so no bolt handshake happens here. Use
    /// [`GraphClient::verify_connectivity`] when an eager check is wanted.
    pub async fn connect(config: &GraphConfig) -> GraphResult<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(200)
            .build()
            .map_err(|e| GraphError::dependency(format!("Failed to build Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphError::dependency(format!("Database connection failed: {}", e)))?;

        Ok(Self {
            graph,
            timeout: config.query_timeout,
        })
    }

    /// Force a real TCP+bolt handshake, failing fast when Neo4j is down.
    pub async fn verify_connectivity(&self) -> GraphResult<()> {
        self.ping().await
    }

    async fn collect_rows(&self, statement: &Statement) -> GraphResult<Vec<Record>> {
        // The stream holds a pooled connection until it is dropped, which
        // happens on every return path out of this function.
        let mut stream = self.graph.execute(to_query(statement)).await?;

        let mut records = Vec::new();
        while let Some(row) = stream.next().await? {
            let mut record = Record::new();
            for column in statement.columns {
                let value: Value = row.get(column).map_err(|e| {
                    GraphError::dependency(format!("Failed to get field '{}': {:?}", column, e))
                })?;
                record.insert((*column).to_string(), value);
            }
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn fetch(&self, statement: &Statement) -> GraphResult<Vec<Record>> {
        debug!(cypher = statement.cypher, params = statement.params.len(), "Running graph query");

        match tokio::time::timeout(self.timeout, self.collect_rows(statement)).await {
            Ok(result) => result.inspect_err(|e| error!("Neo4j query failed: {}", e)),
            Err(_) => {
                error!("Neo4j query timed out after {:?}", self.timeout);
                Err(GraphError::dependency(format!(
                    "Neo4j query timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        }
    }

    async fn ping(&self) -> GraphResult<()> {
        let probe = self.graph.run(Query::new("RETURN 1".to_string()));
        match tokio::time::timeout(self.timeout, probe).await {
            Ok(result) => result.map_err(|e| {
                GraphError::dependency(format!("Neo4j is not responding to queries: {}", e))
            }),
            Err(_) => Err(GraphError::dependency(format!(
                "Neo4j did not answer within {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(Query::new(statement.cypher.to_string()), |query, (name, value)| match value {
            Param::Text(s) => query.param(name, s.clone()),
            Param::TextList(list) => query.param(name, list.clone()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.database, "neo4j");
        assert_eq!(config.query_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_to_query_binds_every_param() {
        let statement = Statement::new("RETURN $a AS a, $b AS b", &["a", "b"])
            .param("a", "HO00030511")
            .param_list("b", vec!["Flood".to_string()]);
        let query = to_query(&statement);
        assert!(query.has_param_key("a"));
        assert!(query.has_param_key("b"));
    }
}

//! # PoliDoc Graph
//!
//! Read-only query gateway over the Neo4j graph of insurance policy
//! documents.
//!
//! Forms, coverages, paragraphs and map terms are reached through a fixed
//! catalogue of parameterized Cypher statements; each result row is projected
//! into a typed record.

pub mod client;
pub mod error;
pub mod gateway;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig};
pub use error::{GraphError, GraphResult};
pub use gateway::{ConnectionStatus, QueryGateway};
pub use queries::{resolve_policy_form, Operation, ParagraphQuery, DEFAULT_POLICY_FORM};
pub use store::{GraphStore, Param, Record, Statement};

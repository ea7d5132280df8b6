// betflow-core/src/ports/connector.rs

// The warehouse contract. Data tests only ever need to run a statement,
// count rows, and look at a relation's columns.

use crate::error::BetflowError;
use async_trait::async_trait;

/// A column as the warehouse reports it (independent of the schema document).
#[derive(Debug, Clone, PartialEq)]
pub struct RelationColumn {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn execute(&self, query: &str) -> Result<(), BetflowError>;

    /// Runs a query whose first row, first column is a row count.
    async fn query_count(&self, query: &str) -> Result<u64, BetflowError>;

    async fn fetch_columns(&self, relation: &str) -> Result<Vec<RelationColumn>, BetflowError>;

    /// Exposes a CSV file as a relation named `name`.
    async fn register_seed(&self, name: &str, path: &str) -> Result<(), BetflowError>;

    fn engine_name(&self) -> &str;
}

// betflow-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::BetflowError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{Connector, RelationColumn};

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, BetflowError> {
        self.conn
            .lock()
            .map_err(|_| BetflowError::Infrastructure(DatabaseError::Poisoned.into()))
    }

    /// Runs `f` on the blocking pool with its own connection to the same
    /// database, so concurrent callers do not queue on the shared handle.
    async fn with_connection<T, F>(&self, f: F) -> Result<T, BetflowError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, BetflowError> + Send + 'static,
    {
        let conn = self.lock()?.try_clone()?;
        tokio::task::spawn_blocking(move || f(&conn))
            .await
            .map_err(|e| BetflowError::InternalError(format!("DuckDB task failed: {}", e)))?
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), BetflowError> {
        let query = query.to_string();
        self.with_connection(move |conn| {
            conn.execute_batch(&query)?;
            Ok(())
        })
        .await
    }

    async fn query_count(&self, query: &str) -> Result<u64, BetflowError> {
        let query = query.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(&query)?;
            let mut rows = stmt.query([])?;

            let row = rows
                .next()?
                .ok_or_else(|| BetflowError::InternalError("No count returned".into()))?;
            let value: i64 = row.get(0)?;

            u64::try_from(value).map_err(|_| {
                BetflowError::InternalError(format!("Negative count returned: {}", value))
            })
        })
        .await
    }

    async fn fetch_columns(&self, relation: &str) -> Result<Vec<RelationColumn>, BetflowError> {
        let pragma = format!("PRAGMA table_info('{}')", relation.replace('\'', "''"));
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(&pragma)?;
            let rows = stmt.query_map([], |row| {
                Ok(RelationColumn {
                    name: row.get("name")?,
                    data_type: row.get("type")?,
                    is_nullable: !row.get::<_, bool>("notnull")?,
                })
            })?;

            let mut columns = Vec::new();
            for row in rows {
                columns.push(row?);
            }
            Ok(columns)
        })
        .await
    }

    async fn register_seed(&self, name: &str, path: &str) -> Result<(), BetflowError> {
        let query = format!(
            "CREATE OR REPLACE VIEW \"{}\" AS SELECT * FROM read_csv_auto('{}', header = true)",
            name.replace('"', "\"\""),
            path.replace('\'', "''")
        );
        self.execute(&query).await
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

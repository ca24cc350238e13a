//! libSQL warehouse — a local table with the warehouse schema.
//!
//! Used when no BigQuery project is configured. Rows land in a table named
//! `<dataset>_<table>`, created on first insert.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{info, warn};

use crate::error::WarehouseError;

use super::{RowError, TableRef, Warehouse, WarehouseRow};

/// Local libSQL warehouse backend.
pub struct LibSqlWarehouse {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlWarehouse {
    /// Open (or create) a local database file.
    pub async fn new_local(path: &Path) -> Result<Self, WarehouseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WarehouseError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| WarehouseError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| WarehouseError::Connection(format!("Failed to create connection: {e}")))?;

        info!(path = %path.display(), "Warehouse database opened");
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, WarehouseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                WarehouseError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| WarehouseError::Connection(format!("Failed to create connection: {e}")))?;

        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Number of rows stored for a table. Zero if it was never written.
    pub async fn row_count(&self, table: &TableRef) -> Result<u64, WarehouseError> {
        let name = table_name(table)?;
        self.ensure_table(&name).await?;
        let mut rows = self
            .conn
            .query(&format!("SELECT COUNT(*) FROM {name}"), ())
            .await
            .map_err(|e| WarehouseError::Query(e.to_string()))?;
        let count = match rows.next().await.map_err(|e| WarehouseError::Query(e.to_string()))? {
            Some(row) => row
                .get::<i64>(0)
                .map_err(|e| WarehouseError::Query(e.to_string()))?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }

    async fn ensure_table(&self, name: &str) -> Result<(), WarehouseError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                name TEXT NOT NULL,
                company_name TEXT NOT NULL,
                about_company TEXT NOT NULL,
                email TEXT NOT NULL,
                domain TEXT NOT NULL,
                data_team_size TEXT NOT NULL,
                ai_team_size TEXT NOT NULL,
                organization_size TEXT NOT NULL,
                annual_revenue TEXT NOT NULL,
                customer_type TEXT NOT NULL,
                data_volume TEXT NOT NULL,
                ai_leadership_support TEXT NOT NULL,
                total_score INTEGER NOT NULL,
                maturity_level TEXT NOT NULL,
                reponse TEXT NOT NULL,
                recommendations TEXT NOT NULL
            )"
        );
        self.conn
            .execute(&ddl, ())
            .await
            .map_err(|e| WarehouseError::Query(format!("Failed to create {name}: {e}")))?;
        Ok(())
    }
}

/// Local table name for a dataset/table pair. Only `[A-Za-z0-9_]` is allowed
/// since the name is spliced into SQL.
fn table_name(table: &TableRef) -> Result<String, WarehouseError> {
    let name = format!("{}_{}", table.dataset, table.table);
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(name)
    } else {
        Err(WarehouseError::InsertFailed {
            table: table.to_string(),
            reason: "table name must be alphanumeric".to_string(),
        })
    }
}

#[async_trait]
impl Warehouse for LibSqlWarehouse {
    fn name(&self) -> &str {
        "libsql"
    }

    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: &[WarehouseRow],
    ) -> Result<Vec<RowError>, WarehouseError> {
        let name = table_name(table)?;
        self.ensure_table(&name).await?;

        let sql = format!(
            "INSERT INTO {name} (
                timestamp, name, company_name, about_company, email, domain,
                data_team_size, ai_team_size, organization_size, annual_revenue,
                customer_type, data_volume, ai_leadership_support, total_score,
                maturity_level, reponse, recommendations
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
        );

        let mut errors = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let result = self
                .conn
                .execute(
                    &sql,
                    params![
                        row.timestamp.as_str(),
                        row.name.as_str(),
                        row.company_name.as_str(),
                        row.about_company.as_str(),
                        row.email.as_str(),
                        row.domain.as_str(),
                        row.data_team_size.as_str(),
                        row.ai_team_size.as_str(),
                        row.organization_size.as_str(),
                        row.annual_revenue.as_str(),
                        row.customer_type.as_str(),
                        row.data_volume.as_str(),
                        row.ai_leadership_support.as_str(),
                        row.total_score,
                        row.maturity_level.as_str(),
                        row.reponse.as_str(),
                        row.recommendations.as_str()
                    ],
                )
                .await;
            if let Err(e) = result {
                warn!(table = %name, index, error = %e, "Row insert failed");
                errors.push(RowError {
                    index,
                    reason: "insert_failed".to_string(),
                    message: e.to_string(),
                });
            }
        }

        info!(table = %name, rows = rows.len(), errors = errors.len(), "Rows stored locally");
        Ok(errors)
    }
}

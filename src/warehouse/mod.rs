//! Analytics warehouse — where finished assessments are persisted.
//!
//! One batch-insert call per report with one fixed-schema row. The call
//! returns per-row errors; an empty list means the row landed.

pub mod auth;
pub mod bigquery;
pub mod local;

pub use auth::{AccessTokenSource, ServiceAccountTokens};
pub use bigquery::BigQueryWarehouse;
pub use local::LibSqlWarehouse;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WarehouseError;

/// Default dataset holding assessment rows.
pub const DEFAULT_DATASET: &str = "audit";
/// Default table holding assessment rows.
pub const DEFAULT_TABLE: &str = "auditplus";

/// Fixed warehouse schema, one row per finished assessment.
///
/// Column names are part of the external contract, including `reponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseRow {
    pub timestamp: String,
    pub name: String,
    pub company_name: String,
    pub about_company: String,
    pub email: String,
    pub domain: String,
    pub data_team_size: String,
    pub ai_team_size: String,
    pub organization_size: String,
    pub annual_revenue: String,
    pub customer_type: String,
    pub data_volume: String,
    pub ai_leadership_support: String,
    pub total_score: i64,
    pub maturity_level: String,
    /// Pretty-printed JSON of the response set.
    pub reponse: String,
    pub recommendations: String,
}

/// One error reported for one inserted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Position of the offending row in the batch.
    pub index: usize,
    pub reason: String,
    pub message: String,
}

/// Fully-qualified target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(dataset: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            table: table.into(),
        }
    }
}

impl Default for TableRef {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET, DEFAULT_TABLE)
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.dataset, self.table)
    }
}

/// Backend-agnostic warehouse sink.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Insert a batch of rows. `Ok` carries the per-row errors; `Err` means
    /// the call itself failed.
    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: &[WarehouseRow],
    ) -> Result<Vec<RowError>, WarehouseError>;
}

/// Which warehouse backend to use.
#[derive(Debug, Clone)]
pub enum WarehouseConfig {
    /// Service-account key file, plus an optional project override; without
    /// one the key file's own project is used.
    BigQuery {
        credentials_path: PathBuf,
        project: Option<String>,
        base_url: String,
    },
    LibSql {
        path: PathBuf,
    },
}

/// Open the configured warehouse backend.
pub async fn create_warehouse(config: &WarehouseConfig) -> Result<Arc<dyn Warehouse>, WarehouseError> {
    match config {
        WarehouseConfig::BigQuery {
            credentials_path,
            project,
            base_url,
        } => {
            let tokens = ServiceAccountTokens::from_file(credentials_path)?;
            let project = match project.as_deref().or(tokens.project_id()) {
                Some(project) => project.to_string(),
                None => {
                    return Err(WarehouseError::Auth(format!(
                        "{} names no project; set BIGQUERY_PROJECT",
                        credentials_path.display()
                    )));
                }
            };
            tracing::info!(project = %project, "Using BigQuery warehouse");
            Ok(Arc::new(
                BigQueryWarehouse::new(project, Arc::new(tokens)).with_base_url(base_url),
            ))
        }
        WarehouseConfig::LibSql { path } => {
            tracing::info!(path = %path.display(), "Using local libSQL warehouse");
            Ok(Arc::new(LibSqlWarehouse::new_local(path).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ref_display() {
        assert_eq!(TableRef::default().to_string(), "audit.auditplus");
        assert_eq!(TableRef::new("a", "b").to_string(), "a.b");
    }

    #[test]
    fn row_uses_external_column_names() {
        let row = WarehouseRow {
            timestamp: "2025-01-01T00:00:00+00:00".into(),
            name: String::new(),
            company_name: "Acme".into(),
            about_company: String::new(),
            email: String::new(),
            domain: "Pharmaceuticals".into(),
            data_team_size: "None".into(),
            ai_team_size: "None".into(),
            organization_size: "Less than 50 employees".into(),
            annual_revenue: "Less than ₹10 Crores".into(),
            customer_type: "B2B (Business to Business)".into(),
            data_volume: "Less than 1GB".into(),
            ai_leadership_support: "No commitment – AI is not part of our business strategy".into(),
            total_score: 12,
            maturity_level: "Novice - Exploring Opportunities".into(),
            reponse: "{}".into(),
            recommendations: "text".into(),
        };
        let value = serde_json::to_value(&row).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 17);
        assert!(obj.contains_key("reponse"));
        assert!(!obj.contains_key("response"));
        assert_eq!(value["total_score"], 12);
    }

    #[tokio::test]
    async fn create_libsql_warehouse() {
        let dir = tempfile::tempdir().unwrap();
        let config = WarehouseConfig::LibSql {
            path: dir.path().join("wh.db"),
        };
        let wh = create_warehouse(&config).await.unwrap();
        assert_eq!(wh.name(), "libsql");
    }

    #[tokio::test]
    async fn bigquery_without_key_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = WarehouseConfig::BigQuery {
            credentials_path: dir.path().join("missing.json"),
            project: Some("proj".into()),
            base_url: bigquery::DEFAULT_BASE_URL.into(),
        };
        assert!(matches!(
            create_warehouse(&config).await,
            Err(WarehouseError::Auth(_))
        ));
    }
}

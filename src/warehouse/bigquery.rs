//! BigQuery streaming insert (`tabledata.insertAll`) over REST.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::WarehouseError;

use super::auth::AccessTokenSource;
use super::{RowError, TableRef, Warehouse, WarehouseRow};

/// Default BigQuery API host.
pub const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com";

/// BigQuery sink authenticated with OAuth bearer tokens.
pub struct BigQueryWarehouse {
    client: reqwest::Client,
    project: String,
    tokens: Arc<dyn AccessTokenSource>,
    base_url: String,
}

impl BigQueryWarehouse {
    pub fn new(project: impl Into<String>, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            project: project.into(),
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn insert_url(&self, table: &TableRef) -> String {
        format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.base_url.trim_end_matches('/'),
            self.project,
            table.dataset,
            table.table
        )
    }
}

#[derive(Serialize)]
struct InsertAllRequest<'a> {
    kind: &'static str,
    rows: Vec<InsertRow<'a>>,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    json: &'a WarehouseRow,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<InsertErrors>,
}

#[derive(Debug, Deserialize)]
struct InsertErrors {
    #[serde(default)]
    index: usize,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

/// Flatten `insertErrors` into one `RowError` per reported error.
fn flatten_errors(response: InsertAllResponse) -> Vec<RowError> {
    response
        .insert_errors
        .into_iter()
        .flat_map(|row| {
            let index = row.index;
            row.errors.into_iter().map(move |e| RowError {
                index,
                reason: e.reason,
                message: e.message,
            })
        })
        .collect()
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    fn name(&self) -> &str {
        "bigquery"
    }

    async fn insert_rows(
        &self,
        table: &TableRef,
        rows: &[WarehouseRow],
    ) -> Result<Vec<RowError>, WarehouseError> {
        let body = InsertAllRequest {
            kind: "bigquery#tableDataInsertAllRequest",
            rows: rows.iter().map(|json| InsertRow { json }).collect(),
        };
        let token = self.tokens.access_token().await.map_err(|e| {
            warn!(table = %table, error = %e, "No BigQuery access token");
            e
        })?;
        debug!(table = %table, rows = rows.len(), "Streaming rows to BigQuery");

        let resp = self
            .client
            .post(self.insert_url(table))
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| WarehouseError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(table = %table, status = %status, "BigQuery insertAll rejected");
            return Err(WarehouseError::InsertFailed {
                table: table.to_string(),
                reason: format!("HTTP {status}: {text}"),
            });
        }

        let parsed: InsertAllResponse = resp
            .json()
            .await
            .map_err(|e| WarehouseError::Serialization(e.to_string()))?;
        let errors = flatten_errors(parsed);
        info!(table = %table, rows = rows.len(), errors = errors.len(), "BigQuery insertAll complete");
        Ok(errors)
    }
}

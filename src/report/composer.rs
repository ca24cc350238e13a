//! ReportComposer — turns a finished assessment into a report.
//!
//! Classify, ask the LLM for recommendations, persist the row, render the
//! downloadable document. A failed recommendation call aborts the report; a
//! failed persist only changes the status message.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{Error, WarehouseError};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::survey::{MaturityLevel, Profile, ResponseSet, recommendation_prompt};
use crate::warehouse::{RowError, TableRef, Warehouse};

use super::document::ReportDocument;
use super::record::ReportRecord;

/// Shown when the row was stored.
pub const SUCCESS_MESSAGE: &str =
    "Here's an overview of our findings. Download the PDF now! A detailed report will be provided later.";
/// Shown when the row could not be stored.
pub const FAILURE_MESSAGE: &str = "A detailed report will be provided later.";

/// Outcome of persisting the report row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Persistence {
    Stored,
    /// The insert call returned per-row errors.
    Rejected { errors: Vec<RowError> },
    /// The insert call itself failed.
    Failed { reason: String },
}

impl Persistence {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored)
    }

    pub fn message(&self) -> &'static str {
        if self.is_stored() {
            SUCCESS_MESSAGE
        } else {
            FAILURE_MESSAGE
        }
    }
}

impl From<Result<Vec<RowError>, WarehouseError>> for Persistence {
    fn from(result: Result<Vec<RowError>, WarehouseError>) -> Self {
        match result {
            Ok(errors) if errors.is_empty() => Self::Stored,
            Ok(errors) => Self::Rejected { errors },
            Err(e) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// Everything the report page needs.
#[derive(Debug, Clone)]
pub struct ComposedReport {
    pub record: ReportRecord,
    pub persistence: Persistence,
    pub document: ReportDocument,
}

pub struct ReportComposer {
    llm: Arc<dyn LlmProvider>,
    warehouse: Arc<dyn Warehouse>,
    table: TableRef,
}

impl ReportComposer {
    pub fn new(llm: Arc<dyn LlmProvider>, warehouse: Arc<dyn Warehouse>, table: TableRef) -> Self {
        Self {
            llm,
            warehouse,
            table,
        }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Compose the report for a completed assessment.
    pub async fn compose(
        &self,
        profile: &Profile,
        total_score: u32,
        responses: &ResponseSet,
    ) -> Result<ComposedReport, Error> {
        let maturity = MaturityLevel::classify(total_score);
        let created_at = Utc::now();

        let prompt = recommendation_prompt(profile, total_score, maturity, created_at.date_naive());
        let response = self.llm.complete(CompletionRequest::user(prompt)).await.map_err(|e| {
            error!(company = %profile.company_name, error = %e, "Recommendation generation failed");
            e
        })?;
        info!(
            model = self.llm.model_name(),
            output_tokens = response.output_tokens,
            "Recommendations generated"
        );

        let record = ReportRecord {
            profile: profile.clone(),
            total_score,
            maturity,
            responses: responses.clone(),
            recommendations: response.content,
            created_at,
        };

        let persistence = self.persist(&record).await;
        let document = ReportDocument::build(&record)?;

        Ok(ComposedReport {
            record,
            persistence,
            document,
        })
    }

    async fn persist(&self, record: &ReportRecord) -> Persistence {
        let row = match record.to_warehouse_row() {
            Ok(row) => row,
            Err(e) => {
                return Persistence::Failed {
                    reason: format!("Failed to serialize responses: {e}"),
                };
            }
        };
        let persistence = Persistence::from(
            self.warehouse
                .insert_rows(&self.table, std::slice::from_ref(&row))
                .await,
        );
        match &persistence {
            Persistence::Stored => info!(
                warehouse = self.warehouse.name(),
                table = %self.table,
                "Assessment row stored"
            ),
            Persistence::Rejected { errors } => warn!(
                warehouse = self.warehouse.name(),
                table = %self.table,
                errors = ?errors,
                "Warehouse rejected assessment row"
            ),
            Persistence::Failed { reason } => warn!(
                warehouse = self.warehouse.name(),
                table = %self.table,
                reason = %reason,
                "Warehouse insert failed"
            ),
        }
        persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::CompletionResponse;
    use crate::warehouse::WarehouseRow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubLlm {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl StubLlm {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err("quota exceeded".to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    input_tokens: 10,
                    output_tokens: 20,
                }),
                Err(reason) => Err(LlmError::RequestFailed {
                    provider: "stub".into(),
                    reason: reason.clone(),
                }),
            }
        }
    }

    enum Mode {
        Accept,
        RowErrors,
        Down,
    }

    struct StubWarehouse {
        mode: Mode,
        rows: Mutex<Vec<WarehouseRow>>,
    }

    impl StubWarehouse {
        fn new(mode: Mode) -> Self {
            Self {
                mode,
                rows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Warehouse for StubWarehouse {
        fn name(&self) -> &str {
            "stub"
        }

        async fn insert_rows(
            &self,
            _table: &TableRef,
            rows: &[WarehouseRow],
        ) -> Result<Vec<RowError>, WarehouseError> {
            match self.mode {
                Mode::Accept => {
                    self.rows.lock().unwrap().extend_from_slice(rows);
                    Ok(Vec::new())
                }
                Mode::RowErrors => Ok(vec![RowError {
                    index: 0,
                    reason: "invalid".into(),
                    message: "bad row".into(),
                }]),
                Mode::Down => Err(WarehouseError::Connection("refused".into())),
            }
        }
    }

    fn profile() -> Profile {
        Profile {
            name: "Meera".into(),
            company_name: "Nova Labs".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn compose_stores_row_and_builds_document() {
        let llm = Arc::new(StubLlm::ok("## Overview\n* Start small"));
        let wh = Arc::new(StubWarehouse::new(Mode::Accept));
        let composer = ReportComposer::new(llm.clone(), wh.clone(), TableRef::default());

        let report = composer.compose(&profile(), 33, &ResponseSet::new()).await.unwrap();

        assert!(report.persistence.is_stored());
        assert_eq!(report.persistence.message(), SUCCESS_MESSAGE);
        assert_eq!(report.record.maturity, MaturityLevel::Advanced);
        assert_eq!(report.record.recommendations, "## Overview\n* Start small");
        assert_eq!(report.document.file_name, "Nova Labs_Pharma_Assessment_Report.pdf");
        assert!(report.document.bytes.starts_with(b"%PDF"));

        let rows = wh.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_score, 33);
        assert_eq!(rows[0].maturity_level, "Advanced - Strategically Optimized");
    }

    #[tokio::test]
    async fn prompt_is_a_single_user_message() {
        let llm = Arc::new(StubLlm::ok("ok"));
        let composer = ReportComposer::new(
            llm.clone(),
            Arc::new(StubWarehouse::new(Mode::Accept)),
            TableRef::default(),
        );
        composer.compose(&profile(), 10, &ResponseSet::new()).await.unwrap();

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].prompt.contains("Nova Labs"));
        assert!(seen[0].prompt.contains("Novice - Exploring Opportunities"));
    }

    #[tokio::test]
    async fn row_errors_still_offer_document() {
        let composer = ReportComposer::new(
            Arc::new(StubLlm::ok("text")),
            Arc::new(StubWarehouse::new(Mode::RowErrors)),
            TableRef::default(),
        );
        let report = composer.compose(&profile(), 20, &ResponseSet::new()).await.unwrap();
        assert!(matches!(report.persistence, Persistence::Rejected { ref errors } if errors.len() == 1));
        assert_eq!(report.persistence.message(), FAILURE_MESSAGE);
        assert!(!report.document.bytes.is_empty());
    }

    #[tokio::test]
    async fn warehouse_outage_still_offers_document() {
        let composer = ReportComposer::new(
            Arc::new(StubLlm::ok("text")),
            Arc::new(StubWarehouse::new(Mode::Down)),
            TableRef::default(),
        );
        let report = composer.compose(&profile(), 20, &ResponseSet::new()).await.unwrap();
        assert!(matches!(report.persistence, Persistence::Failed { .. }));
        assert_eq!(report.persistence.message(), FAILURE_MESSAGE);
        assert!(!report.document.bytes.is_empty());
    }

    #[tokio::test]
    async fn llm_failure_aborts_without_persisting() {
        let wh = Arc::new(StubWarehouse::new(Mode::Accept));
        let composer = ReportComposer::new(Arc::new(StubLlm::failing()), wh.clone(), TableRef::default());
        let err = composer
            .compose(&profile(), 20, &ResponseSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
        assert!(wh.rows.lock().unwrap().is_empty());
    }

    #[test]
    fn persistence_serializes_with_status_tag() {
        let value = serde_json::to_value(Persistence::Stored).unwrap();
        assert_eq!(value["status"], "stored");
    }
}

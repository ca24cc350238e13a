//! Pharma Maturity — AI/data maturity self-assessment service.

pub mod config;
pub mod error;
pub mod llm;
pub mod report;
pub mod sessions;
pub mod survey;
pub mod warehouse;

use std::sync::Arc;

use axum::Router;

use report::ReportComposer;
use sessions::{SessionManager, SessionRouteState, SessionStore, session_routes};
use survey::{Questionnaire, ScoringMode};
use warehouse::{TableRef, Warehouse};

/// Build the full HTTP application around a generation backend and a
/// warehouse. Returns the router and the session store it serves.
pub fn build_app(
    llm: Arc<dyn llm::LlmProvider>,
    warehouse: Arc<dyn Warehouse>,
    table: TableRef,
    scoring: ScoringMode,
    idle_timeout: chrono::Duration,
) -> (Router, Arc<SessionStore>) {
    let store = SessionStore::new(scoring, idle_timeout);
    let composer = ReportComposer::new(llm, warehouse, table);
    let manager = Arc::new(SessionManager::new(
        Arc::clone(&store),
        composer,
        Questionnaire::standard(),
    ));
    (session_routes(SessionRouteState { manager }), store)
}

//! SessionManager — runs page transitions against stored sessions.
//!
//! Each action locks its session, applies one transition and returns the
//! resulting page view. Submitting the assessment composes the report on a
//! copy of the state and commits both only when composition succeeds.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, SessionError};
use crate::report::{ComposedReport, ReportComposer};
use crate::survey::{Answer, Profile, Questionnaire};

use super::store::SessionStore;
use super::views::PageView;

pub struct SessionManager {
    store: Arc<SessionStore>,
    composer: ReportComposer,
    questionnaire: Questionnaire,
}

impl SessionManager {
    pub fn new(store: Arc<SessionStore>, composer: ReportComposer, questionnaire: Questionnaire) -> Self {
        Self {
            store,
            composer,
            questionnaire,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub async fn start(&self) -> Result<PageView, Error> {
        let handle = self.store.create().await;
        let entry = handle.lock().await;
        Ok(PageView::of(&entry, &self.questionnaire)?)
    }

    pub async fn view(&self, id: Uuid) -> Result<PageView, Error> {
        let handle = self.store.get(id).await?;
        let mut entry = handle.lock().await;
        entry.touch();
        Ok(PageView::of(&entry, &self.questionnaire)?)
    }

    pub async fn submit_intake(&self, id: Uuid, profile: Profile) -> Result<PageView, Error> {
        let handle = self.store.get(id).await?;
        let mut entry = handle.lock().await;
        entry.touch();
        let company = profile.company_name.clone();
        entry.state.submit_intake(profile)?;
        info!(session_id = %id, company = %company, "Intake submitted");
        Ok(PageView::of(&entry, &self.questionnaire)?)
    }

    pub async fn next(&self, id: Uuid, selection: Option<Answer>) -> Result<PageView, Error> {
        let handle = self.store.get(id).await?;
        let mut entry = handle.lock().await;
        entry.touch();
        let contribution = entry.state.next(&self.questionnaire, selection)?;
        debug!(
            session_id = %id,
            index = entry.state.question_index(),
            contribution,
            score = entry.state.total_score(),
            "Question answered"
        );
        Ok(PageView::of(&entry, &self.questionnaire)?)
    }

    pub async fn previous(&self, id: Uuid) -> Result<PageView, Error> {
        let handle = self.store.get(id).await?;
        let mut entry = handle.lock().await;
        entry.touch();
        let index = entry.state.previous()?;
        debug!(session_id = %id, index, "Stepped back");
        Ok(PageView::of(&entry, &self.questionnaire)?)
    }

    /// Record the last answer, compose the report and open the report page.
    ///
    /// If composition fails the session stays on the last question.
    pub async fn submit(&self, id: Uuid, selection: Option<Answer>) -> Result<PageView, Error> {
        let handle = self.store.get(id).await?;
        let mut entry = handle.lock().await;
        entry.touch();

        let mut next_state = entry.state.clone();
        next_state.submit(&self.questionnaire, selection)?;
        let profile = next_state.profile().cloned().unwrap_or_default();
        info!(
            session_id = %id,
            score = next_state.total_score(),
            maturity = next_state.maturity().label(),
            "Assessment submitted"
        );

        let report = self
            .composer
            .compose(&profile, next_state.total_score(), next_state.responses())
            .await?;

        entry.state = next_state;
        entry.report = Some(Arc::new(report));
        Ok(PageView::of(&entry, &self.questionnaire)?)
    }

    /// The composed report of a finished session.
    pub async fn report(&self, id: Uuid) -> Result<Arc<ComposedReport>, Error> {
        let handle = self.store.get(id).await?;
        let mut entry = handle.lock().await;
        entry.touch();
        match &entry.report {
            Some(report) => Ok(Arc::clone(report)),
            None => Err(SessionError::ReportUnavailable(id).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LlmError, WarehouseError};
    use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};
    use crate::sessions::views::AssessmentAction;
    use crate::survey::{Page, ScoringMode};
    use crate::warehouse::{LibSqlWarehouse, RowError, TableRef, Warehouse, WarehouseRow};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubLlm {
        fail: AtomicBool,
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(LlmError::RequestFailed {
                    provider: "stub".into(),
                    reason: "unavailable".into(),
                });
            }
            Ok(CompletionResponse {
                content: "## Overview\n* Build a data catalogue".into(),
                input_tokens: 1,
                output_tokens: 1,
            })
        }
    }

    struct DownWarehouse;

    #[async_trait]
    impl Warehouse for DownWarehouse {
        fn name(&self) -> &str {
            "down"
        }

        async fn insert_rows(
            &self,
            _table: &TableRef,
            _rows: &[WarehouseRow],
        ) -> Result<Vec<RowError>, WarehouseError> {
            Err(WarehouseError::Connection("offline".into()))
        }
    }

    fn manager_with(
        llm: Arc<StubLlm>,
        warehouse: Arc<dyn Warehouse>,
        scoring: ScoringMode,
    ) -> SessionManager {
        let store = SessionStore::new(scoring, chrono::Duration::minutes(60));
        let composer = ReportComposer::new(llm, warehouse, TableRef::default());
        SessionManager::new(store, composer, Questionnaire::standard())
    }

    async fn manager(scoring: ScoringMode) -> (SessionManager, Arc<StubLlm>) {
        let llm = Arc::new(StubLlm {
            fail: AtomicBool::new(false),
        });
        let wh = Arc::new(LibSqlWarehouse::new_memory().await.unwrap());
        (manager_with(llm.clone(), wh, scoring), llm)
    }

    fn session_id(view: &PageView) -> Uuid {
        match view {
            PageView::Intake(v) => v.session_id,
            PageView::Assessment(v) => v.session_id,
            PageView::Report(v) => v.session_id,
        }
    }

    async fn start_assessment(mgr: &SessionManager) -> Uuid {
        let id = session_id(&mgr.start().await.unwrap());
        mgr.submit_intake(
            id,
            Profile {
                company_name: "Zenith Bio".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn walks_every_page_with_defaults() {
        let (mgr, _) = manager(ScoringMode::Recompute).await;
        let id = session_id(&mgr.start().await.unwrap());
        assert!(matches!(mgr.view(id).await.unwrap(), PageView::Intake(_)));

        mgr.submit_intake(id, Profile::default()).await.unwrap();
        for expected in 1..15 {
            match mgr.next(id, None).await.unwrap() {
                PageView::Assessment(v) => assert_eq!(v.index, expected),
                other => panic!("unexpected view {other:?}"),
            }
        }

        let view = mgr.submit(id, None).await.unwrap();
        let PageView::Report(report) = view else {
            panic!("expected report view");
        };
        assert_eq!(report.total_score, 0);
        assert_eq!(report.score_display, "0 / 45");
        assert_eq!(report.maturity_level, "Novice - Exploring Opportunities");
        assert_eq!(report.message, crate::report::SUCCESS_MESSAGE);
        assert_eq!(report.download.url, format!("/api/sessions/{id}/report.pdf"));
    }

    #[tokio::test]
    async fn last_question_offers_submit() {
        let (mgr, _) = manager(ScoringMode::Recompute).await;
        let id = start_assessment(&mgr).await;
        for _ in 0..13 {
            mgr.next(id, None).await.unwrap();
        }
        let PageView::Assessment(v) = mgr.next(id, None).await.unwrap() else {
            panic!("expected assessment");
        };
        assert_eq!(v.index, 14);
        assert_eq!(v.action, AssessmentAction::Submit);
        assert!((v.progress - 1.0).abs() < f64::EPSILON);

        let err = mgr.next(id, None).await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn invalid_actions_leave_state_unchanged() {
        let (mgr, _) = manager(ScoringMode::Recompute).await;
        let id = session_id(&mgr.start().await.unwrap());
        assert!(mgr.next(id, None).await.is_err());
        assert!(mgr.previous(id).await.is_err());
        assert!(mgr.submit(id, None).await.is_err());
        assert!(matches!(mgr.view(id).await.unwrap(), PageView::Intake(_)));
    }

    #[tokio::test]
    async fn unknown_option_is_rejected() {
        let (mgr, _) = manager(ScoringMode::Recompute).await;
        let id = start_assessment(&mgr).await;
        let err = mgr
            .next(id, Some(Answer::Single("(z) Nonsense".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::UnknownOption { index: 0, .. })));
        let PageView::Assessment(v) = mgr.view(id).await.unwrap() else {
            panic!("expected assessment");
        };
        assert_eq!(v.index, 0);
    }

    #[tokio::test]
    async fn revisited_answer_is_preselected() {
        let (mgr, _) = manager(ScoringMode::Recompute).await;
        let id = start_assessment(&mgr).await;
        let q0 = Questionnaire::standard().get(0).unwrap();
        let chosen = q0.options[2].0;
        mgr.next(id, Some(Answer::Single(chosen.into()))).await.unwrap();

        let PageView::Assessment(v) = mgr.previous(id).await.unwrap() else {
            panic!("expected assessment");
        };
        assert_eq!(v.index, 0);
        assert!(!v.can_go_back);
        assert_eq!(v.selection, Some(Answer::Single(chosen.into())));
    }

    #[tokio::test]
    async fn failed_generation_keeps_last_question() {
        let (mgr, llm) = manager(ScoringMode::Recompute).await;
        let id = start_assessment(&mgr).await;
        for _ in 0..14 {
            mgr.next(id, None).await.unwrap();
        }
        llm.fail.store(true, Ordering::SeqCst);
        let err = mgr.submit(id, None).await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
        assert!(matches!(mgr.view(id).await.unwrap(), PageView::Assessment(_)));
        assert!(mgr.report(id).await.is_err());

        llm.fail.store(false, Ordering::SeqCst);
        assert!(matches!(mgr.submit(id, None).await.unwrap(), PageView::Report(_)));
        assert!(mgr.report(id).await.is_ok());
    }

    #[tokio::test]
    async fn warehouse_outage_still_reaches_report() {
        let llm = Arc::new(StubLlm {
            fail: AtomicBool::new(false),
        });
        let mgr = manager_with(llm, Arc::new(DownWarehouse), ScoringMode::Recompute);
        let id = start_assessment(&mgr).await;
        for _ in 0..14 {
            mgr.next(id, None).await.unwrap();
        }
        let PageView::Report(view) = mgr.submit(id, None).await.unwrap() else {
            panic!("expected report");
        };
        assert_eq!(view.message, crate::report::FAILURE_MESSAGE);
        assert_eq!(view.download.file_name, "Zenith Bio_Pharma_Assessment_Report.pdf");
    }

    #[tokio::test]
    async fn report_page_is_terminal() {
        let (mgr, _) = manager(ScoringMode::Recompute).await;
        let id = start_assessment(&mgr).await;
        for _ in 0..14 {
            mgr.next(id, None).await.unwrap();
        }
        mgr.submit(id, None).await.unwrap();
        assert!(mgr.submit(id, None).await.is_err());
        assert!(mgr.previous(id).await.is_err());
        assert!(mgr.submit_intake(id, Profile::default()).await.is_err());

        let handle = mgr.store().get(id).await.unwrap();
        assert_eq!(handle.lock().await.state.page(), Page::Report);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (mgr, _) = manager(ScoringMode::Recompute).await;
        let err = mgr.view(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::NotFound(_))));
    }
}

//! JSON views of each page, as returned by the session API.

use serde::Serialize;
use uuid::Uuid;

use crate::error::SessionError;
use crate::report::{ComposedReport, Persistence};
use crate::survey::{
    Answer, IntakeOptions, MATURITY_BANDS, MaturityBand, Page, Questionnaire,
    score_distribution_legend,
};

use super::store::SessionEntry;

/// The page a session is on, with everything needed to render it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Intake(IntakeView),
    Assessment(AssessmentView),
    Report(ReportView),
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeView {
    pub session_id: Uuid,
    pub options: IntakeOptions,
}

/// Which button finishes the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentAction {
    Next,
    Submit,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub session_id: Uuid,
    pub category: &'static str,
    pub question: &'static str,
    pub options: Vec<&'static str>,
    pub multiple_choice: bool,
    pub selection: Option<Answer>,
    pub index: usize,
    pub total: usize,
    pub progress: f64,
    pub action: AssessmentAction,
    pub can_go_back: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadLink {
    pub file_name: String,
    pub url: String,
    pub mime: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub session_id: Uuid,
    pub company_name: String,
    pub total_score: u32,
    pub max_score: u32,
    pub score_display: String,
    pub maturity_level: &'static str,
    pub legend: String,
    pub recommendations: String,
    pub persistence: Persistence,
    pub message: &'static str,
    pub download: DownloadLink,
}

impl ReportView {
    pub fn new(session_id: Uuid, report: &ComposedReport) -> Self {
        let record = &report.record;
        Self {
            session_id,
            company_name: record.profile.company_name.clone(),
            total_score: record.total_score,
            max_score: Questionnaire::standard().max_score(),
            score_display: record.score_display(),
            maturity_level: record.maturity_label(),
            legend: score_distribution_legend(),
            recommendations: record.recommendations.clone(),
            persistence: report.persistence.clone(),
            message: report.persistence.message(),
            download: DownloadLink {
                file_name: report.document.file_name.clone(),
                url: format!("/api/sessions/{session_id}/report.pdf"),
                mime: report.document.mime(),
            },
        }
    }
}

impl PageView {
    pub fn of(entry: &SessionEntry, questionnaire: &Questionnaire) -> Result<Self, SessionError> {
        let state = &entry.state;
        match state.page() {
            Page::Intake => Ok(Self::Intake(IntakeView {
                session_id: entry.id,
                options: IntakeOptions::new(),
            })),
            Page::Assessment => {
                let index = state.question_index();
                let question = questionnaire.get(index).ok_or_else(|| {
                    SessionError::InvalidTransition {
                        page: state.page().to_string(),
                        action: "view".to_string(),
                    }
                })?;
                Ok(Self::Assessment(AssessmentView {
                    session_id: entry.id,
                    category: question.category,
                    question: question.text,
                    options: question.option_labels(),
                    multiple_choice: question.multiple_choice,
                    selection: state.default_selection(questionnaire),
                    index,
                    total: questionnaire.len(),
                    progress: state.progress(questionnaire),
                    action: if state.on_last_question(questionnaire) {
                        AssessmentAction::Submit
                    } else {
                        AssessmentAction::Next
                    },
                    can_go_back: index > 0,
                }))
            }
            Page::Report => {
                let report = entry
                    .report
                    .as_ref()
                    .ok_or(SessionError::ReportUnavailable(entry.id))?;
                Ok(Self::Report(ReportView::new(entry.id, report)))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub label: &'static str,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub category: &'static str,
    pub text: &'static str,
    pub options: Vec<OptionView>,
    pub multiple_choice: bool,
}

impl QuestionView {
    pub fn list(questionnaire: &Questionnaire) -> Vec<Self> {
        questionnaire
            .questions()
            .iter()
            .enumerate()
            .map(|(index, q)| Self {
                index,
                category: q.category,
                text: q.text,
                options: q
                    .options
                    .iter()
                    .map(|&(label, score)| OptionView { label, score })
                    .collect(),
                multiple_choice: q.multiple_choice,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendView {
    pub bands: &'static [MaturityBand],
    pub text: String,
    pub max_score: u32,
}

impl LegendView {
    pub fn new() -> Self {
        Self {
            bands: &MATURITY_BANDS,
            text: score_distribution_legend(),
            max_score: Questionnaire::standard().max_score(),
        }
    }
}

impl Default for LegendView {
    fn default() -> Self {
        Self::new()
    }
}

//! Session state machine.
//!
//! `Intake --submit_intake--> Assessment(0..=14) --submit--> Report`.
//! Pages only move forward; `previous` moves within the assessment.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SessionError;

use super::maturity::MaturityLevel;
use super::model::Profile;
use super::questions::{Question, Questionnaire};

/// The three pages of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Intake,
    Assessment,
    Report,
}

impl Page {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Page) -> bool {
        matches!(
            (self, target),
            (Page::Intake, Page::Assessment) | (Page::Assessment, Page::Report)
        )
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intake => "intake",
            Self::Assessment => "assessment",
            Self::Report => "report",
        };
        write!(f, "{s}")
    }
}

/// The option label(s) chosen for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

/// A recorded answer and the score it contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub question: &'static str,
    pub answer: Answer,
    pub contribution: u32,
}

/// Answers keyed by question, iterated in question order.
///
/// Serializes as a JSON object of question text → answer, with keys in
/// question order rather than lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSet {
    entries: BTreeMap<usize, Response>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&Response> {
        self.entries.get(&index)
    }

    /// Insert or overwrite the entry for a question.
    pub fn record(&mut self, index: usize, response: Response) {
        self.entries.insert(index, response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Response)> {
        self.entries.iter().map(|(i, r)| (*i, r))
    }

    /// Sum of the latest contribution of every recorded question.
    pub fn total_contribution(&self) -> u32 {
        self.entries.values().map(|r| r.contribution).sum()
    }

    /// Two-space indented JSON, the form stored in the warehouse.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ResponseSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for response in self.entries.values() {
            map.serialize_entry(response.question, &response.answer)?;
        }
        map.end()
    }
}

/// How re-confirming an already answered question affects the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Total is the sum of each question's latest contribution.
    #[default]
    Recompute,
    /// Every Next/Submit adds the current contribution to the total, even
    /// for a question that was already counted.
    Accumulate,
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recompute" => Ok(Self::Recompute),
            "accumulate" => Ok(Self::Accumulate),
            other => Err(format!("expected 'recompute' or 'accumulate', got '{other}'")),
        }
    }
}

/// Everything one user session carries.
///
/// Mutated only through the action methods below. Each action validates
/// first and either applies fully or returns an error with state unchanged.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    page: Page,
    question_index: usize,
    total_score: u32,
    profile: Option<Profile>,
    responses: ResponseSet,
    scoring: ScoringMode,
}

impl SessionState {
    pub fn new(scoring: ScoringMode) -> Self {
        Self {
            scoring,
            ..Self::default()
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn scoring(&self) -> ScoringMode {
        self.scoring
    }

    pub fn maturity(&self) -> MaturityLevel {
        MaturityLevel::classify(self.total_score)
    }

    /// Fraction shown by the progress bar: `(index + 1) / len`.
    pub fn progress(&self, questionnaire: &Questionnaire) -> f64 {
        if questionnaire.is_empty() {
            return 0.0;
        }
        (self.question_index + 1) as f64 / questionnaire.len() as f64
    }

    /// Whether the current question is the last one (Submit instead of Next).
    pub fn on_last_question(&self, questionnaire: &Questionnaire) -> bool {
        self.question_index == questionnaire.last_index()
    }

    /// Selection preloaded when the current question is (re)displayed: the
    /// recorded answer if any, else the first option, or nothing selected for
    /// a multiple-choice question.
    pub fn default_selection(&self, questionnaire: &Questionnaire) -> Option<Answer> {
        let question = questionnaire.get(self.question_index)?;
        if let Some(recorded) = self.responses.get(self.question_index) {
            return Some(recorded.answer.clone());
        }
        if question.multiple_choice {
            Some(Answer::Multiple(Vec::new()))
        } else {
            question.first_option().map(|o| Answer::Single(o.to_string()))
        }
    }

    /// Freeze the intake form into the profile and open the assessment.
    pub fn submit_intake(&mut self, profile: Profile) -> Result<(), SessionError> {
        self.require(Page::Intake, "submit_intake")?;
        self.profile = Some(profile);
        self.transition(Page::Assessment);
        Ok(())
    }

    /// Step back one question. No effect on the first question, no effect on
    /// the score.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.require(Page::Assessment, "previous")?;
        if self.question_index > 0 {
            self.question_index -= 1;
        }
        Ok(self.question_index)
    }

    /// Record the current selection and advance one question.
    ///
    /// `None` accepts the default selection. Returns the contribution of the
    /// recorded answer.
    pub fn next(
        &mut self,
        questionnaire: &Questionnaire,
        selection: Option<Answer>,
    ) -> Result<u32, SessionError> {
        self.require(Page::Assessment, "next")?;
        if self.on_last_question(questionnaire) {
            return Err(self.invalid("next"));
        }
        let contribution = self.record_current(questionnaire, selection)?;
        self.question_index += 1;
        Ok(contribution)
    }

    /// Record the answer to the last question and close the assessment.
    pub fn submit(
        &mut self,
        questionnaire: &Questionnaire,
        selection: Option<Answer>,
    ) -> Result<u32, SessionError> {
        self.require(Page::Assessment, "submit")?;
        if !self.on_last_question(questionnaire) {
            return Err(self.invalid("submit"));
        }
        let contribution = self.record_current(questionnaire, selection)?;
        self.transition(Page::Report);
        Ok(contribution)
    }

    fn record_current(
        &mut self,
        questionnaire: &Questionnaire,
        selection: Option<Answer>,
    ) -> Result<u32, SessionError> {
        let index = self.question_index;
        let question = questionnaire
            .get(index)
            .ok_or_else(|| self.invalid("answer"))?;
        let answer = match selection {
            Some(answer) => answer,
            None => self
                .default_selection(questionnaire)
                .ok_or_else(|| self.invalid("answer"))?,
        };
        let contribution = score_answer(index, question, &answer)?;

        self.responses.record(
            index,
            Response {
                question: question.text,
                answer,
                contribution,
            },
        );
        self.total_score = match self.scoring {
            ScoringMode::Accumulate => self.total_score.saturating_add(contribution),
            ScoringMode::Recompute => self.responses.total_contribution(),
        };
        Ok(contribution)
    }

    fn require(&self, page: Page, action: &str) -> Result<(), SessionError> {
        if self.page == page {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &str) -> SessionError {
        SessionError::InvalidTransition {
            page: self.page.to_string(),
            action: action.to_string(),
        }
    }

    fn transition(&mut self, target: Page) {
        debug_assert!(self.page.can_transition_to(target));
        self.page = target;
    }
}

/// Score contribution of an answer.
///
/// Single choice: the option's score; an unknown label is rejected.
/// Multiple choice: the sum over the chosen options; unknown labels count 0.
pub fn score_answer(index: usize, question: &Question, answer: &Answer) -> Result<u32, SessionError> {
    match (question.multiple_choice, answer) {
        (false, Answer::Single(label)) => {
            question
                .score_of(label)
                .ok_or_else(|| SessionError::UnknownOption {
                    index,
                    option: label.clone(),
                })
        }
        (false, Answer::Multiple(_)) => Err(SessionError::SelectionShape {
            index,
            expected: "a single option".to_string(),
        }),
        (true, Answer::Single(label)) => Ok(question.score_of(label).unwrap_or(0)),
        (true, Answer::Multiple(labels)) => Ok(labels
            .iter()
            .map(|l| question.score_of(l).unwrap_or(0))
            .sum()),
    }
}

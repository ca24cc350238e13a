//! Survey flow — intake profile, scored questionnaire and maturity bands.
//!
//! A session walks `Intake → Assessment → Report`. The intake form freezes
//! into a `Profile`, the assessment records one answer per question into a
//! `ResponseSet` while keeping a running score, and the final score is
//! classified into a `MaturityLevel`.

pub mod maturity;
pub mod model;
pub mod prompts;
pub mod questions;
pub mod state;

pub use maturity::{MATURITY_BANDS, MaturityBand, MaturityLevel, score_distribution_legend};
pub use model::{IntakeOptions, Profile};
pub use prompts::recommendation_prompt;
pub use questions::{Question, Questionnaire};
pub use state::{Answer, Page, Response, ResponseSet, ScoringMode, SessionState};

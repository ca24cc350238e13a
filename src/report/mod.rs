//! Report stage — recommendations, persistence and the downloadable PDF.

pub mod composer;
pub mod document;
pub mod record;

pub use composer::{ComposedReport, FAILURE_MESSAGE, Persistence, ReportComposer, SUCCESS_MESSAGE};
pub use document::{PDF_MIME, ReportDocument, clean_recommendations, report_file_name};
pub use record::ReportRecord;

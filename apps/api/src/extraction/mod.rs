//! Field extraction: raw upload bytes to a `ResumeRecord`.
//!
//! `AppState` holds an `Arc<dyn FieldExtractor>`; the default is
//! `PdfFieldExtractor`. Analysis never sees bytes, only the record.

pub mod fields;
pub mod pdf;

use thiserror::Error;

use crate::models::resume::ResumeRecord;

pub use pdf::PdfFieldExtractor;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("the uploaded file is not a PDF")]
    NotPdf,

    #[error("the PDF could not be decoded ({0})")]
    Decode(String),

    #[error("no extractable text was found (is it a scanned image?)")]
    NoText,
}

/// Turns an uploaded document into structured resume fields.
///
/// Implementations are synchronous and may be CPU heavy; callers run them on
/// the blocking pool.
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<ResumeRecord, ExtractError>;
}

use std::panic;

use crate::extraction::fields::parse_fields;
use crate::extraction::{ExtractError, FieldExtractor};
use crate::models::resume::ResumeRecord;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Default extractor: `pdf-extract` for text, regex heuristics for fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfFieldExtractor;

impl FieldExtractor for PdfFieldExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ResumeRecord, ExtractError> {
        let text = extract_text(bytes)?;
        Ok(parse_fields(&text))
    }
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Decodes the text layer of an in-memory PDF.
///
/// `pdf-extract` can panic on malformed input, so the call is isolated with
/// `catch_unwind` and reported as a decode failure.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::Empty);
    }
    if !is_pdf(bytes) {
        return Err(ExtractError::NotPdf);
    }

    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractError::Decode("decoder panicked".to_string()))?
        .map_err(|e| ExtractError::Decode(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}

//! Picking list line item extraction module.

pub mod consolidate;
mod parser;
pub mod rules;
pub mod tokenizer;

pub use consolidate::{consolidate, duplicate_groups};
pub use parser::{PickingListParser, PAGE_BREAK};
pub use tokenizer::{TokenizeOutcome, Tokenizer};

use tracing::info;

use crate::error::{ExtractionError, PdfError};
use crate::models::config::PickrConfig;
use crate::models::manifest::ParseResult;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for picking list parsers.
pub trait ManifestParser {
    /// Parse a document given as page texts in order.
    fn parse_pages(&self, pages: &[String]) -> Result<ParseResult>;

    /// Parse a document given as one string with form-feed page breaks.
    fn parse_text(&self, text: &str) -> Result<ParseResult>;
}

/// Read a picking list PDF and run the whole pipeline on it.
///
/// A PDF without any text layer (a scan) fails with
/// [`PdfError::TextExtraction`].
pub fn extract_from_pdf(data: &[u8], config: &PickrConfig) -> crate::Result<ParseResult> {
    let mut extractor = PdfExtractor::from_config(&config.pdf);
    extractor.load(data)?;

    let pages = extractor.page_texts()?;
    info!("Read {} pages of text", pages.len());

    if pages.iter().all(|page| page.trim().is_empty()) {
        return Err(PdfError::TextExtraction(format!(
            "no text on any of {} pages",
            pages.len()
        ))
        .into());
    }

    let parser = PickingListParser::from_config(config);
    Ok(parser.parse_pages(&pages)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PickrError;
    use crate::pdf::fixtures::pdf_with_pages;

    #[test]
    fn test_pdf_without_text_layer() {
        let data = pdf_with_pages(&[&[], &[]]);
        let err = extract_from_pdf(&data, &PickrConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PickrError::Pdf(PdfError::TextExtraction(ref msg)) if msg.contains("2 pages")
        ));
    }

    #[test]
    fn test_garbage_bytes_are_a_pdf_error() {
        let err = extract_from_pdf(b"%PDF-nonsense", &PickrConfig::default()).unwrap_err();
        assert!(matches!(err, PickrError::Pdf(PdfError::Parse(_))));
    }

    #[test]
    fn test_text_pdf_without_lines_is_no_records() {
        let data = pdf_with_pages(&[&["PICKING LIST"], &["nothing to pick here"]]);
        let err = extract_from_pdf(&data, &PickrConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PickrError::Extraction(ExtractionError::NoRecords { .. })
        ));
    }
}

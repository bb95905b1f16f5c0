//! Error types for the pickr-core library.

use thiserror::Error;

/// Main error type for the pickr library.
#[derive(Error, Debug)]
pub enum PickrError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Picking list extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF has pages but no extractable text.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page index requested (0-based).
    #[error("invalid page index: {0}")]
    InvalidPage(usize),

    /// Failed to serialize a PDF document.
    #[error("failed to write PDF: {0}")]
    Write(String),
}

/// Errors related to picking list extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Not a single line item survived field extraction.
    #[error("no picking lines found; not a valid picking list ({candidates} candidates checked)")]
    NoRecords { candidates: usize },
}

/// Result type for the pickr library.
pub type Result<T> = std::result::Result<T, PickrError>;

//! Core library for picking list manifest processing.
//!
//! This crate provides:
//! - PDF processing (per-page text extraction, packing section copy)
//! - Header field extraction (order number, date, time, status)
//! - Packing section boundary detection
//! - Line item tokenizing with legacy code / description splitting
//! - Consolidation of repeated legacy codes

pub mod error;
pub mod models;
pub mod pdf;
pub mod picking;

pub use error::{ExtractionError, PdfError, PickrError, Result};
pub use models::config::PickrConfig;
pub use models::manifest::{
    ConsolidatedRecord, DuplicateGroup, ExtractedRecord, ExtractionStats, HeaderInfo,
    ParseResult, TokenizerMode,
};
pub use pdf::{packing_tail, PdfExtractor, PdfProcessor};
pub use picking::{
    consolidate, duplicate_groups, extract_from_pdf, ManifestParser, PickingListParser,
};

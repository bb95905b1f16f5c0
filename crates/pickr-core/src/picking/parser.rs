//! Picking list parser: pages in, consolidated line items out.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, PickrConfig};
use crate::models::manifest::{ParseResult, TokenizerMode};

use super::consolidate::consolidate;
use super::rules::{boundary::PackingDetector, header::extract_header, split::CodeSplitter, SplitPolicy};
use super::tokenizer::Tokenizer;
use super::{ManifestParser, Result};

/// Page separator used when a whole document arrives as one string.
pub const PAGE_BREAK: char = '\u{000C}';

/// Rule-based picking list parser.
pub struct PickingListParser {
    config: ExtractionConfig,
    splitter: Box<dyn CodeSplitter>,
}

impl PickingListParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            splitter: Box::new(SplitPolicy::default()),
        }
    }

    /// Create a parser from a full configuration.
    pub fn from_config(config: &PickrConfig) -> Self {
        Self {
            config: config.extraction.clone(),
            splitter: Box::new(config.split.clone()),
        }
    }

    /// Set the tokenizer mode.
    pub fn with_mode(mut self, mode: TokenizerMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Replace the legacy code / description splitter.
    pub fn with_splitter(mut self, splitter: Box<dyn CodeSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Restrict the warehouse tags that may end a record in segment mode.
    pub fn with_segment_markers(mut self, markers: Vec<String>) -> Self {
        self.config.segment_markers = markers;
        self
    }
}

impl Default for PickingListParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for PickingListParser {
    fn parse_pages(&self, pages: &[String]) -> Result<ParseResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing picking list from {} pages", pages.len());

        let header = extract_header(pages.first().map(String::as_str).unwrap_or(""));
        if header.is_empty() {
            warnings.push("No header fields found on the first page".to_string());
        } else if header.order_number.is_none() {
            warnings.push("Could not extract order number".to_string());
        }
        if let (Some(date), None) = (&header.date, header.parsed_date()) {
            warnings.push(format!("Issue date {} is not a calendar date", date));
        }
        if let (Some(time), None) = (&header.time, header.parsed_time()) {
            warnings.push(format!("Issue time {} is not a valid time", time));
        }

        let detector = PackingDetector::new(self.config.packing_markers.clone());
        let packing_start = detector.find_packing_start(pages);
        if packing_start.is_none() {
            warnings.push("Packing section not found; all pages read as order lines".to_string());
        }

        let order_pages = &pages[..packing_start.unwrap_or(pages.len())];
        let outcome = Tokenizer::new(&self.config, self.splitter.as_ref()).tokenize(order_pages);

        if outcome.records.is_empty() {
            return Err(ExtractionError::NoRecords {
                candidates: outcome.stats.candidates,
            });
        }

        if outcome.stats.dropped() > 0 {
            warnings.push(format!(
                "{} of {} candidate lines did not match the line pattern",
                outcome.stats.dropped(),
                outcome.stats.candidates
            ));
        }

        let consolidated = consolidate(&outcome.records);

        debug!(
            "Extracted {} records, {} after consolidation, packing start {:?}",
            outcome.records.len(),
            consolidated.len(),
            packing_start
        );

        Ok(ParseResult {
            header,
            records: outcome.records,
            consolidated,
            packing_start,
            page_count: pages.len(),
            stats: outcome.stats,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn parse_text(&self, text: &str) -> Result<ParseResult> {
        let pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
        self.parse_pages(&pages)
    }
}

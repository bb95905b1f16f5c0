//! Picking list data models.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Document-level fields read from the first page.
///
/// Every field is optional. Missing values are left unset here and defaulted
/// by whatever presents the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Picking list number (`N°: 12345`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    /// Issue date as printed, `dd/mm/yyyy`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Issue time as printed, `hh:mm:ss`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Document status word (`Estado: Liberado`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl HeaderInfo {
    /// True when no header field was found.
    pub fn is_empty(&self) -> bool {
        self.order_number.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.status.is_none()
    }

    /// The printed date as a calendar date, if present and well formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%d/%m/%Y").ok())
    }

    /// The printed time, if present and well formed.
    pub fn parsed_time(&self) -> Option<NaiveTime> {
        self.time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok())
    }
}

/// One line item as it appears in the order section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Sequence number printed at the start of the line.
    pub original_sequence: u32,

    /// Primary item code.
    pub code: String,

    /// Legacy inventory code (consolidation key, may be empty).
    pub legacy_code: String,

    /// Article description.
    pub description: String,

    /// Requested quantity. May be negative for stock adjustments.
    pub quantity: Decimal,

    /// Stock on hand. May be negative.
    pub stock_level: Decimal,

    /// Warehouse/location tag.
    pub warehouse_code: String,
}

/// A line item after duplicates have been merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    /// 1-based position after sorting by legacy code.
    pub line: usize,

    /// Primary item code of the first record in the group.
    pub code: String,

    /// Legacy inventory code shared by the group.
    pub legacy_code: String,

    /// Description of the first record in the group.
    pub description: String,

    /// Sum of the group's quantities.
    pub quantity: Decimal,

    /// Stock level of the first record in the group (not summed).
    pub stock_level: Decimal,

    /// Warehouse code of the first record in the group.
    pub warehouse_code: String,
}

/// A legacy code that appeared on more than one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub legacy_code: String,
    /// Quantities in order of appearance.
    pub quantities: Vec<Decimal>,
    pub total: Decimal,
}

/// How order-section text is cut into candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// One candidate per physical line.
    Line,
    /// One candidate per record tail of the joined text.
    Segment,
    /// Line mode first, segment mode when line mode finds nothing.
    #[default]
    Auto,
}

/// Counters describing one tokenizer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Mode that produced the records.
    pub mode: TokenizerMode,
    /// Order-section pages that were read.
    pub pages_scanned: usize,
    /// Candidate lines or segments checked against the field pattern.
    pub candidates: usize,
    /// Candidates that became records.
    pub extracted: usize,
}

impl ExtractionStats {
    /// Candidates that failed the field pattern.
    pub fn dropped(&self) -> usize {
        self.candidates.saturating_sub(self.extracted)
    }
}

/// Everything one run over a document produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    /// Header fields from the first page.
    pub header: HeaderInfo,

    /// Records in order of appearance.
    pub records: Vec<ExtractedRecord>,

    /// Merged, sorted and renumbered records.
    pub consolidated: Vec<ConsolidatedRecord>,

    /// 0-based index of the first packing page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packing_start: Option<usize>,

    /// Total pages supplied.
    pub page_count: usize,

    /// Tokenizer counters.
    pub stats: ExtractionStats,

    /// Non-fatal issues found during the run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ParseResult {
    /// Number of extracted lines folded into another line.
    pub fn duplicates_merged(&self) -> usize {
        self.records.len() - self.consolidated.len()
    }

    /// Pages from the packing boundary to the end of the document.
    pub fn packing_page_count(&self) -> usize {
        self.packing_start
            .map(|start| self.page_count.saturating_sub(start))
            .unwrap_or(0)
    }
}

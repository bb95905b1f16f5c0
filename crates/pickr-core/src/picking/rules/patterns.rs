//! Common regex patterns for picking list extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Header fields (first page)
    pub static ref ORDER_NUMBER: Regex = Regex::new(
        r"N[°º]:\s*(\d+)"
    ).unwrap();

    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"FECHA:\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref ISSUE_TIME: Regex = Regex::new(
        r"HORA:\s*(\d{2}:\d{2}:\d{2})"
    ).unwrap();

    pub static ref STATUS: Regex = Regex::new(
        r"Estado:\s*(\w+)"
    ).unwrap();

    // One picking line: seq, code, remainder, quantity, stock, warehouse
    pub static ref PICKING_LINE: Regex = Regex::new(
        r"^(\d+)\s+([A-Z]{2}[A-Z0-9]+)\s+(.+?)\s+(\d+(?:,\d{2})?)\s+(-?\d[\d.]*(?:,\d+)?)\s+([A-Z]+)\s*$"
    ).unwrap();

    // One record cut from the joined text. The remainder is captured as its
    // first token and the text that follows it; together they accept the
    // same text as the line remainder.
    pub static ref PICKING_SEGMENT: Regex = Regex::new(
        r"(?:^|\s)(\d+)\s+([A-Z]{2}[A-Z0-9]+)\s+(\S+)(.*?)\s+(\d+(?:,\d{2})?)\s+(-?\d[\d.]*(?:,\d+)?)\s+([A-Z]+)\s*$"
    ).unwrap();

    // Record tail directly followed by the next record's sequence number and
    // item code. Group 1 is the stock, group 2 the warehouse tag. A tail
    // without a tag only counts when the next code holds a digit, so a tag
    // is never read as a code.
    pub static ref SEGMENT_BOUNDARY: Regex = Regex::new(
        r"\s\d+(?:,\d{2})?\s+(-?\d[\d.]*(?:,\d+)?)(?:\s+([A-Z]+)\s+\d+\s+[A-Z]{2}[A-Z0-9]+|\s+\d+\s+[A-Z]{2}[A-Z0-9]*\d[A-Z0-9]*)\s"
    ).unwrap();

    // Record tail at a word boundary.
    pub static ref SEGMENT_TAIL: Regex = Regex::new(
        r"\s\d+(?:,\d{2})?\s+-?\d[\d.]*(?:,\d+)?\s+([A-Z]+)\b"
    ).unwrap();

    // Split chain boundaries
    pub static ref NATURAL_WORD: Regex = Regex::new(
        r"[A-ZÁÉÍÓÚÑÜ][a-záéíóúñü]"
    ).unwrap();

    pub static ref SEPARATOR: Regex = Regex::new(
        r#"[\s*"]"#
    ).unwrap();

    // Locale numbers: optional sign, digits, dot thousands, comma decimals
    pub static ref LOCALE_NUMBER: Regex = Regex::new(
        r"^-?\d[\d.]*(?:,\d+)?$"
    ).unwrap();
}

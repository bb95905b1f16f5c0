//! Header metadata extraction from the first page.

use regex::Regex;

use super::patterns::{ISSUE_DATE, ISSUE_TIME, ORDER_NUMBER, STATUS};
use super::FieldExtractor;
use crate::models::manifest::HeaderInfo;

/// Extracts one labeled header field (the pattern's first group).
pub struct HeaderFieldExtractor {
    pattern: &'static Regex,
}

impl HeaderFieldExtractor {
    pub fn new(pattern: &'static Regex) -> Self {
        Self { pattern }
    }

    /// `N°: 12345`
    pub fn order_number() -> Self {
        Self::new(&ORDER_NUMBER)
    }

    /// `FECHA: dd/mm/yyyy`
    pub fn date() -> Self {
        Self::new(&ISSUE_DATE)
    }

    /// `HORA: hh:mm:ss`
    pub fn time() -> Self {
        Self::new(&ISSUE_TIME)
    }

    /// `Estado: word`
    pub fn status() -> Self {
        Self::new(&STATUS)
    }
}

impl FieldExtractor for HeaderFieldExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .collect()
    }
}

/// Extract header fields from the first page's text.
///
/// Each field is matched on its own; a field that is not found stays `None`.
pub fn extract_header(text: &str) -> HeaderInfo {
    HeaderInfo {
        order_number: HeaderFieldExtractor::order_number().extract(text),
        date: HeaderFieldExtractor::date().extract(text),
        time: HeaderFieldExtractor::time().extract(text),
        status: HeaderFieldExtractor::status().extract(text),
    }
}

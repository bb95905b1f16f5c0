//! Candidate segmentation and field extraction for the order section.

use regex::Captures;
use tracing::debug;

use super::rules::numbers::parse_locale_decimal;
use super::rules::patterns::{PICKING_LINE, PICKING_SEGMENT, SEGMENT_BOUNDARY, SEGMENT_TAIL};
use super::rules::split::{CodeSplit, CodeSplitter};
use crate::models::config::ExtractionConfig;
use crate::models::manifest::{ExtractedRecord, ExtractionStats, TokenizerMode};

/// Records plus the counters of the pass that produced them.
#[derive(Debug, Clone)]
pub struct TokenizeOutcome {
    pub records: Vec<ExtractedRecord>,
    pub stats: ExtractionStats,
}

/// Turns order-section page texts into extracted records.
pub struct Tokenizer<'a> {
    config: &'a ExtractionConfig,
    splitter: &'a dyn CodeSplitter,
}

impl<'a> Tokenizer<'a> {
    pub fn new(config: &'a ExtractionConfig, splitter: &'a dyn CodeSplitter) -> Self {
        Self { config, splitter }
    }

    /// Tokenize with the configured mode.
    pub fn tokenize(&self, pages: &[String]) -> TokenizeOutcome {
        self.tokenize_with(self.config.mode, pages)
    }

    /// Tokenize with an explicit mode. `Auto` runs line mode and falls back
    /// to segment mode when line mode yields no records.
    pub fn tokenize_with(&self, mode: TokenizerMode, pages: &[String]) -> TokenizeOutcome {
        match mode {
            TokenizerMode::Line => self.run(TokenizerMode::Line, pages, self.line_candidates(pages)),
            TokenizerMode::Segment => {
                self.run(TokenizerMode::Segment, pages, self.segment_candidates(pages))
            }
            TokenizerMode::Auto => {
                let lines = self.tokenize_with(TokenizerMode::Line, pages);
                if !lines.records.is_empty() {
                    return lines;
                }

                debug!("Line mode found no records, trying segment mode");
                let segments = self.tokenize_with(TokenizerMode::Segment, pages);
                if segments.records.is_empty() { lines } else { segments }
            }
        }
    }

    /// True for page titles, headers, signature labels and footers.
    pub fn is_noise(&self, line: &str) -> bool {
        let upper = line.to_uppercase();
        self.config
            .skip_prefixes
            .iter()
            .any(|p| upper.starts_with(p.as_str()))
            || self
                .config
                .skip_contains
                .iter()
                .any(|c| upper.contains(c.as_str()))
    }

    /// Trimmed, non-empty, non-noise lines of all pages.
    pub fn line_candidates(&self, pages: &[String]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|page| page.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.is_noise(line))
            .map(str::to_string)
            .collect()
    }

    /// Record-sized chunks of the joined non-noise text.
    ///
    /// The stream is cut after every record tail (quantity, stock, warehouse
    /// tag) that is directly followed by the next sequence number and item
    /// code. A tail missing its tag is cut after the stock so the broken
    /// record stays a candidate of its own. Text after the last tail is
    /// discarded.
    pub fn segment_candidates(&self, pages: &[String]) -> Vec<String> {
        let stream = self.line_candidates(pages).join(" ");
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in SEGMENT_BOUNDARY.captures_iter(&stream) {
            let end = match (caps.get(2), caps.get(1)) {
                (Some(tag), _) if !self.is_segment_marker(tag.as_str()) => continue,
                (Some(tag), _) => tag.end(),
                (None, Some(stock)) => stock.end(),
                (None, None) => continue,
            };
            segments.push(normalize_whitespace(&stream[last..end]));
            last = end;
        }

        let rest = &stream[last..];
        let tail_end = SEGMENT_TAIL
            .captures_iter(rest)
            .filter(|caps| self.is_segment_marker(&caps[1]))
            .filter_map(|caps| caps.get(1).map(|m| m.end()))
            .last();
        if let Some(end) = tail_end {
            segments.push(normalize_whitespace(&rest[..end]));
        }

        segments.retain(|segment| !segment.is_empty());
        segments
    }

    /// True when `tag` may terminate a record. Any tag does when no markers
    /// are configured.
    fn is_segment_marker(&self, tag: &str) -> bool {
        self.config.segment_markers.is_empty()
            || self.config.segment_markers.iter().any(|m| m == tag)
    }

    fn run(&self, mode: TokenizerMode, pages: &[String], candidates: Vec<String>) -> TokenizeOutcome {
        let records: Vec<ExtractedRecord> = candidates
            .iter()
            .filter_map(|candidate| {
                let record = match mode {
                    TokenizerMode::Segment => self.match_segment(candidate),
                    _ => self.match_line(candidate),
                };
                if record.is_none() {
                    debug!("Dropped candidate: {}", candidate);
                }
                record
            })
            .collect();

        let stats = ExtractionStats {
            mode,
            pages_scanned: pages.len(),
            candidates: candidates.len(),
            extracted: records.len(),
        };

        debug!(
            "{:?} mode: {} of {} candidates extracted",
            mode, stats.extracted, stats.candidates
        );

        TokenizeOutcome { records, stats }
    }

    /// Apply the line field pattern to one candidate.
    pub fn match_line(&self, candidate: &str) -> Option<ExtractedRecord> {
        let caps = PICKING_LINE.captures(candidate)?;
        let remainder = &caps[3];
        let split = self.splitter.split(remainder);
        build_record(&caps, split, remainder, [4, 5, 6])
    }

    /// Apply the segment field pattern to one candidate.
    ///
    /// A chunk that still holds a complete record followed by another record
    /// start (its warehouse tag was not a configured marker) is rejected.
    pub fn match_segment(&self, candidate: &str) -> Option<ExtractedRecord> {
        if SEGMENT_BOUNDARY.is_match(candidate) {
            debug!("Segment holds more than one record: {}", candidate);
            return None;
        }
        let caps = PICKING_SEGMENT.captures(candidate)?;
        let remainder = format!("{}{}", &caps[3], &caps[4]);
        let split = self.splitter.split_pair(&caps[3], &caps[4]);
        build_record(&caps, split, remainder.trim(), [5, 6, 7])
    }
}

/// Build a record from pattern captures. Groups 1 and 2 are the sequence
/// number and item code; `numeric` holds the quantity, stock and warehouse
/// group indices.
fn build_record(
    caps: &Captures<'_>,
    split: CodeSplit,
    remainder: &str,
    numeric: [usize; 3],
) -> Option<ExtractedRecord> {
    let [quantity, stock, warehouse] = numeric;

    let original_sequence = caps[1].parse().ok()?;
    let quantity = parse_locale_decimal(&caps[quantity])?;
    let stock_level = parse_locale_decimal(&caps[stock])?;

    let description = if split.description.is_empty() {
        remainder.trim().to_string()
    } else {
        split.description
    };

    Some(ExtractedRecord {
        original_sequence,
        code: caps[2].to_string(),
        legacy_code: split.legacy_code,
        description,
        quantity,
        stock_level,
        warehouse_code: caps[warehouse].to_string(),
    })
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::rules::split::SplitPolicy;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    const ORDER_PAGE: &str = "PICKING LIST N°: 18342
FECHA: 07/03/2025 HORA: 09:41:27
Estado: Liberado
COD COD VIEJO ARTICULO CANT STOCK ALM
1 GR00123 FVMB1CR181Grifería lavatorio 2,00 3.228 DEP
2 CN00456 HH32 Codo 90 Bronce 1/2 12 -5 DEP
3 TB00789 PV110 \"TUBO PVC 110\" 4,50 1.250,50 CEN
4 XX00001 ZZ9 Codo 3,00 12
PREPARO: ____________
Página 1 de 1";

    #[test]
    fn test_line_mode_extracts_records() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let outcome = tokenizer.tokenize_with(TokenizerMode::Line, &pages(&[ORDER_PAGE]));

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(
            outcome.records[0],
            ExtractedRecord {
                original_sequence: 1,
                code: "GR00123".to_string(),
                legacy_code: "FVMB1CR181".to_string(),
                description: "Grifería lavatorio".to_string(),
                quantity: dec("2.00"),
                stock_level: dec("3228"),
                warehouse_code: "DEP".to_string(),
            }
        );

        assert_eq!(outcome.records[1].legacy_code, "HH32");
        assert_eq!(outcome.records[1].description, "Codo 90 Bronce 1/2");
        assert_eq!(outcome.records[1].quantity, dec("12"));
        assert_eq!(outcome.records[1].stock_level, dec("-5"));

        assert_eq!(outcome.records[2].legacy_code, "PV110");
        assert_eq!(outcome.records[2].description, "TUBO PVC 110");
        assert_eq!(outcome.records[2].stock_level, dec("1250.50"));
        assert_eq!(outcome.records[2].warehouse_code, "CEN");
    }

    #[test]
    fn test_code_words_in_descriptions_do_not_move_the_split() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let text = "1 TB00789 PV110 TUBO PVC CON CODO 4,50 10 DEP
2 GR00123 FVMB1CR181Grifería c/ LLAVE 2,00 3 DEP
3 CN00456 HCODO12 Codo bronce 1 1 DEP";
        let outcome = tokenizer.tokenize(&pages(&[text]));

        let split: Vec<(&str, &str)> = outcome
            .records
            .iter()
            .map(|r| (r.legacy_code.as_str(), r.description.as_str()))
            .collect();
        assert_eq!(
            split,
            vec![
                ("PV110", "TUBO PVC CON CODO"),
                ("FVMB1CR181", "Grifería c/ LLAVE"),
                ("HCODO12", "Codo bronce"),
            ]
        );
    }

    #[test]
    fn test_line_without_warehouse_is_dropped_and_counted() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        assert_eq!(tokenizer.match_line("4 XX00001 ZZ9 Codo 3,00 12"), None);

        let outcome = tokenizer.tokenize_with(TokenizerMode::Line, &pages(&[ORDER_PAGE]));
        assert!(outcome.records.iter().all(|r| r.original_sequence != 4));
        assert_eq!(outcome.stats.candidates, 4);
        assert_eq!(outcome.stats.extracted, 3);
        assert_eq!(outcome.stats.dropped(), 1);
    }

    #[test]
    fn test_segment_without_warehouse_is_dropped_and_counted() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let text = pages(&["1 AB00001 ZZ1 Tapa\nchica 1 1 DEP 2 XX00001 ZZ9 Codo 3,00 12\n3 CD00003 YY1 Tapa 2 4 DEP"]);
        let candidates = tokenizer.segment_candidates(&text);
        assert_eq!(
            candidates,
            vec![
                "1 AB00001 ZZ1 Tapa chica 1 1 DEP".to_string(),
                "2 XX00001 ZZ9 Codo 3,00 12".to_string(),
                "3 CD00003 YY1 Tapa 2 4 DEP".to_string(),
            ]
        );

        let outcome = tokenizer.tokenize_with(TokenizerMode::Segment, &text);
        let sequence: Vec<u32> = outcome.records.iter().map(|r| r.original_sequence).collect();
        assert_eq!(sequence, vec![1, 3]);
        assert_eq!(outcome.stats.candidates, 3);
        assert_eq!(outcome.stats.extracted, 2);
        assert_eq!(outcome.stats.dropped(), 1);
    }

    #[test]
    fn test_noise_lines_are_not_candidates() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        assert!(tokenizer.is_noise("PICKING LIST N°: 1"));
        assert!(tokenizer.is_noise("Controló: ______"));
        assert!(tokenizer.is_noise("Página 2 de 3"));
        assert!(tokenizer.is_noise("Cod Viejo Articulo"));
        assert!(!tokenizer.is_noise("1 GR00123 FVMB1CR181Grifería 2,00 3 DEP"));
    }

    #[test]
    fn test_description_defaults_to_remainder() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let record = tokenizer.match_line("7 AB00001 QWERTY99 1 0 DEP").unwrap();
        assert_eq!(record.legacy_code, "QWERTY99");
        assert_eq!(record.description, "QWERTY99");
    }

    #[test]
    fn test_segment_mode_handles_wrapped_lines() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let text = "PICKING LIST N°: 5
1 GR00123 FVMB1CR181Grifería
lavatorio monocomando 2,00 3.228
DEP 2 CN00456 HH32 Codo 90
Bronce 12 -5 DEP
pie de página sin marcador";

        let outcome = tokenizer.tokenize_with(TokenizerMode::Segment, &pages(&[text]));

        assert_eq!(outcome.stats.candidates, 2);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].legacy_code, "FVMB1CR181");
        assert_eq!(outcome.records[0].description, "Grifería lavatorio monocomando");
        assert_eq!(outcome.records[0].stock_level, dec("3228"));
        assert_eq!(outcome.records[1].original_sequence, 2);
        assert_eq!(outcome.records[1].legacy_code, "HH32");
        assert_eq!(outcome.records[1].description, "Codo 90 Bronce");
        assert_eq!(outcome.records[1].warehouse_code, "DEP");
    }

    const MIXED_WAREHOUSES: &str =
        "1 TB00789 PV110 Tubo\nPVC 4,50 10 CEN 2 GR00123 FVMB1CR181Grifería\nlavatorio 2,00 3 DEP";

    #[test]
    fn test_segment_mode_cuts_at_any_warehouse() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let outcome = tokenizer.tokenize(&pages(&[MIXED_WAREHOUSES]));

        assert_eq!(outcome.stats.mode, TokenizerMode::Segment);
        assert_eq!(outcome.stats.candidates, 2);
        assert_eq!(
            outcome.records[0],
            ExtractedRecord {
                original_sequence: 1,
                code: "TB00789".to_string(),
                legacy_code: "PV110".to_string(),
                description: "Tubo PVC".to_string(),
                quantity: dec("4.50"),
                stock_level: dec("10"),
                warehouse_code: "CEN".to_string(),
            }
        );
        assert_eq!(outcome.records[1].legacy_code, "FVMB1CR181");
        assert_eq!(outcome.records[1].description, "Grifería lavatorio");
        assert_eq!(outcome.records[1].quantity, dec("2"));
        assert_eq!(outcome.records[1].warehouse_code, "DEP");
    }

    #[test]
    fn test_segment_markers_restrict_record_tails() {
        let config = ExtractionConfig {
            segment_markers: vec!["DEP".to_string()],
            ..Default::default()
        };
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let outcome = tokenizer.tokenize_with(TokenizerMode::Segment, &pages(&[MIXED_WAREHOUSES]));

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.candidates, 1);
        assert_eq!(outcome.stats.dropped(), 1);
    }

    #[test]
    fn test_segment_and_line_accept_the_same_remainders() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        for candidate in [
            "1 AB00001 abc123 tapa*chica 1 1 DEP",
            "2 AB00002 XY9** Codo corto 1 1 DEP",
            "3 AB00003 PV110 \"TUBO PVC\" 4,50 10 CEN",
            "4 AB00004 QWERTY99 1 0 DEP",
            "5 AB00005 *promo Tapa 2 2 DEP",
        ] {
            let line = tokenizer.match_line(candidate);
            assert!(line.is_some(), "line mode rejected {candidate}");
            assert_eq!(tokenizer.match_segment(candidate), line, "{candidate}");
        }
    }

    #[test]
    fn test_auto_falls_back_to_segments() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let wrapped = pages(&["1 GR00123 FVMB1CR181Grifería\nlavatorio 2,00 3 DEP"]);
        let outcome = tokenizer.tokenize(&wrapped);
        assert_eq!(outcome.stats.mode, TokenizerMode::Segment);
        assert_eq!(outcome.records.len(), 1);

        let flat = pages(&["1 GR00123 FVMB1CR181Grifería 2,00 3 DEP"]);
        let outcome = tokenizer.tokenize(&flat);
        assert_eq!(outcome.stats.mode, TokenizerMode::Line);
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn test_auto_reports_line_stats_when_both_fail() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let outcome = tokenizer.tokenize(&pages(&["hello\nworld"]));
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.mode, TokenizerMode::Line);
        assert_eq!(outcome.stats.candidates, 2);
    }

    #[test]
    fn test_order_of_appearance_across_pages() {
        let config = ExtractionConfig::default();
        let policy = SplitPolicy::default();
        let tokenizer = Tokenizer::new(&config, &policy);

        let outcome = tokenizer.tokenize(&pages(&[
            "3 AA0003 ZZ1 Tapa 1 1 DEP",
            "1 AA0001 YY1 Tapa 1 1 DEP\n2 AA0002 XX1 Tapa 1 1 DEP",
        ]));

        let sequence: Vec<u32> = outcome.records.iter().map(|r| r.original_sequence).collect();
        assert_eq!(sequence, vec![3, 1, 2]);
        assert_eq!(outcome.stats.pages_scanned, 2);
    }
}

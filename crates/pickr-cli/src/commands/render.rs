//! Presentation of a parse result as JSON, CSV or a text table.

use chrono::{Local, NaiveDateTime};

use pickr_core::models::config::OutputConfig;
use pickr_core::picking::rules::{format_quantity, format_stock};
use pickr_core::{DuplicateGroup, HeaderInfo, ParseResult};

/// Header fields with every gap filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    pub order_number: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

impl ResolvedHeader {
    /// Fill missing fields: `-` for the order number, `now` for date and time,
    /// the configured status otherwise.
    pub fn resolve(header: &HeaderInfo, output: &OutputConfig, now: NaiveDateTime) -> Self {
        Self {
            order_number: header.order_number.clone().unwrap_or_else(|| "-".to_string()),
            date: header
                .date
                .clone()
                .unwrap_or_else(|| now.format("%d/%m/%Y").to_string()),
            time: header
                .time
                .clone()
                .unwrap_or_else(|| now.format("%H:%M:%S").to_string()),
            status: header
                .status
                .clone()
                .unwrap_or_else(|| output.default_status.clone()),
        }
    }
}

/// Cut a description to `width` characters, ending in `..` when shortened.
pub fn truncate_description(description: &str, width: usize) -> String {
    if description.chars().count() <= width {
        return description.to_string();
    }
    let kept: String = description.chars().take(width.saturating_sub(2)).collect();
    format!("{}..", kept)
}

pub fn format_json(result: &ParseResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn format_csv(result: &ParseResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "line",
        "code",
        "legacy_code",
        "description",
        "quantity",
        "stock",
        "warehouse",
    ])?;

    for record in &result.consolidated {
        wtr.write_record([
            &record.line.to_string(),
            &record.code,
            &record.legacy_code,
            &record.description,
            &format_quantity(record.quantity),
            &format_stock(record.stock_level),
            &record.warehouse_code,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(result: &ParseResult, output: &OutputConfig) -> String {
    format_text_at(result, output, Local::now().naive_local())
}

fn format_text_at(result: &ParseResult, output: &OutputConfig, now: NaiveDateTime) -> String {
    let header = ResolvedHeader::resolve(&result.header, output, now);
    let width = output.description_width;
    let mut out = String::new();

    out.push_str(&format!("PICKING LIST N°: {}\n", header.order_number));
    out.push_str(&format!(
        "Fecha: {}  Hora: {}  Estado: {}\n\n",
        header.date, header.time, header.status
    ));

    out.push_str(&format!(
        "{:>4}  {:<10} {:<14} {:<width$} {:>8} {:>8}  {}\n",
        "#",
        "COD",
        "COD VIEJO",
        "ARTICULO",
        "CANT",
        "STOCK",
        "ALM",
        width = width
    ));

    for record in &result.consolidated {
        out.push_str(&format!(
            "{:>4}  {:<10} {:<14} {:<width$} {:>8} {:>8}  {}\n",
            record.line,
            record.code,
            record.legacy_code,
            truncate_description(&record.description, width),
            format_quantity(record.quantity),
            format_stock(record.stock_level),
            record.warehouse_code,
            width = width
        ));
    }

    out.push_str(&format!("\nTotal lines: {}\n", result.consolidated.len()));
    out
}

pub fn format_duplicates(groups: &[DuplicateGroup]) -> String {
    if groups.is_empty() {
        return "No repeated legacy codes\n".to_string();
    }

    let mut out = String::from("Repeated legacy codes:\n");
    for group in groups {
        let parts: Vec<String> = group.quantities.iter().map(|q| format_quantity(*q)).collect();
        out.push_str(&format!(
            "  {}: {} = {}\n",
            group.legacy_code,
            parts.join(" + "),
            format_quantity(group.total)
        ));
    }
    out
}

pub fn format_stats(result: &ParseResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Pages: {}\n", result.page_count));
    match result.packing_start {
        Some(start) => out.push_str(&format!(
            "Packing section: page {} ({} pages)\n",
            start + 1,
            result.packing_page_count()
        )),
        None => out.push_str("Packing section: not found\n"),
    }
    out.push_str(&format!("Mode: {:?}\n", result.stats.mode));
    out.push_str(&format!(
        "Candidates: {} ({} extracted, {} dropped)\n",
        result.stats.candidates,
        result.stats.extracted,
        result.stats.dropped()
    ));
    out.push_str(&format!(
        "Lines: {} extracted, {} after consolidation\n",
        result.records.len(),
        result.consolidated.len()
    ));
    out.push_str(&format!("Processing time: {}ms\n", result.processing_time_ms));
    out
}

//! Merging duplicate line items by legacy code.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::manifest::{ConsolidatedRecord, DuplicateGroup, ExtractedRecord};

/// Group records by legacy code, sum quantities and renumber.
///
/// Non-summed fields come from the first record of each group in input
/// order. Output is sorted by legacy code (code-point order) and numbered
/// `1..=N`. An empty legacy code is an ordinary key.
pub fn consolidate(records: &[ExtractedRecord]) -> Vec<ConsolidatedRecord> {
    let mut groups: BTreeMap<&str, ConsolidatedRecord> = BTreeMap::new();

    for record in records {
        groups
            .entry(record.legacy_code.as_str())
            .and_modify(|group| group.quantity += record.quantity)
            .or_insert_with(|| ConsolidatedRecord {
                line: 0,
                code: record.code.clone(),
                legacy_code: record.legacy_code.clone(),
                description: record.description.clone(),
                quantity: record.quantity,
                stock_level: record.stock_level,
                warehouse_code: record.warehouse_code.clone(),
            });
    }

    groups
        .into_values()
        .enumerate()
        .map(|(i, mut group)| {
            group.line = i + 1;
            group
        })
        .collect()
}

/// Legacy codes that occur on more than one line, with their quantities.
pub fn duplicate_groups(records: &[ExtractedRecord]) -> Vec<DuplicateGroup> {
    let mut quantities: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();

    for record in records {
        quantities
            .entry(record.legacy_code.as_str())
            .or_default()
            .push(record.quantity);
    }

    quantities
        .into_iter()
        .filter(|(_, q)| q.len() > 1)
        .map(|(code, q)| DuplicateGroup {
            legacy_code: code.to_string(),
            total: q.iter().copied().sum(),
            quantities: q,
        })
        .collect()
}

/// View consolidated rows as extracted records so they can be fed back in.
fn as_records(consolidated: &[ConsolidatedRecord]) -> Vec<ExtractedRecord> {
    consolidated
        .iter()
        .map(|c| ExtractedRecord {
            original_sequence: c.line as u32,
            code: c.code.clone(),
            legacy_code: c.legacy_code.clone(),
            description: c.description.clone(),
            quantity: c.quantity,
            stock_level: c.stock_level,
            warehouse_code: c.warehouse_code.clone(),
        })
        .collect()
}

/// Consolidate rows that are already one per legacy code.
///
/// For sorted input this returns the same rows.
pub fn reconsolidate(consolidated: &[ConsolidatedRecord]) -> Vec<ConsolidatedRecord> {
    consolidate(&as_records(consolidated))
}

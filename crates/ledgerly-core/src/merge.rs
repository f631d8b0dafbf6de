//! Multiline row merger
//!
//! Bank statement exports frequently wrap one logical transaction across
//! several physical CSV rows: the first row carries the date and the start of
//! the description, and the continuation rows carry only the overflow text.
//! This module reconstructs logical transaction rows before categorization.

use crate::models::{ColumnMapping, RawRow};

/// Merge continuation rows into their preceding dated row.
///
/// A row with a non-empty (trimmed) date cell starts a new logical
/// transaction. A row without one is a continuation: its description cell, if
/// non-empty, is space-joined onto the current transaction's description.
/// Continuation rows appearing before any dated row have nothing to attach to
/// and are dropped — leading garbage in an export is discarded, not an error.
pub fn merge_multiline_rows(rows: &[RawRow], mapping: &ColumnMapping) -> Vec<RawRow> {
    let mut merged = Vec::new();
    let mut current: Option<RawRow> = None;

    for row in rows {
        let has_date = row
            .get(&mapping.date)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);

        if has_date {
            // Starts a new logical transaction; flush the previous one.
            if let Some(tx) = current.take() {
                merged.push(tx);
            }
            current = Some(row.clone());
        } else if let Some(tx) = current.as_mut() {
            let extra = row
                .get(&mapping.description)
                .map(|v| v.trim())
                .unwrap_or("");
            if !extra.is_empty() {
                let desc = tx.entry(mapping.description.clone()).or_default();
                *desc = format!("{} {}", desc, extra).trim().to_string();
            }
        }
        // No accumulator yet: orphan continuation row, dropped.
    }

    if let Some(tx) = current {
        merged.push(tx);
    }

    merged
}

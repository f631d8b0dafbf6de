//! CSV reading glue for statement exports
//!
//! Thin layer between the `csv` reader and the multiline merger: rows come
//! out as column-name → cell-value maps, exactly what the merger and resolver
//! consume.

use std::io::Read;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ColumnMapping, RawRow};

/// Read a headered CSV into raw row maps.
///
/// Short rows (fewer cells than headers) simply lack those keys; the merger
/// treats a missing date cell as a continuation marker, so bank exports with
/// ragged continuation rows parse cleanly.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header.to_string(), value.to_string());
            }
        }
        rows.push(row);
    }

    debug!("Read {} raw rows", rows.len());
    Ok(rows)
}

/// Check that a column mapping refers to columns the file actually has.
///
/// Surfaced before processing so a typo in a column name fails the whole
/// import up front instead of silently categorizing everything as Others.
pub fn validate_mapping(rows: &[RawRow], mapping: &ColumnMapping) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    for (field, column) in [("date", &mapping.date), ("description", &mapping.description)] {
        if !first.contains_key(column) {
            return Err(Error::Import(format!(
                "{} column '{}' not found in CSV header",
                field, column
            )));
        }
    }
    if let Some(col) = &mapping.category {
        if !first.contains_key(col) {
            return Err(Error::Import(format!(
                "category column '{}' not found in CSV header",
                col
            )));
        }
    }
    Ok(())
}

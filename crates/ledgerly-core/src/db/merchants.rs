//! Merchant category cache operations
//!
//! The cache maps a normalized merchant name to a category plus its
//! provenance. Entries are created lazily by the resolver (source rule or
//! gemini) or explicitly by an override (source manual); entries are never
//! deleted by this crate.

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, MerchantCategory, Source};

/// Outcome of a best-effort cache insert.
///
/// A concurrent first-writer losing the race to the UNIQUE constraint is not
/// an error: the entry it wanted already exists with an equivalent value.
/// Genuine store failures still surface as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new cache entry was created.
    Inserted,
    /// An entry for this merchant already existed; nothing was written.
    AlreadyExists,
}

/// Normalize a merchant name into its cache-key form.
pub fn normalize_merchant(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Database {
    /// Look up a cached category by normalized merchant name.
    pub fn find_merchant_category(&self, merchant_name: &str) -> Result<Option<MerchantCategory>> {
        let conn = self.conn()?;
        let normalized = normalize_merchant(merchant_name);

        let entry = conn
            .query_row(
                "SELECT id, merchant_name, category, source, created_at, updated_at
                 FROM merchant_categories WHERE merchant_name = ?",
                params![normalized],
                row_to_merchant_category,
            )
            .optional()?;

        Ok(entry)
    }

    /// Best-effort insert used by the resolver's rule and AI stages.
    ///
    /// Uses `INSERT OR IGNORE`: if another resolver already cached this
    /// merchant, the write is a no-op and `AlreadyExists` is returned. The
    /// caller has already determined the category and returns it either way.
    pub fn insert_merchant_category(
        &self,
        merchant_name: &str,
        category: Category,
        source: Source,
    ) -> Result<InsertOutcome> {
        let conn = self.conn()?;
        let normalized = normalize_merchant(merchant_name);

        let changed = conn.execute(
            "INSERT OR IGNORE INTO merchant_categories (merchant_name, category, source)
             VALUES (?, ?, ?)",
            params![normalized, category.as_str(), source.as_str()],
        )?;

        if changed == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    /// Manual override: atomically create or replace the entry for a merchant
    /// with `source = manual`.
    ///
    /// Unlike the resolver's ignore-on-conflict insert, an override always
    /// wins; it replaces category and source and bumps `updated_at`.
    pub fn upsert_merchant_override(
        &self,
        merchant_name: &str,
        category: Category,
    ) -> Result<MerchantCategory> {
        let conn = self.conn()?;
        let normalized = normalize_merchant(merchant_name);

        conn.execute(
            "INSERT INTO merchant_categories (merchant_name, category, source)
             VALUES (?, ?, 'manual')
             ON CONFLICT(merchant_name) DO UPDATE SET
                 category = excluded.category,
                 source = 'manual',
                 updated_at = CURRENT_TIMESTAMP",
            params![normalized, category.as_str()],
        )?;

        self.find_merchant_category(&normalized)?
            .ok_or_else(|| Error::NotFound(format!("merchant category: {}", normalized)))
    }

    /// List all cached entries, ordered by merchant name.
    pub fn list_merchant_categories(&self) -> Result<Vec<MerchantCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, merchant_name, category, source, created_at, updated_at
             FROM merchant_categories ORDER BY merchant_name",
        )?;

        let entries = stmt
            .query_map([], row_to_merchant_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

fn row_to_merchant_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<MerchantCategory> {
    let category_str: String = row.get(2)?;
    let source_str: String = row.get(3)?;
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;

    Ok(MerchantCategory {
        id: row.get(0)?,
        merchant_name: row.get(1)?,
        // The CHECK constraint and the resolver both keep these in range;
        // fall back conservatively if a hand-edited row slips through.
        category: category_str.parse().unwrap_or(Category::Others),
        source: source_str.parse().unwrap_or(Source::Rule),
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

//! Domain models for Ledgerly

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw CSV row as read from a statement export: column name → cell value.
///
/// Rows flow from the CSV reader through the multiline merger to the
/// categorizer without being reshaped, so unmapped columns (amount, balance,
/// reference numbers) survive untouched.
pub type RawRow = HashMap<String, String>;

/// Maps logical transaction fields to the statement's actual column names.
///
/// Supplied once per file and immutable for the duration of that file's
/// processing. The `category` column is optional; when present and populated,
/// its value short-circuits the whole resolution pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Column holding the transaction date. An empty date cell marks a
    /// continuation row.
    pub date: String,
    /// Column holding the free-text description used for merchant extraction.
    pub description: String,
    /// Optional column holding a user-designated explicit category.
    #[serde(default)]
    pub category: Option<String>,
}

impl ColumnMapping {
    pub fn new(date: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// The fixed spending category taxonomy.
///
/// Declaration order matters: it is the scan order for rule matching and for
/// recognizing a label inside an AI response. `Others` is the universal
/// fallback and must stay last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Utilities,
    Entertainment,
    Travel,
    Healthcare,
    Education,
    Groceries,
    Others,
}

impl Category {
    /// All categories in canonical declaration order.
    pub const ALL: [Category; 10] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Utilities,
        Self::Entertainment,
        Self::Travel,
        Self::Healthcare,
        Self::Education,
        Self::Groceries,
        Self::Others,
    ];

    /// Canonical-cased label, as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Travel => "Travel",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Groceries => "Groceries",
            Self::Others => "Others",
        }
    }

    /// Case-insensitive lookup returning the canonical variant.
    ///
    /// Folds case on the input side only; externally supplied labels
    /// ("groceries", "FOOD") resolve to their canonical casing.
    pub fn from_loose(s: &str) -> Option<Category> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_loose(s).ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance of a cached merchant category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Matched by the keyword rule engine
    Rule,
    /// Classified by the Gemini fallback
    Gemini,
    /// Explicit user override; always wins on subsequent lookups
    Manual,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Gemini => "gemini",
            Self::Manual => "manual",
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rule" => Ok(Self::Rule),
            "gemini" => Ok(Self::Gemini),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted merchant → category cache entry.
///
/// At most one entry exists per normalized merchant name; the table enforces
/// this with a uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantCategory {
    pub id: i64,
    /// Normalized merchant name: lowercased and trimmed before storage.
    pub merchant_name: String,
    pub category: Category,
    pub source: Source,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Ledgerly Core Library
//!
//! Shared functionality for the Ledgerly statement categorization tool:
//! - CSV reading and multiline row merging for bank statement exports
//! - Merchant name extraction heuristic
//! - Keyword rule engine over the fixed category taxonomy
//! - Persistent merchant → category cache (SQLite) with provenance
//! - Gemini AI fallback classifier behind a pluggable backend trait
//! - The hybrid resolver tying the tiers together

pub mod ai;
pub mod categorize;
pub mod db;
pub mod error;
pub mod import;
pub mod merchant;
pub mod merge;
pub mod models;
pub mod rules;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, GeminiBackend, MockBackend};
pub use categorize::{resolve_ai_response, Categorizer};
pub use db::{Database, InsertOutcome};
pub use error::{Error, Result};
pub use merchant::{extract_merchant, MERCHANT_DISPLAY_LEN, MERCHANT_MAX_LEN};
pub use merge::merge_multiline_rows;
pub use models::{Category, ColumnMapping, MerchantCategory, RawRow, Source};
pub use rules::RuleSet;

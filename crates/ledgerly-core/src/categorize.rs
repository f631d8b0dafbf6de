//! Hybrid categorization resolver
//!
//! One run per logical transaction, stages in strict priority order, each
//! short-circuiting on success:
//!
//! 1. explicit CSV category column (validated against the taxonomy)
//! 2. merchant extraction (no token means "Others", terminally)
//! 3. merchant category cache (manual overrides win here)
//! 4. keyword rules, with a best-effort cache write
//! 5. Gemini fallback, revalidated, with a best-effort cache write
//!
//! The resolver never fails a transaction: every error path degrades to
//! "Others" or to continuing without the cache.

use tracing::{debug, error, warn};

use crate::ai::{AIBackend, AIClient};
use crate::db::Database;
use crate::merchant::{extract_merchant, MERCHANT_MAX_LEN};
use crate::models::{Category, ColumnMapping, RawRow, Source};
use crate::rules::RuleSet;

/// Extract the first taxonomy label appearing in a free-text AI response.
///
/// The classifier is asked for only the category name but may reply with a
/// sentence; scan for labels in taxonomy order, case-insensitively, and
/// default to `Others` when nothing is recognizable.
pub fn resolve_ai_response(text: &str) -> Category {
    let lower = text.to_lowercase();
    Category::ALL
        .into_iter()
        .find(|c| lower.contains(&c.as_str().to_lowercase()))
        .unwrap_or(Category::Others)
}

/// Hybrid category resolver
///
/// Holds the rule table as an injected value so tests can substitute their
/// own, and an optional AI client; without one the AI tier resolves to
/// `Others` immediately.
pub struct Categorizer<'a> {
    db: &'a Database,
    rules: RuleSet,
    ai: Option<&'a AIClient>,
}

impl<'a> Categorizer<'a> {
    /// Create a resolver with the default rule table and no AI tier
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            rules: RuleSet::default(),
            ai: None,
        }
    }

    /// Create a resolver with the default rule table and an AI fallback
    pub fn with_ai(db: &'a Database, ai: &'a AIClient) -> Self {
        Self {
            db,
            rules: RuleSet::default(),
            ai: Some(ai),
        }
    }

    /// Replace the rule table
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Resolve the category for one merged transaction row.
    ///
    /// Infallible by design: the worst outcome is `Others`.
    pub async fn categorize(&self, row: &RawRow, mapping: &ColumnMapping) -> Category {
        // 1. Explicit CSV category: valid values return immediately with no
        //    cache interaction at all.
        if let Some(col) = &mapping.category {
            if let Some(raw) = row.get(col) {
                if let Some(category) = Category::from_loose(raw) {
                    debug!("Explicit CSV category '{}' for row", category);
                    return category;
                }
            }
        }

        // 2. Merchant extraction. No usable token, no resolution.
        let description = row.get(&mapping.description).map(String::as_str).unwrap_or("");
        let token = match extract_merchant(description, MERCHANT_MAX_LEN) {
            Some(t) => t,
            None => return Category::Others,
        };
        let merchant_name = token.to_lowercase();

        // 3. Cache lookup. Manual overrides and previously learned results
        //    take precedence here; a read failure degrades to a miss.
        match self.db.find_merchant_category(&merchant_name) {
            Ok(Some(entry)) => {
                debug!(
                    "Cache hit for '{}': {} ({})",
                    merchant_name, entry.category, entry.source
                );
                return entry.category;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Cache lookup failed for '{}': {}", merchant_name, e);
            }
        }

        // 4. Keyword rules.
        if let Some(category) = self.rules.match_merchant(&merchant_name) {
            self.remember(&merchant_name, category, Source::Rule);
            return category;
        }

        // 5. Gemini fallback. The response is untrusted free text; failures
        //    and missing credentials both land on Others.
        let category = match self.ai {
            Some(ai) => match ai.classify(&merchant_name).await {
                Ok(text) => resolve_ai_response(&text),
                Err(e) => {
                    error!("AI classification failed for '{}': {}", merchant_name, e);
                    Category::Others
                }
            },
            None => {
                debug!("No AI client configured; '{}' falls back to Others", merchant_name);
                Category::Others
            }
        };
        self.remember(&merchant_name, category, Source::Gemini);
        category
    }

    /// Best-effort cache write: losing an insert race to a concurrent
    /// resolver is a no-op, and any other store failure is logged and
    /// swallowed since the category has already been determined.
    fn remember(&self, merchant_name: &str, category: Category, source: Source) {
        if let Err(e) = self.db.insert_merchant_category(merchant_name, category, source) {
            warn!("Failed to cache '{}' -> {}: {}", merchant_name, category, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping::new("Date", "Description")
    }

    #[test]
    fn test_resolve_ai_response() {
        assert_eq!(resolve_ai_response("Groceries"), Category::Groceries);
        assert_eq!(resolve_ai_response("  food  "), Category::Food);
        assert_eq!(
            resolve_ai_response("I think this merchant is Travel related."),
            Category::Travel
        );
        assert_eq!(resolve_ai_response("no idea"), Category::Others);
        assert_eq!(resolve_ai_response(""), Category::Others);
    }

    #[tokio::test]
    async fn test_explicit_csv_category_short_circuits() {
        let db = Database::in_memory().unwrap();
        // Even a conflicting manual override must not be consulted.
        db.upsert_merchant_override("swiggy", Category::Travel).unwrap();

        let categorizer = Categorizer::new(&db);
        let mapping = mapping().with_category("Cat");
        let r = row(&[
            ("Date", "2024-01-01"),
            ("Description", "SWIGGY#123"),
            ("Cat", "groceries"),
        ]);

        let category = categorizer.categorize(&r, &mapping).await;
        assert_eq!(category, Category::Groceries);

        // No write happened: still just the seeded override.
        let entries = db.list_merchant_categories().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, Category::Travel);
    }

    #[tokio::test]
    async fn test_invalid_explicit_category_falls_through() {
        let db = Database::in_memory().unwrap();
        let categorizer = Categorizer::new(&db);
        let mapping = mapping().with_category("Cat");
        let r = row(&[
            ("Date", "2024-01-01"),
            ("Description", "SWIGGY#123"),
            ("Cat", "Rent"),
        ]);

        // "Rent" is not in the taxonomy; the rule tier catches swiggy.
        let category = categorizer.categorize(&r, &mapping).await;
        assert_eq!(category, Category::Food);
    }

    #[tokio::test]
    async fn test_missing_description_is_others() {
        let db = Database::in_memory().unwrap();
        let categorizer = Categorizer::new(&db);

        let r = row(&[("Date", "2024-01-01")]);
        assert_eq!(categorizer.categorize(&r, &mapping()).await, Category::Others);

        let r = row(&[("Date", "2024-01-01"), ("Description", "   ")]);
        assert_eq!(categorizer.categorize(&r, &mapping()).await, Category::Others);

        // Terminal fallback persists nothing.
        assert!(db.list_merchant_categories().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manual_override_beats_rules_and_ai() {
        let db = Database::in_memory().unwrap();
        db.upsert_merchant_override("swiggy", Category::Entertainment)
            .unwrap();

        // A failing AI client: if the resolver reached the AI tier the
        // result would be Others, not the override's category.
        let ai = AIClient::Mock(MockBackend::failing());
        let categorizer = Categorizer::with_ai(&db, &ai);

        let r = row(&[("Date", "2024-01-01"), ("Description", "SWIGGY#99/X")]);
        let category = categorizer.categorize(&r, &mapping()).await;
        assert_eq!(category, Category::Entertainment);
    }

    #[tokio::test]
    async fn test_rule_match_caches_with_rule_source() {
        let db = Database::in_memory().unwrap();
        let categorizer = Categorizer::new(&db);

        let r = row(&[("Date", "2024-01-01"), ("Description", "ZOMATO*4412")]);
        let category = categorizer.categorize(&r, &mapping()).await;
        assert_eq!(category, Category::Food);

        let entry = db.find_merchant_category("zomato").unwrap().unwrap();
        assert_eq!(entry.category, Category::Food);
        assert_eq!(entry.source, Source::Rule);
    }

    #[tokio::test]
    async fn test_ai_fallback_caches_with_gemini_source() {
        let db = Database::in_memory().unwrap();
        let ai = AIClient::Mock(MockBackend::with_reply("This looks like Healthcare."));
        let categorizer = Categorizer::with_ai(&db, &ai);

        let r = row(&[("Date", "2024-01-01"), ("Description", "DR LAL PATHLABS#1")]);
        let category = categorizer.categorize(&r, &mapping()).await;
        assert_eq!(category, Category::Healthcare);

        let entry = db.find_merchant_category("dr lal pathlabs").unwrap().unwrap();
        assert_eq!(entry.source, Source::Gemini);
        assert_eq!(entry.category, Category::Healthcare);
    }

    #[tokio::test]
    async fn test_second_resolution_served_from_cache() {
        let db = Database::in_memory().unwrap();

        // First pass learns via AI.
        let ai = AIClient::Mock(MockBackend::with_reply("Education"));
        let categorizer = Categorizer::with_ai(&db, &ai);
        let r = row(&[("Date", "2024-01-01"), ("Description", "UNACADEMY#1")]);
        assert_eq!(categorizer.categorize(&r, &mapping()).await, Category::Education);

        // Second pass must hit the cache: a now-failing AI never fires.
        let failing = AIClient::Mock(MockBackend::failing());
        let categorizer = Categorizer::with_ai(&db, &failing);
        assert_eq!(categorizer.categorize(&r, &mapping()).await, Category::Education);
    }

    #[tokio::test]
    async fn test_ai_failure_degrades_to_others() {
        let db = Database::in_memory().unwrap();
        let ai = AIClient::Mock(MockBackend::failing());
        let categorizer = Categorizer::with_ai(&db, &ai);

        let r = row(&[("Date", "2024-01-01"), ("Description", "MYSTERY VENDOR")]);
        assert_eq!(categorizer.categorize(&r, &mapping()).await, Category::Others);
    }

    #[tokio::test]
    async fn test_no_ai_client_is_immediate_others() {
        let db = Database::in_memory().unwrap();
        let categorizer = Categorizer::new(&db);

        let r = row(&[("Date", "2024-01-01"), ("Description", "MYSTERY VENDOR")]);
        assert_eq!(categorizer.categorize(&r, &mapping()).await, Category::Others);

        // The no-credential result is still cached under the gemini source.
        let entry = db.find_merchant_category("mystery vendor").unwrap().unwrap();
        assert_eq!(entry.source, Source::Gemini);
        assert_eq!(entry.category, Category::Others);
    }

    #[tokio::test]
    async fn test_injected_rule_table() {
        let db = Database::in_memory().unwrap();
        let rules = RuleSet::new(vec![(Category::Travel, vec!["mystery"])]);
        let categorizer = Categorizer::new(&db).with_rules(rules);

        let r = row(&[("Date", "2024-01-01"), ("Description", "MYSTERY VENDOR")]);
        assert_eq!(categorizer.categorize(&r, &mapping()).await, Category::Travel);
    }

    #[tokio::test]
    async fn test_concurrent_first_writers_agree() {
        let db = Database::in_memory().unwrap();

        let r = row(&[("Date", "2024-01-01"), ("Description", "KFC#778")]);
        let m = mapping();

        let c1 = Categorizer::new(&db);
        let c2 = Categorizer::new(&db);
        let (a, b) = tokio::join!(c1.categorize(&r, &m), c2.categorize(&r, &m));

        // Whoever loses the insert race still returns the same category,
        // and exactly one cache entry survives.
        assert_eq!(a, Category::Food);
        assert_eq!(b, Category::Food);
        assert_eq!(db.list_merchant_categories().unwrap().len(), 1);
    }
}

//! Keyword rule engine
//!
//! Deterministic first-tier categorization: an ordered table of
//! (category, keywords) pairs scanned in declaration order. Injected into the
//! resolver as a value so tests can substitute their own table.

use crate::models::Category;

/// An immutable, ordered keyword rule table.
///
/// Matching scans categories in declared order and keywords in declared
/// order; the first substring hit wins, not the longest or most specific.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<(Category, Vec<&'static str>)>,
}

impl RuleSet {
    /// Build a rule set from an ordered (category, keywords) table.
    ///
    /// Keywords must already be lowercase; matching is plain substring
    /// containment against a lowercased merchant token.
    pub fn new(rules: Vec<(Category, Vec<&'static str>)>) -> Self {
        Self { rules }
    }

    /// Match a merchant token (already lowercased by the caller) against the
    /// table. Returns `None` when no category's keywords hit.
    pub fn match_merchant(&self, merchant: &str) -> Option<Category> {
        if merchant.is_empty() {
            return None;
        }
        for (category, keywords) in &self.rules {
            if keywords.iter().any(|kw| merchant.contains(kw)) {
                return Some(*category);
            }
        }
        None
    }

    /// Number of (category, keywords) rows in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    /// The canonical keyword table.
    ///
    /// Note the `Others` row: explicitly recognized non-spend merchants
    /// (salary, brokers, EMIs) cache as `Others` via a rule hit instead of
    /// falling through to the AI tier.
    fn default() -> Self {
        Self::new(vec![
            (
                Category::Food,
                vec![
                    "swiggy",
                    "zomato",
                    "restaurant",
                    "cafe",
                    "doordash",
                    "kfc",
                    "mcdonald",
                    "starbucks",
                    "burger",
                ],
            ),
            (
                Category::Transport,
                vec![
                    "uber",
                    "ola",
                    "metro",
                    "rapido",
                    "fuel",
                    "petrol",
                    "bpcl",
                    "hpcl",
                    "indian oil",
                    "auto",
                ],
            ),
            (
                Category::Shopping,
                vec![
                    "amazon", "amzn", "flipkart", "myntra", "meesho", "zara", "h&m", "retail",
                    "store",
                ],
            ),
            (
                Category::Utilities,
                vec![
                    "electricity",
                    "water",
                    "gas",
                    "recharge",
                    "bbps",
                    "rent",
                    "broadband",
                    "airtel",
                    "jio",
                    "vi",
                    "bescom",
                ],
            ),
            (
                Category::Entertainment,
                vec!["netflix", "spotify", "movie", "bookmyshow", "pvr", "inox"],
            ),
            (
                Category::Travel,
                vec![
                    "airlines",
                    "flight",
                    "irctc",
                    "makemytrip",
                    "agoda",
                    "booking",
                    "hotel",
                    "oyo",
                ],
            ),
            (
                Category::Healthcare,
                vec![
                    "hospital", "pharmacy", "apollo", "clinic", "medplus", "health",
                ],
            ),
            (
                Category::Education,
                vec![
                    "school",
                    "college",
                    "university",
                    "udemy",
                    "coursera",
                    "byjus",
                ],
            ),
            (
                Category::Groceries,
                vec![
                    "blinkit",
                    "zepto",
                    "instamart",
                    "reliance fresh",
                    "supermarket",
                    "wholefds",
                    "more supermarket",
                    "grocery",
                    "dmart",
                ],
            ),
            (
                Category::Others,
                vec![
                    "salary",
                    "zerodha",
                    "groww",
                    "investment",
                    "tax",
                    "loan",
                    "emi",
                    "bajaj finserv",
                ],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches() {
        let rules = RuleSet::default();
        // One row per taxonomy entry, Others included.
        assert!(!rules.is_empty());
        assert_eq!(rules.len(), Category::ALL.len());
        assert_eq!(rules.match_merchant("swiggy"), Some(Category::Food));
        assert_eq!(rules.match_merchant("uber india"), Some(Category::Transport));
        assert_eq!(rules.match_merchant("dmart avenue"), Some(Category::Groceries));
        assert_eq!(rules.match_merchant("zerodha broking"), Some(Category::Others));
        assert_eq!(rules.match_merchant("unknown shop name"), None);
    }

    #[test]
    fn test_first_declared_category_wins() {
        // "auto" (Transport) vs "store" (Shopping): Transport is declared
        // first, so a token matching both resolves to Transport.
        let rules = RuleSet::default();
        assert_eq!(
            rules.match_merchant("auto parts store"),
            Some(Category::Transport)
        );
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let rules = RuleSet::default();
        let first = rules.match_merchant("netflix subscription");
        for _ in 0..10 {
            assert_eq!(rules.match_merchant("netflix subscription"), first);
        }
    }

    #[test]
    fn test_custom_table_order() {
        // Same keyword in two rows: declaration order decides.
        let rules = RuleSet::new(vec![
            (Category::Entertainment, vec!["prime"]),
            (Category::Shopping, vec!["prime"]),
        ]);
        assert_eq!(
            rules.match_merchant("amazon prime"),
            Some(Category::Entertainment)
        );
    }

    #[test]
    fn test_empty_token_never_matches() {
        let rules = RuleSet::default();
        assert_eq!(rules.match_merchant(""), None);
    }
}

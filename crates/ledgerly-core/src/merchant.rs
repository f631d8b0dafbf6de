//! Merchant name extraction
//!
//! Bank descriptions typically lead with the merchant name and trail off into
//! reference numbers, codes, and dates ("SWIGGY#12345/ORDER"). The extractor
//! keeps the leading text and strips the rest, no merchant database required.

/// Extraction bound used by the resolver (cache key / rule subject).
pub const MERCHANT_MAX_LEN: usize = 50;

/// Shorter bound for display surfaces.
pub const MERCHANT_DISPLAY_LEN: usize = 30;

/// Characters that terminate the merchant portion of a description.
///
/// Digits plus the symbol set banks use for reference suffixes. Hyphen and
/// slash are deliberately absent; they only participate in the fallback split.
fn is_delimiter(c: char) -> bool {
    c.is_ascii_digit() || "@#$%^&*()_+=[]{}\\|;:'\",./<>?".contains(c)
}

/// Extract a short merchant token from a transaction description.
///
/// Takes the text before the first run of delimiter characters, trimmed. If
/// that leaves fewer than 2 characters (a description that starts with a
/// reference number, say), falls back to splitting on hyphen or slash only.
/// The result is truncated to `max_len` characters.
///
/// Returns `None` when the description is empty or reduces to nothing.
pub fn extract_merchant(description: &str, max_len: usize) -> Option<String> {
    if description.trim().is_empty() {
        return None;
    }

    let primary = match description.find(is_delimiter) {
        Some(idx) => &description[..idx],
        None => description,
    };
    let mut cleaned = primary.trim();

    if cleaned.chars().count() < 2 {
        cleaned = description
            .split(['-', '/'])
            .next()
            .unwrap_or("")
            .trim();
    }

    if cleaned.is_empty() {
        return None;
    }

    Some(cleaned.chars().take(max_len).collect())
}

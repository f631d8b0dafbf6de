//! Database tests

use super::*;
use crate::db::merchants::normalize_merchant;
use crate::models::{Category, Source};

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    let entries = db.list_merchant_categories().unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('merchant_categories')
             WHERE name IN ('id', 'merchant_name', 'category', 'source', 'created_at', 'updated_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 6, "merchant_categories should have 6 expected columns");
}

#[test]
fn test_insert_and_find() {
    let db = Database::in_memory().unwrap();

    let outcome = db
        .insert_merchant_category("swiggy", Category::Food, Source::Rule)
        .unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);

    let entry = db.find_merchant_category("swiggy").unwrap().unwrap();
    assert_eq!(entry.merchant_name, "swiggy");
    assert_eq!(entry.category, Category::Food);
    assert_eq!(entry.source, Source::Rule);
}

#[test]
fn test_find_normalizes_lookup_key() {
    let db = Database::in_memory().unwrap();
    db.insert_merchant_category("  SWIGGY  ", Category::Food, Source::Rule)
        .unwrap();

    // Stored normalized; any casing/padding of the same name finds it.
    let entry = db.find_merchant_category("Swiggy").unwrap().unwrap();
    assert_eq!(entry.merchant_name, "swiggy");
}

#[test]
fn test_duplicate_insert_is_already_exists() {
    let db = Database::in_memory().unwrap();

    db.insert_merchant_category("uber", Category::Transport, Source::Rule)
        .unwrap();

    // Second writer loses the race; no error, nothing overwritten.
    let outcome = db
        .insert_merchant_category("uber", Category::Shopping, Source::Gemini)
        .unwrap();
    assert_eq!(outcome, InsertOutcome::AlreadyExists);

    let entry = db.find_merchant_category("uber").unwrap().unwrap();
    assert_eq!(entry.category, Category::Transport);
    assert_eq!(entry.source, Source::Rule);
}

#[test]
fn test_override_replaces_category_and_source() {
    let db = Database::in_memory().unwrap();

    db.insert_merchant_category("dmart", Category::Shopping, Source::Gemini)
        .unwrap();

    let entry = db
        .upsert_merchant_override("DMart", Category::Groceries)
        .unwrap();
    assert_eq!(entry.merchant_name, "dmart");
    assert_eq!(entry.category, Category::Groceries);
    assert_eq!(entry.source, Source::Manual);

    // Exactly one entry survives for the merchant.
    assert_eq!(db.list_merchant_categories().unwrap().len(), 1);
}

#[test]
fn test_override_inserts_when_absent() {
    let db = Database::in_memory().unwrap();

    let entry = db
        .upsert_merchant_override("corner shop", Category::Shopping)
        .unwrap();
    assert_eq!(entry.source, Source::Manual);
    assert_eq!(entry.category, Category::Shopping);
}

#[test]
fn test_list_ordered_by_merchant_name() {
    let db = Database::in_memory().unwrap();
    db.insert_merchant_category("zomato", Category::Food, Source::Rule)
        .unwrap();
    db.insert_merchant_category("airtel", Category::Utilities, Source::Rule)
        .unwrap();

    let entries = db.list_merchant_categories().unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.merchant_name.as_str()).collect();
    assert_eq!(names, vec!["airtel", "zomato"]);
}

#[test]
fn test_normalize_merchant() {
    assert_eq!(normalize_merchant("  Reliance Fresh "), "reliance fresh");
    assert_eq!(normalize_merchant("KFC"), "kfc");
}

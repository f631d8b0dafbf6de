//! Cache commands: manual overrides and listing learned merchants

use std::path::Path;

use anyhow::{bail, Result};
use ledgerly_core::models::Category;

use super::open_db;

/// Pin a merchant to a category (`source = manual`).
///
/// Unlike the resolver, this surface rejects invalid categories loudly; a
/// typo here should not silently become "Others".
pub fn cmd_override(db_path: &Path, merchant: &str, category: &str) -> Result<()> {
    let Some(category) = Category::from_loose(category) else {
        let allowed = Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        bail!("Invalid category '{}'. Allowed categories are: {}", category, allowed);
    };

    if merchant.trim().is_empty() {
        bail!("Merchant name must not be empty");
    }

    let db = open_db(db_path)?;
    let entry = db.upsert_merchant_override(merchant, category)?;

    println!(
        "✅ '{}' pinned to {} (source: {})",
        entry.merchant_name, entry.category, entry.source
    );
    Ok(())
}

/// List all cached merchant → category entries
pub fn cmd_cache(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let entries = db.list_merchant_categories()?;

    if entries.is_empty() {
        println!("Cache is empty. Import a statement to start learning merchants.");
        return Ok(());
    }

    println!("{:<32} {:<14} {:<8} {}", "MERCHANT", "CATEGORY", "SOURCE", "UPDATED");
    for entry in &entries {
        println!(
            "{:<32} {:<14} {:<8} {}",
            entry.merchant_name,
            entry.category,
            entry.source,
            entry.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
    println!("{} cached merchants", entries.len());

    Ok(())
}

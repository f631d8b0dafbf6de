//! Import command: read, merge, and categorize a statement CSV

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use ledgerly_core::ai::AIClient;
use ledgerly_core::categorize::Categorizer;
use ledgerly_core::import::{read_rows, validate_mapping};
use ledgerly_core::merchant::MERCHANT_DISPLAY_LEN;
use ledgerly_core::merge::merge_multiline_rows;
use ledgerly_core::models::ColumnMapping;

use super::open_db;

pub async fn cmd_import(
    db_path: &Path,
    file: &Path,
    date_col: &str,
    desc_col: &str,
    category_col: Option<&str>,
) -> Result<()> {
    println!("📄 Importing {}...", file.display());

    let db = open_db(db_path)?;

    let reader = File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let rows = read_rows(reader).context("Failed to parse CSV")?;

    let mut mapping = ColumnMapping::new(date_col, desc_col);
    if let Some(col) = category_col {
        mapping = mapping.with_category(col);
    }
    validate_mapping(&rows, &mapping).context("Column mapping does not match the file")?;

    let merged = merge_multiline_rows(&rows, &mapping);
    println!(
        "   {} raw rows merged into {} transactions",
        rows.len(),
        merged.len()
    );

    let ai = AIClient::from_env();
    let categorizer = match &ai {
        Some(client) => {
            println!("   🤖 Gemini fallback enabled");
            Categorizer::with_ai(&db, client)
        }
        None => {
            println!("   💡 Tip: Set GEMINI_API_KEY to classify unknown merchants");
            Categorizer::new(&db)
        }
    };

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for row in &merged {
        let category = categorizer.categorize(row, &mapping).await;
        *counts.entry(category.as_str()).or_default() += 1;

        let date = row.get(date_col).map(String::as_str).unwrap_or("");
        let description = row.get(desc_col).map(String::as_str).unwrap_or("");
        let short: String = description.chars().take(MERCHANT_DISPLAY_LEN).collect();
        println!("   {:<12} {:<30} → {}", date, short, category);
    }

    println!();
    println!("✅ Categorized {} transactions:", merged.len());
    for (category, count) in &counts {
        println!("   {:<14} {}", category, count);
    }

    Ok(())
}

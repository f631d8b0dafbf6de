//! Database access layer with connection pooling and migrations
//!
//! The store backs exactly one core concern: the merchant → category cache
//! (`merchant_categories`). Everything else the surrounding application
//! persists lives outside this crate.

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod merchants;

#[cfg(test)]
mod tests;

pub use merchants::{normalize_merchant, InsertOutcome};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (creating if necessary) a database at the given path and run
    /// migrations.
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/ledgerly_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers; concurrent resolvers
            -- hit this table from multiple pooled connections.
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Merchant category cache.
            -- merchant_name is stored normalized (lowercased, trimmed) and
            -- the UNIQUE constraint is what makes concurrent first-writer
            -- races benign: exactly one entry survives.
            CREATE TABLE IF NOT EXISTS merchant_categories (
                id INTEGER PRIMARY KEY,
                merchant_name TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                source TEXT NOT NULL CHECK (source IN ('rule', 'gemini', 'manual')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_merchant_categories_source
                ON merchant_categories(source);
            "#,
        )?;

        info!("Database migrations complete");
        Ok(())
    }
}

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

/// Key under which the quote list blob is stored.
pub const QUOTE_LIST_KEY: &str = "quote_list";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Local state manager backed by SQLite.
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - Battle-tested and reliable
/// - Doesn't require a separate process
///
/// Two tables, both holding JSON documents: `blobs` for keyed snapshots with
/// a fetch timestamp (the quote-list cache), and `bookmarks` for the saved
/// quote collection, unique on (text, author) and ordered by insertion so
/// the navigation cursor is stable across restarts.
pub struct CacheManager {
    conn: Connection,
}

impl CacheManager {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS bookmarks (
                id INTEGER PRIMARY KEY,
                quote_text TEXT NOT NULL,
                quote_author TEXT NOT NULL,
                data TEXT NOT NULL,
                bookmarked_at INTEGER NOT NULL,
                UNIQUE(quote_text, quote_author)
            )",
            [],
        )?;

        Ok(())
    }

    /// Store a keyed JSON snapshot, stamping it with the current time.
    /// Overwrites any previous snapshot under the same key.
    pub fn set_blob<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_string(value)?;
        let now = Utc::now().timestamp();

        self.conn.execute(
            "INSERT INTO blobs (key, data, fetched_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET data = ?2, fetched_at = ?3",
            params![key, data, now],
        )?;

        debug!("Cached blob under key '{}'", key);
        Ok(())
    }

    /// Fetch a keyed snapshot if one exists and is younger than
    /// `max_age_secs`. Stale or missing snapshots return `None`.
    pub fn get_blob<T: DeserializeOwned>(&self, key: &str, max_age_secs: i64) -> Result<Option<T>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT data, fetched_at FROM blobs WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((data, fetched_at)) = row else {
            return Ok(None);
        };

        let age = Utc::now().timestamp() - fetched_at;
        if age >= max_age_secs {
            debug!("Blob '{}' is stale ({}s old), ignoring", key, age);
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Backdate a blob's fetch timestamp. Test hook for TTL behavior.
    pub fn backdate_blob(&self, key: &str, fetched_at: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE blobs SET fetched_at = ?1 WHERE key = ?2",
            params![fetched_at, key],
        )?;
        Ok(())
    }

    /// Replace the whole bookmark collection with the given one.
    ///
    /// The collection is small (a handful of saved quotes), so rewriting it
    /// wholesale on every mutation keeps the disk state trivially in sync
    /// with memory.
    pub fn save_bookmarks<T: Serialize>(&self, bookmarks: &[(String, String, i64, T)]) -> Result<()> {
        self.conn.execute("DELETE FROM bookmarks", [])?;

        for (text, author, bookmarked_at, value) in bookmarks {
            let data = serde_json::to_string(value)?;
            self.conn.execute(
                "INSERT OR IGNORE INTO bookmarks (quote_text, quote_author, data, bookmarked_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![text, author, data, bookmarked_at],
            )?;
        }

        debug!("Persisted {} bookmarks", bookmarks.len());
        Ok(())
    }

    /// Load the bookmark collection in insertion order.
    pub fn get_bookmarks<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare("SELECT data FROM bookmarks ORDER BY id ASC")?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut bookmarks = Vec::new();
        for data in rows {
            bookmarks.push(serde_json::from_str(&data?)?);
        }
        Ok(bookmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Snap {
        items: Vec<String>,
    }

    fn snap() -> Snap {
        Snap {
            items: vec!["a".into(), "b".into()],
        }
    }

    #[test]
    fn blob_roundtrip() {
        let cache = CacheManager::open_in_memory().unwrap();
        cache.set_blob(QUOTE_LIST_KEY, &snap()).unwrap();

        let loaded: Option<Snap> = cache.get_blob(QUOTE_LIST_KEY, 60).unwrap();
        assert_eq!(loaded, Some(snap()));
    }

    #[test]
    fn missing_blob_is_none() {
        let cache = CacheManager::open_in_memory().unwrap();
        let loaded: Option<Snap> = cache.get_blob("nope", 60).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn stale_blob_is_ignored() {
        let cache = CacheManager::open_in_memory().unwrap();
        cache.set_blob(QUOTE_LIST_KEY, &snap()).unwrap();

        // Pretend it was fetched 25 hours ago against a 24h TTL.
        let old = Utc::now().timestamp() - 25 * 3600;
        cache.backdate_blob(QUOTE_LIST_KEY, old).unwrap();

        let loaded: Option<Snap> = cache.get_blob(QUOTE_LIST_KEY, 24 * 3600).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn set_overwrites_and_refreshes() {
        let cache = CacheManager::open_in_memory().unwrap();
        cache.set_blob(QUOTE_LIST_KEY, &snap()).unwrap();
        let old = Utc::now().timestamp() - 25 * 3600;
        cache.backdate_blob(QUOTE_LIST_KEY, old).unwrap();

        // A fresh set must reset the timestamp too.
        let newer = Snap {
            items: vec!["c".into()],
        };
        cache.set_blob(QUOTE_LIST_KEY, &newer).unwrap();

        let loaded: Option<Snap> = cache.get_blob(QUOTE_LIST_KEY, 24 * 3600).unwrap();
        assert_eq!(loaded, Some(newer));
    }

    #[test]
    fn bookmarks_keep_insertion_order() {
        let cache = CacheManager::open_in_memory().unwrap();
        let rows = vec![
            ("one".to_string(), "A".to_string(), 1_i64, "first".to_string()),
            ("two".to_string(), "B".to_string(), 2_i64, "second".to_string()),
            ("three".to_string(), "C".to_string(), 3_i64, "third".to_string()),
        ];
        cache.save_bookmarks(&rows).unwrap();

        let loaded: Vec<String> = cache.get_bookmarks().unwrap();
        assert_eq!(loaded, vec!["first", "second", "third"]);
    }

    #[test]
    fn duplicate_bookmark_rows_collapse() {
        let cache = CacheManager::open_in_memory().unwrap();
        let rows = vec![
            ("one".to_string(), "A".to_string(), 1_i64, "first".to_string()),
            ("one".to_string(), "A".to_string(), 2_i64, "dupe".to_string()),
        ];
        cache.save_bookmarks(&rows).unwrap();

        let loaded: Vec<String> = cache.get_bookmarks().unwrap();
        assert_eq!(loaded, vec!["first"]);
    }
}

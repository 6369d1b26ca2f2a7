use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// SQLite-backed store of raw API responses keyed by request URL.
pub struct ResponseCache {
    conn: Connection,
    ttl_secs: i64,
}

pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

impl ResponseCache {
    pub fn open<P: AsRef<Path>>(path: P, ttl_secs: i64) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?, ttl_secs)
    }

    pub fn open_in_memory(ttl_secs: i64) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, ttl_secs)
    }

    fn init(conn: Connection, ttl_secs: i64) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                cache_key   TEXT PRIMARY KEY,
                url         TEXT NOT NULL,
                body        TEXT NOT NULL,
                fetched_at  INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn, ttl_secs })
    }

    /// Returns the cached body if it is younger than the TTL at `now`.
    pub fn get(&self, url: &str, now: i64) -> Result<Option<String>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT body, fetched_at FROM responses WHERE cache_key = ?1",
                params![cache_key(url)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        match row {
            Some((body, fetched_at)) if now - fetched_at < self.ttl_secs => Ok(Some(body)),
            Some(_) => {
                debug!("cache entry expired for {}", url);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn put(&self, url: &str, body: &str, now: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO responses (cache_key, url, body, fetched_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(cache_key) DO UPDATE SET body=excluded.body, fetched_at=excluded.fetched_at",
            params![cache_key(url), url, body, now],
        )?;
        Ok(())
    }

    /// Drops every entry older than the TTL; returns the number removed.
    pub fn purge_expired(&self, now: i64) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM responses WHERE ?1 - fetched_at >= ?2",
            params![now, self.ttl_secs],
        )?;
        Ok(removed)
    }
}

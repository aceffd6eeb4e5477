use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::warn;

use crate::core::error::EngineError;
use crate::core::hash::record_id;

/// One persisted verification outcome, link or text.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: String,
    pub kind: String,
    pub input: String,
    pub classification: String,
    pub confidence: f64,
    pub summary: String,
    pub reference_urls: Vec<String>,
    pub created_at: String,
}

/// SQLite-backed log of past verdicts.
///
/// The id is a content hash of kind and normalized input, so re-checking
/// the same URL or claim replaces the earlier row instead of piling up
/// duplicates.
#[derive(Clone)]
pub struct HistoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryStore {
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn: Arc::new(Mutex::new(conn)) };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, EngineError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Arc::new(Mutex::new(conn)) };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), EngineError> {
        let conn = self.conn.lock().expect("history store lock poisoned");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS verifications (
              id TEXT PRIMARY KEY,
              kind TEXT NOT NULL,
              input TEXT NOT NULL,
              classification TEXT NOT NULL,
              confidence REAL NOT NULL,
              summary TEXT NOT NULL,
              reference_urls TEXT NOT NULL,
              created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_verifications_created
              ON verifications(created_at);
            ",
        )?;
        Ok(())
    }

    pub fn record(
        &self,
        kind: &str,
        input: &str,
        classification: &str,
        confidence: f64,
        summary: &str,
        reference_urls: &[String],
    ) -> Result<(), EngineError> {
        let id = record_id(kind, input);
        let urls_json = serde_json::to_string(reference_urls)?;
        let conn = self.conn.lock().expect("history store lock poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO verifications
             (id, kind, input, classification, confidence, summary, reference_urls, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                kind,
                input,
                classification,
                confidence,
                summary,
                urls_json,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn recent(&self, limit: u32) -> Result<Vec<HistoryRecord>, EngineError> {
        let conn = self.conn.lock().expect("history store lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, kind, input, classification, confidence, summary, reference_urls, created_at
             FROM verifications ORDER BY created_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, kind, input, classification, confidence, summary, urls_json, created_at) =
                row?;
            let reference_urls: Vec<String> = serde_json::from_str(&urls_json)?;
            out.push(HistoryRecord {
                id,
                kind,
                input,
                classification,
                confidence,
                summary,
                reference_urls,
                created_at,
            });
        }
        Ok(out)
    }

    pub fn purge_older_than(&self, retention_days: u32) -> Result<usize, EngineError> {
        if retention_days == 0 {
            return Ok(0);
        }
        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(retention_days))).to_rfc3339();
        let conn = self.conn.lock().expect("history store lock poisoned");
        let purged = conn.execute(
            "DELETE FROM verifications WHERE created_at < ?1",
            params![cutoff],
        )?;
        Ok(purged)
    }
}

/// Persist off the request path. History is best effort: a failed write
/// is logged and the response goes out regardless.
pub fn record_async(
    store: HistoryStore,
    kind: &'static str,
    input: String,
    classification: String,
    confidence: f64,
    summary: String,
    reference_urls: Vec<String>,
) {
    tokio::task::spawn_blocking(move || {
        if let Err(err) =
            store.record(kind, &input, &classification, confidence, &summary, &reference_urls)
        {
            warn!(kind, error = %err, "failed to record verification history");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_read_back() {
        let store = HistoryStore::in_memory().unwrap();
        store
            .record(
                "link",
                "http://banco-brasil-resgate.site",
                "scam",
                1.0,
                "GOLPE CONFIRMADO",
                &["https://www.bb.com.br".to_string()],
            )
            .unwrap();
        let rows = store.recent(10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "link");
        assert_eq!(rows[0].classification, "scam");
        assert_eq!(rows[0].reference_urls, vec!["https://www.bb.com.br".to_string()]);
    }

    #[test]
    fn same_input_replaces_instead_of_duplicating() {
        let store = HistoryStore::in_memory().unwrap();
        store
            .record("text", "O PIX será taxado", "needs_verification", 0.5, "a", &[])
            .unwrap();
        store
            .record("text", "o pix será taxado  ", "fake", 0.9, "b", &[])
            .unwrap();
        let rows = store.recent(10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].classification, "fake");
    }

    #[test]
    fn purge_with_zero_retention_is_a_noop() {
        let store = HistoryStore::in_memory().unwrap();
        store.record("link", "https://x.com", "safe", 1.0, "", &[]).unwrap();
        assert_eq!(store.purge_older_than(0).unwrap(), 0);
        assert_eq!(store.recent(10).unwrap().len(), 1);
    }
}

//! File-backed store on SQLite.
//!
//! `rusqlite` is blocking, so every call runs on the blocking pool while
//! holding the single connection mutex. Timestamps are stored as integer
//! microseconds since the epoch so ordering is a plain integer compare.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use synthmetrics_core::error::{Result, SynthError};
use synthmetrics_core::{Measurement, MetricSummary};

use super::MeasurementStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS metrics (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT    NOT NULL,
    value   REAL    NOT NULL,
    when_us INTEGER NOT NULL
            DEFAULT (CAST((julianday('now') - 2440587.5) * 86400000000.0 AS INTEGER))
);
CREATE INDEX IF NOT EXISTS metrics_when_id ON metrics (when_us, id);
";

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            let conn = Connection::open(&path).map_err(|e| {
                SynthError::Store(format!("open sqlite database at {} failed: {e}", path.display()))
            })?;
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA busy_timeout = 5000;",
            )
            .map_err(store_err)?;
            Ok(conn)
        })
        .await
        .map_err(|e| SynthError::Internal(format!("sqlite open task failed: {e}")))??;

        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| SynthError::Internal("sqlite connection mutex poisoned".into()))?;
            f(&*guard).map_err(store_err)
        })
        .await
        .map_err(|e| SynthError::Internal(format!("sqlite task failed: {e}")))?
    }
}

fn store_err(e: rusqlite::Error) -> SynthError {
    SynthError::Store(e.to_string())
}

fn micros_to_utc(us: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(us).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Integer,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid when_us value: {us}"),
            )),
        )
    })
}

#[async_trait]
impl MeasurementStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.with_conn(|c| c.execute_batch(SCHEMA)).await
    }

    async fn insert(&self, name: &str, value: f64, when: DateTime<Utc>) -> Result<i64> {
        let name = name.to_string();
        let when_us = when.timestamp_micros();
        self.with_conn(move |c| {
            c.execute(
                "INSERT INTO metrics (name, value, when_us) VALUES (?1, ?2, ?3)",
                params![name, value, when_us],
            )?;
            Ok(c.last_insert_rowid())
        })
        .await
    }

    async fn recent_window(&self, limit: usize) -> Result<Vec<Measurement>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(move |c| {
            let mut stmt = c.prepare_cached(
                "SELECT id, name, value, when_us FROM metrics
                 ORDER BY when_us DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(Measurement {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    value: row.get(2)?,
                    when: micros_to_utc(row.get(3)?)?,
                })
            })?;
            rows.collect()
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        let n: i64 = self
            .with_conn(|c| c.query_row("SELECT COUNT(*) FROM metrics", [], |row| row.get(0)))
            .await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn summarize(&self, since: DateTime<Utc>) -> Result<Vec<MetricSummary>> {
        let since_us = since.timestamp_micros();
        self.with_conn(move |c| {
            let mut stmt = c.prepare_cached(
                "SELECT name, COUNT(*), AVG(value), MIN(value), MAX(value) FROM metrics
                 WHERE when_us >= ?1
                 GROUP BY name
                 ORDER BY name",
            )?;
            let rows = stmt.query_map(params![since_us], |row| {
                let count: i64 = row.get(1)?;
                Ok(MetricSummary {
                    name: row.get(0)?,
                    count: u64::try_from(count).unwrap_or(0),
                    mean: row.get(2)?,
                    min: row.get(3)?,
                    max: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
    }
}

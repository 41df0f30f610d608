//! Append-only access log.
//!
//! # Format
//! ```text
//! <Sun 19 Oct 2026 14:03:11 +02:00>: <client host> <original URL> <byte count>
//! ```
//!
//! Each append opens the file, writes the whole record with one call and
//! closes it again, all while holding the log's mutex. Two transactions
//! finishing together therefore never interleave their lines.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%a %d %b %Y %H:%M:%S %Z";

#[derive(Debug, Error)]
pub enum AccessLogError {
    #[error("cannot open access log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write access log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One completed transaction.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub timestamp: DateTime<Local>,
    pub client_host: String,
    /// The URI exactly as the client sent it.
    pub url: String,
    pub byte_count: u64,
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} {} {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.client_host,
            self.url,
            self.byte_count
        )
    }
}

#[derive(Debug)]
pub struct AccessLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AccessLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record` as a single line.
    pub async fn append(&self, record: &TransactionRecord) -> Result<(), AccessLogError> {
        let entry = record.to_string();

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| AccessLogError::Open {
                path: self.path.clone(),
                source,
            })?;

        let write = async {
            file.write_all(entry.as_bytes()).await?;
            file.flush().await
        };
        write.await.map_err(|source| AccessLogError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::trace!(path = %self.path.display(), "Access log record appended");
        Ok(())
    }
}

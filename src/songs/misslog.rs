use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum MissLogError {
    #[error("miss log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("miss log entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One unmatched lookup, recorded exactly as the client queried it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissEntry {
    pub title: String,
    pub artist: String,
    pub date: DateTime<Utc>,
}

impl MissEntry {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            date: Utc::now(),
        }
    }
}

/// Append-only file of unmatched lookups, one JSON object per line.
///
/// Entries are never deduplicated and the file is never rotated.
#[derive(Debug)]
pub struct MissLog {
    path: PathBuf,
    // Whole lines only: concurrent misses must not interleave their bytes.
    write_lock: Mutex<()>,
}

impl MissLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry` as a single line, creating the file and its parent
    /// directory on first use.
    pub async fn append(&self, entry: &MissEntry) -> Result<(), MissLogError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }

    /// Reads every recorded entry. A log that was never written is empty.
    pub async fn read_all(&self) -> Result<Vec<MissEntry>, MissLogError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(MissLogError::from))
            .collect()
    }
}

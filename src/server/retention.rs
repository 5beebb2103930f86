//! Retention sweep over the log storage directory

use crate::config::{RetentionSettings, StorageSettings};
use crate::Result;
use std::path::Path;
use std::time::SystemTime;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

const SECS_PER_DAY: u64 = 86_400;

/// Background task that deletes log files older than the retention window.
///
/// Runs independently of the sessions writing to the same directory. A file
/// deleted mid-sweep may be recreated by the next write for that client; the
/// race is benign and accepted.
pub struct RetentionSweeper {
    retention: RetentionSettings,
    storage: StorageSettings,
}

impl RetentionSweeper {
    /// Create a sweeper over the configured storage directory
    pub fn new(retention: RetentionSettings, storage: StorageSettings) -> Self {
        Self { retention, storage }
    }

    /// Sweep immediately, then once per interval until shutdown
    pub async fn start(self, mut shutdown_rx: broadcast::Receiver<()>) {
        if !self.retention.enabled {
            info!("Retention sweep disabled");
            return;
        }

        // the first tick fires immediately, giving a sweep at startup
        let mut sweep_interval = interval(Duration::from_secs(self.retention.sweep_interval_secs));

        loop {
            tokio::select! {
                _ = sweep_interval.tick() => {
                    match self.sweep_once().await {
                        Ok(deleted) if deleted > 0 => {
                            info!(deleted, "Retention sweep finished");
                        }
                        Ok(_) => debug!("Retention sweep finished, nothing to delete"),
                        Err(e) => warn!(error = %e, "Retention sweep failed"),
                    }
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }
    }

    /// One full pass over the storage directory. Returns the number of files
    /// deleted. A missing directory is a no-op, not an error; per-file
    /// deletion failures are logged and the sweep continues.
    pub async fn sweep_once(&self) -> Result<usize> {
        let dir = &self.storage.output_directory;
        if !dir.exists() {
            return Ok(0);
        }

        let now = SystemTime::now();
        let mut deleted = 0;

        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !self.matches_convention(&path) {
                continue;
            }

            let age_days = match file_age_days(&entry, now).await {
                Some(days) => days,
                None => continue,
            };
            if age_days <= self.retention.max_age_days {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    info!(file = %path.display(), age_days, "Deleted old log file");
                    deleted += 1;
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Failed to delete old log file");
                }
            }
        }

        Ok(deleted)
    }

    fn matches_convention(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(&format!("{}_", self.storage.file_prefix)))
            .unwrap_or(false)
    }
}

/// Whole days since the entry was last modified, `None` if the metadata is
/// unavailable or the mtime is in the future.
async fn file_age_days(entry: &tokio::fs::DirEntry, now: SystemTime) -> Option<u64> {
    let modified = entry.metadata().await.ok()?.modified().ok()?;
    let age = now.duration_since(modified).ok()?;
    Some(age.as_secs() / SECS_PER_DAY)
}

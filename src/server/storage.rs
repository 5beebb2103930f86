//! Per-client daily log file storage

use crate::config::StorageSettings;
use crate::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Derive the log file name for a client on a given date.
///
/// Pure and deterministic: the same `(client_ip, date)` pair always resolves
/// to the same name, `<prefix>_<YYYYMMDD>_<ip>.txt` with the IP's dots
/// replaced by underscores. Distinct pairs never collide unless the IP string
/// itself already contains underscores in place of dots.
pub fn log_file_name(prefix: &str, date: NaiveDate, client_ip: &str) -> String {
    format!(
        "{}_{}_{}.txt",
        prefix,
        date.format("%Y%m%d"),
        client_ip.replace('.', "_")
    )
}

/// Storage backend that appends received lines to per-client daily files.
///
/// Files are opened in append mode per write and released immediately; no
/// open handles are held between writes. Concurrent sessions for the same
/// client on the same day rely on the filesystem's append semantics.
pub struct LogStorage {
    settings: StorageSettings,
}

impl LogStorage {
    /// Create a storage backend over the configured output directory
    pub fn new(settings: StorageSettings) -> Self {
        Self { settings }
    }

    /// Resolve the path a client's data lands in on the given date
    pub fn path_for(&self, client_ip: &str, date: NaiveDate) -> PathBuf {
        self.settings
            .output_directory
            .join(log_file_name(&self.settings.file_prefix, date, client_ip))
    }

    /// Append one timestamped line for `client_ip` to today's file.
    ///
    /// Creates the output directory and the file if absent. Filesystem
    /// failures propagate to the caller.
    pub async fn append(&self, client_ip: &str, text: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.settings.output_directory).await?;

        let now = Local::now();
        let path = self.path_for(client_ip, now.date_naive());
        let timestamp = now.format("%Y-%m-%d %H:%M:%S%.3f");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(format!("[{}] {}\n", timestamp, text).as_bytes())
            .await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings(dir: &std::path::Path) -> StorageSettings {
        StorageSettings {
            output_directory: dir.to_path_buf(),
            file_prefix: "ATS_PSD_log".to_string(),
        }
    }

    #[test]
    fn file_name_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 21).unwrap();
        let a = log_file_name("ATS_PSD_log", date, "192.168.1.100");
        let b = log_file_name("ATS_PSD_log", date, "192.168.1.100");
        assert_eq!(a, b);
        assert_eq!(a, "ATS_PSD_log_20230921_192_168_1_100.txt");
    }

    #[test]
    fn file_name_distinguishes_ips_and_dates() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 21).unwrap();
        let next = NaiveDate::from_ymd_opt(2023, 9, 22).unwrap();
        let a = log_file_name("ATS_PSD_log", date, "10.0.0.1");
        let b = log_file_name("ATS_PSD_log", date, "10.0.0.2");
        let c = log_file_name("ATS_PSD_log", next, "10.0.0.1");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn underscored_ip_collides_with_dotted_form() {
        // Known edge case: an IP string that already uses underscores maps
        // onto the same name as its dotted counterpart.
        let date = NaiveDate::from_ymd_opt(2023, 9, 21).unwrap();
        let dotted = log_file_name("ATS_PSD_log", date, "10.0.0.1");
        let underscored = log_file_name("ATS_PSD_log", date, "10_0_0_1");
        assert_eq!(dotted, underscored);
    }

    #[tokio::test]
    async fn append_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nested").join("log");
        let storage = LogStorage::new(settings(&missing));

        storage.append("172.16.0.9", "boot sequence ok").await.unwrap();

        let path = storage.path_for("172.16.0.9", Local::now().date_naive());
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("boot sequence ok"));
    }

    #[tokio::test]
    async fn append_produces_one_timestamped_line_per_call() {
        let dir = tempdir().unwrap();
        let storage = LogStorage::new(settings(dir.path()));

        for i in 0..5 {
            storage
                .append("192.168.1.100", &format!("event {}", i))
                .await
                .unwrap();
        }

        let path = storage.path_for("192.168.1.100", Local::now().date_naive());
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        let mut previous = String::new();
        for (i, line) in lines.iter().enumerate() {
            assert!(line.starts_with('['), "line should begin with a timestamp");
            assert!(line.contains(&format!("event {}", i)));
            let stamp = line[1..line.find(']').unwrap()].to_string();
            // [YYYY-MM-DD HH:MM:SS.mmm] is 23 chars of timestamp
            assert_eq!(stamp.len(), 23);
            assert!(stamp >= previous, "timestamps must be non-decreasing");
            previous = stamp;
        }
    }

    #[tokio::test]
    async fn appends_from_two_writers_land_in_one_file() {
        let dir = tempdir().unwrap();
        let storage = std::sync::Arc::new(LogStorage::new(settings(dir.path())));

        let a = storage.clone();
        let b = storage.clone();
        let h1 = tokio::spawn(async move {
            for i in 0..20 {
                a.append("10.1.1.1", &format!("writer-a {}", i)).await.unwrap();
            }
        });
        let h2 = tokio::spawn(async move {
            for i in 0..20 {
                b.append("10.1.1.1", &format!("writer-b {}", i)).await.unwrap();
            }
        });
        h1.await.unwrap();
        h2.await.unwrap();

        let path = storage.path_for("10.1.1.1", Local::now().date_naive());
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 40);
    }
}

//! JSONL scan sink implementation

use crate::sink::ScanSink;
use givetrace_core::{Result, ScanRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// JSONL sink for scan records, one file per day.
pub struct JsonlScanSink {
    scans_dir: PathBuf,
}

impl JsonlScanSink {
    pub fn new(scans_dir: PathBuf) -> Self {
        Self { scans_dir }
    }

    /// File path for today's scan log
    fn current_file_path(&self) -> PathBuf {
        let today = Utc::now().format("%Y-%m-%d");
        self.scans_dir.join(format!("{}.jsonl", today))
    }

    /// Open today's file for appending
    async fn open_current_file(&self) -> Result<tokio::fs::File> {
        let path = self.current_file_path();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(file)
    }
}

#[async_trait]
impl ScanSink for JsonlScanSink {
    async fn write_scan(&self, record: &ScanRecord) -> Result<()> {
        let mut file = self.open_current_file().await?;

        let json = serde_json::to_string(record)?;
        file.write_all(json.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;

        Ok(())
    }

    async fn write_batch(&self, records: &[ScanRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut file = self.open_current_file().await?;

        for record in records {
            let json = serde_json::to_string(record)?;
            file.write_all(json.as_bytes()).await?;
            file.write_all(b"\n").await?;
        }

        file.flush().await?;
        Ok(())
    }

    fn supports_batching(&self) -> bool {
        true
    }
}

//! Telemetry configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level telemetry configuration for the host application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryConfig {
    /// Analytics client configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Monitoring client configuration
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// QR-scan recording configuration
    #[serde(default)]
    pub scan_recording: ScanRecordingConfig,
}

impl TelemetryConfig {
    pub fn validate(&self) -> Result<()> {
        self.scan_recording.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Enable the analytics session binder
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Application identifier handed to the analytics client, if it needs one
    #[serde(default)]
    pub app_id: Option<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Enable the monitoring session binder
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Endpoint the monitoring client reports to, if it needs one
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanRecordingConfig {
    /// Enable scan recording
    #[serde(default)]
    pub enabled: bool,

    /// JSONL sink configuration
    #[serde(default)]
    pub jsonl: Option<JsonlSinkConfig>,

    /// Background worker configuration
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl ScanRecordingConfig {
    /// Whether recording is on and at least one sink is configured.
    pub fn has_sinks(&self) -> bool {
        self.enabled && self.jsonl.as_ref().is_some_and(|j| j.enabled)
    }

    pub fn validate(&self) -> Result<()> {
        self.worker.validate()?;

        if self.enabled && self.jsonl.is_none() {
            return Err(Error::Config(
                "scan recording is enabled but no sink is configured".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonlSinkConfig {
    /// Enable the JSONL sink
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory for scan log files
    pub directory: PathBuf,
}

/// Background worker knobs for the scan recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Maximum records to buffer before flushing
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum time to wait before flushing (milliseconds)
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// Channel capacity before scans are dropped
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl WorkerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        if self.flush_interval_ms == 0 {
            return Err(Error::Config(
                "flush_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(Error::Config(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    64
}

fn default_flush_interval_ms() -> u64 {
    250
}

fn default_channel_capacity() -> usize {
    4096
}

//! Scan sink trait and the multi-sink recorder

use givetrace_core::config::{ScanRecordingConfig, WorkerConfig};
use givetrace_core::{Error, Result, ScanEvent, ScanRecord};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Trait for scan record sinks
#[async_trait]
pub trait ScanSink: Send + Sync {
    /// Write a single scan record
    async fn write_scan(&self, record: &ScanRecord) -> Result<()>;

    /// Write a batch of records (for efficiency)
    async fn write_batch(&self, records: &[ScanRecord]) -> Result<()> {
        for record in records {
            self.write_scan(record).await?;
        }
        Ok(())
    }

    /// Flush any pending writes
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Check if this sink supports batching
    fn supports_batching(&self) -> bool {
        false
    }
}

/// Recorder that dispatches scan events to multiple sinks asynchronously.
///
/// Recording is fire-and-forget: the caller hands an event over and never
/// waits for sink IO. A background worker batches records and fans them out
/// to every sink; sink failures are logged, never propagated.
pub struct ScanRecorder {
    tx: mpsc::Sender<ScanRecord>,
    worker_handle: Option<JoinHandle<()>>,
}

impl ScanRecorder {
    /// Create a new recorder with the given sinks and default worker knobs
    pub fn new(sinks: Vec<Arc<dyn ScanSink>>) -> Self {
        Self::with_config(sinks, WorkerConfig::default())
    }

    /// Create with custom worker configuration
    pub fn with_config(sinks: Vec<Arc<dyn ScanSink>>, config: WorkerConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_capacity);

        let worker_handle = tokio::spawn(async move {
            Self::worker_loop(rx, sinks, config).await;
        });

        Self {
            tx,
            worker_handle: Some(worker_handle),
        }
    }

    /// Record a scan event (non-blocking, fire-and-forget).
    /// Returns false if the event was dropped due to the channel being full.
    pub fn record(&self, event: ScanEvent) -> bool {
        match self.tx.try_send(ScanRecord::from_event(event)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Scan recording buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!("Scan recorder channel closed");
                false
            }
        }
    }

    /// Background worker loop
    async fn worker_loop(
        mut rx: mpsc::Receiver<ScanRecord>,
        sinks: Vec<Arc<dyn ScanSink>>,
        config: WorkerConfig,
    ) {
        let mut buffer = Vec::with_capacity(config.batch_size);
        // tokio's interval panics on a zero period, so unvalidated configs
        // get a 1ms floor instead of a dead worker.
        let flush_interval_ms = config.flush_interval_ms.max(1);
        let mut interval = tokio::time::interval(Duration::from_millis(flush_interval_ms));

        loop {
            tokio::select! {
                received = rx.recv() => {
                    match received {
                        Some(record) => {
                            buffer.push(record);

                            if buffer.len() >= config.batch_size {
                                Self::flush_buffer(&sinks, &mut buffer).await;
                            }
                        }
                        None => {
                            // Channel closed, flush remaining and exit
                            if !buffer.is_empty() {
                                Self::flush_buffer(&sinks, &mut buffer).await;
                            }
                            break;
                        }
                    }
                }
                _ = interval.tick() => {
                    // Periodic flush for low-traffic periods
                    if !buffer.is_empty() {
                        Self::flush_buffer(&sinks, &mut buffer).await;
                    }
                }
            }
        }

        tracing::debug!("Scan recorder worker loop exited");
    }

    /// Flush buffered records to all sinks
    async fn flush_buffer(sinks: &[Arc<dyn ScanSink>], buffer: &mut Vec<ScanRecord>) {
        if buffer.is_empty() {
            return;
        }

        let records = std::mem::take(buffer);
        let record_count = records.len();

        let futures: Vec<_> = sinks
            .iter()
            .map(|sink| {
                let records = records.clone();
                let sink = Arc::clone(sink);
                async move {
                    if sink.supports_batching() {
                        sink.write_batch(&records).await
                    } else {
                        for record in &records {
                            sink.write_scan(record).await?;
                        }
                        Ok(())
                    }
                }
            })
            .collect();

        let results = futures::future::join_all(futures).await;

        // Log any write failures but don't propagate
        for (i, result) in results.iter().enumerate() {
            if let Err(e) = result {
                tracing::error!(
                    sink = i,
                    error = %e,
                    record_count = record_count,
                    "Failed to write scan records"
                );
            }
        }

        let flush_futures: Vec<_> = sinks.iter().map(|s| s.flush()).collect();
        let _ = futures::future::join_all(flush_futures).await;
    }

    /// Gracefully shutdown, flushing all pending records.
    /// Consumes the recorder and waits for the worker to finish.
    pub async fn shutdown(mut self) -> Result<()> {
        // Swap the sender out so the channel closes while we wait; the
        // worker drains the queue, flushes, and exits on the closed channel.
        let (detached, _) = mpsc::channel(1);
        drop(std::mem::replace(&mut self.tx, detached));

        if let Some(handle) = self.worker_handle.take() {
            handle
                .await
                .map_err(|_| Error::Internal("Scan recorder worker panicked".to_string()))?;
        }

        tracing::info!("Scan recorder shutdown complete");
        Ok(())
    }
}

impl Drop for ScanRecorder {
    fn drop(&mut self) {
        // Worker exits on its own once tx is gone, but pending records may
        // not be fully flushed unless shutdown() was called.
        if self.worker_handle.is_some() {
            tracing::warn!(
                "ScanRecorder dropped without calling shutdown(). \
                 Worker will exit but pending scans may not be fully flushed."
            );
        }
    }
}

/// Builder for ScanRecorder
pub struct ScanRecorderBuilder {
    sinks: Vec<Arc<dyn ScanSink>>,
    config: WorkerConfig,
}

impl ScanRecorderBuilder {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            config: WorkerConfig::default(),
        }
    }

    pub fn add_sink(mut self, sink: Arc<dyn ScanSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn flush_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.flush_interval_ms = interval_ms;
        self
    }

    pub fn build(self) -> ScanRecorder {
        ScanRecorder::with_config(self.sinks, self.config)
    }
}

impl Default for ScanRecorderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a ScanRecorder from configuration, or None when recording is off
pub fn build_from_config(config: &ScanRecordingConfig) -> Result<Option<ScanRecorder>> {
    use crate::jsonl::JsonlScanSink;

    if !config.has_sinks() {
        return Ok(None);
    }

    let mut builder = ScanRecorderBuilder::new()
        .batch_size(config.worker.batch_size)
        .flush_interval_ms(config.worker.flush_interval_ms);

    if let Some(jsonl_config) = &config.jsonl
        && jsonl_config.enabled
    {
        let sink = JsonlScanSink::new(jsonl_config.directory.clone());
        builder = builder.add_sink(Arc::new(sink));
    }

    Ok(Some(builder.build()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory sink for testing
    #[derive(Clone, Default)]
    pub(crate) struct InMemorySink {
        records: Arc<Mutex<Vec<ScanRecord>>>,
    }

    impl InMemorySink {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn records(&self) -> Vec<ScanRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScanSink for InMemorySink {
        async fn write_scan(&self, record: &ScanRecord) -> Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    /// Sink that always fails, for fault-isolation tests
    struct FailingSink;

    #[async_trait]
    impl ScanSink for FailingSink {
        async fn write_scan(&self, _record: &ScanRecord) -> Result<()> {
            Err(Error::Internal("sink offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_recorder_delivers_to_sink() {
        let sink = Arc::new(InMemorySink::new());
        let recorder = ScanRecorder::new(vec![sink.clone()]);

        assert!(recorder.record(ScanEvent::new(json!({"pkg": "p-1"}), None)));
        assert!(recorder.record(ScanEvent::new(json!("raw"), Some("u-1".to_string()))));

        recorder.shutdown().await.unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, json!({"pkg": "p-1"}));
        assert_eq!(records[1].user.as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_block_healthy_sink() {
        let healthy = Arc::new(InMemorySink::new());
        let recorder = ScanRecorder::new(vec![Arc::new(FailingSink), healthy.clone()]);

        recorder.record(ScanEvent::new(json!("X"), None));
        recorder.shutdown().await.unwrap();

        assert_eq!(healthy.records().len(), 1);
    }

    #[tokio::test]
    async fn test_full_channel_never_panics() {
        let sink = Arc::new(InMemorySink::new());
        let recorder = ScanRecorder::with_config(
            vec![sink],
            WorkerConfig {
                batch_size: 1,
                flush_interval_ms: 10,
                channel_capacity: 1,
            },
        );

        // Saturate the channel; the second try_send can observe Full
        // depending on worker scheduling, but must never panic.
        recorder.record(ScanEvent::new(json!(1), None));
        recorder.record(ScanEvent::new(json!(2), None));
        recorder.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_flush_interval_still_flushes_and_shuts_down() {
        let sink = Arc::new(InMemorySink::new());
        let recorder = ScanRecorder::with_config(
            vec![sink.clone()],
            WorkerConfig {
                batch_size: 64,
                flush_interval_ms: 0,
                channel_capacity: 16,
            },
        );

        assert!(recorder.record(ScanEvent::new(json!("X"), None)));
        recorder.shutdown().await.unwrap();

        assert_eq!(sink.records().len(), 1);
    }

    #[tokio::test]
    async fn test_build_from_config_disabled() {
        let config = ScanRecordingConfig::default();
        assert!(build_from_config(&config).unwrap().is_none());
    }
}

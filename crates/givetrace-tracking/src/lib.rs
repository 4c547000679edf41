//! GiveTrace QR-Scan Tracking
//!
//! This crate provides QR-scan event tracking:
//! - The scan tracker, wired once onto the event bus
//! - Scan payload parsing
//! - Asynchronous scan recording to pluggable sinks

pub mod jsonl;
pub mod parse;
pub mod sink;
pub mod tracker;

pub use jsonl::JsonlScanSink;
pub use parse::{ParsedScan, parse_scan_data};
pub use sink::{ScanRecorder, ScanRecorderBuilder, ScanSink, build_from_config};
pub use tracker::{QR_CODE_SCANNED, ScanTracker};

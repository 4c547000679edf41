//! GiveTrace Core Types
//!
//! This crate provides the fundamental types used throughout GiveTrace:
//! - Session identity for authenticated and anonymous users
//! - Page-view and QR-scan event types
//! - Telemetry configuration
//! - Core error types

pub mod config;
pub mod error;
pub mod events;
pub mod identity;

pub use error::{Error, Result};
pub use events::{Location, PageView, ScanEvent, ScanRecord};
pub use identity::SessionIdentity;

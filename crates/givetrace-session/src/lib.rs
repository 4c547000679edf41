//! GiveTrace Session Binders
//!
//! This crate keeps external analytics and monitoring clients synchronized
//! with the hosting view's lifecycle:
//! - Analytics: session init per identity, page views per navigation
//! - Monitoring: init/shutdown paired with mount/unmount and identity changes
//!
//! Every collaborator call crosses a fault boundary: failures are logged to
//! the diagnostic channel and swallowed, never propagated to the host.

pub mod analytics;
pub mod boundary;
pub mod client;
pub mod monitoring;

pub use analytics::AnalyticsBinder;
pub use client::{AnalyticsClient, MonitoringClient};
pub use monitoring::MonitoringBinder;

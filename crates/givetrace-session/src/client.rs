//! Collaborator client traits
//!
//! The binders call these but never implement them; the host wires in the
//! real SDK adapters. Calls are treated as synchronous from the binders'
//! perspective: the binders neither await nor track completion.

use givetrace_core::{PageView, Result};

/// External analytics client.
pub trait AnalyticsClient: Send + Sync {
    /// (Re)initialize the analytics session for the given user, or an
    /// anonymous session when `identity` is `None`.
    fn init(&self, identity: Option<&str>) -> Result<()>;

    /// Record one page view.
    fn track_page_view(&self, view: &PageView) -> Result<()>;
}

/// External monitoring client.
pub trait MonitoringClient: Send + Sync {
    /// (Re)initialize monitoring for the given user.
    fn init(&self, identity: Option<&str>) -> Result<()>;

    /// Tear the monitoring session down.
    fn shutdown(&self) -> Result<()>;
}

//! Analytics session binder
//!
//! Keeps the analytics client's session and page-view stream synchronized
//! with authentication state and navigation state. The two reconcile
//! operations are independent: the host may call them in either order, and
//! each re-runs only when its own dependency value actually changed.
//!
//! Unlike the monitoring binder, this binder registers no teardown: an
//! analytics session lives for the rest of the process, and an identity
//! change re-initializes over the previous session without shutting it
//! down. That asymmetry is deliberate.

use crate::boundary::guard;
use crate::client::AnalyticsClient;
use givetrace_core::{Location, PageView, SessionIdentity};

/// Lifecycle holder for the analytics client.
pub struct AnalyticsBinder<C: AnalyticsClient> {
    client: C,
    last_identity: Option<SessionIdentity>,
    last_path: Option<String>,
}

impl<C: AnalyticsClient> AnalyticsBinder<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            last_identity: None,
            last_path: None,
        }
    }

    /// Re-run the identity effect if the identity changed since the last
    /// reconcile. The first reconcile always fires, anonymous included.
    /// An init failure is logged and swallowed; the identity still counts
    /// as reconciled, so the same value is not retried.
    pub fn reconcile_identity(&mut self, identity: &SessionIdentity) {
        if self.last_identity.as_ref() == Some(identity) {
            return;
        }

        tracing::debug!(identity = %identity, "Initializing analytics session");
        guard("analytics init", self.client.init(identity.as_deref()));
        self.last_identity = Some(identity.clone());
    }

    /// Re-run the navigation effect if path or query changed since the last
    /// reconcile. Builds the page view from the location snapshot and hands
    /// it to the client; failure is logged and swallowed.
    pub fn reconcile_navigation(&mut self, location: &Location) {
        let path = location.path_and_query();
        if self.last_path.as_deref() == Some(path.as_str()) {
            return;
        }

        let view = PageView::from_location(location);
        tracing::debug!(path = %view.path, "Recording page view");
        guard("analytics page view", self.client.track_page_view(&view));
        self.last_path = Some(path);
    }
}

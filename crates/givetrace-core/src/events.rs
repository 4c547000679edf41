//! Page-view and QR-scan event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of the hosting view's navigation state.
///
/// A plain value type so the session binders stay independent of any UI
/// framework; the host captures these fields from wherever its navigation
/// state lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Location {
    /// Path portion of the current URL (e.g. "/donations/new").
    pub pathname: String,

    /// Query string, with or without the leading '?'. Empty when absent.
    #[serde(default)]
    pub search: String,

    /// Document title at the time of the snapshot.
    #[serde(default)]
    pub title: String,

    /// Referrer, if the host knows one.
    #[serde(default)]
    pub referrer: String,
}

impl Location {
    /// Path plus query string, the navigation-change key.
    ///
    /// The query is prefixed with '?' only when non-empty, so
    /// "/a" + "" stays "/a" and "/a" + "q=1" becomes "/a?q=1".
    pub fn path_and_query(&self) -> String {
        if self.search.is_empty() {
            self.pathname.clone()
        } else if self.search.starts_with('?') {
            format!("{}{}", self.pathname, self.search)
        } else {
            format!("{}?{}", self.pathname, self.search)
        }
    }
}

/// A single page view, built on every navigation change and handed to the
/// analytics client. Immutable; not retained by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub path: String,
    pub title: String,
    pub referrer: String,
}

impl PageView {
    pub fn from_location(location: &Location) -> Self {
        Self {
            path: location.path_and_query(),
            title: location.title.clone(),
            referrer: location.referrer.clone(),
        }
    }
}

/// A QR-scan event as carried on the event bus.
///
/// `data` is opaque to this core; validation beyond presence is the scan
/// sink's concern. `user` is the scanning user's identity, when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    pub data: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ScanEvent {
    pub fn new(data: Value, user: Option<String>) -> Self {
        Self { data, user }
    }
}

/// A scan event enriched for persistence: generated id plus capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub data: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ScanRecord {
    pub fn from_event(event: ScanEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            data: event.data,
            user: event.user,
        }
    }
}

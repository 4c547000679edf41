//! Fault boundary for collaborator calls
//!
//! Telemetry failures must be invisible to the end user: each collaborator
//! call is wrapped at its call site, logged with the failing operation's
//! name, and swallowed. Fault isolation is per call, not per component, so
//! one failed call never aborts an unrelated one.

use givetrace_core::Result;

/// Run one collaborator call; log and swallow its failure.
/// Returns whether the call succeeded.
pub fn guard(operation: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(operation, error = %e, "Collaborator call failed");
            false
        }
    }
}

//! Progress reporting for incident loading.
//!
//! Defines a [`ProgressCallback`] trait so the loader can report how far it
//! has read without depending on a terminal backend. The CLI plugs in an
//! `indicatif` bar; tests and library callers use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a long-running load.
///
/// Units are whatever the caller set with [`ProgressCallback::set_total`];
/// the incident loader reports bytes read.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work (enables percentage/ETA).
    fn set_total(&self, total: u64);

    /// Set the current position (absolute, not delta).
    fn set_position(&self, pos: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}

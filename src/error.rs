//! Error types for extraction runs and persistence.
//!
//! Aggregation has no error type: every malformed input degrades to a zero or
//! empty default instead.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A fatal failure while loading or reading the rendered page.
///
/// Any `FetchFailure` aborts the extraction run; no partial record is persisted.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("invalid source URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("{stage} timed out after {}s", after.as_secs())]
    Timeout { stage: &'static str, after: Duration },

    #[error("selector `{selector}` did not appear within {}s", after.as_secs())]
    SelectorTimeout { selector: String, after: Duration },

    #[error("rendering context error: {0}")]
    Rendering(String),
}

/// A per-element snapshot that could not be captured. Logged and skipped.
#[derive(Error, Debug)]
#[error("snapshot of element {index} failed: {reason}")]
pub struct SnapshotFailure {
    pub index: usize,
    pub reason: String,
}

/// Persistence errors for the record file and refresh lock.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("another refresh holds {}", path.display())]
    Locked { path: PathBuf },
}

/// Errors surfaced by a full extract-then-persist run.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Rendering contexts the extractor drives.
//!
//! # Architecture
//!
//! - [`RenderContext`]: async trait for loading a page and reading its DOM
//! - [`HttpRenderer`]: implementation over HTTP + `scraper`
//!
//! A context holds at most one loaded page. Callers must call
//! [`RenderContext::close`] on every exit path; the extractor does this for
//! its own runs.

mod http;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FetchFailure, SnapshotFailure};

pub use http::HttpRenderer;

/// A browser-like context able to load one page and inspect its DOM.
#[async_trait]
pub trait RenderContext: Send {
    /// Context name for logs (e.g., "http").
    fn name(&self) -> &'static str;

    /// File extension of the snapshots this context writes (e.g., "png").
    fn snapshot_extension(&self) -> &'static str;

    /// Load `url`, giving up after `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), FetchFailure>;

    /// Wait until `selector` matches something in the loaded page.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration)
        -> Result<(), FetchFailure>;

    /// The loaded page's DOM serialized as HTML.
    async fn content(&self) -> Result<String, FetchFailure>;

    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, FetchFailure>;

    /// Capture the `index`-th element matching `selector` into `path`.
    async fn snapshot(&self, selector: &str, index: usize, path: &Path)
        -> Result<(), SnapshotFailure>;

    /// Release the page and any resources held by the context.
    async fn close(&mut self) -> Result<(), FetchFailure>;
}

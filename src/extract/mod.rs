//! Extraction runs: drive a [`RenderContext`] to the budget page and read it
//! into a [`PageRecord`].
//!
//! # Architecture
//!
//! ```text
//! navigate ─► wait for <body> ─► content() ─► dom::parse_page ─► snapshots ─► PageRecord
//! ```
//!
//! Navigation and the selector wait are bounded by [`ExtractOptions`]. Any
//! failure before the snapshot stage aborts the run. A failed snapshot only
//! drops that element from `screenshots`. The context is closed on every
//! exit path.

pub mod dom;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::error::FetchFailure;
use crate::model::{PageRecord, ScreenshotRef};
use crate::render::RenderContext;

pub use dom::{parse_page, PageContent};

/// Selector that must be present before the DOM is read.
pub const READY_SELECTOR: &str = "body";

/// Parameters of an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub url: String,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    /// Directory receiving the per-element snapshots.
    pub images_dir: PathBuf,
}

/// Runs extractions against a fixed source URL.
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Perform one extraction run and close `ctx` afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailure`] when navigation, the readiness wait or reading
    /// the DOM fails. No partial record is produced.
    #[instrument(skip(self, ctx), fields(url = %self.options.url, context = ctx.name()))]
    pub async fn run(&self, ctx: &mut dyn RenderContext) -> Result<PageRecord, FetchFailure> {
        let result = self.extract(ctx).await;

        if let Err(e) = ctx.close().await {
            warn!(error = %e, "Closing rendering context failed");
        }

        match &result {
            Ok(record) => info!(
                sections = record.sections.len(),
                financial_items = record.financial_items.len(),
                screenshots = record.screenshots.len(),
                "Extraction complete"
            ),
            Err(e) => warn!(error = %e, "Extraction failed"),
        }
        result
    }

    async fn extract(&self, ctx: &mut dyn RenderContext) -> Result<PageRecord, FetchFailure> {
        let opts = &self.options;

        bounded(
            "navigation",
            opts.navigation_timeout,
            ctx.navigate(&opts.url, opts.navigation_timeout),
        )
        .await?;

        // A context that hangs instead of reporting its own timeout still
        // surfaces as a selector timeout.
        tokio::time::timeout(
            opts.selector_timeout,
            ctx.wait_for_selector(READY_SELECTOR, opts.selector_timeout),
        )
        .await
        .map_err(|_| FetchFailure::SelectorTimeout {
            selector: READY_SELECTOR.to_string(),
            after: opts.selector_timeout,
        })??;

        debug!("Page ready, reading DOM");
        let html = ctx.content().await?;
        let content = parse_page(&html);

        let screenshots = self.capture_snapshots(ctx).await?;

        Ok(assemble(content, screenshots))
    }

    async fn capture_snapshots(
        &self,
        ctx: &mut dyn RenderContext,
    ) -> Result<Vec<ScreenshotRef>, FetchFailure> {
        let count = ctx.count(dom::SNAPSHOT_SELECTOR).await?;
        let extension = ctx.snapshot_extension();
        debug!(count, "Capturing element snapshots");

        let mut screenshots = Vec::with_capacity(count);
        for index in 0..count {
            let file_name = format!("chart_{index}.{extension}");
            let path = self.options.images_dir.join(&file_name);

            match ctx.snapshot(dom::SNAPSHOT_SELECTOR, index, &path).await {
                Ok(()) => screenshots.push(ScreenshotRef { file_name, index }),
                Err(e) => warn!(index = e.index, reason = %e.reason, "Snapshot skipped"),
            }
        }
        Ok(screenshots)
    }
}

async fn bounded<F>(stage: &'static str, after: Duration, step: F) -> Result<(), FetchFailure>
where
    F: std::future::Future<Output = Result<(), FetchFailure>>,
{
    tokio::time::timeout(after, step)
        .await
        .map_err(|_| FetchFailure::Timeout { stage, after })?
}

/// Stamp parsed page content into a record.
fn assemble(content: PageContent, screenshots: Vec<ScreenshotRef>) -> PageRecord {
    PageRecord {
        title: content.title,
        meta: content.meta,
        sections: content.sections,
        charts: content.charts,
        financial_items: content.financial_items,
        raw_amount_strings: content.raw_amount_strings,
        screenshots,
        fetched_at: Utc::now(),
    }
}

//! Rendering context over plain HTTP.
//!
//! The archived budget page is server-rendered, so the fetched document is
//! the rendered DOM. The page counts as settled once the whole body has
//! arrived. Snapshots are standalone HTML documents holding the element's
//! markup, since there is no raster engine to draw them.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::RenderContext;
use crate::error::{FetchFailure, SnapshotFailure};
use crate::http_client::PageClient;

struct LoadedPage {
    url: String,
    html: String,
}

/// [`RenderContext`] backed by [`PageClient`] and `scraper`.
pub struct HttpRenderer {
    client: PageClient,
    page: Option<LoadedPage>,
}

impl HttpRenderer {
    pub fn new(client: PageClient) -> Self {
        Self { client, page: None }
    }

    fn loaded(&self) -> Result<&LoadedPage, FetchFailure> {
        self.page
            .as_ref()
            .ok_or_else(|| FetchFailure::Rendering("no page loaded".to_string()))
    }
}

#[async_trait]
impl RenderContext for HttpRenderer {
    fn name(&self) -> &'static str {
        "http"
    }

    fn snapshot_extension(&self) -> &'static str {
        "html"
    }

    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), FetchFailure> {
        url::Url::parse(url).map_err(|e| FetchFailure::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let html = tokio::time::timeout(timeout, self.client.fetch_text(url))
            .await
            .map_err(|_| FetchFailure::Timeout {
                stage: "navigation",
                after: timeout,
            })?
            .map_err(|e| FetchFailure::Navigation {
                url: url.to_string(),
                reason: format!("{e:#}"),
            })?;

        debug!(bytes = html.len(), "Page body received");
        self.page = Some(LoadedPage {
            url: url.to_string(),
            html,
        });
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), FetchFailure> {
        // A fetched document never changes, so one check decides it.
        if count_matches(&self.loaded()?.html, selector)? > 0 {
            Ok(())
        } else {
            Err(FetchFailure::SelectorTimeout {
                selector: selector.to_string(),
                after: timeout,
            })
        }
    }

    async fn content(&self) -> Result<String, FetchFailure> {
        Ok(self.loaded()?.html.clone())
    }

    async fn count(&self, selector: &str) -> Result<usize, FetchFailure> {
        count_matches(&self.loaded()?.html, selector)
    }

    async fn snapshot(
        &self,
        selector: &str,
        index: usize,
        path: &Path,
    ) -> Result<(), SnapshotFailure> {
        let fail = |reason: String| SnapshotFailure { index, reason };

        let page = self.loaded().map_err(|e| fail(e.to_string()))?;
        let document = element_document(page, selector, index).map_err(fail)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| fail(format!("{}: {e}", parent.display())))?;
        }
        tokio::fs::write(path, document)
            .await
            .map_err(|e| fail(format!("{}: {e}", path.display())))
    }

    async fn close(&mut self) -> Result<(), FetchFailure> {
        if let Some(page) = self.page.take() {
            debug!(url = %page.url, "Page closed");
        }
        Ok(())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, FetchFailure> {
    Selector::parse(selector)
        .map_err(|e| FetchFailure::Rendering(format!("invalid selector `{selector}`: {e}")))
}

fn count_matches(html: &str, selector: &str) -> Result<usize, FetchFailure> {
    let selector = parse_selector(selector)?;
    Ok(Html::parse_document(html).select(&selector).count())
}

/// Wrap one element's markup in a standalone document that resolves relative
/// links against the page URL.
fn element_document(page: &LoadedPage, selector: &str, index: usize) -> Result<String, String> {
    let selector = parse_selector(selector).map_err(|e| e.to_string())?;
    let document = Html::parse_document(&page.html);
    let element = document
        .select(&selector)
        .nth(index)
        .ok_or_else(|| format!("no element at index {index}"))?;

    Ok(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><base href=\"{}\"></head>\n<body>\n{}\n</body></html>\n",
        page.url.replace('"', "&quot;"),
        element.html()
    ))
}

//! HTTP client used to load the archived budget page.
//!
//! Features:
//! - Browser-like headers (see [`crate::fingerprint`])
//! - Brotli/Gzip/Deflate compression (auto-negotiated)
//! - Cookie jar, since the archive viewer sets a session cookie on redirect
//! - Connect timeout; the overall budget is enforced by the caller

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

use crate::fingerprint::{chrome_profile, BrowserProfile};

/// HTTP client whose default headers come from one browser profile.
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Create a client with a generated Chrome profile.
    pub fn new() -> Result<Self> {
        Self::with_profile(chrome_profile())
    }

    /// Create client with specific browser profile
    pub fn with_profile(profile: BrowserProfile) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .default_headers(profile.to_headers())
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// Send a GET request and fail on non-success status codes.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Response> {
        debug!("Fetching page");
        let response = self.client.get(url).send().await?.error_for_status()?;

        info!(
            status = %response.status(),
            version = ?response.version(),
            content_encoding = ?response.headers().get("content-encoding"),
            "Response received"
        );

        Ok(response)
    }

    /// Fetch and return body as string
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch(url).await?;
        let text = response.text().await?;
        Ok(text)
    }
}

//! `gemdash` - budget metrics from an archived municipal budget page
//!
//! # Pipeline
//!
//! | Stage      | Module       | Output                         |
//! |------------|--------------|--------------------------------|
//! | Render     | [`render`]   | rendered DOM, element snapshots |
//! | Extract    | [`extract`]  | [`PageRecord`]                 |
//! | Persist    | [`store`]    | `scraped-data.json`            |
//! | Aggregate  | [`metrics`]  | [`MetricsSummary`]             |
//! | Present    | [`report`]   | markdown dashboard             |
//!
//! Aggregation is a pure function of the record; only extraction touches the
//! network and only the store touches disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use gemdash::{Config, Extractor, HttpRenderer, PageClient, summarize};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let mut renderer = HttpRenderer::new(PageClient::new()?);
//!     let record = Extractor::new(config.extract_options()).run(&mut renderer).await?;
//!     println!("Budget total: {}", summarize(&record).budget_total);
//!     Ok(())
//! }
//! ```

pub mod amount;
pub mod config;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod http_client;
pub mod metrics;
pub mod model;
pub mod render;
pub mod report;
pub mod store;

pub use amount::{parse_amount, Magnitude};
pub use config::Config;
pub use error::{ExtractError, FetchFailure, SnapshotFailure, StoreError};
pub use extract::{ExtractOptions, Extractor};
pub use fingerprint::{chrome_profile, BrowserProfile};
pub use http_client::PageClient;
pub use metrics::{key_topics, summarize, AmountSourceKind, MetricsSummary};
pub use model::{FinancialItem, PageRecord, Section};
pub use render::{HttpRenderer, RenderContext};
pub use report::{format_euro, render_dashboard};
pub use store::{is_stale, refresh, Store};

/// Version of gemdash
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

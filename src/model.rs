//! Record shapes produced by an extraction run.
//!
//! Field names follow the persisted JSON document (camelCase). Aliases accept
//! the field names written by the earlier Node-based tool, and every field has
//! a default so partially written or hand-edited files still load.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One extraction run's output: everything read from the rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    #[serde(default, alias = "pageTitle")]
    pub title: String,
    #[serde(default, alias = "metaInfo")]
    pub meta: PageMeta,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, alias = "chartData")]
    pub charts: Vec<ChartRef>,
    #[serde(default, alias = "financialData")]
    pub financial_items: Vec<FinancialItem>,
    #[serde(default, alias = "allFinancialMatches")]
    pub raw_amount_strings: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<ScreenshotRef>,
    /// Set once when the run succeeds. A record without a timestamp loads as
    /// the Unix epoch, which always reads as stale.
    #[serde(
        rename = "lastUpdated",
        alias = "fetchedAt",
        default = "unix_epoch"
    )]
    pub fetched_at: DateTime<Utc>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// `<meta>` information, with `date` falling back to visible date text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    pub description: String,
    pub keywords: String,
    pub author: String,
    pub date: String,
}

/// A content container (`section`, `article`, ...) and what it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Section {
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub list_items: Vec<String>,
    pub tables: Vec<Table>,
    pub figures: Vec<Figure>,
    #[serde(alias = "numericData")]
    pub numeric_mentions: Vec<String>,
}

impl Section {
    /// Sections contributing nothing are dropped from the record.
    pub fn has_content(&self) -> bool {
        !(self.headings.is_empty()
            && self.paragraphs.is_empty()
            && self.list_items.is_empty()
            && self.tables.is_empty()
            && self.figures.is_empty()
            && self.numeric_mentions.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Figure {
    pub caption: String,
    #[serde(alias = "dataText")]
    pub text: String,
}

/// A chart-like element with its `data-*` attributes copied verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartRef {
    pub id: String,
    pub class_name: String,
    pub data_attributes: BTreeMap<String, String>,
    pub inner_text: String,
}

/// A budget line tagged in the page markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialItem {
    pub category: String,
    /// Raw, locale-formatted amount such as `€ 10,5 miljoen`.
    #[serde(alias = "amount")]
    pub amount_text: String,
    pub description: String,
}

impl FinancialItem {
    pub fn is_empty(&self) -> bool {
        self.category.is_empty() && self.amount_text.is_empty()
    }
}

/// A snapshot artifact written next to the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotRef {
    pub file_name: String,
    pub index: usize,
}

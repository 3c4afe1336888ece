//! Budget metrics derived from a [`PageRecord`].
//!
//! [`summarize`] is a pure function of its input: the same record always yields
//! the same [`MetricsSummary`]. Budget totals come from one of two sources,
//! chosen once per call:
//!
//! | Source | When | Category name |
//! |--------|------|---------------|
//! | [`AmountSource::Structured`] | record has financial items | item category |
//! | [`AmountSource::TextFallback`] | no financial items | `Category {n}` (1-based) |
//!
//! Both feed the same reduction. Entries with an empty category or a zero
//! parsed amount are skipped in either case.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::amount::{parse_amount, parse_amount_in_column};
use crate::model::{FinancialItem, PageRecord, Section};

/// Heading words never reported as topics (compared case-insensitively).
const STOP_WORDS: [&str; 5] = ["voor", "naar", "deze", "door", "over"];

/// Maximum number of distinct topics reported.
pub const MAX_TOPICS: usize = 10;

/// Header terms marking a table column as monetary.
const FINANCIAL_HEADER_TERMS: [&str; 7] = [
    "budget",
    "bedrag",
    "miljoen",
    "euro",
    "€",
    "kosten",
    "investering",
];

/// Aggregated view of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub section_count: usize,
    pub financial_item_count: usize,
    pub last_updated: DateTime<Utc>,
    /// Distinct structured categories in first-seen order.
    pub key_categories: Vec<String>,
    pub budget_total: f64,
    /// Totals per category, in the order categories first appear.
    pub category_totals: IndexMap<String, f64>,
    pub key_topics: Vec<String>,
    pub amount_source: AmountSourceKind,
    pub content: ContentStats,
    /// Lines read from budget tables. Reported alongside, never summed into
    /// `budget_total`.
    pub table_budget_lines: Vec<BudgetLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AmountSourceKind {
    Structured,
    TextFallback,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub paragraphs: usize,
    pub list_items: usize,
    pub tables: usize,
    pub figures: usize,
    pub numeric_mentions: usize,
    pub charts: usize,
    pub screenshots: usize,
}

/// A category/amount pair read from a table with a monetary column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub category: String,
    pub amount: f64,
    /// The cell text the amount was parsed from.
    pub text: String,
    /// Index of the table in page order.
    pub table: usize,
}

/// Where budget amounts are read from for one call.
pub enum AmountSource<'a> {
    Structured(&'a [FinancialItem]),
    TextFallback(&'a [String]),
}

impl<'a> AmountSource<'a> {
    pub fn select(record: &'a PageRecord) -> Self {
        if record.financial_items.is_empty() {
            AmountSource::TextFallback(&record.raw_amount_strings)
        } else {
            AmountSource::Structured(&record.financial_items)
        }
    }

    pub fn kind(&self) -> AmountSourceKind {
        match self {
            AmountSource::Structured(_) => AmountSourceKind::Structured,
            AmountSource::TextFallback(_) => AmountSourceKind::TextFallback,
        }
    }

    /// `(category, amount text)` pairs in page order.
    fn entries(&self) -> Box<dyn Iterator<Item = (Cow<'a, str>, &'a str)> + 'a> {
        match *self {
            AmountSource::Structured(items) => Box::new(
                items
                    .iter()
                    .map(|item| (Cow::Borrowed(item.category.as_str()), item.amount_text.as_str())),
            ),
            AmountSource::TextFallback(strings) => Box::new(
                strings
                    .iter()
                    .enumerate()
                    .map(|(i, text)| (Cow::Owned(format!("Category {}", i + 1)), text.as_str())),
            ),
        }
    }
}

#[derive(Debug, Default)]
struct BudgetTotals {
    total: f64,
    categories: IndexMap<String, f64>,
}

impl BudgetTotals {
    fn add(mut self, category: &str, amount: f64) -> Self {
        if category.is_empty() || amount == 0.0 {
            return self;
        }
        *self.categories.entry(category.to_string()).or_insert(0.0) += amount;
        self.total += amount;
        self
    }
}

/// Compute the metrics for a record. Never fails; missing data yields zeros.
pub fn summarize(record: &PageRecord) -> MetricsSummary {
    let source = AmountSource::select(record);
    let totals = source
        .entries()
        .fold(BudgetTotals::default(), |acc, (category, text)| {
            acc.add(&category, parse_amount(text))
        });

    let key_categories = match source {
        AmountSource::Structured(_) => totals.categories.keys().cloned().collect(),
        AmountSource::TextFallback(_) => Vec::new(),
    };

    MetricsSummary {
        section_count: record.sections.len(),
        financial_item_count: record.financial_items.len(),
        last_updated: record.fetched_at,
        key_categories,
        budget_total: totals.total,
        category_totals: totals.categories,
        key_topics: key_topics(&record.sections),
        amount_source: source.kind(),
        content: content_stats(record),
        table_budget_lines: table_budget_lines(&record.sections),
    }
}

/// Distinct heading words longer than four characters, minus stop words,
/// in first-seen order, capped at [`MAX_TOPICS`].
pub fn key_topics(sections: &[Section]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    let words = sections
        .iter()
        .flat_map(|s| &s.headings)
        .flat_map(|heading| heading.split_whitespace());

    for word in words {
        if topics.len() == MAX_TOPICS {
            break;
        }
        if word.chars().count() > 4 && !is_stop_word(word) && !topics.iter().any(|t| t == word) {
            topics.push(word.to_string());
        }
    }
    topics
}

fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

fn content_stats(record: &PageRecord) -> ContentStats {
    record.sections.iter().fold(
        ContentStats {
            charts: record.charts.len(),
            screenshots: record.screenshots.len(),
            ..ContentStats::default()
        },
        |mut stats, s| {
            stats.paragraphs += s.paragraphs.len();
            stats.list_items += s.list_items.len();
            stats.tables += s.tables.len();
            stats.figures += s.figures.len();
            stats.numeric_mentions += s.numeric_mentions.len();
            stats
        },
    )
}

/// Read category/amount lines from tables with a monetary header.
///
/// The first column is the category; the first header containing a financial
/// term picks the amount column. Rows without a category or a non-zero amount
/// are skipped.
pub fn table_budget_lines(sections: &[Section]) -> Vec<BudgetLine> {
    sections
        .iter()
        .flat_map(|s| &s.tables)
        .enumerate()
        .filter_map(|(index, table)| {
            let column = table.headers.iter().position(|h| is_financial_header(h))?;
            Some((index, table, column))
        })
        .flat_map(|(index, table, column)| {
            let header = &table.headers[column];
            table.rows.iter().filter_map(move |row| {
                let category = row.first()?.trim();
                let cell = row.get(column)?;
                let amount = parse_amount_in_column(cell, header);
                if category.is_empty() || amount == 0.0 {
                    return None;
                }
                Some(BudgetLine {
                    category: category.to_string(),
                    amount,
                    text: cell.clone(),
                    table: index,
                })
            })
        })
        .collect()
}

fn is_financial_header(header: &str) -> bool {
    let lower = header.to_lowercase();
    FINANCIAL_HEADER_TERMS.iter().any(|term| lower.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageMeta, Table};

    fn record() -> PageRecord {
        PageRecord {
            title: String::new(),
            meta: PageMeta::default(),
            sections: vec![],
            charts: vec![],
            financial_items: vec![],
            raw_amount_strings: vec![],
            screenshots: vec![],
            fetched_at: "2024-11-14T09:10:54Z".parse().unwrap(),
        }
    }

    fn item(category: &str, amount: &str) -> FinancialItem {
        FinancialItem {
            category: category.into(),
            amount_text: amount.into(),
            description: String::new(),
        }
    }

    fn headings(list: &[&str]) -> Section {
        Section {
            headings: list.iter().map(ToString::to_string).collect(),
            ..Section::default()
        }
    }

    #[test]
    fn empty_record_yields_zeroes() {
        let m = summarize(&record());
        assert_eq!(m.budget_total, 0.0);
        assert!(m.category_totals.is_empty());
        assert!(m.key_topics.is_empty());
        assert!(m.key_categories.is_empty());
        assert_eq!(m.section_count, 0);
        assert_eq!(m.financial_item_count, 0);
        assert_eq!(m.amount_source, AmountSourceKind::TextFallback);
    }

    #[test]
    fn structured_items_sum_per_category() {
        let mut r = record();
        r.financial_items = vec![item("Zorg", "1 miljoen"), item("Zorg", "2 miljoen")];

        let m = summarize(&r);
        assert_eq!(m.category_totals["Zorg"], 3_000_000.0);
        assert_eq!(m.budget_total, 3_000_000.0);
        assert_eq!(m.key_categories, vec!["Zorg"]);
        assert_eq!(m.financial_item_count, 2);
        assert_eq!(m.amount_source, AmountSourceKind::Structured);
    }

    #[test]
    fn structured_path_skips_empty_category_and_zero_amount() {
        let mut r = record();
        r.financial_items = vec![
            item("", "5 miljoen"),
            item("Wonen", "geen bedrag"),
            item("Cultuur", "€ 40"),
        ];
        r.raw_amount_strings = vec!["€ 999".into()];

        let m = summarize(&r);
        assert_eq!(m.budget_total, 40.0);
        assert_eq!(m.key_categories, vec!["Cultuur"]);
        assert!(!m.category_totals.contains_key("Wonen"));
        assert!(!m.category_totals.contains_key("Category 1"));
    }

    #[test]
    fn key_categories_keep_first_seen_order() {
        let mut r = record();
        r.financial_items = vec![
            item("Wonen", "150 miljoen"),
            item("Economie", "70 miljoen"),
            item("Wonen", "5 miljoen"),
        ];
        assert_eq!(summarize(&r).key_categories, vec!["Wonen", "Economie"]);
    }

    #[test]
    fn falls_back_to_raw_amount_strings() {
        let mut r = record();
        r.raw_amount_strings = vec!["€ 500".into(), "1 duizend".into()];

        let m = summarize(&r);
        assert_eq!(m.category_totals.len(), 2);
        assert_eq!(m.category_totals["Category 1"], 500.0);
        assert_eq!(m.category_totals["Category 2"], 1_000.0);
        assert_eq!(m.budget_total, 1_500.0);
        assert!(m.key_categories.is_empty());
    }

    #[test]
    fn fallback_categories_keep_page_order() {
        let mut r = record();
        r.raw_amount_strings = (1..=11).map(|i| format!("€ {i}")).collect();

        let m = summarize(&r);
        let names: Vec<&str> = m.category_totals.keys().map(String::as_str).collect();
        let expected: Vec<String> = (1..=11).map(|i| format!("Category {i}")).collect();
        assert_eq!(names, expected);
        assert_eq!(m.category_totals["Category 10"], 10.0);

        let json = serde_json::to_string(&m.category_totals).unwrap();
        assert!(json.starts_with(r#"{"Category 1":1.0,"Category 2":2.0,"#));
        assert!(json.ends_with(r#""Category 10":10.0,"Category 11":11.0}"#));
    }

    #[test]
    fn structured_totals_keep_page_order() {
        let mut r = record();
        r.financial_items = vec![
            item("Zorg", "€ 3"),
            item("Armoede", "€ 2"),
            item("Zorg", "€ 1"),
            item("Bereikbaarheid", "€ 4"),
        ];

        let m = summarize(&r);
        let names: Vec<&str> = m.category_totals.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zorg", "Armoede", "Bereikbaarheid"]);
        assert_eq!(m.category_totals["Zorg"], 4.0);
    }

    #[test]
    fn fallback_numbering_is_positional() {
        let mut r = record();
        r.raw_amount_strings = vec!["€ 0".into(), "€ 7".into()];

        let m = summarize(&r);
        assert_eq!(m.category_totals.len(), 1);
        assert_eq!(m.category_totals["Category 2"], 7.0);
    }

    #[test]
    fn topics_drop_short_and_stop_words() {
        let mut r = record();
        r.sections = vec![headings(&["Voortgang Ontwikkeling Zorgbeleid", "Geld voor Wonen"])];

        let topics = summarize(&r).key_topics;
        assert_eq!(topics, vec!["Voortgang", "Ontwikkeling", "Zorgbeleid", "Wonen"]);
    }

    #[test]
    fn stop_words_match_case_insensitively() {
        assert!(is_stop_word("DOOR"));
        assert!(is_stop_word("Over"));
        assert!(!is_stop_word("Overig"));
    }

    #[test]
    fn topics_are_distinct_and_capped() {
        let words: Vec<String> = (0..15).map(|i| format!("Thema{i:02}")).collect();
        let heading = words.join(" ");
        let sections = vec![headings(&["Thema00 Thema00", heading.as_str()])];

        let topics = key_topics(&sections);
        assert_eq!(topics.len(), MAX_TOPICS);
        assert_eq!(topics[0], "Thema00");
        assert_eq!(topics[9], "Thema09");
    }

    #[test]
    fn summarize_is_idempotent() {
        let mut r = record();
        r.financial_items = vec![item("Zorg", "€ 10,5 miljoen")];
        r.sections = vec![headings(&["Financiële Ontwikkelingen"])];
        assert_eq!(summarize(&r), summarize(&r));
    }

    #[test]
    fn last_updated_passes_through() {
        let r = record();
        assert_eq!(summarize(&r).last_updated, r.fetched_at);
    }

    #[test]
    fn budget_tables_produce_lines() {
        let mut r = record();
        r.sections = vec![Section {
            tables: vec![
                Table {
                    headers: vec!["Wijk".into(), "Woningen".into()],
                    rows: vec![vec!["Noord".into(), "600".into()]],
                },
                Table {
                    headers: vec!["Programma".into(), "Budget 2024 (miljoen €)".into()],
                    rows: vec![
                        vec!["Wonen".into(), "150".into()],
                        vec!["Cultuur".into(), "n.v.t.".into()],
                        vec!["Zorg".into()],
                    ],
                },
            ],
            ..Section::default()
        }];

        let m = summarize(&r);
        assert_eq!(m.table_budget_lines.len(), 1);
        let line = &m.table_budget_lines[0];
        assert_eq!(line.category, "Wonen");
        assert_eq!(line.amount, 150_000_000.0);
        assert_eq!(line.table, 1);
        assert_eq!(m.budget_total, 0.0);
        assert_eq!(m.content.tables, 2);
    }
}

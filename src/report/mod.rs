//! Markdown dashboard rendered from a record and its metrics.

mod table;

use std::fmt::Write;

use crate::metrics::{AmountSourceKind, MetricsSummary};
use crate::model::PageRecord;

pub use table::MarkdownTable;

const FALLBACK_TITLE: &str = "Gemeente Rotterdam Voorjaarsnota 2024 Dashboard";

/// Render the dashboard as markdown. `stale` marks the record as older than
/// the freshness threshold.
pub fn render_dashboard(record: &PageRecord, metrics: &MetricsSummary, stale: bool) -> String {
    let mut md = String::new();
    let title = if record.title.is_empty() {
        FALLBACK_TITLE
    } else {
        record.title.as_str()
    };

    // Writing to a String cannot fail.
    let _ = writeln!(md, "# {title}\n");
    if !record.meta.description.is_empty() {
        let _ = writeln!(md, "{}\n", record.meta.description);
    }
    let _ = write!(
        md,
        "_Last updated: {}_",
        metrics.last_updated.format("%Y-%m-%d %H:%M UTC")
    );
    md.push_str(if stale { " (stale)\n\n" } else { "\n\n" });

    md.push_str("## Budget\n\n");
    let _ = writeln!(md, "**Total:** {}\n", format_euro(metrics.budget_total));
    if metrics.amount_source == AmountSourceKind::TextFallback {
        md.push_str("_No tagged budget items found; totals come from amounts in the page text._\n\n");
    }

    let mut categories = MarkdownTable::new(["Category", "Amount"]);
    for (category, amount) in &metrics.category_totals {
        categories.push_row(vec![category.clone(), format_euro(*amount)]);
    }
    let rendered = categories.to_markdown();
    if rendered.is_empty() {
        md.push_str("No amounts found.\n\n");
    } else {
        md.push_str(&rendered);
        md.push('\n');
    }

    if !metrics.table_budget_lines.is_empty() {
        md.push_str("## Budget tables\n\n");
        let mut lines = MarkdownTable::new(["Table", "Category", "Amount", "Source"]);
        for line in &metrics.table_budget_lines {
            lines.push_row(vec![
                (line.table + 1).to_string(),
                line.category.clone(),
                format_euro(line.amount),
                line.text.clone(),
            ]);
        }
        md.push_str(&lines.to_markdown());
        md.push('\n');
    }

    if !metrics.key_topics.is_empty() {
        md.push_str("## Topics\n\n");
        for topic in &metrics.key_topics {
            let _ = writeln!(md, "- {topic}");
        }
        md.push('\n');
    }

    let c = &metrics.content;
    md.push_str("## Content\n\n");
    let _ = writeln!(
        md,
        "{} sections, {} paragraphs, {} list items, {} tables, {} figures, {} charts, {} snapshots",
        metrics.section_count,
        c.paragraphs,
        c.list_items,
        c.tables,
        c.figures,
        c.charts,
        c.screenshots
    );

    md
}

/// Format an amount the Dutch way: `€ 1.234.567,89`.
pub fn format_euro(amount: f64) -> String {
    if !amount.is_finite() {
        return "€ -".to_string();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("€ {sign}{grouped},{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::metrics::summarize;
    use crate::model::{FinancialItem, PageMeta, Section};

    fn record() -> PageRecord {
        PageRecord {
            title: "Voortgang".to_string(),
            meta: PageMeta::default(),
            sections: vec![Section {
                headings: vec!["Voortgang Ontwikkeling Zorgbeleid".to_string()],
                ..Section::default()
            }],
            charts: Vec::new(),
            financial_items: vec![FinancialItem {
                category: "Zorg".to_string(),
                amount_text: "€ 1,5 miljoen".to_string(),
                description: String::new(),
            }],
            raw_amount_strings: Vec::new(),
            screenshots: Vec::new(),
            fetched_at: Utc.with_ymd_and_hms(2024, 11, 14, 9, 10, 54).unwrap(),
        }
    }

    #[test]
    fn euro_formatting() {
        assert_eq!(format_euro(0.0), "€ 0,00");
        assert_eq!(format_euro(500.0), "€ 500,00");
        assert_eq!(format_euro(1_234_567.891), "€ 1.234.567,89");
        assert_eq!(format_euro(-1500.0), "€ -1.500,00");
        assert_eq!(format_euro(f64::NAN), "€ -");
    }

    #[test]
    fn dashboard_lists_totals_and_topics() {
        let record = record();
        let md = render_dashboard(&record, &summarize(&record), false);

        assert!(md.starts_with("# Voortgang\n"));
        assert!(md.contains("_Last updated: 2024-11-14 09:10 UTC_\n"));
        assert!(md.contains("**Total:** € 1.500.000,00"));
        assert!(md.contains("| Zorg | € 1.500.000,00 |"));
        assert!(md.contains("- Zorgbeleid"));
        assert!(!md.contains("(stale)"));
    }

    #[test]
    fn dashboard_marks_stale_and_empty_data() {
        let mut record = record();
        record.title.clear();
        record.financial_items.clear();
        let md = render_dashboard(&record, &summarize(&record), true);

        assert!(md.starts_with(&format!("# {FALLBACK_TITLE}")));
        assert!(md.contains("(stale)"));
        assert!(md.contains("No amounts found."));
        assert!(md.contains("amounts in the page text"));
    }
}

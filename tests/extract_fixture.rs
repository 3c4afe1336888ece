//! DOM extraction and aggregation over a saved copy of the progress page.

use gemdash::extract::parse_page;
use gemdash::metrics::{summarize, AmountSourceKind};
use gemdash::model::PageRecord;

const FIXTURE: &str = include_str!("fixtures/voortgang.html");

fn fixture_record() -> PageRecord {
    let content = parse_page(FIXTURE);
    PageRecord {
        title: content.title,
        meta: content.meta,
        sections: content.sections,
        charts: content.charts,
        financial_items: content.financial_items,
        raw_amount_strings: content.raw_amount_strings,
        screenshots: Vec::new(),
        fetched_at: "2024-11-14T09:10:54Z".parse().unwrap(),
    }
}

// ─── Extraction ──────────────────────────────────────────────────────────────

#[test]
fn reads_title_and_meta() {
    let content = parse_page(FIXTURE);
    assert_eq!(content.title, "Voortgang | Voorjaarsnota 2024");
    assert_eq!(content.meta.author, "Gemeente Rotterdam");
    assert_eq!(content.meta.keywords, "voorjaarsnota, begroting, Rotterdam");
    // No <meta name="date">, so the visible publication date is used.
    assert_eq!(content.meta.date, "14 november 2024");
}

#[test]
fn empty_containers_are_dropped() {
    let content = parse_page(FIXTURE);
    // article, section and the content block; the empty div.section is gone.
    assert_eq!(content.sections.len(), 3);

    let article = &content.sections[0];
    assert_eq!(article.headings, ["Voortgang Ontwikkeling Zorgbeleid"]);
    assert_eq!(article.paragraphs.len(), 2);
    assert_eq!(article.list_items, ["Wijkteams: 3 duizend huishoudens bereikt"]);
    assert!(article.numeric_mentions.contains(&"45,5 miljoen".to_string()));
    assert!(article.numeric_mentions.contains(&"12,5 %".to_string()));
}

#[test]
fn reads_tables_and_figures() {
    let content = parse_page(FIXTURE);
    let section = &content.sections[1];

    let table = &section.tables[0];
    assert_eq!(table.headers, ["Programma", "Budget 2024 (miljoen €)", "Toelichting"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0], ["Zorg", "45,5", "Extra middelen wijkteams"]);

    let figure = &section.figures[0];
    assert_eq!(figure.caption, "Verdeling investeringen 2024");
    assert!(figure.text.contains("Verdeling van het budget"));
}

#[test]
fn reads_chart_data_attributes() {
    let content = parse_page(FIXTURE);
    assert_eq!(content.charts.len(), 2);

    let pie = &content.charts[0];
    assert_eq!(pie.id, "chart-begroting");
    assert_eq!(pie.data_attributes["data-chart"], "pie");
    assert_eq!(pie.data_attributes["data-source"], "begroting-2024");
    assert_eq!(content.charts[1].class_name, "graph");
}

#[test]
fn reads_tagged_financial_items() {
    let content = parse_page(FIXTURE);
    let categories: Vec<_> = content
        .financial_items
        .iter()
        .map(|i| i.category.as_str())
        .collect();
    assert_eq!(categories, ["Zorg", "Onderwijs", "Cultuur"]);
    assert_eq!(content.financial_items[0].amount_text, "€ 45,5 miljoen");
    assert_eq!(content.financial_items[2].description, "");
}

#[test]
fn script_text_is_not_an_amount() {
    let content = parse_page(FIXTURE);
    assert!(!content.raw_amount_strings.is_empty());
    assert!(content.raw_amount_strings.iter().all(|s| !s.contains("999")));
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

#[test]
fn summarizes_structured_items() {
    let metrics = summarize(&fixture_record());

    assert_eq!(metrics.amount_source, AmountSourceKind::Structured);
    assert_eq!(metrics.section_count, 3);
    assert_eq!(metrics.financial_item_count, 3);
    assert_eq!(metrics.key_categories, ["Zorg", "Onderwijs"]);
    assert_eq!(metrics.category_totals["Zorg"], 45_500_000.0);
    assert_eq!(metrics.category_totals["Onderwijs"], 12_000_000.0);
    assert!(!metrics.category_totals.contains_key("Cultuur"));
    assert_eq!(metrics.budget_total, 57_500_000.0);
}

#[test]
fn topics_come_from_headings() {
    let metrics = summarize(&fixture_record());
    assert_eq!(
        metrics.key_topics,
        ["Voortgang", "Ontwikkeling", "Zorgbeleid", "Investeringen"]
    );
}

#[test]
fn table_lines_use_header_magnitude() {
    let metrics = summarize(&fixture_record());
    let lines: Vec<_> = metrics
        .table_budget_lines
        .iter()
        .map(|l| (l.category.as_str(), l.amount))
        .collect();
    assert_eq!(
        lines,
        [
            ("Zorg", 45_500_000.0),
            ("Onderwijs", 12_000_000.0),
            ("Wonen", 8_250_000.0)
        ]
    );
}

#[test]
fn summary_is_deterministic() {
    let record = fixture_record();
    assert_eq!(summarize(&record), summarize(&record));
}

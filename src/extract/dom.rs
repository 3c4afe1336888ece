//! DOM reading for the budget page.
//!
//! Turns rendered HTML into the structured parts of a [`PageRecord`]: content
//! sections, chart references, tagged financial items, meta information and a
//! page-wide list of amount strings. Everything here is synchronous and pure;
//! loading the page and capturing snapshots live in the parent module.
//!
//! [`PageRecord`]: crate::model::PageRecord

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::model::{ChartRef, FinancialItem, Figure, PageMeta, Section, Table};

/// Section-like content containers.
pub const SECTION_SELECTOR: &str = "section, div.section, div.content-block, article";
/// Chart-like elements whose `data-*` attributes are recorded.
pub const CHART_SELECTOR: &str = "[data-chart], .chart, .graph";
/// Elements captured as snapshot artifacts.
pub const SNAPSHOT_SELECTOR: &str = ".chart, [data-chart], .graph, .visualization, table";
/// Elements explicitly tagged as budget lines.
pub const FINANCIAL_SELECTOR: &str = ".financial, .budget, .finance, .amount, .money";

static SECTIONS: Lazy<Selector> = Lazy::new(|| selector(SECTION_SELECTOR));
static CHARTS: Lazy<Selector> = Lazy::new(|| selector(CHART_SELECTOR));
static FINANCIAL: Lazy<Selector> = Lazy::new(|| selector(FINANCIAL_SELECTOR));
static HEADINGS: Lazy<Selector> = Lazy::new(|| selector("h1, h2, h3, h4, h5"));
static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| selector("p"));
static LIST_ITEMS: Lazy<Selector> = Lazy::new(|| selector("li"));
static TABLES: Lazy<Selector> = Lazy::new(|| selector("table"));
static TH: Lazy<Selector> = Lazy::new(|| selector("th"));
static TR: Lazy<Selector> = Lazy::new(|| selector("tr"));
static TD: Lazy<Selector> = Lazy::new(|| selector("td"));
static FIGURES: Lazy<Selector> = Lazy::new(|| selector(".figure, figure, .data-visualization"));
static CAPTION: Lazy<Selector> = Lazy::new(|| selector("figcaption, .caption"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("body"));
static DATE_TEXT: Lazy<Selector> = Lazy::new(|| selector(".date, .published-date"));
static CATEGORY: Lazy<Selector> = Lazy::new(|| selector(".category, .title"));
static AMOUNT: Lazy<Selector> = Lazy::new(|| selector(".amount, .value"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(".description"));

/// Percentages and amounts mentioned inside a section.
static NUMERIC_MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+[.,]?[0-9]*\s?(?:%|miljoen|duizend|euro|€)").expect("valid mention pattern")
});

/// Amount-looking strings anywhere on the page.
static RAW_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"€\s?[0-9]+[.,]?[0-9]*|[0-9]+[.,]?[0-9]*\s?(?:miljoen|duizend|euro|€)")
        .expect("valid amount pattern")
});

/// Elements whose text is never visible.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that break text flow; their text is separated from neighbours.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// The structured content of one rendered page, before snapshots and
/// timestamping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub title: String,
    pub meta: PageMeta,
    pub sections: Vec<Section>,
    pub charts: Vec<ChartRef>,
    pub financial_items: Vec<FinancialItem>,
    pub raw_amount_strings: Vec<String>,
}

/// Read a rendered HTML document into [`PageContent`].
pub fn parse_page(html: &str) -> PageContent {
    let document = Html::parse_document(html);

    let title = first_document_text(&document, &TITLE);

    let sections = document
        .select(&SECTIONS)
        .map(read_section)
        .filter(Section::has_content)
        .collect();

    let charts = document.select(&CHARTS).map(read_chart).collect();

    let financial_items = document
        .select(&FINANCIAL)
        .map(read_financial_item)
        .filter(|item| !item.is_empty())
        .collect();

    let body_text = first_document_text(&document, &BODY);

    PageContent {
        title,
        meta: read_meta(&document),
        sections,
        charts,
        financial_items,
        raw_amount_strings: raw_amount_strings(&body_text),
    }
}

fn read_section(container: ElementRef<'_>) -> Section {
    let headings = texts(container, &HEADINGS).collect();
    let paragraphs = texts(container, &PARAGRAPHS).filter(|t| !t.is_empty()).collect();
    let list_items = texts(container, &LIST_ITEMS).filter(|t| !t.is_empty()).collect();
    let tables = container.select(&TABLES).map(read_table).collect();
    let figures = container.select(&FIGURES).map(read_figure).collect();

    Section {
        headings,
        paragraphs,
        list_items,
        tables,
        figures,
        numeric_mentions: numeric_mentions(&inner_text(container)),
    }
}

/// Header cells come from every `th`; rows are the `td` cells of each `tr`.
/// Rows without `td` cells (header rows) are left out.
fn read_table(table: ElementRef<'_>) -> Table {
    let headers = texts(table, &TH).collect();
    let rows = table
        .select(&TR)
        .map(|tr| texts(tr, &TD).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();
    Table { headers, rows }
}

fn read_figure(figure: ElementRef<'_>) -> Figure {
    Figure {
        caption: first_text(figure, &CAPTION),
        text: inner_text(figure),
    }
}

fn read_chart(chart: ElementRef<'_>) -> ChartRef {
    let element = chart.value();
    let data_attributes: BTreeMap<String, String> = element
        .attrs()
        .filter(|(name, _)| name.starts_with("data-"))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    ChartRef {
        id: element.id().unwrap_or_default().to_string(),
        class_name: element.attr("class").unwrap_or_default().to_string(),
        data_attributes,
        inner_text: inner_text(chart),
    }
}

fn read_financial_item(element: ElementRef<'_>) -> FinancialItem {
    FinancialItem {
        category: first_text(element, &CATEGORY),
        amount_text: first_text(element, &AMOUNT),
        description: first_text(element, &DESCRIPTION),
    }
}

fn read_meta(document: &Html) -> PageMeta {
    let mut date = meta_content(document, "date");
    if date.is_empty() {
        date = first_document_text(document, &DATE_TEXT);
    }

    PageMeta {
        description: meta_content(document, "description"),
        keywords: meta_content(document, "keywords"),
        author: meta_content(document, "author"),
        date,
    }
}

fn meta_content(document: &Html, name: &str) -> String {
    let Ok(sel) = Selector::parse(&format!(r#"meta[name="{name}"]"#)) else {
        return String::new();
    };
    document
        .select(&sel)
        .next()
        .and_then(|m| m.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

/// Numeric mentions (`12,5 %`, `€ 45 miljoen`, ...) in a container's text.
pub fn numeric_mentions(text: &str) -> Vec<String> {
    NUMERIC_MENTION_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Page-wide amount strings, used when no financial items are tagged.
pub fn raw_amount_strings(text: &str) -> Vec<String> {
    RAW_AMOUNT_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn texts<'a>(
    scope: ElementRef<'a>,
    selector: &'a Selector,
) -> impl Iterator<Item = String> + 'a {
    scope.select(selector).map(inner_text)
}

fn first_document_text(document: &Html, selector: &Selector) -> String {
    document.select(selector).next().map(inner_text).unwrap_or_default()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope.select(selector).next().map(inner_text).unwrap_or_default()
}

/// Visible text of an element with whitespace collapsed, approximating what a
/// browser reports as `innerText`.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if HIDDEN_TAGS.contains(&name) {
            continue;
        }
        let block = BLOCK_TAGS.contains(&name);
        if block {
            out.push(' ');
        }
        collect_text(child, out);
        if block {
            out.push(' ');
        }
    }
}

//! GitHub-flavored markdown tables.

/// A table rendered with a fixed header row.
#[derive(Debug, Clone, Default)]
pub struct MarkdownTable {
    pub headers: Vec<String>,
    /// Cell contents: `rows[row_idx][col_idx]`.
    pub rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Render as markdown. Short rows are padded with empty cells; an empty
    /// table renders as an empty string.
    pub fn to_markdown(&self) -> String {
        let col_count = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        if col_count == 0 || self.rows.is_empty() {
            return String::new();
        }

        let mut md = String::new();
        push_row(&mut md, &self.headers, col_count);

        md.push('|');
        for _ in 0..col_count {
            md.push_str(" --- |");
        }
        md.push('\n');

        for row in &self.rows {
            push_row(&mut md, row, col_count);
        }
        md
    }
}

fn push_row(md: &mut String, cells: &[String], col_count: usize) {
    md.push('|');
    for col in 0..col_count {
        let cell = cells.get(col).map(String::as_str).unwrap_or("");
        md.push(' ');
        // Pipes would split the cell.
        md.push_str(&cell.replace('|', "\\|"));
        md.push_str(" |");
    }
    md.push('\n');
}

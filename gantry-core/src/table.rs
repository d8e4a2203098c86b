//! Plain-text table rendering
//!
//! Renders the bordered tables printed by the CLI:
//!
//! ```text
//! +---------+-----------+
//! | Service | Instances |
//! +---------+-----------+
//! | mongodb | prod-db   |
//! | redis   |           |
//! +---------+-----------+
//! ```
//!
//! Column widths are measured in characters rather than bytes, so
//! multi-byte content lines up and truncation never splits a
//! character.

use std::collections::{BTreeSet, HashMap};

/// Collects the union of metadata keys across a set of records
///
/// The returned column names are sorted and deduplicated, so the same
/// records always produce the same column order.
pub fn dynamic_columns<'a, I>(infos: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a HashMap<String, String>>,
{
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for info in infos {
        for key in info.keys() {
            columns.insert(key);
        }
    }
    columns.into_iter().map(String::from).collect()
}

/// Extends a row of core cells with one cell per dynamic column
///
/// Records that lack a column contribute an empty cell, so every row
/// ends up with `core.len() + columns.len()` cells.
pub fn build_row(core: Vec<String>, info: &HashMap<String, String>, columns: &[String]) -> Vec<String> {
    let mut row = core;
    row.reserve(columns.len());
    for column in columns {
        row.push(info.get(column).cloned().unwrap_or_default());
    }
    row
}

/// Shortens a cell to `limit` characters, marking the cut with `...`
///
/// Cells at or under the limit come back unchanged, as does everything
/// when `disabled` is set. The count is in characters, so multi-byte
/// content is never split mid-character.
pub fn truncate(cell: &str, limit: usize, disabled: bool) -> String {
    if disabled || cell.chars().count() <= limit {
        return cell.to_string();
    }
    let mut truncated: String = cell.chars().take(limit).collect();
    truncated.push_str("...");
    truncated
}

/// A bordered plain-text table
///
/// Build one with [`Table::new`] and [`Table::add_row`], then print the
/// output of [`Table::render`] verbatim.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table with the given column headers and no rows
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

    /// Appends a row; cells line up positionally with the headers
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Sorts rows by the cell in `column`, preserving the insertion
    /// order of rows that compare equal
    ///
    /// Rows too short to have that column sort as if the cell were
    /// empty; an out-of-range column therefore leaves the row order
    /// untouched.
    pub fn sort_by_column(&mut self, column: usize) {
        self.rows.sort_by(|a, b| {
            let left = a.get(column).map(String::as_str).unwrap_or("");
            let right = b.get(column).map(String::as_str).unwrap_or("");
            left.cmp(right)
        });
    }

    /// Renders the bordered grid, ending with a trailing newline
    ///
    /// A table without rows renders just the header block; a table
    /// without headers renders as the empty string. Rendering never
    /// mutates the table, so repeated calls return identical output.
    pub fn render(&self) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let widths = self.column_widths();
        let separator = separator_line(&widths);
        let mut out = String::new();
        out.push_str(&separator);
        out.push_str(&format_line(&self.headers, &widths));
        out.push_str(&separator);
        for row in &self.rows {
            out.push_str(&format_line(row, &widths));
        }
        if !self.rows.is_empty() {
            out.push_str(&separator);
        }
        out
    }

    /// Width of each column in characters, covering header and cells
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                let len = cell.chars().count();
                if len > widths[i] {
                    widths[i] = len;
                }
            }
        }
        widths
    }
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        line.push_str(&format!(" {:<width$} |", cell, width = *width));
    }
    line.push('\n');
    line
}

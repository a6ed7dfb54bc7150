//! Text and JSON rendering of a browse view.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use roster_seeker::{export_row, BrowseView, Column, Dir, Record, SortSpec};

/// Widest a table cell is allowed to get before it is cut.
const MAX_CELL_WIDTH: usize = 40;

/// Plain-text table of the page, with the active sort marked in the header
/// and a footer with the record counts and page position.
pub fn table<T: Record>(view: &BrowseView<'_, T>, sort: &SortSpec, columns: &[Column]) -> String {
    let mut out = String::new();
    if view.is_empty() {
        let _ = writeln!(out, "{}", view.empty_message());
        let _ = writeln!(out, "{}", view.summary());
        return out;
    }

    let headers: Vec<String> = columns
        .iter()
        .map(|column| match (sort.field(), sort.dir()) {
            (Some(field), Dir::Asc) if field == column.field => format!("{} ↑", column.header),
            (Some(field), Dir::Desc) if field == column.field => format!("{} ↓", column.header),
            _ => column.header.clone(),
        })
        .collect();
    let rows: Vec<Vec<String>> = view
        .page
        .items
        .iter()
        .map(|item| {
            export_row(*item, columns, &T::accessor)
                .into_iter()
                .map(|cell| clip(&cell))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} · page {} of {}",
        view.summary(),
        view.page.number,
        view.page.total_pages
    );
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// Collapses line breaks and cuts long cells with an ellipsis.
fn clip(cell: &str) -> String {
    let flat: String = cell
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[derive(Serialize)]
struct JsonPage<'v, T> {
    page: usize,
    total_pages: usize,
    page_size: usize,
    matched: usize,
    total: usize,
    items: &'v [&'v T],
}

/// The page and its counts as pretty-printed JSON.
pub fn json<T: Serialize>(view: &BrowseView<'_, T>) -> Result<String> {
    let page = JsonPage {
        page: view.page.number,
        total_pages: view.page.total_pages,
        page_size: view.page.page_size,
        matched: view.matched,
        total: view.total,
        items: &view.page.items,
    };
    serde_json::to_string_pretty(&page).context("serializing page json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_seeker::{BrowseState, FilterSpec, SearchScope, Value};

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        note: Option<&'static str>,
    }

    impl Record for Row {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(self.name),
                "note" => self.note.map_or(Value::None, Value::String),
                _ => Value::None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Bob", note: Some("line one\nline two") },
            Row { name: "Ann", note: None },
        ]
    }

    fn columns() -> [Column; 2] {
        [Column::new("name", "Name"), Column::new("note", "Note")]
    }

    #[test]
    fn table_marks_sort_and_fills_gaps() {
        let rows = rows();
        let state = BrowseState::default().toggle_sort("name");
        let view = state
            .view(&rows, &SearchScope::new(["name"]), Row::accessor)
            .unwrap();

        let text = table(&view, state.sort(), &columns());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name ↑  Note");
        assert_eq!(lines[1], "------  -----------------");
        assert_eq!(lines[2], "Ann     N/A");
        assert_eq!(lines[3], "Bob     line one line two");
        assert_eq!(lines[5], "Showing 2 of 2 records · page 1 of 1");
    }

    #[test]
    fn empty_table_explains_why() {
        let rows = rows();
        let state = BrowseState::default().with_filter(FilterSpec::new().search("zed"));
        let view = state
            .view(&rows, &SearchScope::new(["name"]), Row::accessor)
            .unwrap();

        let text = table(&view, state.sort(), &columns());
        assert_eq!(
            text,
            "No records match your filters\nShowing 0 of 2 records\n"
        );
    }

    #[test]
    fn long_cells_are_clipped() {
        let long = "x".repeat(60);
        let clipped = clip(&long);
        assert_eq!(clipped.chars().count(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn json_carries_counts() {
        let rows = rows();
        let view = BrowseState::new(1)
            .unwrap()
            .with_page(2)
            .view(&rows, &SearchScope::default(), Row::accessor)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json(&view).unwrap()).unwrap();
        assert_eq!(parsed["page"], 2);
        assert_eq!(parsed["total_pages"], 2);
        assert_eq!(parsed["matched"], 2);
        assert_eq!(parsed["items"][0]["name"], "Ann");
        assert!(parsed["items"][0]["note"].is_null());
    }
}

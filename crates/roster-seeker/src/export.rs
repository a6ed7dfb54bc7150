//! Delimited-text export of the current view.
//!
//! Every cell is double-quoted so embedded commas, quotes and newlines
//! survive; quotes inside a cell are doubled. Missing values become
//! [`MISSING_PLACEHOLDER`].

use chrono::NaiveDate;

use crate::error::{Result, SeekerError};
use crate::value::Value;

/// Text written for a missing or empty cell.
pub const MISSING_PLACEHOLDER: &str = "N/A";

/// One exported column: the record field and its header label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: String,
    pub header: String,
}

impl Column {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Column {
            field: field.into(),
            header: header.into(),
        }
    }
}

/// Flattens one record into display strings, in column order.
pub fn export_row<T, F>(item: &T, columns: &[Column], accessor: &F) -> Vec<String>
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    columns
        .iter()
        .map(|column| {
            accessor(item, column.field.as_str())
                .render()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string())
        })
        .collect()
}

/// Renders `items` as CSV text: a header line, then one line per record.
///
/// ```
/// use roster_seeker::{to_delimited_text, Column, Value};
///
/// fn accessor<'a>(row: &'a (String, Option<String>), field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&row.0),
///         "email" => Value::from(&row.1),
///         _ => Value::None,
///     }
/// }
///
/// let rows = vec![
///     ("Ann \"the hat\"".to_string(), Some("ann@corp.io".to_string())),
///     ("Bob".to_string(), None),
/// ];
/// let columns = [Column::new("name", "Name"), Column::new("email", "Email")];
///
/// let text = to_delimited_text(&rows, &columns, accessor).unwrap();
/// assert_eq!(
///     text,
///     "\"Name\",\"Email\"\n\"Ann \"\"the hat\"\"\",\"ann@corp.io\"\n\"Bob\",\"N/A\"\n"
/// );
/// ```
pub fn to_delimited_text<'a, T, I, F>(items: I, columns: &[Column], accessor: F) -> Result<String>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| column.header.as_str()))?;

    let mut rows = 0usize;
    for item in items {
        writer.write_record(export_row(item, columns, &accessor))?;
        rows += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| SeekerError::Export(err.to_string()))?;
    tracing::debug!(rows, columns = columns.len(), "exported records");
    String::from_utf8(bytes).map_err(|err| SeekerError::Export(err.to_string()))
}

/// Conventional export file name: `<stem>_<YYYY-MM-DD>.csv`.
pub fn export_file_name(stem: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", stem, date.format("%Y-%m-%d"))
}

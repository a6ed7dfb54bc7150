use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use roster_seeker::{
    distinct_values, export_file_name, to_delimited_text, BrowseState, FieldValue, FilterSpec,
    Record, Value,
};

use crate::config::RosterConfig;
use crate::records::{AuditLog, Browsable, Candidate, CandidateScore, RecordKind};
use crate::render;

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON dump of the table, as returned by the backend
    pub input: PathBuf,
    /// Which table the dump holds
    #[arg(long, value_enum, default_value = "candidates")]
    pub kind: RecordKind,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text searched in the table's text fields
    #[arg(long)]
    pub search: Option<String>,
    /// Exact match on one field, written field=value
    #[arg(long)]
    pub category: Option<String>,
    /// Keep records on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,
    /// Keep records on or before this day (YYYY-MM-DD), inclusive of the whole day
    #[arg(long)]
    pub until: Option<String>,
    /// Click a column header; repeat to flip the direction
    #[arg(long = "sort", value_name = "FIELD")]
    pub sort: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Page to show (clamped to the available pages)
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Records per page (defaults to the config value)
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Print the page as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Output file (defaults to <table>_<date>.csv in the export directory)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ValuesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Field whose distinct values are listed
    pub field: String,
}

/// Renders one page of the filtered, sorted table.
pub fn list(config: &RosterConfig, args: &ListArgs) -> Result<String> {
    let text = read_source(&args.source.input)?;
    match args.source.kind {
        RecordKind::Candidates => list_records::<Candidate>(&text, config, args),
        RecordKind::Scores => list_records::<CandidateScore>(&text, config, args),
        RecordKind::AuditLogs => list_records::<AuditLog>(&text, config, args),
    }
}

/// Writes the filtered, sorted table as CSV and returns the file written.
pub fn export(config: &RosterConfig, args: &ExportArgs, today: NaiveDate) -> Result<PathBuf> {
    let text = read_source(&args.source.input)?;
    match args.source.kind {
        RecordKind::Candidates => export_records::<Candidate>(&text, config, args, today),
        RecordKind::Scores => export_records::<CandidateScore>(&text, config, args, today),
        RecordKind::AuditLogs => export_records::<AuditLog>(&text, config, args, today),
    }
}

/// Lists the distinct values of a field, one per line, in first-seen order.
pub fn values(args: &ValuesArgs) -> Result<String> {
    let text = read_source(&args.source.input)?;
    let values = match args.source.kind {
        RecordKind::Candidates => field_values::<Candidate>(&text, &args.field)?,
        RecordKind::Scores => field_values::<CandidateScore>(&text, &args.field)?,
        RecordKind::AuditLogs => field_values::<AuditLog>(&text, &args.field)?,
    };
    Ok(values.into_iter().map(|v| v + "\n").collect())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading records {}", path.display()))
}

fn parse_records<T: Browsable>(text: &str) -> Result<Vec<T>> {
    let records = T::parse_collection(text).context("parsing records json")?;
    tracing::info!(records = records.len(), "loaded records");
    Ok(records)
}

fn list_records<T: Browsable>(text: &str, config: &RosterConfig, args: &ListArgs) -> Result<String> {
    let records: Vec<T> = parse_records(text)?;
    let page_size = args.page_size.unwrap_or(config.page_size);
    let state = browse_state(&records, &args.filter, page_size)?.with_page(args.page);

    let view = state.view(&records, &T::scope(), T::accessor)?;
    if args.json {
        render::json(&view)
    } else {
        Ok(render::table(&view, state.sort(), &T::columns()))
    }
}

fn export_records<T: Browsable>(
    text: &str,
    config: &RosterConfig,
    args: &ExportArgs,
    today: NaiveDate,
) -> Result<PathBuf> {
    let records: Vec<T> = parse_records(text)?;
    let state = browse_state(&records, &args.filter, config.page_size)?;
    let visible = state.visible(&records, &T::scope(), T::accessor);
    let rows = visible.len();
    let csv = to_delimited_text(visible, &T::columns(), T::accessor)?;

    let path = match &args.out {
        Some(path) => path.clone(),
        None => {
            let name = export_file_name(T::EXPORT_STEM, today);
            match &config.export_dir {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&path, csv).with_context(|| format!("writing export {}", path.display()))?;
    tracing::info!(rows, path = %path.display(), "exported records");
    Ok(path)
}

fn field_values<T: Browsable>(text: &str, field: &str) -> Result<Vec<String>> {
    let records: Vec<T> = parse_records(text)?;
    Ok(distinct_values(&records, field, T::accessor))
}

/// Builds the browse state the flags describe. Each `--sort` is one header
/// click, so naming a field twice sorts it descending.
fn browse_state<T: Record>(
    records: &[T],
    args: &FilterArgs,
    page_size: usize,
) -> Result<BrowseState> {
    let mut state = BrowseState::new(page_size)?.with_filter(filter_spec(records, args)?);
    for field in &args.sort {
        state = state.toggle_sort(field);
    }
    Ok(state)
}

fn filter_spec<T: Record>(records: &[T], args: &FilterArgs) -> Result<FilterSpec> {
    let mut spec = FilterSpec::new();
    if let Some(term) = &args.search {
        spec = spec.search(term.as_str());
    }
    if let Some(raw) = &args.category {
        let (field, value) = raw
            .split_once('=')
            .with_context(|| format!("category filter `{raw}` must look like field=value"))?;
        let field = field.trim();
        spec = spec.category(field, category_value(records, field, value.trim()));
    }
    if let Some(since) = &args.since {
        spec = spec.parse_since(since)?;
    }
    if let Some(until) = &args.until {
        spec = spec.parse_until(until)?;
    }
    Ok(spec)
}

/// Category text typed on the command line, converted to the type the field
/// holds in the data so that numeric and boolean columns can match.
fn category_value<T: Record>(records: &[T], field: &str, raw: &str) -> FieldValue {
    let sample = records
        .iter()
        .map(|record| record.field_value(field))
        .find(|value| !value.is_none());
    match sample {
        Some(Value::Number(_)) => raw
            .parse::<i64>()
            .map(FieldValue::from)
            .or_else(|_| raw.parse::<f64>().map(FieldValue::from))
            .unwrap_or_else(|_| FieldValue::from(raw)),
        Some(Value::Bool(_)) => raw
            .parse::<bool>()
            .map(FieldValue::from)
            .unwrap_or_else(|_| FieldValue::from(raw)),
        _ => FieldValue::from(raw),
    }
}

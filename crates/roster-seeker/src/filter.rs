//! The record filter chain.
//!
//! A [`FilterSpec`] holds up to three criteria: a free-text search term, a
//! categorical equality and an inclusive date range. A record passes when
//! every active criterion accepts it:
//!
//! ```text
//! match = (no search term, OR the term occurs in any searchable field)
//!       ∧ (no category,    OR record[field] == value)
//!       ∧ (no date bound,  OR from ≤ record[date_field] ≤ to)
//! ```
//!
//! Which fields are searched, and which one holds the date, depends on the
//! record shape and is supplied separately as a [`SearchScope`].

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::{Result, SeekerError};
use crate::value::{Number, Timestamp, Value};

/// Field names the filter chain consults for one record shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchScope {
    /// Textual fields searched by the free-text term (OR-combined).
    pub fields: Vec<String>,
    /// Timestamp field the date range applies to.
    pub date_field: Option<String>,
}

impl SearchScope {
    /// Creates a scope searching the given fields, with no date field.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchScope {
            fields: fields.into_iter().map(Into::into).collect(),
            date_field: None,
        }
    }

    /// Sets the field the date range is applied to.
    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }
}

/// Owned value a categorical criterion compares against.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(Number),
    Bool(bool),
}

impl FieldValue {
    /// Exact equality with a record value. Mismatched types never match.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (FieldValue::String(expected), Value::String(actual)) => expected == actual,
            (FieldValue::Number(expected), Value::Number(actual)) => {
                actual.compare(*expected) == Some(std::cmp::Ordering::Equal)
            }
            (FieldValue::Bool(expected), Value::Bool(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Number> for FieldValue {
    fn from(n: Number) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(Number::I64(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(Number::F64(n))
    }
}

/// Exact-match criterion on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub field: String,
    pub value: FieldValue,
}

/// Inclusive time window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl DateRange {
    /// Returns `true` if at least one bound is set.
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Returns `true` if `ts` lies within every present bound.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.from.map_or(true, |from| from <= ts) && self.to.map_or(true, |to| ts <= to)
    }
}

/// Immutable description of the active filter criteria.
///
/// ```
/// use roster_seeker::{FilterSpec, SearchScope, Value};
///
/// struct Log { action: &'static str, user_email: &'static str, details: &'static str }
///
/// fn accessor<'a>(log: &'a Log, field: &str) -> Value<'a> {
///     match field {
///         "action" => Value::String(log.action),
///         "user_email" => Value::String(log.user_email),
///         "details" => Value::String(log.details),
///         _ => Value::None,
///     }
/// }
///
/// let logs = [
///     Log { action: "LOGIN", user_email: "admin@corp.io", details: "" },
///     Log { action: "LOGIN", user_email: "ann@corp.io", details: "" },
///     Log { action: "UPLOAD_CV", user_email: "admin@corp.io", details: "" },
/// ];
///
/// let spec = FilterSpec::new().search("ADMIN").category("action", "LOGIN");
/// let scope = SearchScope::new(["user_email", "details"]);
/// let hits = spec.apply(&logs, &scope, accessor);
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    search: Option<String>,
    category: Option<Category>,
    range: DateRange,
}

impl FilterSpec {
    /// Creates a spec with no active criteria. It matches everything.
    pub fn new() -> Self {
        FilterSpec::default()
    }

    /// Sets the free-text term. A blank term clears the criterion.
    ///
    /// Whitespace-only counts as blank, unlike the dashboard's search box
    /// which treats `" "` as a term to look for.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    /// Requires `field` to equal `value` exactly.
    pub fn category(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.category = Some(Category {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Removes the categorical criterion (the "all" option).
    pub fn any_category(mut self) -> Self {
        self.category = None;
        self
    }

    /// Sets the inclusive lower bound to the start of `date`.
    pub fn since(mut self, date: NaiveDate) -> Self {
        self.range.from = Some(Timestamp::start_of_day(date));
        self
    }

    /// Sets the inclusive upper bound to the end of `date`.
    pub fn until(mut self, date: NaiveDate) -> Self {
        self.range.to = Some(Timestamp::end_of_day(date));
        self
    }

    /// Sets the lower bound from `YYYY-MM-DD` text; blank text clears it.
    pub fn parse_since(self, text: &str) -> Result<Self> {
        match parse_date_bound(text)? {
            Some(date) => Ok(self.since(date)),
            None => Ok(FilterSpec {
                range: DateRange {
                    from: None,
                    ..self.range
                },
                ..self
            }),
        }
    }

    /// Sets the upper bound from `YYYY-MM-DD` text; blank text clears it.
    pub fn parse_until(self, text: &str) -> Result<Self> {
        match parse_date_bound(text)? {
            Some(date) => Ok(self.until(date)),
            None => Ok(FilterSpec {
                range: DateRange {
                    to: None,
                    ..self.range
                },
                ..self
            }),
        }
    }

    /// Sets both bounds as exact instants.
    pub fn between(mut self, from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        self.range = DateRange { from, to };
        self
    }

    /// A spec with every criterion removed.
    pub fn cleared(&self) -> Self {
        FilterSpec::default()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn category_criterion(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn date_range(&self) -> DateRange {
        self.range
    }

    /// Returns `true` if any criterion is active.
    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.category.is_some() || self.range.is_active()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Returns `true` if `item` passes every active criterion.
    pub fn matches<T, F>(&self, item: &T, scope: &SearchScope, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        Matcher::new(self, scope).matches(item, &accessor)
    }

    /// Narrows `items` to the matching records, preserving input order.
    pub fn apply<'a, T, F>(&self, items: &'a [T], scope: &SearchScope, accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        if !self.is_active() {
            return items.iter().collect();
        }

        let matcher = Matcher::new(self, scope);
        let matched: Vec<&'a T> = items
            .iter()
            .filter(|item| matcher.matches(*item, &accessor))
            .collect();

        tracing::debug!(
            total = items.len(),
            matched = matched.len(),
            search = ?self.search,
            "applied record filter"
        );
        matched
    }

    /// Counts the matching records.
    pub fn count<T, F>(&self, items: &[T], scope: &SearchScope, accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let matcher = Matcher::new(self, scope);
        items
            .iter()
            .filter(|item| matcher.matches(*item, &accessor))
            .count()
    }
}

fn parse_date_bound(text: &str) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|source| SeekerError::InvalidDate {
            input: text.to_string(),
            source,
        })
}

/// A spec bound to a scope, with the search term lower-cased once.
struct Matcher<'s> {
    needle: Option<String>,
    category: Option<&'s Category>,
    range: DateRange,
    scope: &'s SearchScope,
}

impl<'s> Matcher<'s> {
    fn new(spec: &'s FilterSpec, scope: &'s SearchScope) -> Self {
        Matcher {
            needle: spec.search.as_deref().map(str::to_lowercase),
            category: spec.category.as_ref(),
            range: spec.range,
            scope,
        }
    }

    fn matches<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.matches_search(item, accessor)
            && self.matches_category(item, accessor)
            && self.matches_range(item, accessor)
    }

    fn matches_search<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let Some(needle) = &self.needle else {
            return true;
        };
        self.scope.fields.iter().any(|field| {
            accessor(item, field.as_str())
                .as_str()
                .is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
        })
    }

    fn matches_category<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        match self.category {
            Some(category) => category.value.matches(&accessor(item, category.field.as_str())),
            None => true,
        }
    }

    fn matches_range<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        if !self.range.is_active() {
            return true;
        }
        let Some(date_field) = &self.scope.date_field else {
            return true;
        };
        accessor(item, date_field.as_str())
            .to_timestamp()
            .is_some_and(|ts| self.range.contains(ts))
    }
}

/// Distinct rendered values of `field`, in first-seen order.
///
/// Missing and empty values are skipped. This feeds the options of a
/// categorical selector.
pub fn distinct_values<T, F>(items: &[T], field: &str, accessor: F) -> Vec<String>
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| accessor(item, field).render())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

//! Sorting: the active sort key, its direction, and the stable sort itself.
//!
//! At most one field is active at a time. The comparator is picked per sort
//! from the values actually present in the column:
//!
//! | Column contents | Compared by |
//! |-----------------|-------------|
//! | numbers | magnitude |
//! | lists | length |
//! | timestamps | chronological order |
//! | booleans | `false < true` |
//! | text | code-point order |
//! | a mix of the above | textual representation |
//!
//! Missing values (and NaN) always sort after every present value, whatever
//! the direction.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::value::{Kind, Number, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// The opposite direction.
    pub fn flipped(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable description of the active sort.
///
/// ```
/// use roster_seeker::{Dir, SortSpec};
///
/// let spec = SortSpec::new().toggle("score");
/// assert_eq!(spec.field(), Some("score"));
/// assert_eq!(spec.dir(), Dir::Asc);
///
/// // Same field again flips the direction
/// assert_eq!(spec.toggle("score").dir(), Dir::Desc);
///
/// // A different field starts ascending
/// assert_eq!(spec.toggle("score").toggle("name").dir(), Dir::Asc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    field: Option<String>,
    dir: Dir,
}

impl SortSpec {
    /// No active sort: records keep their input order.
    pub fn new() -> Self {
        SortSpec::default()
    }

    /// Sorts by `field` in the given direction.
    pub fn by(field: impl Into<String>, dir: Dir) -> Self {
        SortSpec {
            field: Some(field.into()),
            dir,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn is_active(&self) -> bool {
        self.field.is_some()
    }

    /// The spec after a click on the `field` header.
    ///
    /// Flips the direction if `field` is already active, otherwise makes it
    /// the active field in ascending order.
    pub fn toggle(&self, field: &str) -> SortSpec {
        if self.field() == Some(field) {
            SortSpec {
                field: self.field.clone(),
                dir: self.dir.flipped(),
            }
        } else {
            SortSpec::by(field, Dir::Asc)
        }
    }

    /// Stable-sorts borrowed records by the active field.
    ///
    /// Without an active field the input order is returned unchanged.
    pub fn sort<'a, T, F>(&self, items: Vec<&'a T>, accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let Some(field) = self.field() else {
            return items;
        };

        let values: Vec<Value<'a>> = items.iter().map(|item| accessor(*item, field)).collect();
        let mode = column_mode(&values);

        let mut keyed: Vec<(SortKey<'a>, &'a T)> = values
            .into_iter()
            .map(|value| SortKey::new(value, mode))
            .zip(items)
            .collect();

        // Vec::sort_by is stable, so equal keys keep their input order.
        keyed.sort_by(|(a, _), (b, _)| a.compare(b, self.dir));

        tracing::trace!(field, dir = %self.dir, ?mode, count = keyed.len(), "sorted records");
        keyed.into_iter().map(|(_, item)| item).collect()
    }

    /// Convenience wrapper sorting a whole slice.
    pub fn sort_slice<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.sort(items.iter().collect(), accessor)
    }
}

/// How the keys of one column are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnMode {
    /// Nothing present; every key is missing.
    Empty,
    Integer,
    Float,
    Timestamp,
    Bool,
    Length,
    Text,
}

fn column_mode(values: &[Value<'_>]) -> ColumnMode {
    let kinds: HashSet<Kind> = values
        .iter()
        .filter(|value| !is_missing(value))
        .filter_map(Value::kind)
        .collect();

    if kinds.len() > 1 {
        return ColumnMode::Text;
    }
    match kinds.into_iter().next() {
        None => ColumnMode::Empty,
        Some(Kind::Number) => {
            let all_integral = values
                .iter()
                .filter_map(Value::as_number)
                .all(|n| !matches!(n, Number::F64(_)));
            if all_integral {
                ColumnMode::Integer
            } else {
                ColumnMode::Float
            }
        }
        Some(Kind::Timestamp) => ColumnMode::Timestamp,
        Some(Kind::Bool) => ColumnMode::Bool,
        Some(Kind::List) => ColumnMode::Length,
        Some(Kind::String) => ColumnMode::Text,
    }
}

fn is_missing(value: &Value<'_>) -> bool {
    match value {
        Value::None => true,
        Value::Number(n) => n.is_nan(),
        _ => false,
    }
}

/// A precomputed, totally ordered sort key.
#[derive(Debug, Clone, PartialEq)]
enum SortKey<'a> {
    Missing,
    Integer(i128),
    Float(f64),
    Timestamp(i64),
    Bool(bool),
    Length(usize),
    Text(Cow<'a, str>),
}

impl<'a> SortKey<'a> {
    fn new(value: Value<'a>, mode: ColumnMode) -> Self {
        if is_missing(&value) {
            return SortKey::Missing;
        }
        match (mode, value) {
            (ColumnMode::Integer, Value::Number(Number::I64(n))) => SortKey::Integer(n as i128),
            (ColumnMode::Integer, Value::Number(Number::U64(n))) => SortKey::Integer(n as i128),
            // Adding 0.0 folds -0.0 into 0.0 so equal magnitudes tie under total_cmp
            (ColumnMode::Float, Value::Number(n)) => SortKey::Float(n.to_f64() + 0.0),
            (ColumnMode::Timestamp, Value::Timestamp(t)) => SortKey::Timestamp(t.as_millis()),
            (ColumnMode::Bool, Value::Bool(b)) => SortKey::Bool(b),
            (ColumnMode::Length, Value::List(items)) => SortKey::Length(items.len()),
            (ColumnMode::Text, Value::String(s)) => SortKey::Text(Cow::Borrowed(s)),
            (ColumnMode::Text, other) => other
                .render()
                .map_or(SortKey::Missing, |text| SortKey::Text(Cow::Owned(text))),
            _ => SortKey::Missing,
        }
    }

    fn compare(&self, other: &SortKey<'a>, dir: Dir) -> Ordering {
        let ordering = match (self, other) {
            (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
            (SortKey::Missing, _) => return Ordering::Greater,
            (_, SortKey::Missing) => return Ordering::Less,
            (SortKey::Integer(a), SortKey::Integer(b)) => a.cmp(b),
            (SortKey::Float(a), SortKey::Float(b)) => a.total_cmp(b),
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Length(a), SortKey::Length(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // One mode per column, so keys of different shapes never meet.
            _ => Ordering::Equal,
        };
        dir.apply(ordering)
    }
}

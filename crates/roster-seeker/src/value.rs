//! Runtime value types for field access.
//!
//! The [`Value`] enum represents the value of a single record field at the
//! time the pipeline runs. Records hand these out through an accessor (see
//! [`Record`](crate::Record)); the filter chain, the sort comparator and the
//! export sink only ever look at records through this type.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Runtime value of a record field, borrowed from the source record.
///
/// # Example
///
/// ```
/// use roster_seeker::{Value, Number};
///
/// struct Candidate {
///     name: String,
///     years_of_experience: u32,
///     skills: Vec<String>,
/// }
///
/// fn accessor<'a>(c: &'a Candidate, field: &str) -> Value<'a> {
///     match field {
///         "name" => Value::String(&c.name),
///         "years_of_experience" => Value::Number(Number::from(c.years_of_experience)),
///         "skills" => Value::List(&c.skills),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Point in time.
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// Ordered sequence of text, e.g. a skills list.
    List(&'a [String]),
    /// Field not present, null, or unsupported.
    None,
}

/// The shape of a [`Value`], used to pick a comparator for a sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Timestamp,
    Bool,
    List,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns the kind of a present value, `None` for a missing one.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::String(_) => Some(Kind::String),
            Value::Number(_) => Some(Kind::Number),
            Value::Timestamp(_) => Some(Kind::Timestamp),
            Value::Bool(_) => Some(Kind::Bool),
            Value::List(_) => Some(Kind::List),
            Value::None => None,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the list value, if present.
    pub fn as_list(&self) -> Option<&'a [String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Reads the value as a point in time.
    ///
    /// Timestamp values are returned as is; text values are parsed with
    /// [`Timestamp::parse`]. Anything else, including unparseable text,
    /// yields `None`.
    pub fn to_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            Value::String(s) => Timestamp::parse(s),
            _ => None,
        }
    }

    /// Renders the value as display text, or `None` when it is missing.
    ///
    /// Lists are joined with `", "` and timestamps use RFC 3339 in UTC.
    pub fn render(&self) -> Option<String> {
        match self {
            Value::String(s) => Some((*s).to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Timestamp(t) => Some(t.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::List(items) => Some(items.join(", ")),
            Value::None => None,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a Option<String>> for Value<'a> {
    fn from(s: &'a Option<String>) -> Self {
        s.as_deref().map_or(Value::None, Value::String)
    }
}

/// Numeric value supporting all common numeric types.
///
/// Integers keep their exact representation; comparisons between different
/// variants go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` for a NaN float.
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Compares two numbers by magnitude, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::I64(a), Number::U64(b)) => Some((a as i128).cmp(&(b as i128))),
            (Number::U64(a), Number::I64(b)) => Some((a as i128).cmp(&(b as i128))),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Point in time, stored as milliseconds since the Unix epoch (UTC).
///
/// ```
/// use roster_seeker::Timestamp;
///
/// let ts = Timestamp::parse("2024-03-01T09:30:00Z").unwrap();
/// assert_eq!(ts.to_string(), "2024-03-01T09:30:00Z");
/// assert!(Timestamp::parse("not a date").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns the timestamp as milliseconds since the Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// First instant of `date`, UTC.
    pub fn start_of_day(date: NaiveDate) -> Self {
        date.and_time(chrono::NaiveTime::MIN).and_utc().into()
    }

    /// Last millisecond of `date`, UTC.
    pub fn end_of_day(date: NaiveDate) -> Self {
        Timestamp(Self::start_of_day(date).0 + 86_400_000 - 1)
    }

    /// Parses ISO-8601 text.
    ///
    /// Accepts RFC 3339 with an offset, a naive `YYYY-MM-DDTHH:MM:SS[.fff]`
    /// (with `T` or a space, read as UTC), or a bare `YYYY-MM-DD` (start of
    /// day). Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc).into());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(naive.and_utc().into());
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Self::start_of_day)
    }

    /// Converts back to a `chrono` UTC datetime.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp_millis())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

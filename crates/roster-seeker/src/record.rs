//! The field-access abstraction every record shape implements.

use crate::value::Value;

/// A record the pipeline can filter, sort and export.
///
/// The only thing the pipeline needs from a record is field access by name.
/// Unknown fields return [`Value::None`].
///
/// ```
/// use roster_seeker::{Record, Value, Number};
///
/// struct AuditLog {
///     id: u64,
///     action: String,
///     user_email: Option<String>,
/// }
///
/// impl Record for AuditLog {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "id" => Value::Number(Number::from(self.id)),
///             "action" => Value::String(&self.action),
///             "user_email" => Value::from(&self.user_email),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let log = AuditLog { id: 7, action: "LOGIN".into(), user_email: None };
/// assert_eq!(log.field_value("action"), Value::String("LOGIN"));
/// assert!(log.field_value("user_email").is_none());
/// assert_eq!(log.record_id(), Value::Number(Number::U64(7)));
/// ```
pub trait Record {
    /// Returns the value of `field`, or [`Value::None`] if there is none.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// The stable identity of the record. Defaults to the `id` field.
    fn record_id(&self) -> Value<'_> {
        self.field_value("id")
    }

    /// Accessor function suitable for the pipeline entry points.
    ///
    /// ```ignore
    /// let page = state.view(&logs, &scope, AuditLog::accessor)?;
    /// ```
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

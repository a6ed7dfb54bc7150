//! Roster seeker - filter, sort, paginate and export in-memory record
//! collections.
//!
//! The crate is the record browser behind the candidate list, the ranking
//! results table and the audit-log report. It is generic over the record
//! shape: anything that can hand out field values by name (through the
//! [`Record`] trait or a plain accessor function) can be browsed.
//!
//! - **Filter chain**: free-text search over chosen fields, categorical
//!   equality, inclusive date range; all AND-combined
//! - **Sorting**: one active field, toggleable direction, stable, with
//!   type-aware comparators (numbers by magnitude, lists by length)
//! - **Pagination**: fixed-size windows with page-number clamping
//! - **Export**: the current view as quoted CSV text
//!
//! # Quick Start
//!
//! ```rust
//! use roster_seeker::{BrowseState, Column, FilterSpec, Number, SearchScope, Value};
//!
//! struct Candidate {
//!     name: String,
//!     email: Option<String>,
//!     years_of_experience: u32,
//!     skills: Vec<String>,
//! }
//!
//! fn accessor<'a>(c: &'a Candidate, field: &str) -> Value<'a> {
//!     match field {
//!         "name" => Value::String(&c.name),
//!         "email" => Value::from(&c.email),
//!         "years_of_experience" => Value::Number(Number::from(c.years_of_experience)),
//!         "skills" => Value::List(&c.skills),
//!         _ => Value::None,
//!     }
//! }
//!
//! let candidates = vec![
//!     Candidate {
//!         name: "Ann Lee".into(),
//!         email: Some("ann@corp.io".into()),
//!         years_of_experience: 4,
//!         skills: vec!["Rust".into(), "SQL".into()],
//!     },
//!     Candidate {
//!         name: "Bob Ray".into(),
//!         email: None,
//!         years_of_experience: 9,
//!         skills: vec!["Go".into()],
//!     },
//! ];
//!
//! let scope = SearchScope::new(["name", "email"]);
//! let state = BrowseState::default()
//!     .with_filter(FilterSpec::new().search("ray"))
//!     .toggle_sort("skills");
//!
//! let view = state.view(&candidates, &scope, accessor).unwrap();
//! assert_eq!(view.page.items.len(), 1);
//! assert_eq!(view.page.items[0].name, "Bob Ray");
//!
//! let columns = [Column::new("name", "Name"), Column::new("email", "Email")];
//! let csv = roster_seeker::to_delimited_text(
//!     state.visible(&candidates, &scope, accessor),
//!     &columns,
//!     accessor,
//! )
//! .unwrap();
//! assert_eq!(csv, "\"Name\",\"Email\"\n\"Bob Ray\",\"N/A\"\n");
//! ```
//!
//! # Failure semantics
//!
//! Malformed data never raises: a missing or unparseable value fails to
//! match a filter and sorts after every valid value. Empty results and
//! out-of-range page numbers are ordinary outcomes. The only errors are
//! caller misconfiguration (a zero page size, a malformed date bound) and a
//! failing CSV writer; see [`SeekerError`].

mod error;
mod export;
mod filter;
mod ordering;
mod record;
mod value;
mod view;

// Re-export public API
pub use error::{Result, SeekerError};
pub use export::{export_file_name, export_row, to_delimited_text, Column, MISSING_PLACEHOLDER};
pub use filter::{distinct_values, Category, DateRange, FieldValue, FilterSpec, SearchScope};
pub use ordering::{Dir, SortSpec};
pub use record::Record;
pub use value::{Kind, Number, Timestamp, Value};
pub use view::{paginate, total_pages, BrowseState, BrowseView, Page, DEFAULT_PAGE_SIZE};

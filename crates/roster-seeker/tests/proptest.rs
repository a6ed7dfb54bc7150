//! Property-based tests for the record pipeline using proptest.

use proptest::prelude::*;
use roster_seeker::{
    paginate, to_delimited_text, Column, Dir, FilterSpec, Number, SearchScope, SortSpec, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    id: usize,
    name: String,
    action: String,
    score: i64,
    tags: Vec<String>,
}

fn accessor<'a>(entry: &'a Entry, field: &str) -> Value<'a> {
    match field {
        "id" => Value::Number(Number::from(entry.id)),
        "name" => Value::String(&entry.name),
        "action" => Value::String(&entry.action),
        "score" => Value::Number(Number::I64(entry.score)),
        "tags" => Value::List(&entry.tags),
        _ => Value::None,
    }
}

fn scope() -> SearchScope {
    SearchScope::new(["name", "action"])
}

// Entries get their position as id, so relative order is observable.
fn entries_strategy(max: usize) -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(
        (
            "[a-zA-Z]{1,8}",
            prop::sample::select(vec!["LOGIN", "UPLOAD_CV", "RUN_RANKING"]),
            -5i64..5,
            prop::collection::vec("[a-z]{1,4}", 0..4),
        ),
        0..max,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(id, (name, action, score, tags))| Entry {
                id,
                name,
                action: action.to_string(),
                score,
                tags,
            })
            .collect()
    })
}

fn spec_strategy() -> impl Strategy<Value = FilterSpec> {
    (
        prop::option::of("[a-zA-Z]{0,2}"),
        prop::option::of(prop::sample::select(vec!["LOGIN", "UPLOAD_CV"])),
    )
        .prop_map(|(term, action)| {
            let mut spec = FilterSpec::new();
            if let Some(term) = term {
                spec = spec.search(term);
            }
            if let Some(action) = action {
                spec = spec.category("action", action);
            }
            spec
        })
}

fn ids(entries: &[&Entry]) -> Vec<usize> {
    entries.iter().map(|e| e.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Filtering never grows the collection.
    #[test]
    fn filter_is_monotone(entries in entries_strategy(60), spec in spec_strategy()) {
        let filtered = spec.apply(&entries, &scope(), accessor);
        prop_assert!(filtered.len() <= entries.len());
    }

    /// Filtering the filtered result again changes nothing.
    #[test]
    fn filter_is_idempotent(entries in entries_strategy(60), spec in spec_strategy()) {
        let once: Vec<Entry> = spec
            .apply(&entries, &scope(), accessor)
            .into_iter()
            .cloned()
            .collect();
        let twice = spec.apply(&once, &scope(), accessor);
        prop_assert_eq!(ids(&twice), once.iter().map(|e| e.id).collect::<Vec<_>>());
    }

    /// Filtering keeps input order (ids stay increasing).
    #[test]
    fn filter_preserves_order(entries in entries_strategy(60), spec in spec_strategy()) {
        let filtered = ids(&spec.apply(&entries, &scope(), accessor));
        prop_assert!(filtered.windows(2).all(|w| w[0] < w[1]));
    }

    /// Equal sort keys keep their input order, in both directions.
    #[test]
    fn sort_is_stable(entries in entries_strategy(60), desc in any::<bool>()) {
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let sorted = SortSpec::by("score", dir).sort_slice(&entries, accessor);
        prop_assert_eq!(sorted.len(), entries.len());
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.score == b.score {
                prop_assert!(a.id < b.id);
            } else if desc {
                prop_assert!(a.score > b.score);
            } else {
                prop_assert!(a.score < b.score);
            }
        }
    }

    /// Lists compare by length.
    #[test]
    fn list_sort_orders_by_length(entries in entries_strategy(40)) {
        let sorted = SortSpec::by("tags", Dir::Asc).sort_slice(&entries, accessor);
        prop_assert!(sorted.windows(2).all(|w| w[0].tags.len() <= w[1].tags.len()));
    }

    /// With unique keys, toggling to descending reverses the ascending order.
    #[test]
    fn toggle_reverses_unique_keys(entries in entries_strategy(40)) {
        let asc_spec = SortSpec::new().toggle("id");
        let desc_spec = asc_spec.toggle("id");

        let asc = ids(&asc_spec.sort_slice(&entries, accessor));
        let mut desc = ids(&desc_spec.sort_slice(&entries, accessor));
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }

    /// Concatenating every page reproduces the sequence exactly.
    #[test]
    fn pages_cover_sequence(len in 0usize..120, page_size in 1usize..25) {
        let items: Vec<usize> = (0..len).collect();
        let total = paginate(items.clone(), 1, page_size).unwrap().total_pages;

        let mut joined = Vec::new();
        for number in 1..=total {
            let page = paginate(items.clone(), number, page_size).unwrap();
            prop_assert_eq!(page.number, number);
            joined.extend(page.items);
        }
        prop_assert_eq!(joined, items);
    }

    /// Out-of-range page numbers serve the first or last page.
    #[test]
    fn pages_clamp(len in 0usize..120, page_size in 1usize..25, over in 1usize..10) {
        let items: Vec<usize> = (0..len).collect();
        let first = paginate(items.clone(), 1, page_size).unwrap();
        let total = first.total_pages;

        prop_assert_eq!(paginate(items.clone(), 0, page_size).unwrap(), first);
        prop_assert_eq!(
            paginate(items.clone(), total + over, page_size).unwrap(),
            paginate(items, total, page_size).unwrap()
        );
    }

    /// Export text parses back into the same header and cells.
    #[test]
    fn export_round_trips(
        cells in prop::collection::vec(("[ -~\n]{1,12}", "[ -~\n]{1,12}"), 0..20),
    ) {
        let entries: Vec<Entry> = cells
            .iter()
            .enumerate()
            .map(|(id, (name, action))| Entry {
                id,
                name: name.clone(),
                action: action.clone(),
                score: 0,
                tags: Vec::new(),
            })
            .collect();
        let columns = [Column::new("name", "Name, full"), Column::new("action", "Action \"type\"")];

        let text = to_delimited_text(&entries, &columns, accessor).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        prop_assert_eq!(headers, vec!["Name, full".to_string(), "Action \"type\"".to_string()]);

        let rows: Vec<(String, String)> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].to_string())
            })
            .collect();
        prop_assert_eq!(rows, cells);
    }
}

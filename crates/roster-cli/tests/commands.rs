//! Command-level tests over JSON dumps written to a temp directory.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use roster_cli::commands::{self, ExportArgs, FilterArgs, ListArgs, SourceArgs, ValuesArgs};
use roster_cli::config::RosterConfig;
use roster_cli::records::RecordKind;
use tempfile::TempDir;

const AUDIT_LOGS: &str = r#"[
    {"id": 1, "user_email": "admin@hr.io", "action": "LOGIN", "details": null, "timestamp": "2024-04-01T08:00:00"},
    {"id": 2, "user_email": "recruiter@hr.io", "action": "UPLOAD_CV", "details": {"file": "ann.pdf"}, "timestamp": "2024-04-02T10:00:00"},
    {"id": 3, "user_email": "recruiter@hr.io", "action": "LOGIN", "details": "from office", "timestamp": "2024-04-03T23:59:59.500"},
    {"id": 4, "user_email": null, "action": "RUN_RANKING", "details": "job 7", "timestamp": "2024-04-04T00:00:00"}
]"#;

const CANDIDATES: &str = r#"[
    {"id": 1, "name": "Bob Ray", "email": "bob@mail.io", "years_of_experience": 3, "skills": ["Go", "SQL", "K8s"], "parse_status": "success", "created_at": "2024-03-01T09:00:00"},
    {"id": 2, "name": "Ann Lee", "email": null, "years_of_experience": 7.5, "skills": ["Rust"], "parse_status": "success", "created_at": "2024-03-02T09:00:00"},
    {"id": 3, "name": "Cid Moe", "years_of_experience": 3, "skills": [], "parse_status": "failed", "created_at": "2024-03-03T09:00:00"}
]"#;

fn dump(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn source(input: PathBuf, kind: RecordKind) -> SourceArgs {
    SourceArgs { input, kind }
}

fn list_args(source: SourceArgs, filter: FilterArgs) -> ListArgs {
    ListArgs {
        source,
        filter,
        page: 1,
        page_size: None,
        json: true,
    }
}

fn listed_ids(output: &str) -> Vec<i64> {
    let parsed: serde_json::Value = serde_json::from_str(output).unwrap();
    parsed["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn list_filters_by_action_and_date() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "logs.json", AUDIT_LOGS);
    let filter = FilterArgs {
        category: Some("action=LOGIN".into()),
        since: Some("2024-04-02".into()),
        until: Some("2024-04-03".into()),
        ..FilterArgs::default()
    };

    let out = commands::list(
        &RosterConfig::default(),
        &list_args(source(input, RecordKind::AuditLogs), filter),
    )
    .unwrap();
    assert_eq!(listed_ids(&out), [3]);
}

#[test]
fn list_searches_structured_details() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "logs.json", AUDIT_LOGS);
    let filter = FilterArgs {
        search: Some("ANN.PDF".into()),
        ..FilterArgs::default()
    };

    let out = commands::list(
        &RosterConfig::default(),
        &list_args(source(input, RecordKind::AuditLogs), filter),
    )
    .unwrap();
    assert_eq!(listed_ids(&out), [2]);
}

#[test]
fn list_sorts_by_experience_then_keeps_ties_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "candidates.json", CANDIDATES);
    let filter = FilterArgs {
        sort: vec!["years_of_experience".into()],
        ..FilterArgs::default()
    };

    let out = commands::list(
        &RosterConfig::default(),
        &list_args(source(input, RecordKind::Candidates), filter),
    )
    .unwrap();
    assert_eq!(listed_ids(&out), [1, 3, 2]);
}

#[test]
fn list_sorts_skills_by_count_descending() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "candidates.json", CANDIDATES);
    let filter = FilterArgs {
        sort: vec!["skills".into(), "skills".into()],
        ..FilterArgs::default()
    };

    let out = commands::list(
        &RosterConfig::default(),
        &list_args(source(input, RecordKind::Candidates), filter),
    )
    .unwrap();
    assert_eq!(listed_ids(&out), [1, 2, 3]);
}

#[test]
fn list_clamps_page_and_uses_config_page_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "candidates.json", CANDIDATES);
    let config = RosterConfig {
        page_size: 2,
        ..RosterConfig::default()
    };
    let mut args = list_args(source(input, RecordKind::Candidates), FilterArgs::default());
    args.page = 9;

    let out = commands::list(&config, &args).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["page"], 2);
    assert_eq!(parsed["total_pages"], 2);
    assert_eq!(listed_ids(&out), [3]);
}

#[test]
fn list_table_reports_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "candidates.json", CANDIDATES);
    let filter = FilterArgs {
        search: Some("nobody".into()),
        ..FilterArgs::default()
    };
    let mut args = list_args(source(input, RecordKind::Candidates), filter);
    args.json = false;

    let out = commands::list(&RosterConfig::default(), &args).unwrap();
    assert_eq!(out, "No records match your filters\nShowing 0 of 3 records\n");
}

#[test]
fn zero_page_size_flag_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "candidates.json", CANDIDATES);
    let mut args = list_args(source(input, RecordKind::Candidates), FilterArgs::default());
    args.page_size = Some(0);

    assert!(commands::list(&RosterConfig::default(), &args).is_err());
}

#[test]
fn bad_date_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "logs.json", AUDIT_LOGS);
    let filter = FilterArgs {
        since: Some("04/02/2024".into()),
        ..FilterArgs::default()
    };

    let err = commands::list(
        &RosterConfig::default(),
        &list_args(source(input, RecordKind::AuditLogs), filter),
    )
    .unwrap_err();
    assert!(err.to_string().contains("04/02/2024"));
}

#[test]
fn export_writes_dated_file_into_export_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "logs.json", AUDIT_LOGS);
    let config = RosterConfig {
        export_dir: Some(dir.path().join("exports")),
        ..RosterConfig::default()
    };
    let args = ExportArgs {
        source: source(input, RecordKind::AuditLogs),
        filter: FilterArgs {
            sort: vec!["id".into(), "id".into()],
            since: Some("2024-04-03".into()),
            ..FilterArgs::default()
        },
        out: None,
    };
    let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    let path = commands::export(&config, &args, today).unwrap();
    assert_eq!(path, dir.path().join("exports").join("audit_logs_2024-04-05.csv"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        concat!(
            "\"Timestamp\",\"User\",\"Action\",\"Details\"\n",
            "\"2024-04-04T00:00:00\",\"N/A\",\"RUN_RANKING\",\"job 7\"\n",
            "\"2024-04-03T23:59:59.500\",\"recruiter@hr.io\",\"LOGIN\",\"from office\"\n",
        )
    );
}

#[test]
fn export_ignores_pagination() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "candidates.json", CANDIDATES);
    let out = dir.path().join("all.csv");
    let config = RosterConfig {
        page_size: 1,
        ..RosterConfig::default()
    };
    let args = ExportArgs {
        source: source(input, RecordKind::Candidates),
        filter: FilterArgs::default(),
        out: Some(out.clone()),
    };
    let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    assert_eq!(commands::export(&config, &args, today).unwrap(), out);
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("\"Ann Lee\",\"N/A\",\"7.5\",\"Rust\""));
}

#[test]
fn values_lists_actions_in_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(&dir, "logs.json", AUDIT_LOGS);
    let args = ValuesArgs {
        source: source(input, RecordKind::AuditLogs),
        field: "action".into(),
    };

    assert_eq!(
        commands::values(&args).unwrap(),
        "LOGIN\nUPLOAD_CV\nRUN_RANKING\n"
    );
}

#[test]
fn ranking_envelope_is_browsable() {
    let dir = tempfile::tempdir().unwrap();
    let input = dump(
        &dir,
        "ranking.json",
        r#"{"job_id": 7, "total_candidates": 2, "ranked_candidates": [
            {"id": 10, "candidate_id": 1, "job_id": 7, "total_score": 64.0, "skills_score": 50.0,
             "experience_score": 80.0, "keywords_score": 60.0, "rank": 2, "created_at": "2024-04-01T00:00:00",
             "candidate": {"id": 1, "name": "Bob Ray", "parse_status": "success", "created_at": "2024-03-01T09:00:00"}},
            {"id": 11, "candidate_id": 2, "job_id": 7, "total_score": 88.5, "skills_score": 90.0,
             "experience_score": 85.0, "keywords_score": 90.0, "rank": 1, "created_at": "2024-04-01T00:00:00",
             "candidate": {"id": 2, "name": "Ann Lee", "parse_status": "success", "created_at": "2024-03-02T09:00:00"}}
        ]}"#,
    );
    let filter = FilterArgs {
        sort: vec!["total_score".into(), "total_score".into()],
        ..FilterArgs::default()
    };

    let out = commands::list(
        &RosterConfig::default(),
        &list_args(source(input, RecordKind::Scores), filter),
    )
    .unwrap();
    assert_eq!(listed_ids(&out), [11, 10]);
}

#[test]
fn unreadable_input_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let args = ValuesArgs {
        source: source(missing, RecordKind::Candidates),
        field: "name".into(),
    };
    let err = commands::values(&args).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

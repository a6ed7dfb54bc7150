//! Record shapes returned by the dashboard backend.
//!
//! Each shape implements [`Record`] for field access and [`Browsable`] for
//! the per-table settings: which fields the search box looks at, which field
//! the date filter applies to, and which columns an export contains.

use clap::ValueEnum;
use roster_seeker::{Column, Number, Record, SearchScope, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A record table the front end can browse.
pub trait Browsable: Record + Serialize + DeserializeOwned {
    /// Stem of the export file name.
    const EXPORT_STEM: &'static str;

    /// Search fields and date field of the table.
    fn scope() -> SearchScope;

    /// Columns shown in listings and exports, in order.
    fn columns() -> Vec<Column>;

    /// Reads a JSON dump of the table.
    fn parse_collection(text: &str) -> serde_json::Result<Vec<Self>> {
        serde_json::from_str(text)
    }
}

/// Which table a dump holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    /// Uploaded candidates (`GET /api/candidates`).
    Candidates,
    /// Ranked candidates for one job (`POST /api/matching/rank`).
    Scores,
    /// System audit log (`GET /api/reports/audit-logs`).
    AuditLogs,
}

// ============================================================================
// Candidate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub years_of_experience: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub parse_status: String,
    #[serde(default)]
    pub parse_error: Option<String>,
    pub created_at: String,
}

impl Record for Candidate {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::Number(Number::I64(self.id)),
            "name" => Value::String(&self.name),
            "email" => Value::from(&self.email),
            "phone" => Value::from(&self.phone),
            "education" => Value::from(&self.education),
            "years_of_experience" => Value::Number(Number::F64(self.years_of_experience)),
            "skills" => Value::List(&self.skills),
            "languages" => Value::List(&self.languages),
            "file_name" => Value::from(&self.file_name),
            "parse_status" => Value::String(&self.parse_status),
            "parse_error" => Value::from(&self.parse_error),
            "created_at" => Value::String(&self.created_at),
            _ => Value::None,
        }
    }
}

impl Browsable for Candidate {
    const EXPORT_STEM: &'static str = "candidates";

    fn scope() -> SearchScope {
        SearchScope::new(["name", "email", "education"]).with_date_field("created_at")
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("years_of_experience", "Experience"),
            Column::new("skills", "Skills"),
            Column::new("parse_status", "Status"),
            Column::new("created_at", "Uploaded"),
        ]
    }
}

// ============================================================================
// CandidateScore
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub id: i64,
    pub candidate_id: i64,
    pub job_id: i64,
    pub total_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub keywords_score: f64,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub created_at: String,
    pub candidate: Candidate,
}

/// A ranking response wraps the scores; a plain array is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoresPayload {
    Ranking { ranked_candidates: Vec<CandidateScore> },
    List(Vec<CandidateScore>),
}

impl Record for CandidateScore {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::Number(Number::I64(self.id)),
            "candidate_id" => Value::Number(Number::I64(self.candidate_id)),
            "job_id" => Value::Number(Number::I64(self.job_id)),
            "total_score" => Value::Number(Number::F64(self.total_score)),
            "skills_score" => Value::Number(Number::F64(self.skills_score)),
            "experience_score" => Value::Number(Number::F64(self.experience_score)),
            "keywords_score" => Value::Number(Number::F64(self.keywords_score)),
            "rank" => self.rank.map_or(Value::None, |r| Value::Number(Number::I64(r))),
            "explanation" => Value::from(&self.explanation),
            "matched_skills" => Value::List(&self.matched_skills),
            "missing_skills" => Value::List(&self.missing_skills),
            "created_at" => Value::String(&self.created_at),
            "name" => Value::String(&self.candidate.name),
            "email" => Value::from(&self.candidate.email),
            "years_of_experience" => {
                Value::Number(Number::F64(self.candidate.years_of_experience))
            }
            _ => Value::None,
        }
    }
}

impl Browsable for CandidateScore {
    const EXPORT_STEM: &'static str = "ranking";

    fn scope() -> SearchScope {
        SearchScope::new(["name", "email", "explanation"]).with_date_field("created_at")
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("rank", "Rank"),
            Column::new("name", "Candidate"),
            Column::new("total_score", "Total"),
            Column::new("skills_score", "Skills"),
            Column::new("experience_score", "Experience"),
            Column::new("keywords_score", "Keywords"),
            Column::new("matched_skills", "Matched"),
            Column::new("missing_skills", "Missing"),
        ]
    }

    fn parse_collection(text: &str) -> serde_json::Result<Vec<Self>> {
        Ok(match serde_json::from_str(text)? {
            ScoresPayload::Ranking { ranked_candidates } => ranked_candidates,
            ScoresPayload::List(scores) => scores,
        })
    }
}

// ============================================================================
// AuditLog
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub action: String,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default, deserialize_with = "details_text")]
    pub details: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub timestamp: String,
}

/// Audit details arrive as free text or as a JSON object; both are kept as
/// text so they can be searched and exported.
fn details_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        },
    )
}

impl Record for AuditLog {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::Number(Number::I64(self.id)),
            "user_id" => self
                .user_id
                .map_or(Value::None, |id| Value::Number(Number::I64(id))),
            "user_email" => Value::from(&self.user_email),
            "action" => Value::String(&self.action),
            "entity_type" => Value::from(&self.entity_type),
            "entity_id" => self
                .entity_id
                .map_or(Value::None, |id| Value::Number(Number::I64(id))),
            "details" => Value::from(&self.details),
            "ip_address" => Value::from(&self.ip_address),
            "timestamp" => Value::String(&self.timestamp),
            _ => Value::None,
        }
    }
}

impl Browsable for AuditLog {
    const EXPORT_STEM: &'static str = "audit_logs";

    fn scope() -> SearchScope {
        SearchScope::new(["user_email", "action", "details"]).with_date_field("timestamp")
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("timestamp", "Timestamp"),
            Column::new("user_email", "User"),
            Column::new("action", "Action"),
            Column::new("details", "Details"),
        ]
    }
}

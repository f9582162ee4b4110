use fake::{Dummy, Faker, Rng};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Defines user data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub fname: String,
    #[serde(default)]
    pub lname: String,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub role_name: Option<String>,
}

impl User {
    /// Returns first and last name, or the username when both are blank.
    ///
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.fname, self.lname);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Defines role data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Defines case type catalog entry.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct CaseType {
    #[serde(deserialize_with = "identifier")]
    pub id: String,
    pub name: String,
}

/// Defines case status values known to the front-end.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum CaseStatus {
    Pending,
    InProgress,
    Completed,
    Unknown,
}

impl CaseStatus {
    /// Statuses a list can be filtered by, in display order.
    ///
    pub const ALL: [CaseStatus; 3] = [
        CaseStatus::Pending,
        CaseStatus::InProgress,
        CaseStatus::Completed,
    ];
}

impl Dummy<Faker> for CaseStatus {
    fn dummy_with_rng<R: Rng + ?Sized>(_: &Faker, rng: &mut R) -> Self {
        CaseStatus::ALL[rng.gen_range(0..CaseStatus::ALL.len())]
    }
}

impl From<String> for CaseStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "pending" => CaseStatus::Pending,
            "in-progress" => CaseStatus::InProgress,
            "completed" => CaseStatus::Completed,
            _ => CaseStatus::Unknown,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CaseStatus::Pending => "Pending",
            CaseStatus::InProgress => "In progress",
            CaseStatus::Completed => "Completed",
            CaseStatus::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

/// Defines case data structure as returned by the case list endpoint.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct Case {
    #[serde(default, deserialize_with = "identifier")]
    pub id: String,
    pub title: String,
    #[serde(default, alias = "caseType", deserialize_with = "optional_identifier")]
    pub case_type: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "unknown_status")]
    pub status: CaseStatus,
    #[serde(default)]
    pub created_at: Option<String>, // RFC 3339 as sent by the backend
}

fn unknown_status() -> CaseStatus {
    CaseStatus::Unknown
}

/// Defines exportable column catalog entry.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct ExportColumn {
    pub key: String,
    pub label: String,
}

/// Count of users holding a role.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: u64,
}

/// Count of today's cases in a status.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Count of today's cases of a type.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub case_type: String,
    pub count: u64,
}

/// Binary blob attached to a new case.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Transfer payload for case creation.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCase {
    pub case_type: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub submitter_id: Option<i64>,
    pub attachments: Vec<Attachment>,
}

/// Echo returned by the backend after a case was created.
///
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedCase {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub case_id: Option<i64>,
}

/// Transfer payload for user creation.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub fname: String,
    pub lname: String,
    pub role_id: i64,
}

/// Accept identifiers sent either as JSON strings or numbers.
///
fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

fn optional_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Number(number)) => Some(number.to_string()),
        None => None,
    })
}

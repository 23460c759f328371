use serde::{Deserialize, Serialize};

/// Student roster record. Timestamps are RFC 3339 strings, set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub assigned_teacher_id: Option<String>,
    pub progress_report_grade: Option<i64>,
    pub final_report_grade: Option<i64>,
    pub finalized: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Student plus the eagerly joined assigned teacher, for list/display
/// responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    #[serde(flatten)]
    pub student: Student,
    pub teacher: Option<Teacher>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
        }
    }
}

/// Caller identity, derived per request and never persisted.
///
/// The current source of the raw values is a pair of request headers; a
/// verified session or token source can replace that without touching the
/// policy layer, which only ever sees this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Option<Role>,
    pub user_id: Option<String>,
}

impl Identity {
    /// Map raw role/user-id indicators to an identity. Missing or
    /// unrecognized role values resolve to `role: None`; downstream policy
    /// denies those.
    pub fn resolve(role: Option<&str>, user_id: Option<&str>) -> Identity {
        Identity {
            role: role.and_then(Role::parse),
            user_id: user_id
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn admin() -> Identity {
        Identity {
            role: Some(Role::Admin),
            user_id: Some("admin".to_string()),
        }
    }

    pub fn teacher(user_id: &str) -> Identity {
        Identity {
            role: Some(Role::Teacher),
            user_id: Some(user_id.to_string()),
        }
    }
}

/// The two report slots a teacher can grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Progress,
    Final,
}

impl ReportType {
    pub fn parse(raw: &str) -> Option<ReportType> {
        match raw {
            "progress" => Some(ReportType::Progress),
            "final" => Some(ReportType::Final),
            _ => None,
        }
    }
}

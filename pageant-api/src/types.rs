//! Request and response bodies exchanged with the backend.
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LogoutInput {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct VerifyEmailInput<'a> {
    pub token: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordResetInput<'a> {
    pub address: &'a str,
}

/// The new password, with the token from the reset link.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetDoneInput {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// The `{ code, type, statusText }` body the auth endpoints answer with.
///
/// A successful login carries the session fields alongside.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "statusText")]
    pub status_text: Option<Value>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Value,
}

impl FormResponse {
    pub fn messages(&self) -> Vec<String> {
        match &self.status_text {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            // Django form errors: `{ field: [messages] }`.
            Some(Value::Object(fields)) => fields
                .values()
                .flat_map(|v| match v {
                    Value::Array(items) => items.iter().map(value_text).collect(),
                    other => vec![value_text(other)],
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fields of an event. Unset fields are left out of the request body, so the
/// same type serves creation and partial updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_per_vote: Option<f64>,
    /// RFC 3339 timestamps, passed through as given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContestantInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteInput {
    /// `null` votes anonymously.
    pub voter_email: Option<String>,
    pub number_of_votes: u32,
}

impl Default for VoteInput {
    fn default() -> Self {
        Self { voter_email: None, number_of_votes: 1 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchParameters<'a> {
    pub q: &'a str,
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Login form fields. Absent fields never match a stored record.
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginInput {
    /// Take string `username`/`password` members from a JSON object body.
    /// Non-object bodies and non-string members yield `None` fields.
    pub fn from_json(body: &Value) -> Self {
        let field = |name: &str| {
            body.as_object()
                .and_then(|obj| obj.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self { username: field("username"), password: field("password") }
    }
}

/// One entry of the `users` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
}

/// Result of a credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched { username: String },
    NoMatch,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

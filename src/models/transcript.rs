use serde::{Deserialize, Serialize};

/// Who produced a dialogue turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The customer on the call
    User,
    /// The collections agent
    Assistant,
}

impl Role {
    /// Speaker name used in the flattened transcript
    pub fn speaker(&self) -> &'static str {
        match self {
            Role::User => "borrower",
            Role::Assistant => "lender",
        }
    }
}

/// One turn of dialogue as received from the call platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: Role,
    /// Absent or null content marks a turn with nothing said
    #[serde(default)]
    pub content: Option<String>,
}

impl TranscriptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a human conversation took place on the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    NotConnected,
}

impl ConnectionStatus {
    /// Label as it appears in the disposition table
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::NotConnected => "Not Connected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    /// Accepts table values ("Not Connected") and model replies ("NOT CONNECTED",
    /// "\"CONNECTED\"", "NOT_CONNECTED")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '`')
            .replace('_', " ")
            .to_uppercase();
        let normalized = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        match normalized.as_str() {
            "CONNECTED" => Ok(ConnectionStatus::Connected),
            "NOT CONNECTED" => Ok(ConnectionStatus::NotConnected),
            _ => Err(format!("unrecognised connection status: {:?}", s)),
        }
    }
}

/// One row of the general disposition table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionRecord {
    pub connected_status: ConnectionStatus,
    pub code: String,
    pub label: String,
    pub description: String,
}

/// One row of the grievance subcategory table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrievanceRecord {
    pub parent_code: String,
    pub subcategory_code: String,
    pub subcategory_label: String,
    pub description: String,
}

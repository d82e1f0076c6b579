use std::path::PathBuf;

use crate::error::Result;
use crate::io::ReferenceTables;
use crate::llm::OpenAiConfig;

pub const DEFAULT_DISPOSITION_CSV: &str = "csv/General_disposition.csv";
pub const DEFAULT_GRIEVANCE_CSV: &str = "csv/Grievance_Categories.csv";

/// Locations of the two reference tables
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceConfig {
    pub dispositions: PathBuf,
    pub grievances: PathBuf,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            dispositions: PathBuf::from(DEFAULT_DISPOSITION_CSV),
            grievances: PathBuf::from(DEFAULT_GRIEVANCE_CSV),
        }
    }
}

impl ReferenceConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            dispositions: lookup("DISPOSITION_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.dispositions),
            grievances: lookup("GRIEVANCE_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.grievances),
        }
    }

    pub fn load_tables(&self) -> Result<ReferenceTables> {
        ReferenceTables::load(&self.dispositions, &self.grievances)
    }
}

/// Everything needed at startup; read once, never reloaded
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: OpenAiConfig,
    pub reference: ReferenceConfig,
}

impl AppConfig {
    /// Read configuration from the process environment (after `.env` is loaded)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            llm: OpenAiConfig::from_lookup(&lookup)?,
            reference: ReferenceConfig::from_lookup(&lookup),
        })
    }
}

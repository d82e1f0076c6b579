pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod stages;

pub use config::{AppConfig, ReferenceConfig};
pub use error::{ClassifierError, Result};
pub use io::{parse_transcript_file, parse_transcript_json, ReferenceTables};
pub use llm::{LlmBackend, OpenAiClient, OpenAiConfig};
pub use models::{
    ClassificationResult, ConnectionStatus, DispositionOutcome, DispositionRecord,
    GrievanceRecord, Role, TranscriptMessage,
};
pub use pipeline::DispositionPipeline;
pub use server::{create_router, serve, AppState};
pub use stages::{detect_connection_status, normalize_transcript, prefilter, summarize};

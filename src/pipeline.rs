use std::sync::Arc;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::io::ReferenceTables;
use crate::llm::{build_disposition_system_prompt, build_grievance_system_prompt, LlmBackend};
use crate::models::{ClassificationResult, DispositionOutcome, TranscriptMessage};
use crate::stages::{
    classify_disposition, classify_grievance, detect_connection_status, normalize_transcript,
    summarize,
};

/// End-to-end classifier shared by every request
///
/// Holds only read-only state: the LLM backend, the reference tables and the
/// system prompts rendered from them once at construction.
#[derive(Clone)]
pub struct DispositionPipeline {
    llm: Arc<dyn LlmBackend>,
    tables: Arc<ReferenceTables>,
    disposition_prompt: Arc<str>,
    grievance_prompt: Arc<str>,
}

impl DispositionPipeline {
    pub fn new(llm: Arc<dyn LlmBackend>, tables: Arc<ReferenceTables>) -> Self {
        let disposition_prompt = build_disposition_system_prompt(&tables).into();
        let grievance_prompt = build_grievance_system_prompt(&tables).into();

        Self {
            llm,
            tables,
            disposition_prompt,
            grievance_prompt,
        }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Classify one transcript
    ///
    /// detect status -> summarize -> classify against the status group ->
    /// grievance subclassification when the primary answer is `GRIEVANCE`.
    pub async fn classify(&self, transcript: &[TranscriptMessage]) -> Result<ClassificationResult> {
        let span = info_span!("classify", request_id = %Uuid::new_v4());
        self.run(transcript).instrument(span).await
    }

    async fn run(&self, transcript: &[TranscriptMessage]) -> Result<ClassificationResult> {
        let llm = self.llm.as_ref();
        let text = normalize_transcript(transcript);
        info!("Classifying transcript: {} turns, {} chars", transcript.len(), text.len());

        let decision = detect_connection_status(llm, &text).await?;
        let summary = summarize(llm, &text).await?;

        let outcome = classify_disposition(
            llm,
            &self.tables,
            &self.disposition_prompt,
            &summary,
            decision.status,
        )
        .await?;

        match outcome {
            DispositionOutcome::Final(result) => Ok(result),
            DispositionOutcome::NeedsGrievanceSubclassification(_) => {
                info!("Grievance detected");
                classify_grievance(llm, &self.tables, &self.grievance_prompt, &summary).await
            }
        }
    }
}

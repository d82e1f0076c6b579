use tracing::info;

use crate::error::Result;
use crate::io::{render_dispositions, ReferenceTables};
use crate::llm::{
    build_disposition_user_prompt, classification_schema, parse_classification, ChatMessage,
    CompletionRequest, LlmBackend,
};
use crate::models::{ConnectionStatus, DispositionOutcome};

pub const DISPOSITION_TEMPERATURE: f32 = 0.5;

/// Schema name sent with the structured-output request
pub const DISPOSITION_SCHEMA_NAME: &str = "disposition_result";

/// Classify a call summary against the dispositions for its connection status
///
/// The model only sees the status-filtered table, and its answer must be one
/// of those codes. A `GRIEVANCE` answer on a connected call is returned as
/// `NeedsGrievanceSubclassification`; anything else is final with the code in
/// display form.
pub async fn classify_disposition(
    llm: &dyn LlmBackend,
    tables: &ReferenceTables,
    system_prompt: &str,
    summary: &str,
    status: ConnectionStatus,
) -> Result<DispositionOutcome> {
    let filtered = tables.filter_by_status(status);
    let allowed: Vec<&str> = filtered.iter().map(|d| d.code.as_str()).collect();
    let filtered_table = render_dispositions(filtered.iter().copied());

    let request = CompletionRequest::new(
        vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(build_disposition_user_prompt(summary, &filtered_table)),
        ],
        DISPOSITION_TEMPERATURE,
    )
    .with_schema(classification_schema(DISPOSITION_SCHEMA_NAME));

    let reply = llm.complete(request).await?;
    let result = parse_classification(&reply, &allowed)?.with_summary(summary);

    info!(
        "Disposition: {} (confidence {:.2}, status {})",
        result.disposition_code, result.confidence, status
    );

    Ok(DispositionOutcome::from_classification(result, status))
}

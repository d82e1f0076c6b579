use tracing::debug;

use crate::error::Result;
use crate::llm::{ChatMessage, CompletionRequest, LlmBackend, SUMMARY_SYSTEM_PROMPT};

/// Low temperature keeps summaries factual while allowing fluent translation
pub const SUMMARY_TEMPERATURE: f32 = 0.2;

/// Summarize a flattened transcript into a neutral English paragraph
///
/// The summary is the only view of the call the classifiers receive.
pub async fn summarize(llm: &dyn LlmBackend, transcript_text: &str) -> Result<String> {
    let request = CompletionRequest::new(
        vec![
            ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(transcript_text),
        ],
        SUMMARY_TEMPERATURE,
    );

    let summary = llm.complete(request).await?.trim().to_string();
    debug!("Summary: {}", summary);

    Ok(summary)
}

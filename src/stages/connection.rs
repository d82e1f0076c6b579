use tracing::info;

use crate::error::{ClassifierError, Result};
use crate::llm::{build_status_prompt, ChatMessage, CompletionRequest, LlmBackend};
use crate::models::ConnectionStatus;

/// Words whose presence suggests a human spoke on the call (substring match)
pub const CONNECTED_INDICATORS: &[&str] = &[
    "hello", "hi", "namaste", "yes", "no", "pay", "emi", "due", "family", "voicemail", "wrong",
    "deceased", "complaint",
];

/// Transcripts shorter than this (in characters) never reach the model
pub const MIN_TRANSCRIPT_CHARS: usize = 20;

/// Deterministic decoding for the forced-choice check
pub const STATUS_TEMPERATURE: f32 = 0.0;

/// Which path decided the connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSource {
    /// Keyword/length pre-filter; no model call was made
    Heuristic,
    /// Forced-choice model call
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionDecision {
    pub status: ConnectionStatus,
    pub source: StatusSource,
}

/// Rule-based pre-filter over lower-cased transcript text
///
/// Returns `Some(NotConnected)` for short or keyword-free transcripts and
/// `None` when the model has to decide.
pub fn prefilter(lowered: &str) -> Option<ConnectionStatus> {
    let too_short = lowered.trim().chars().count() < MIN_TRANSCRIPT_CHARS;
    let has_speech = CONNECTED_INDICATORS.iter().any(|w| lowered.contains(w));

    if too_short || !has_speech {
        Some(ConnectionStatus::NotConnected)
    } else {
        None
    }
}

/// Decide whether the call connected, calling the model only when the
/// pre-filter is inconclusive
pub async fn detect_connection_status(
    llm: &dyn LlmBackend,
    transcript_text: &str,
) -> Result<ConnectionDecision> {
    let lowered = transcript_text.to_lowercase();

    if let Some(status) = prefilter(&lowered) {
        info!("Connection status: {} (pre-filter)", status);
        return Ok(ConnectionDecision {
            status,
            source: StatusSource::Heuristic,
        });
    }

    let request = CompletionRequest::new(
        vec![ChatMessage::system(build_status_prompt(&lowered))],
        STATUS_TEMPERATURE,
    );
    let reply = llm.complete(request).await?;
    let reply = reply.trim();

    let status = reply
        .parse::<ConnectionStatus>()
        .map_err(ClassifierError::SchemaViolation)?;
    info!("Connection status: {} (model replied {:?})", status, reply);

    Ok(ConnectionDecision {
        status,
        source: StatusSource::Model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedBackend;
    use crate::models::TranscriptMessage;
    use crate::stages::normalize_transcript;

    #[test]
    fn test_prefilter_short_text() {
        assert_eq!(prefilter("hello"), Some(ConnectionStatus::NotConnected));
    }

    #[test]
    fn test_prefilter_without_keywords() {
        let text = normalize_transcript(&[TranscriptMessage::assistant("Ringing...")]).to_lowercase();
        assert!(text.len() >= MIN_TRANSCRIPT_CHARS);
        assert_eq!(prefilter(&text), Some(ConnectionStatus::NotConnected));
    }

    #[test]
    fn test_prefilter_defers_to_model() {
        assert_eq!(prefilter("borrower said: hello, lender said: abc loans, "), None);
    }

    #[test]
    fn test_prefilter_matches_inside_words() {
        // "hi" inside "this" counts, as the keyword match is plain substring
        assert_eq!(prefilter("lender said: this is a test call, "), None);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_model() {
        let llm = ScriptedBackend::new(vec![]);
        let text = normalize_transcript(&[TranscriptMessage::assistant("Ringing...")]);

        let decision = detect_connection_status(&llm, &text).await.unwrap();

        assert_eq!(decision.status, ConnectionStatus::NotConnected);
        assert_eq!(decision.source, StatusSource::Heuristic);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_confirms_status() {
        let llm = ScriptedBackend::new(vec!["  CONNECTED\n"]);
        let text = normalize_transcript(&[
            TranscriptMessage::user("Hello"),
            TranscriptMessage::assistant("This is ABC loans, may I know if I'm speaking with John?"),
        ]);

        let decision = detect_connection_status(&llm, &text).await.unwrap();

        assert_eq!(decision.status, ConnectionStatus::Connected);
        assert_eq!(decision.source, StatusSource::Model);

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.0);
        assert!(requests[0].response_schema.is_none());
        assert_eq!(requests[0].messages[0].role, "system");
        assert!(requests[0].messages[0].content.contains("borrower said: hello"));
    }

    #[tokio::test]
    async fn test_model_not_connected() {
        let llm = ScriptedBackend::new(vec!["NOT CONNECTED"]);
        let text = "lender said: hello? hello? no response, ";

        let decision = detect_connection_status(&llm, text).await.unwrap();

        assert_eq!(decision.status, ConnectionStatus::NotConnected);
        assert_eq!(decision.source, StatusSource::Model);
    }

    #[tokio::test]
    async fn test_unrecognised_reply_is_schema_violation() {
        let llm = ScriptedBackend::new(vec!["I think it connected"]);
        let err = detect_connection_status(&llm, "borrower said: hello there, ")
            .await
            .unwrap_err();

        assert!(matches!(err, ClassifierError::SchemaViolation(_)));
    }
}

use tracing::info;

use crate::error::Result;
use crate::io::ReferenceTables;
use crate::llm::{
    build_grievance_user_prompt, classification_schema, parse_classification, ChatMessage,
    CompletionRequest, LlmBackend,
};
use crate::models::{grievance_display_code, ClassificationResult, NO_GRIEVANCE_CODE};

pub const GRIEVANCE_TEMPERATURE: f32 = 0.5;

pub const GRIEVANCE_SCHEMA_NAME: &str = "grievance_result";

/// Pick a grievance subcategory for a summary
///
/// Returns a complete result whose code is `GRIEVANCE(<subcategory>)` in
/// display form; it replaces the primary classification wholesale.
pub async fn classify_grievance(
    llm: &dyn LlmBackend,
    tables: &ReferenceTables,
    system_prompt: &str,
    summary: &str,
) -> Result<ClassificationResult> {
    let mut allowed = tables.grievance_codes();
    allowed.push(NO_GRIEVANCE_CODE);

    let request = CompletionRequest::new(
        vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(build_grievance_user_prompt(summary)),
        ],
        GRIEVANCE_TEMPERATURE,
    )
    .with_schema(classification_schema(GRIEVANCE_SCHEMA_NAME));

    let reply = llm.complete(request).await?;
    let result = parse_classification(&reply, &allowed)?;
    let disposition_code = grievance_display_code(&result.disposition_code);

    info!("Grievance result: {}", disposition_code);

    Ok(ClassificationResult {
        disposition_code,
        ..result.with_summary(summary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifierError;
    use crate::llm::scripted::ScriptedBackend;
    use crate::models::GrievanceRecord;

    fn tables() -> ReferenceTables {
        ReferenceTables::new(
            vec![],
            vec![GrievanceRecord {
                parent_code: "GRIEVANCE".to_string(),
                subcategory_code: "EXCESS_CHARGES".to_string(),
                subcategory_label: "Excess charges".to_string(),
                description: "Customer disputes fees".to_string(),
            }],
        )
    }

    fn reply(code: &str) -> String {
        serde_json::json!({
            "key_points": ["Customer disputes a late fee"],
            "Disposition_code": code,
            "confidence": 0.81,
            "explanation": "Confidence is 0.81 because fees were disputed, with 0.19 uncertainty over which fee.",
            "summary": null
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_grievance_code_wrapped() {
        let llm = ScriptedBackend::new(vec![reply("EXCESS_CHARGES").as_str()]);

        let result = classify_grievance(&llm, &tables(), "system", "Customer disputes a fee.")
            .await
            .unwrap();

        assert_eq!(result.disposition_code, "GRIEVANCE(EXCESS CHARGES)");
        assert_eq!(result.confidence, 0.81);
        assert_eq!(result.summary.as_deref(), Some("Customer disputes a fee."));

        let requests = llm.requests();
        assert_eq!(requests[0].temperature, GRIEVANCE_TEMPERATURE);
        assert!(requests[0].messages[1].content.contains("SUMMARY:\nCustomer disputes a fee."));
    }

    #[tokio::test]
    async fn test_no_grievance_allowed() {
        let llm = ScriptedBackend::new(vec![reply("NO_GRIEVANCE").as_str()]);

        let result = classify_grievance(&llm, &tables(), "system", "Polite call.")
            .await
            .unwrap();

        assert_eq!(result.disposition_code, "GRIEVANCE(NO GRIEVANCE)");
    }

    #[tokio::test]
    async fn test_unknown_subcategory_rejected() {
        let llm = ScriptedBackend::new(vec![reply("RUDE_AGENT").as_str()]);

        let err = classify_grievance(&llm, &tables(), "system", "Agent was rude.")
            .await
            .unwrap_err();

        assert!(matches!(err, ClassifierError::SchemaViolation(_)));
    }
}

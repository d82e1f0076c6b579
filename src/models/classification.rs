use serde::{Deserialize, Serialize};

use super::ConnectionStatus;

/// Primary code that triggers grievance subclassification
pub const GRIEVANCE_CODE: &str = "GRIEVANCE";

/// Grievance classifier answer when no grievance is present
pub const NO_GRIEVANCE_CODE: &str = "NO_GRIEVANCE";

/// Structured classification returned by the LLM and by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "Disposition_code")]
    pub disposition_code: String,
    /// Certainty in [0, 1]
    pub confidence: f64,
    pub explanation: String,
    /// Placeholder from the model; replaced by the pipeline summary
    #[serde(default)]
    pub summary: Option<String>,
    pub key_points: Vec<String>,
}

impl ClassificationResult {
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// Cosmetic transform applied to every code leaving the service
pub fn display_code(code: &str) -> String {
    code.replace('_', " ")
}

/// Wrap a grievance subcategory as `GRIEVANCE(<code>)` in display form
pub fn grievance_display_code(subcategory_code: &str) -> String {
    display_code(&format!("{}({})", GRIEVANCE_CODE, subcategory_code))
}

/// Result of the primary disposition classifier
#[derive(Debug, Clone, PartialEq)]
pub enum DispositionOutcome {
    /// Terminal classification, code already in display form
    Final(ClassificationResult),
    /// Generic grievance on a connected call; needs a subcategory
    NeedsGrievanceSubclassification(ClassificationResult),
}

impl DispositionOutcome {
    pub fn from_classification(result: ClassificationResult, status: ConnectionStatus) -> Self {
        if result.disposition_code == GRIEVANCE_CODE && status == ConnectionStatus::Connected {
            DispositionOutcome::NeedsGrievanceSubclassification(result)
        } else {
            let disposition_code = display_code(&result.disposition_code);
            DispositionOutcome::Final(ClassificationResult {
                disposition_code,
                ..result
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(code: &str) -> ClassificationResult {
        ClassificationResult {
            disposition_code: code.to_string(),
            confidence: 0.9,
            explanation: "clear".to_string(),
            summary: None,
            key_points: vec!["customer answered".to_string()],
        }
    }

    #[test]
    fn test_serializes_with_api_field_names() {
        let value = serde_json::to_value(result("PTP").with_summary("s")).unwrap();
        assert_eq!(value["Disposition_code"], "PTP");
        assert_eq!(value["summary"], "s");
        assert!(value.get("disposition_code").is_none());
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"Disposition_code": "PTP", "confidence": 0.5, "key_points": []}"#;
        assert!(serde_json::from_str::<ClassificationResult>(json).is_err());
    }

    #[test]
    fn test_grievance_display_code() {
        assert_eq!(grievance_display_code("LOAN_CLOSURE_ISSUE"), "GRIEVANCE(LOAN CLOSURE ISSUE)");
        assert_eq!(grievance_display_code(NO_GRIEVANCE_CODE), "GRIEVANCE(NO GRIEVANCE)");
    }

    #[test]
    fn test_outcome_grievance_only_when_connected() {
        let outcome =
            DispositionOutcome::from_classification(result("GRIEVANCE"), ConnectionStatus::Connected);
        assert!(matches!(outcome, DispositionOutcome::NeedsGrievanceSubclassification(_)));

        let outcome = DispositionOutcome::from_classification(
            result("GRIEVANCE"),
            ConnectionStatus::NotConnected,
        );
        assert!(matches!(outcome, DispositionOutcome::Final(_)));
    }

    #[test]
    fn test_outcome_final_code_has_no_underscores() {
        let outcome = DispositionOutcome::from_classification(
            result("PTP_ON_SPECIFIC_DATE"),
            ConnectionStatus::Connected,
        );
        match outcome {
            DispositionOutcome::Final(r) => assert_eq!(r.disposition_code, "PTP ON SPECIFIC DATE"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}

use crate::error::{ClassifierError, Result};
use crate::models::ClassificationResult;

/// Validation result for a structured classification
#[derive(Debug, Clone)]
pub struct ClassificationValidation {
    /// Whether the classification is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
}

impl ClassificationValidation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

/// Check a classification against the codes the model was allowed to choose
pub fn validate_classification(
    result: &ClassificationResult,
    allowed_codes: &[&str],
) -> ClassificationValidation {
    let mut errors = Vec::new();

    // 1. Code must come from the table the model was shown
    if !allowed_codes.contains(&result.disposition_code.as_str()) {
        errors.push(format!(
            "Code {:?} is not in the allowed set ({} codes)",
            result.disposition_code,
            allowed_codes.len()
        ));
    }

    // 2. Confidence must be a probability
    if !result.confidence.is_finite() || !(0.0..=1.0).contains(&result.confidence) {
        errors.push(format!(
            "Confidence {} is outside [0, 1]",
            result.confidence
        ));
    }

    if errors.is_empty() {
        ClassificationValidation::valid()
    } else {
        ClassificationValidation::invalid(errors)
    }
}

/// Parse a structured-output reply and validate it
pub fn parse_classification(raw: &str, allowed_codes: &[&str]) -> Result<ClassificationResult> {
    let mut result: ClassificationResult = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| ClassifierError::SchemaViolation(format!("invalid structured output: {}", e)))?;
    result.disposition_code = result.disposition_code.trim().to_string();

    let validation = validate_classification(&result, allowed_codes);
    if validation.is_valid {
        Ok(result)
    } else {
        Err(ClassifierError::SchemaViolation(validation.errors.join("; ")))
    }
}

/// Some compatible backends wrap JSON in a markdown fence even in JSON mode
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

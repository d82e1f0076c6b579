use std::path::Path;

use anyhow::{Context, Result};

use crate::models::TranscriptMessage;

/// Parse a transcript JSON file (array of `{role, content}` turns)
pub fn parse_transcript_file(path: &Path) -> Result<Vec<TranscriptMessage>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_transcript_json(&content)
}

/// Parse a transcript JSON string
pub fn parse_transcript_json(json: &str) -> Result<Vec<TranscriptMessage>> {
    serde_json::from_str(json).context("Failed to parse transcript JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::io::Write;

    #[test]
    fn test_parse_transcript_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role":"user","content":"Hello"}},{{"role":"assistant","content":"This is ABC loans"}}]"#
        )
        .unwrap();

        let transcript = parse_transcript_file(file.path()).unwrap();

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, Role::Assistant);
    }

    #[test]
    fn test_not_an_array() {
        assert!(parse_transcript_json(r#"{"role":"user"}"#).is_err());
    }
}

use super::lookup;
use super::paths::RAW_TEXT_PATH;
use crate::error::{LensError, Result};
use crate::payload::EmbeddedPayload;
use tracing::warn;

/// Reads the recognized text lines from the primary payload.
///
/// There is no partial result: a missing path or a non-string line means the
/// schema moved, and that is reported rather than guessed around.
pub fn extract_text(payload: &EmbeddedPayload) -> Result<Vec<String>> {
    let mismatch = || LensError::SchemaMismatch {
        field: "raw text",
        path: RAW_TEXT_PATH.to_vec(),
    };

    let lines = lookup(&payload.data, RAW_TEXT_PATH)
        .required("raw text", RAW_TEXT_PATH)
        .inspect_err(|_| warn!("Raw text path missing in {} payload", payload.key))?
        .as_array()
        .ok_or_else(mismatch)?;

    lines
        .iter()
        .map(|line| line.as_str().map(str::to_string).ok_or_else(mismatch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn payload(data: Value) -> EmbeddedPayload {
        EmbeddedPayload {
            key: "ds:1".to_string(),
            hash: "2".to_string(),
            data,
        }
    }

    #[test]
    fn test_extract_text_reads_lines() {
        let data = json!([null, null, null, [0, 1, 2, 3, [[["first line", "second line"]]]]]);
        let lines = extract_text(&payload(data)).unwrap();
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn test_extract_text_empty_line_group() {
        let data = json!([null, null, null, [0, 1, 2, 3, [[[]]]]]);
        assert!(extract_text(&payload(data)).unwrap().is_empty());
    }

    #[test]
    fn test_extract_text_truncated_path_fails() {
        let data = json!([null, null, null, [0, 1, 2, 3, [[]]]]);
        let err = extract_text(&payload(data)).unwrap_err();
        assert!(matches!(err, LensError::SchemaMismatch { field: "raw text", .. }));
    }

    #[test]
    fn test_extract_text_non_string_line_fails() {
        let data = json!([null, null, null, [0, 1, 2, 3, [[["ok", 5]]]]]);
        assert!(extract_text(&payload(data)).is_err());
    }
}

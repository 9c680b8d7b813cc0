//! # HTTP Utilities
//!
//! Helpers for interpreting Control Room HTTP responses: status hints and
//! strict JSON decoding with contextual errors.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Return a user-friendly error message for common HTTP status codes.
///
/// # Example
/// ```rust
/// use controlroom_util::http::status_error_message;
///
/// let error_401 = status_error_message(401).unwrap();
/// assert!(error_401.contains("API_KEY"));
///
/// let error_403 = status_error_message(403).unwrap();
/// assert!(error_403.contains("Forbidden"));
///
/// assert!(status_error_message(500).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: set API_KEY to a valid workspace API key".into()),
        403 => Some("Forbidden (403). Hint: check the API key's workspace permissions".into()),
        404 => Some("Not found (404). Hint: check WORKSPACE_ID and the requested identifiers".into()),
        _ => None,
    }
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// Any parse error is decorated with the originating status code and a
/// truncated, whitespace-collapsed preview of the body (up to 200 characters).
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, 200);

        JsonParseError::new(status_note, error, preview)
    })
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Access the truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_returns_value() {
        let value = parse_response_json_strict(r#"{"data": []}"#, Some(StatusCode::OK)).unwrap();
        assert_eq!(value["data"], Value::Array(Vec::new()));
    }

    #[test]
    fn strict_parse_error_mentions_status_and_preview() {
        let error = parse_response_json_strict("<html>\n<body>oops</body>\n</html>", Some(StatusCode::OK)).unwrap_err();
        let message = error.to_string();

        assert!(message.contains("status 200 OK"));
        assert_eq!(error.body_preview(), "<html> <body>oops</body> </html>");
    }

    #[test]
    fn preview_marks_empty_bodies() {
        assert_eq!(truncate_response_preview("   ", 10), "<empty>");
        assert_eq!(truncate_response_preview("abcdefghijkl", 4), "abcd...");
    }
}

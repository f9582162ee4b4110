//! Backend API-specific error types.

use serde_json::Value;

/// Errors that can occur while talking to the case backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// API returned a non-success response
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Configured base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl BackendError {
    /// Build an API error from a failed response, pulling out whatever message
    /// the backend put in its body.
    ///
    pub fn from_response(status: u16, body: &str) -> Self {
        BackendError::Api {
            status,
            message: extract_message(body),
        }
    }

    /// Returns the message supplied by the backend, if any.
    ///
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            BackendError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns the backend message when present, else the given fallback.
    ///
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message()
            .map(str::to_owned)
            .unwrap_or_else(|| fallback.to_owned())
    }

    /// Returns the backend message when present, else this error's own
    /// description.
    ///
    pub fn detail(&self) -> String {
        self.backend_message()
            .map(str::to_owned)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Extract a human-readable message from an error body.
///
/// The backend is not consistent: failures carry `detail`, `error` or
/// `message` (either a string or a list of strings), optionally alongside an
/// `errors` object of field messages, and some endpoints return the field
/// message object on its own.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let headline = ["detail", "error", "message"]
        .iter()
        .find_map(|key| object.get(*key).and_then(flatten_text));

    let field_errors = match object.get("errors") {
        Some(errors) => flatten_field_errors(errors),
        None if headline.is_none() => flatten_field_errors(&value),
        None => None,
    };

    match (headline, field_errors) {
        (Some(headline), Some(fields)) => Some(format!("{}: {}", headline, fields)),
        (Some(headline), None) => Some(headline),
        (None, fields) => fields,
    }
}

fn flatten_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

fn flatten_field_errors(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    let parts: Vec<String> = object
        .iter()
        .filter_map(|(field, messages)| {
            flatten_text(messages).map(|text| format!("{}: {}", field, text))
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prefers_backend_message() {
        let error = BackendError::Api {
            status: 400,
            message: Some("Invalid columns".to_string()),
        };
        assert_eq!(error.detail(), "Invalid columns");

        let error = BackendError::InvalidBaseUrl("nope".to_string());
        assert_eq!(error.detail(), "Invalid base URL: nope");
    }

    #[test]
    fn test_backend_error_display() {
        let error = BackendError::Api {
            status: 404,
            message: Some("Not found".to_string()),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("404"));
        assert!(error_str.contains("Not found"));

        let error = BackendError::Api {
            status: 500,
            message: None,
        };
        assert!(error.to_string().contains("no message"));

        let error = BackendError::InvalidBaseUrl("nope".to_string());
        assert!(error.to_string().contains("nope"));
    }

    #[test]
    fn extracts_detail_string() {
        let error = BackendError::from_response(404, r#"{"detail": "user not found"}"#);
        assert_eq!(error.backend_message(), Some("user not found"));
    }

    #[test]
    fn extracts_detail_list() {
        let error = BackendError::from_response(
            400,
            r#"{"detail": ["This password is too short.", "This password is too common."]}"#,
        );
        assert_eq!(
            error.backend_message(),
            Some("This password is too short.; This password is too common.")
        );
    }

    #[test]
    fn extracts_error_key() {
        let error = BackendError::from_response(401, r#"{"error": "Invalid username or password"}"#);
        assert_eq!(error.backend_message(), Some("Invalid username or password"));
    }

    #[test]
    fn combines_message_and_field_errors() {
        let error = BackendError::from_response(
            400,
            r#"{"message": "Failed to create case", "errors": {"title": ["This field is required."]}}"#,
        );
        assert_eq!(
            error.backend_message(),
            Some("Failed to create case: title: This field is required.")
        );
    }

    #[test]
    fn extracts_bare_field_errors() {
        let error = BackendError::from_response(
            400,
            r#"{"username": ["user with this username already exists."]}"#,
        );
        assert_eq!(
            error.backend_message(),
            Some("username: user with this username already exists.")
        );
    }

    #[test]
    fn falls_back_when_body_is_not_json() {
        let error = BackendError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(error.backend_message(), None);
        assert_eq!(error.user_message("Something went wrong"), "Something went wrong");
    }
}

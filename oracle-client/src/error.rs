//! Failures of a query round trip, as shown to the user.

use oracle_render::escape_html;
use serde_json::Value;
use thiserror::Error;

/// Shown when the server rejected the request without saying why.
pub const GENERIC_APPLICATION_ERROR: &str = "Erro ao processar a análise";

/// Query failures. `Display` is the user-facing (unescaped) message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Blank or whitespace-only question, caught before any network call.
    #[error("Por favor, digite uma pergunta bíblica")]
    EmptyQuery,

    /// The request never produced a usable response.
    #[error("Erro de conexão: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Application { status: u16, message: String },
}

impl QueryError {
    /// Message ready for insertion into markup.
    pub fn escaped_message(&self) -> String {
        escape_html(&self.to_string())
    }

    /// HTTP status a proxy should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyQuery => 400,
            Self::Transport(_) => 502,
            Self::Application { status, .. } => *status,
        }
    }

    /// Build an application error from a non-2xx response body.
    ///
    /// Prefers `error` (a string, or an object with a `message`), then the
    /// top-level `message` the analysis service uses on internal failures.
    pub fn from_error_body(status: u16, body: &Value) -> Self {
        let from_error = match body.get("error") {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(Value::Object(obj)) => obj.get("message").and_then(Value::as_str),
            _ => None,
        };

        let message = from_error
            .or_else(|| body.get("message").and_then(Value::as_str))
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_APPLICATION_ERROR);

        Self::Application {
            status,
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<QueryError> for oracle_common::Error {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::EmptyQuery => oracle_common::Error::InvalidInput(err.to_string()),
            QueryError::Transport(_) | QueryError::Application { .. } => {
                oracle_common::Error::External(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_match_the_page_copy() {
        assert_eq!(
            QueryError::EmptyQuery.to_string(),
            "Por favor, digite uma pergunta bíblica"
        );
        assert_eq!(
            QueryError::Transport("connection refused".into()).to_string(),
            "Erro de conexão: connection refused"
        );
    }

    #[test]
    fn error_field_is_used_verbatim() {
        let err = QueryError::from_error_body(400, &json!({"error": "Query is required"}));
        assert_eq!(
            err,
            QueryError::Application {
                status: 400,
                message: "Query is required".into()
            }
        );
    }

    #[test]
    fn message_field_is_used_when_error_is_missing() {
        let err = QueryError::from_error_body(
            500,
            &json!({"status": "error", "message": "pipeline exploded"}),
        );
        assert_eq!(err.to_string(), "pipeline exploded");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn structured_error_object() {
        let err = QueryError::from_error_body(
            503,
            &json!({"success": false, "error": {"code": "X", "message": "busy"}}),
        );
        assert_eq!(err.to_string(), "busy");
    }

    #[test]
    fn generic_message_otherwise() {
        assert_eq!(
            QueryError::from_error_body(500, &Value::Null).to_string(),
            GENERIC_APPLICATION_ERROR
        );
        assert_eq!(
            QueryError::from_error_body(500, &json!({"error": "  "})).to_string(),
            GENERIC_APPLICATION_ERROR
        );
    }

    #[test]
    fn escaped_message_is_safe() {
        let err = QueryError::from_error_body(400, &json!({"error": "<script>x</script>"}));
        assert_eq!(err.escaped_message(), "&lt;script&gt;x&lt;/script&gt;");
    }

    #[test]
    fn converts_into_common_error() {
        let common: oracle_common::Error = QueryError::EmptyQuery.into();
        assert_eq!(common.status_code(), 400);
        let common: oracle_common::Error = QueryError::Transport("x".into()).into();
        assert!(common.is_external());
    }
}

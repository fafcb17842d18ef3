use thiserror::Error;

/// A rejected or unreadable query. Views render these as a generic failure.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("backend is not configured: {0}")]
    NotConfigured(String),

    #[error("request for {table} failed: {message}")]
    Transport { table: String, message: String },

    #[error("backend rejected query on {table} (status {status}): {message}")]
    Rejected {
        table: String,
        status: u16,
        message: String,
    },

    #[error("could not decode {table} rows: {message}")]
    Decode { table: String, message: String },
}

impl QueryError {
    pub fn transport(table: &str, message: impl ToString) -> Self {
        Self::Transport {
            table: table.to_string(),
            message: message.to_string(),
        }
    }

    pub fn decode(table: &str, message: impl ToString) -> Self {
        Self::Decode {
            table: table.to_string(),
            message: message.to_string(),
        }
    }

    pub fn rejected(table: &str, status: u16, message: impl ToString) -> Self {
        let message = message.to_string();
        Self::Rejected {
            table: table.to_string(),
            status,
            message: if message.is_empty() {
                "No error details".to_string()
            } else {
                message
            },
        }
    }
}

/// The backend answers errors with `{"message": ...}`; fall back to the raw
/// body otherwise.
pub fn backend_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_prefers_the_json_message() {
        let body = r#"{"code":"42P01","message":"relation \"market_editions\" does not exist"}"#;
        assert_eq!(
            backend_message(body),
            "relation \"market_editions\" does not exist"
        );
    }

    #[test]
    fn backend_message_falls_back_to_body() {
        assert_eq!(backend_message(" Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn empty_error_bodies_get_a_placeholder() {
        let error = QueryError::rejected("market_editions", 500, backend_message(""));
        assert!(error.to_string().contains("No error details"));
    }
}

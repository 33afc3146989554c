use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Your session has expired. Please log in again.")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unable to connect to the server. Please check your internet connection and try again.")]
    Network(String),

    #[error("Unexpected response from the server")]
    Decode(String),

    #[error("Could not generate the receipt: {0}")]
    Render(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Maps a non-2xx response to an error, pulling the backend's `detail`
    /// (or `message`) out of the body when there is one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = detail_from_body(body);
        match status {
            401 => AppError::Unauthorized,
            404 => AppError::NotFound(detail.unwrap_or_else(|| "Not found".to_string())),
            400 | 409 | 422 => {
                AppError::Rejected(detail.unwrap_or_else(|| "Invalid request".to_string()))
            }
            _ => AppError::Server {
                status,
                message: detail.unwrap_or_else(|| "Something went wrong".to_string()),
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

fn detail_from_body(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = json.get("detail").or_else(|| json.get("message"))?;
    match detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        // validation errors come back as a list of {loc, msg}
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => AppError::Decode(e.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(AppError::from_status(401, ""), AppError::Unauthorized);
    }

    #[test]
    fn test_not_found_uses_detail() {
        let err = AppError::from_status(404, r#"{"detail":"Order not found"}"#);
        assert_eq!(err, AppError::NotFound("Order not found".to_string()));
    }

    #[test]
    fn test_validation_list_detail() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"bad level"}]}"#;
        let err = AppError::from_status(422, body);
        assert_eq!(err, AppError::Rejected("field required; bad level".to_string()));
    }

    #[test]
    fn test_server_error_without_body() {
        let err = AppError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(
            err,
            AppError::Server {
                status: 502,
                message: "Something went wrong".to_string()
            }
        );
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Not permitted: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("A roll-call session is already open for this itinerary")]
    SessionConflict,

    #[error("Request could not be processed: {0}")]
    Unprocessable(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("No response - check connectivity: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // Walk back to a char boundary so the cut never splits a
            // multibyte character
            let mut cut = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..cut],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 => ApiError::Validation(truncated),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            409 => ApiError::SessionConflict,
            422 => ApiError::Unprocessable(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Whether a failed call may be attempted again.
    ///
    /// Client-class failures (4xx) indicate a non-recoverable request and are
    /// never retried. Server errors and connection failures are transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::ServerError(_) | ApiError::Network(_))
    }
}

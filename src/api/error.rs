use serde::Deserialize;
use thiserror::Error;

/// Category of an authentication failure, mapped from the identity
/// provider's error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    /// Signup with an address that already has an account (`EMAIL_EXISTS`).
    EmailExists,
    /// Login with an unknown address (`EMAIL_NOT_FOUND`).
    EmailNotFound,
    /// Login with a wrong password (`INVALID_PASSWORD`).
    InvalidPassword,
    /// Anything else the provider reports.
    Other,
}

impl AuthFailureKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "EMAIL_EXISTS" => AuthFailureKind::EmailExists,
            "EMAIL_NOT_FOUND" => AuthFailureKind::EmailNotFound,
            "INVALID_PASSWORD" => AuthFailureKind::InvalidPassword,
            _ => AuthFailureKind::Other,
        }
    }

    /// User-facing message for this failure category.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthFailureKind::EmailExists => "This email address already exists",
            AuthFailureKind::EmailNotFound => "Email address could not be found",
            AuthFailureKind::InvalidPassword => "Invalid login information",
            AuthFailureKind::Other => "Could not create new user, please try again.",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", .0.user_message())]
    AuthenticationFailed(AuthFailureKind),

    #[error("No valid session - sign in first")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error envelope returned by the identity provider:
/// `{"error": {"message": "INVALID_PASSWORD"}}`
#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data in errors
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back off to a char boundary; the cutoff may land mid-character
        // in a multi-byte body
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

    /// Classify a failed entity-endpoint response.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => ApiError::Unauthorized,
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::Server(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Classify a failed identity-provider response.
    ///
    /// The provider wraps its codes in `{"error": {"message": CODE}}`; when
    /// the envelope is missing we fall back to plain status classification.
    pub fn from_auth_status(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ProviderErrorEnvelope>(body) {
            Ok(envelope) => {
                ApiError::AuthenticationFailed(AuthFailureKind::from_code(&envelope.error.message))
            }
            Err(_) => Self::from_status(status, body),
        }
    }
}

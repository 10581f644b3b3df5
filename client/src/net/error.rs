//! Uniform error type for every backend call.
//!
//! ERROR HANDLING
//! ==============
//! Call sites never see transport exceptions: each failure is converted into
//! one `ApiError` variant so pages can branch on `kind()` and show
//! `user_message()` without inspecting transport details.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Result alias used by all backend operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Coarse classification used for user-facing handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid credentials or missing/expired session. Shown verbatim, no retry.
    Auth,
    /// Form input rejected before any request was made.
    Validation,
    /// Transport or server failure. Logged, generic retry message.
    Backend,
}

/// Errors produced by auth and review-store operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the caller's identity or credentials.
    #[error("{0}")]
    Auth(String),

    /// Client-side input validation failed.
    #[error("{0}")]
    Invalid(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("backend error {status}: {message}")]
    Backend { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Called outside the browser (SSR render pass).
    #[error("backend not available on the server")]
    Unavailable,
}

const RETRY_MESSAGE: &str = "Something went wrong. Please try again.";
const NETWORK_MESSAGE: &str = "Network error. Please try again.";

impl ApiError {
    /// Error raised when an operation needs a signed-in user and there is none.
    pub fn not_authenticated() -> Self {
        Self::Auth("User not authenticated. Please login again.".to_owned())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Invalid(_) => ErrorKind::Validation,
            Self::Network(_) | Self::Backend { .. } | Self::Decode(_) | Self::Unavailable => ErrorKind::Backend,
        }
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(message) | Self::Invalid(message) => message.clone(),
            Self::Network(_) => NETWORK_MESSAGE.to_owned(),
            Self::Backend { .. } | Self::Decode(_) | Self::Unavailable => RETRY_MESSAGE.to_owned(),
        }
    }
}

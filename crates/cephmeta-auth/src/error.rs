//! Error types for request signing.

/// Errors that can occur while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No access key was configured.
    #[error("Missing access key")]
    MissingAccessKey,

    /// The secret key was rejected by the HMAC implementation.
    #[error("Invalid secret key")]
    InvalidSecretKey,

    /// The computed `Authorization` value is not a valid header value.
    #[error("Invalid Authorization header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

//! Feed error types.

/// Errors that fail a whole fetch.
///
/// Problems with individual fields never surface here; they are
/// normalized away during conversion.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network failure, timeout, or a body that could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("feed returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not JSON, or not a JSON array
    #[error("malformed feed body: {message}")]
    Malformed { message: String },
}

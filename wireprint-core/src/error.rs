use thiserror::Error;

/// Errors surfaced across the fingerprinting engine.
///
/// Most variants are handled locally at the point they occur (see
/// component-level doc comments for the exact recovery action); only
/// configuration and startup errors propagate out of `main`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("malformed wire data: {0}")]
    MalformedWire(String),

    #[error("capture backend unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("fingerprint database unavailable: {0}")]
    DatabaseMissing(String),

    #[error("TLS handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("operation timed out")]
    Timeout,

    #[error("invalid URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error("no TLS private key found in key file")]
    NoPrivateKey,
}

pub type Result<T> = std::result::Result<T, CoreError>;

//! Unified error type for the analysis engine.

use serde::Serialize;
use thiserror::Error;

/// Engine error type.
///
/// Analyzers never surface these to their callers: every resolver failure is
/// turned into an `error` verdict. WHOIS strategies use them to signal that the
/// chain should move on to the next source.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum EngineError {
    /// Caller input rejected before any network activity.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Transport-level failure (connection refused, TLS, body read).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// An outbound call exceeded its time bound.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Upstream answered with a non-success HTTP status.
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The DNS-over-HTTPS resolver reported a non-zero response status.
    #[error("DNS query failed with status {0}")]
    ResolverStatus(u32),

    /// Upstream payload could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Local WHOIS command could not be run or exited unsuccessfully.
    #[error("Command error: {0}")]
    CommandError(String),

    /// Upstream answered but carried nothing usable.
    #[error("No usable data: {0}")]
    NoData(String),
}

impl EngineError {
    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else {
            Self::NetworkError(e.to_string())
        }
    }
}

/// Engine `Result` alias.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_status_codes() {
        assert_eq!(EngineError::HttpStatus(503).to_string(), "HTTP 503");
        assert_eq!(
            EngineError::ResolverStatus(3).to_string(),
            "DNS query failed with status 3"
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(EngineError::ValidationError("bad".into())).unwrap();
        assert_eq!(json["code"], "ValidationError");
        assert_eq!(json["details"], "bad");
    }
}

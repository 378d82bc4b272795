use thiserror::Error;

/// Errors surfaced through a completion's error slot.
///
/// Exactly one of these accompanies a failed call, always paired with an
/// empty record list. The library never retries or recovers internally;
/// callers own retry, backoff, and user-facing messaging.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, TLS, or timeout failure from the underlying transport,
    /// passed through unmodified.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into typed records.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Why a response body failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The body was not valid JSON. No schema validation was attempted.
    #[error("response is not valid JSON: {0}")]
    Parse(String),

    /// A batch element was missing a required field or carried one of the
    /// wrong type. The whole batch is rejected.
    #[error("{0}")]
    Schema(String),
}

impl DecodeError {
    /// The schema failure every missing or mistyped required field reports.
    pub(crate) fn missing_required() -> Self {
        DecodeError::Schema("JSON object is missing required properties".to_string())
    }
}

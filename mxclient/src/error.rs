//! Error types for the action client and its decoders.

use std::time::Duration;

use crate::codec::ActionResponse;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, thiserror::Error)]
pub enum MxError {
    /// Network-level failure (connection refused, DNS, TLS, body read).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The configured request timeout elapsed.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// The request envelope could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    /// The server answered with a status other than 200.
    ///
    /// The decoded body is kept so callers can still inspect it.
    #[error("received HTTP response: {status}")]
    Protocol {
        /// Status returned by the server.
        status: reqwest::StatusCode,
        /// Decoded response body (empty when the body was not a JSON object).
        body: ActionResponse,
    },
    /// A typed decoder met a missing or mistyped field.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A prerequisite call failed.
    #[error("Error while retrieving session data: {0}")]
    Dependency(#[source] Box<MxError>),
}

impl MxError {
    /// The response body carried by a [`MxError::Protocol`] error.
    #[must_use]
    pub fn response(&self) -> Option<&ActionResponse> {
        match self {
            Self::Protocol { body, .. } => Some(body),
            Self::Dependency(inner) => inner.response(),
            _ => None,
        }
    }

    /// The HTTP status carried by a [`MxError::Protocol`] error.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            Self::Dependency(inner) => inner.status(),
            _ => None,
        }
    }
}

/// A present-but-malformed record in a decoded response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{context}: field '{field}' expected {expected}, found {actual}")]
pub struct SchemaError {
    /// Entity or object the field belongs to, e.g. `entity 'Customer'`.
    pub context: String,
    /// Name of the offending field.
    pub field: String,
    /// JSON type the decoder required.
    pub expected: &'static str,
    /// JSON type actually found (`"missing"` when absent).
    pub actual: &'static str,
}

/// Map a [`reqwest::Error`] to an [`MxError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Option<Duration>) -> MxError {
    match timeout {
        Some(limit) if err.is_timeout() => MxError::Timeout(limit),
        _ => MxError::Transport(err),
    }
}

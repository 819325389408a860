//! Action envelope encoding and response decoding.
//!
//! Requests are JSON objects of the form
//! `{"action": string, "params": {..}, "context": [..]}` where `context` is
//! omitted when empty. Responses are arbitrary JSON objects; the only key
//! interpreted here is `csrftoken`.

use serde::Serialize;
use uuid::Uuid;

use crate::error::MxError;
use crate::schema::json_type_name;

/// Decoded response envelope: an unordered string-keyed JSON mapping.
pub type ActionResponse = serde_json::Map<String, serde_json::Value>;

/// Response key carrying a rotated anti-forgery token.
pub const CSRF_TOKEN_KEY: &str = "csrftoken";

/// Built-in bootstrap action name.
pub const GET_SESSION_DATA: &str = "get_session_data";

/// A named remote action with its parameters and optional context.
///
/// # Example
///
/// ```
/// use mxclient::RequestAction;
///
/// let action = RequestAction::new("retrieve_by_xpath")
///     .param("xpath", "//Sales.Customer")
///     .context("Sales.Customer");
/// assert_eq!(action.action, "retrieve_by_xpath");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestAction {
    /// Action name.
    pub action: String,
    /// Parameters, sent as a JSON object.
    pub params: serde_json::Map<String, serde_json::Value>,
    /// Ordered context strings. Omitted from the wire when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl RequestAction {
    /// Create an action with no parameters and no context.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: serde_json::Map::new(),
            context: Vec::new(),
        }
    }

    /// The `get_session_data` bootstrap action.
    #[must_use]
    pub fn get_session_data() -> Self {
        Self::new(GET_SESSION_DATA)
            .param("profile", "")
            .param("timezoneoffset", 0)
    }

    /// Add or replace a single parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replace all parameters.
    #[must_use]
    pub fn params(mut self, params: serde_json::Map<String, serde_json::Value>) -> Self {
        self.params = params;
        self
    }

    /// Append a context entry.
    #[must_use]
    pub fn context(mut self, entry: impl Into<String>) -> Self {
        self.context.push(entry.into());
        self
    }
}

/// An encoded request body plus its per-request identifier.
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    /// Serialized JSON envelope.
    pub body: Vec<u8>,
    /// Random identifier sent as `X-Mx-ReqToken`.
    pub request_id: Uuid,
}

/// Serialize `action` into the wire envelope with a fresh request id.
///
/// # Errors
///
/// Returns [`MxError::Encode`] if serialization fails.
pub fn encode(action: &RequestAction) -> Result<EncodedRequest, MxError> {
    let body = serde_json::to_vec(action).map_err(MxError::Encode)?;
    Ok(EncodedRequest {
        body,
        request_id: Uuid::new_v4(),
    })
}

/// Parse a response body into a mapping.
///
/// Anything that is not a JSON object (including an empty body) decodes to
/// an empty mapping rather than an error.
#[must_use]
pub fn decode(body: &[u8]) -> ActionResponse {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(other) => {
            tracing::debug!(kind = json_type_name(&other), "response body is not a JSON object");
            ActionResponse::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, len = body.len(), "response body is not valid JSON");
            ActionResponse::new()
        }
    }
}

/// The rotated anti-forgery token in `response`, if it carries a string one.
#[must_use]
pub fn csrf_token(response: &ActionResponse) -> Option<&str> {
    response.get(CSRF_TOKEN_KEY).and_then(serde_json::Value::as_str)
}

//! HTTP transport bound to a cookie jar plus the anti-forgery token.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use crate::codec::EncodedRequest;
use crate::error::{MxError, map_reqwest_error};

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "X-Mx-ReqToken";

/// Header carrying the current anti-forgery token.
pub const CSRF_TOKEN_HEADER: &str = "X-Csrf-Token";

/// One logical server session.
///
/// Server-issued cookies persist across calls in the client's jar. The
/// anti-forgery token starts empty and is overwritten whenever a response
/// supplies one; it is never cleared.
pub struct Session {
    http: reqwest::Client,
    csrf_token: Mutex<String>,
    timeout: Option<Duration>,
}

/// Raw result of one HTTP round trip.
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status of the response.
    pub status: reqwest::StatusCode,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

impl Session {
    /// Create a session with a fresh cookie jar and an empty token.
    ///
    /// # Errors
    ///
    /// Returns [`MxError::Transport`] if the HTTP client cannot be built
    /// (for example when the TLS backend fails to initialize).
    pub fn new(timeout: Option<Duration>) -> Result<Self, MxError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let http = builder.build().map_err(MxError::Transport)?;
        Ok(Self {
            http,
            csrf_token: Mutex::new(String::new()),
            timeout,
        })
    }

    /// The current anti-forgery token (empty until a response sets one).
    pub async fn csrf_token(&self) -> String {
        self.csrf_token.lock().await.clone()
    }

    /// Per-request timeout this session was built with.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Exclusive access to the token for a read-send-update sequence.
    pub(crate) async fn lock_token(&self) -> MutexGuard<'_, String> {
        self.csrf_token.lock().await
    }

    /// POST `request` to `url` and collect the raw response.
    ///
    /// `csrf_token` is attached when non-empty. No retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns [`MxError::Transport`] or [`MxError::Timeout`] if the round
    /// trip fails.
    pub async fn send(
        &self,
        url: &str,
        user_agent: &str,
        csrf_token: &str,
        request: EncodedRequest,
    ) -> Result<RawResponse, MxError> {
        let mut builder = self
            .http
            .post(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, request.request_id.to_string());
        if !csrf_token.is_empty() {
            builder = builder.header(CSRF_TOKEN_HEADER, csrf_token);
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

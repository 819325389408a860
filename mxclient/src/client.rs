//! Client facade: configuration plus one session.

use crate::codec::{self, ActionResponse, RequestAction};
use crate::config::Config;
use crate::error::MxError;
use crate::metadata::{Metadata, decode_metadata};
use crate::mxobject::{MxObject, decode_mxobjects};
use crate::session::Session;

/// Client for an action server.
///
/// Owns its [`Session`] exclusively. Concurrent [`request`](Client::request)
/// calls are serialized on the session's anti-forgery token so each call
/// sees the token left by the previous one.
///
/// # Example
///
/// ```no_run
/// use mxclient::{Client, Config};
///
/// # async fn run() -> Result<(), mxclient::MxError> {
/// let client = Client::new(Config::new("https://app.example.com/xas/"))?;
/// let metadata = client.get_metadata().await?;
/// for entity in &metadata.entities {
///     println!("{} ({} attributes)", entity.name, entity.attributes.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    config: Config,
    session: Session,
}

impl Client {
    /// Create a client, filling empty configuration fields with defaults.
    ///
    /// The endpoint is not contacted.
    ///
    /// # Errors
    ///
    /// Returns [`MxError::Transport`] only if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, MxError> {
        let config = config.normalized();
        let session = Session::new(config.timeout)?;
        Ok(Self { config, session })
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send `action` and return the decoded response.
    ///
    /// A body that is not a JSON object decodes to an empty mapping. A
    /// `csrftoken` in the response replaces the session token before the
    /// status is checked.
    ///
    /// # Errors
    ///
    /// Returns [`MxError::Transport`] or [`MxError::Timeout`] if the round
    /// trip fails, and [`MxError::Protocol`] carrying the decoded body if the
    /// status is not 200.
    pub async fn request(&self, action: &RequestAction) -> Result<ActionResponse, MxError> {
        let encoded = codec::encode(action)?;
        let mut token = self.session.lock_token().await;

        tracing::debug!(
            url = %self.config.url,
            action = %action.action,
            request_id = %encoded.request_id,
            "sending action request"
        );

        let raw = self
            .session
            .send(&self.config.url, &self.config.user_agent, &token, encoded)
            .await?;

        let response = codec::decode(&raw.body);
        if let Some(rotated) = codec::csrf_token(&response) {
            if *token != rotated {
                tracing::debug!(action = %action.action, "csrf token rotated");
            }
            *token = rotated.to_string();
        }
        drop(token);

        if raw.status != reqwest::StatusCode::OK {
            return Err(MxError::Protocol {
                status: raw.status,
                body: response,
            });
        }
        Ok(response)
    }

    /// Issue the `get_session_data` bootstrap action.
    ///
    /// # Errors
    ///
    /// Same as [`request`](Client::request).
    pub async fn get_session_data(&self) -> Result<ActionResponse, MxError> {
        self.request(&RequestAction::get_session_data()).await
    }

    /// Fetch session data and decode the object model it declares.
    ///
    /// # Errors
    ///
    /// Returns [`MxError::Dependency`] wrapping the cause if the session-data
    /// call fails, or [`MxError::Schema`] if the metadata is malformed.
    pub async fn get_metadata(&self) -> Result<Metadata, MxError> {
        let session_data = self
            .get_session_data()
            .await
            .map_err(|e| MxError::Dependency(Box::new(e)))?;
        Ok(decode_metadata(&session_data)?)
    }

    /// Send `action` and decode the objects embedded in the response.
    ///
    /// # Errors
    ///
    /// Same as [`request`](Client::request), plus [`MxError::Schema`] if an
    /// object record is malformed.
    pub async fn request_objects(&self, action: &RequestAction) -> Result<Vec<MxObject>, MxError> {
        let response = self.request(action).await?;
        Ok(decode_mxobjects(&response)?)
    }
}

#![deny(missing_docs)]
//! Client for application servers that speak a JSON-over-HTTP action protocol.
//!
//! Every call is a POST of `{"action", "params", "context"?}` to a single
//! endpoint. The server keeps session state in cookies and rotates an
//! anti-forgery token through the `csrftoken` response key; [`Client`]
//! carries both across calls.
//!
//! # Usage
//!
//! ```no_run
//! use mxclient::{Client, Config, RequestAction};
//!
//! # async fn run() -> Result<(), mxclient::MxError> {
//! let client = Client::new(Config::new("http://localhost:8080/xas/"))?;
//! client.get_session_data().await?;
//!
//! let action = RequestAction::new("retrieve_by_xpath").param("xpath", "//Sales.Customer");
//! for object in client.request_objects(&action).await? {
//!     println!("{} {}", object.object_type, object.guid);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - Cookie-persistent session with csrf token rotation
//! - Lenient envelope decoding: a non-object body is an empty mapping
//! - Non-200 responses surface as [`MxError::Protocol`] with the body attached
//! - Typed projections of the object model ([`Metadata`]) and of returned
//!   objects ([`MxObject`]) with field-level [`SchemaError`]s

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod metadata;
pub mod mxobject;
mod schema;
pub mod session;

pub use client::Client;
pub use codec::{ActionResponse, RequestAction};
pub use config::{Config, DEFAULT_USER_AGENT};
pub use error::{MxError, SchemaError};
pub use metadata::{Attribute, Entity, Metadata, decode_metadata};
pub use mxobject::{MxObject, MxObjectAttribute, decode_mxobjects};
pub use session::Session;

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Netman: declarative HTTP requests with credential refresh
//!
//! This crate builds HTTP requests against a base URL, sends them through an
//! injectable transport and turns the outcome into typed values or typed
//! errors.
//!
//! ## Overview
//!
//! A request goes through three stages:
//!
//! 1. **Build** - a [`RequestBuilder`](client::RequestBuilder) joins the base
//!    URL and a relative path, then accumulates query items, headers, a body
//!    and modifiers
//! 2. **Execute** - the [`RequestExecutor`](client::RequestExecutor) sends it
//!    and classifies the response [`Status`]
//! 3. **Recover** - when the status equals the configured [`Refresh`] trigger,
//!    credentials are refreshed once and the request is retried once
//!
//! Concurrent requests that hit the trigger share a single refresh operation.
//!
//! ## Client Usage
//!
//! ```ignore
//! use netman::{HttpMethod, NetworkClient, Refresh, Status};
//! use netman::client::BearerModifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NetworkClient::builder("https://api.example.com/v2")
//!         .refresh(Refresh::new(Status::Unauthorized, || async {
//!             renew_session().await
//!         }))
//!         .build()?;
//!
//!     let user: User = client
//!         .build("users/42", HttpMethod::Get)?
//!         .modifier(&BearerModifier::new(current_token()))
//!         .with_refresh()
//!         .send()
//!         .await?;
//!
//!     println!("{}", user.name);
//!     Ok(())
//! }
//! ```
//!
//! ## Handling Errors
//!
//! ```
//! use netman::{NetworkError, Status};
//! use bytes::Bytes;
//!
//! let err = NetworkError::ServerStatus {
//!     status: Status::from_code(422),
//!     body: Bytes::from_static(br#"{"message":"name is taken"}"#),
//! };
//!
//! assert_eq!(err.status(), Some(Status::Other(422)));
//! #[derive(serde::Deserialize)]
//! struct ApiMessage {
//!     message: String,
//! }
//! let decoded: ApiMessage = err
//!     .decode_error_body(&netman::JsonCodec)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(decoded.message, "name is taken");
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Request model and raw transport response
//! - **[error]** - Error types and result handling
//! - **[client]** - Builder, executor, refresh and default collaborators
//! - **[protocol]** - Status classification, methods and header names

pub mod client;
pub mod error;
pub mod protocol;
pub mod types;

pub use client::{JsonCodec, NetworkClient, Refresh, RequestBuilder};
pub use error::{BoxError, NetworkError, RefreshError, Result};
pub use protocol::{Authorization, HttpHeader, HttpMethod, MultipartMethod, Status};
pub use types::{HttpRequest, TransportResponse};

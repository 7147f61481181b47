//! HTTP client: request building, execution and credential refresh.
//!
//! This module provides everything between an application and the wire:
//!
//! - **Build requests** against a base URL with typed headers, query items
//!   and encoded bodies
//! - **Upload files** as single-part `multipart/form-data`
//! - **Execute** them over an injectable transport
//! - **Refresh credentials** once on a configured status, with at most one
//!   refresh in flight per client
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch      - NetworkClient facade and its builder
//! ├── builder    - RequestBuilder (standard and multipart)
//! ├── executor   - RequestExecutor, status handling and retry
//! ├── refresh    - Refresh descriptor and single-flight coordinator
//! ├── transport  - HttpTransport trait and the reqwest transport
//! ├── codec      - Body encoder/decoder traits and JsonCodec
//! ├── modifier   - Request modifiers (authorization)
//! ├── multipart  - Multipart body assembly
//! └── config     - Transport configuration
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`NetworkClient`] | Base URL plus shared executor |
//! | [`RequestBuilder`] | Accumulates and dispatches one request |
//! | [`RequestExecutor`] | Sends requests and interprets statuses |
//! | [`Refresh`] | Trigger status plus refresh operation |
//! | [`HttpTransport`] | Pluggable network layer |
//! | [`ClientConfig`] | Default transport configuration |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use netman::client::{ClientConfig, NetworkClient};
//!
//! // Default configuration
//! let client = NetworkClient::new("https://api.test").unwrap();
//!
//! // Custom configuration
//! let client = NetworkClient::builder("https://api.test")
//!     .config(ClientConfig {
//!         request_timeout_ms: 5_000,
//!         ..Default::default()
//!     })
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Authorizing Requests
//!
//! ```
//! use netman::client::{AuthorizationModifier, NetworkClient};
//! use netman::{Authorization, HttpMethod};
//!
//! let client = NetworkClient::new("https://api.test").unwrap();
//! let auth = AuthorizationModifier::new(Authorization::basic_credentials("ada", "s3cret"));
//! let builder = client.build("me", HttpMethod::Get).unwrap().modifier(&auth);
//! assert_eq!(
//!     builder.request().header("Authorization"),
//!     Some("Basic YWRhOnMzY3JldA==")
//! );
//! ```

mod builder;
mod codec;
mod config;
mod executor;
mod fetch;
mod modifier;
mod multipart;
mod refresh;
mod transport;

pub use builder::{Multipart, MultipartRequestBuilder, RequestBuilder, Standard};
pub use codec::{BodyDecoder, BodyEncoder, JsonCodec};
pub use config::ClientConfig;
pub use executor::RequestExecutor;
pub use fetch::{NetworkClient, NetworkClientBuilder};
pub use modifier::{AuthorizationModifier, BearerModifier, RequestModifier};
pub use multipart::{GuessMime, MimeLookup, MultipartAssembler, MultipartBody};
pub use refresh::{Refresh, RefreshCoordinator};
pub use transport::{HttpTransport, ReqwestTransport};

//! Error types and result handling.
//!
//! Every failure of a request surfaces to the caller of the terminal send
//! step as a [`NetworkError`]. The variants fall into two groups that callers
//! are expected to tell apart:
//!
//! | Group | Variants |
//! |-------|----------|
//! | Request could not be formed or sent | [`UrlConstruction`], [`QueryParameters`], [`BodyNotAllowed`], [`BodyEncoding`], [`Transport`], [`Io`], [`Refresh`] |
//! | Server answered, but not with success | [`ServerStatus`], [`EmptyResponse`], [`ResponseDecoding`] |
//!
//! [`UrlConstruction`]: NetworkError::UrlConstruction
//! [`QueryParameters`]: NetworkError::QueryParameters
//! [`BodyNotAllowed`]: NetworkError::BodyNotAllowed
//! [`BodyEncoding`]: NetworkError::BodyEncoding
//! [`Transport`]: NetworkError::Transport
//! [`Io`]: NetworkError::Io
//! [`Refresh`]: NetworkError::Refresh
//! [`ServerStatus`]: NetworkError::ServerStatus
//! [`EmptyResponse`]: NetworkError::EmptyResponse
//! [`ResponseDecoding`]: NetworkError::ResponseDecoding

use crate::client::BodyDecoder;
use crate::protocol::{HttpMethod, Status};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Boxed error used for opaque causes (codec and transport failures).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a refresh operation, shared by every caller that joined it.
pub type RefreshError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for all client operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors produced while building, sending or decoding a request.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The base URL (or the current request URL) cannot be decomposed.
    #[error("unable to construct url from '{0}'")]
    UrlConstruction(String),

    /// The URL could not be rebuilt after editing its query component.
    #[error("unable to apply query parameters: {0}")]
    QueryParameters(String),

    /// A body was set on a method that does not carry one.
    #[error("request body is not allowed for {method}")]
    BodyNotAllowed {
        /// Method the request was built with
        method: HttpMethod,
    },

    /// The body encoder failed.
    #[error("unable to encode request body: {0}")]
    BodyEncoding(#[source] BoxError),

    /// The transport completed without HTTP response metadata.
    #[error("empty response")]
    EmptyResponse,

    /// The success body could not be decoded into the requested type.
    #[error("unable to decode response body: {0}")]
    ResponseDecoding(#[source] BoxError),

    /// The server answered with a non-success status.
    #[error("server responded with status {}", .status.code())]
    ServerStatus {
        /// Classified response status
        status: Status,
        /// Raw response body, left for the caller to interpret
        body: Bytes,
    },

    /// The transport failed. The inner error is passed through untouched.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The credential refresh operation failed.
    #[error("credential refresh failed: {0}")]
    Refresh(#[source] RefreshError),

    /// Reading a local file (multipart upload) failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    /// Status carried by a [`NetworkError::ServerStatus`] error.
    pub fn status(&self) -> Option<Status> {
        match self {
            NetworkError::ServerStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw error body carried by a [`NetworkError::ServerStatus`] error.
    pub fn error_body(&self) -> Option<&Bytes> {
        match self {
            NetworkError::ServerStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the server was reached and rejected the request.
    pub fn is_server_status(&self) -> bool {
        matches!(self, NetworkError::ServerStatus { .. })
    }

    /// Decode the raw body of a [`NetworkError::ServerStatus`] error.
    ///
    /// Returns `None` for every other variant. A body that does not match `T`
    /// yields `Some(Err(NetworkError::ResponseDecoding(_)))`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use netman::{JsonCodec, NetworkError, Status};
    ///
    /// #[derive(serde::Deserialize)]
    /// struct ApiFault { message: String }
    ///
    /// let err = NetworkError::ServerStatus {
    ///     status: Status::BadRequest,
    ///     body: Bytes::from_static(br#"{"message":"name is required"}"#),
    /// };
    /// let fault: ApiFault = err.decode_error_body(&JsonCodec).unwrap().unwrap();
    /// assert_eq!(fault.message, "name is required");
    /// ```
    pub fn decode_error_body<T, D>(&self, decoder: &D) -> Option<Result<T>>
    where
        T: DeserializeOwned,
        D: BodyDecoder + ?Sized,
    {
        self.error_body().map(|body| {
            decoder
                .decode(body)
                .map_err(NetworkError::ResponseDecoding)
        })
    }
}

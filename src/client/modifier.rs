//! Request modifiers.
//!
//! A modifier is a pure transform `HttpRequest -> HttpRequest` applied by
//! [`RequestBuilder::modifier`]. It is the hook for cross-cutting edits that
//! the builder itself knows nothing about, such as authentication.
//!
//! Any `Fn(HttpRequest) -> HttpRequest` closure is a modifier.
//!
//! # Examples
//!
//! ```
//! use netman::client::{BearerModifier, RequestModifier};
//! use netman::{HttpMethod, HttpRequest};
//! use url::Url;
//!
//! let request = HttpRequest::new(HttpMethod::Get, Url::parse("https://api.test/me").unwrap());
//! let request = BearerModifier::new("t0k3n").modify(request);
//! assert_eq!(request.header("Authorization"), Some("Bearer t0k3n"));
//! ```
//!
//! [`RequestBuilder::modifier`]: crate::client::RequestBuilder::modifier

use crate::protocol::{Authorization, HttpHeader};
use crate::types::HttpRequest;

/// Pure transform applied to a request before dispatch.
pub trait RequestModifier {
    /// Return the modified request.
    fn modify(&self, request: HttpRequest) -> HttpRequest;
}

impl<F> RequestModifier for F
where
    F: Fn(HttpRequest) -> HttpRequest,
{
    fn modify(&self, request: HttpRequest) -> HttpRequest {
        self(request)
    }
}

/// Adds an `Authorization` header with the given scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationModifier {
    authorization: Authorization,
}

impl AuthorizationModifier {
    /// Modifier adding `authorization`.
    pub fn new(authorization: Authorization) -> Self {
        AuthorizationModifier { authorization }
    }
}

impl RequestModifier for AuthorizationModifier {
    fn modify(&self, mut request: HttpRequest) -> HttpRequest {
        request.add_header(HttpHeader::Authorization, self.authorization.header_value());
        request
    }
}

/// Adds `Authorization: Bearer {token}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerModifier {
    token: String,
}

impl BearerModifier {
    /// Modifier for `token`.
    pub fn new(token: impl Into<String>) -> Self {
        BearerModifier {
            token: token.into(),
        }
    }
}

impl RequestModifier for BearerModifier {
    fn modify(&self, request: HttpRequest) -> HttpRequest {
        AuthorizationModifier::new(Authorization::Bearer(self.token.clone())).modify(request)
    }
}

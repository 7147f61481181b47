//! Protocol vocabulary: status classification, methods and header names.
//!
//! Everything in this module is a pure value type with an exhaustive mapping
//! to and from its wire representation.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Status`] | Semantic category of a response code |
//! | [`HttpMethod`] | Method of an outbound request |
//! | [`MultipartMethod`] | Methods allowed for multipart uploads |
//! | [`HttpHeader`] | Well-known or custom request header name |
//! | [`Authorization`] | Rendered `Authorization` header value |

mod headers;
mod method;
mod status;

pub use headers::{Authorization, HttpHeader};
pub use method::{HttpMethod, MultipartMethod};
pub use status::Status;

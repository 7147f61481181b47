//! Request and response values exchanged with the transport.
//!
//! [`HttpRequest`] is the outbound request model. The request builder owns it
//! exclusively while steps are applied; once handed to the executor it is
//! treated as frozen input and every attempt sends a clone of it.
//!
//! Header names are matched case-insensitively, the way HTTP treats them, and
//! a later write to the same name replaces the earlier value.

use crate::protocol::{HttpHeader, HttpMethod};
use bytes::{Bytes, BytesMut};
use std::collections::BTreeMap;
use url::Url;

/// Outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute target URL
    pub url: Url,
    /// Request method
    pub method: HttpMethod,
    headers: BTreeMap<String, String>,
    /// Encoded body, if any
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Create a request without headers or body.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        HttpRequest {
            url,
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing any value stored under the same name.
    pub fn set_header(&mut self, name: impl Into<HttpHeader>, value: impl Into<String>) {
        let name = name.into();
        self.remove_header(name.as_str());
        self.headers.insert(name.as_str().to_string(), value.into());
    }

    /// Add a header value. An existing value is kept and joined with `", "`.
    pub fn add_header(&mut self, name: impl Into<HttpHeader>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.header_key(name.as_str()) {
            Some(key) => {
                if let Some(existing) = self.headers.get_mut(&key) {
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
            }
            None => {
                self.headers.insert(name.as_str().to_string(), value);
            }
        }
    }

    /// Look up a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_key(name)
            .and_then(|key| self.headers.get(&key))
            .map(String::as_str)
    }

    /// Remove a header, returning its value.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let key = self.header_key(name)?;
        self.headers.remove(&key)
    }

    /// All headers as `(name, value)` pairs.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append bytes to the body. Does nothing when the request has no body.
    pub fn append_body(&mut self, part: &[u8]) {
        if let Some(body) = self.body.take() {
            let mut merged = BytesMut::with_capacity(body.len() + part.len());
            merged.extend_from_slice(&body);
            merged.extend_from_slice(part);
            self.body = Some(merged.freeze());
        }
    }

    fn header_key(&self, name: &str) -> Option<String> {
        self.headers
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()
    }
}

/// Raw response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric status code
    pub status: u16,
    /// Response headers (keys lowercased, values decoded lossily as UTF-8)
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        TransportResponse {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }
}

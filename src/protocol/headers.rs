//! Header names and authorization header values.
//!
//! [`HttpHeader`] is a closed table of well-known request headers plus a
//! [`HttpHeader::Custom`] escape hatch. Two header keys are equal when their
//! wire names are equal, so `HttpHeader::Custom("Authorization".into())` and
//! [`HttpHeader::Authorization`] address the same header.
//!
//! # Header Table
//!
//! | Variant | Wire name |
//! |---------|-----------|
//! | `Aim` | `A-IM` |
//! | `Accept` | `Accept` |
//! | `AcceptCharset` | `Accept-Charset` |
//! | `AcceptDatetime` | `Accept-Datetime` |
//! | `AcceptEncoding` | `Accept-Encoding` |
//! | `AcceptLanguage` | `Accept-Language` |
//! | `Authorization` | `Authorization` |
//! | `CacheControl` | `Cache-Control` |
//! | `Connection` | `Connection` |
//! | `ContentEncoding` | `Content-Encoding` |
//! | `ContentLength` | `Content-Length` |
//! | `ContentType` | `Content-Type` |
//! | `Cookie` | `Cookie` |
//! | `Date` | `Date` |
//! | `Expect` | `Expect` |
//! | `From` | `From` |
//! | `Host` | `Host` |
//! | `IfMatch` | `If-Match` |
//! | `IfModifiedSince` | `If-Modified-Since` |
//! | `IfNoneMatch` | `If-None-Match` |
//! | `IfRange` | `If-Range` |
//! | `IfUnmodifiedSince` | `If-Unmodified-Since` |
//! | `MaxForwards` | `Max-Forwards` |
//! | `Pragma` | `Pragma` |
//! | `Prefer` | `Prefer` |
//! | `Range` | `Range` |
//! | `Referer` | `Referer` |
//! | `TransferEncoding` | `Transfer-Encoding` |
//! | `UserAgent` | `User-Agent` |
//! | `Custom(name)` | `name` unchanged |
//!
//! # Examples
//!
//! ```
//! use netman::protocol::{Authorization, HttpHeader};
//!
//! assert_eq!(HttpHeader::ContentType.as_str(), "Content-Type");
//! assert_eq!(HttpHeader::Custom("Authorization".into()), HttpHeader::Authorization);
//!
//! let value = Authorization::Bearer("abc".into()).header_value();
//! assert_eq!(value, "Bearer abc");
//! ```

use base64::Engine;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Request header key.
#[derive(Debug, Clone)]
pub enum HttpHeader {
    /// Acceptable instance-manipulations for the request.
    Aim,
    /// Media type(s) acceptable for the response.
    Accept,
    /// Acceptable character sets.
    AcceptCharset,
    /// Acceptable version in time.
    AcceptDatetime,
    /// Acceptable encodings.
    AcceptEncoding,
    /// Acceptable human languages.
    AcceptLanguage,
    /// Authentication credentials.
    Authorization,
    /// Caching directives.
    CacheControl,
    /// Connection control options.
    Connection,
    /// Encoding applied to the body.
    ContentEncoding,
    /// Body length in octets.
    ContentLength,
    /// Media type of the body.
    ContentType,
    /// Cookie previously sent with Set-Cookie.
    Cookie,
    /// Origination date of the message.
    Date,
    /// Server behaviors required by the client.
    Expect,
    /// Email address of the user making the request.
    From,
    /// Target host and port.
    Host,
    /// Conditional on matching entity tag.
    IfMatch,
    /// Conditional on modification since a date.
    IfModifiedSince,
    /// Conditional on non-matching entity tag.
    IfNoneMatch,
    /// Conditional range request.
    IfRange,
    /// Conditional on no modification since a date.
    IfUnmodifiedSince,
    /// Forwarding limit through proxies.
    MaxForwards,
    /// Implementation-specific directives.
    Pragma,
    /// Preferred server behaviors.
    Prefer,
    /// Byte range request.
    Range,
    /// Address of the previous page.
    Referer,
    /// Transfer encoding of the entity.
    TransferEncoding,
    /// User agent string.
    UserAgent,
    /// Any other header, by wire name.
    Custom(String),
}

impl HttpHeader {
    /// Wire name of the header.
    pub fn as_str(&self) -> &str {
        match self {
            HttpHeader::Aim => "A-IM",
            HttpHeader::Accept => "Accept",
            HttpHeader::AcceptCharset => "Accept-Charset",
            HttpHeader::AcceptDatetime => "Accept-Datetime",
            HttpHeader::AcceptEncoding => "Accept-Encoding",
            HttpHeader::AcceptLanguage => "Accept-Language",
            HttpHeader::Authorization => "Authorization",
            HttpHeader::CacheControl => "Cache-Control",
            HttpHeader::Connection => "Connection",
            HttpHeader::ContentEncoding => "Content-Encoding",
            HttpHeader::ContentLength => "Content-Length",
            HttpHeader::ContentType => "Content-Type",
            HttpHeader::Cookie => "Cookie",
            HttpHeader::Date => "Date",
            HttpHeader::Expect => "Expect",
            HttpHeader::From => "From",
            HttpHeader::Host => "Host",
            HttpHeader::IfMatch => "If-Match",
            HttpHeader::IfModifiedSince => "If-Modified-Since",
            HttpHeader::IfNoneMatch => "If-None-Match",
            HttpHeader::IfRange => "If-Range",
            HttpHeader::IfUnmodifiedSince => "If-Unmodified-Since",
            HttpHeader::MaxForwards => "Max-Forwards",
            HttpHeader::Pragma => "Pragma",
            HttpHeader::Prefer => "Prefer",
            HttpHeader::Range => "Range",
            HttpHeader::Referer => "Referer",
            HttpHeader::TransferEncoding => "Transfer-Encoding",
            HttpHeader::UserAgent => "User-Agent",
            HttpHeader::Custom(name) => name,
        }
    }
}

impl PartialEq for HttpHeader {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for HttpHeader {}

impl Hash for HttpHeader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for HttpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HttpHeader {
    fn from(name: &str) -> Self {
        HttpHeader::Custom(name.to_string())
    }
}

impl From<String> for HttpHeader {
    fn from(name: String) -> Self {
        HttpHeader::Custom(name)
    }
}

/// Value of an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// `Basic {token}`; the token is already encoded
    Basic(String),
    /// `Bearer {token}`
    Bearer(String),
    /// Full header value, sent as is
    Other(String),
}

impl Authorization {
    /// Basic credentials from a user name and password.
    ///
    /// ```
    /// use netman::protocol::Authorization;
    ///
    /// let auth = Authorization::basic_credentials("aladdin", "opensesame");
    /// assert_eq!(auth.header_value(), "Basic YWxhZGRpbjpvcGVuc2VzYW1l");
    /// ```
    pub fn basic_credentials(user: &str, password: &str) -> Self {
        let token = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
        Authorization::Basic(token)
    }

    /// Rendered header value.
    pub fn header_value(&self) -> String {
        match self {
            Authorization::Basic(token) => format!("Basic {}", token),
            Authorization::Bearer(token) => format!("Bearer {}", token),
            Authorization::Other(full) => full.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_wire_names() {
        assert_eq!(HttpHeader::Aim.as_str(), "A-IM");
        assert_eq!(HttpHeader::ContentType.as_str(), "Content-Type");
        assert_eq!(HttpHeader::IfUnmodifiedSince.as_str(), "If-Unmodified-Since");
        assert_eq!(HttpHeader::UserAgent.as_str(), "User-Agent");
        assert_eq!(HttpHeader::Custom("X-Trace".into()).as_str(), "X-Trace");
    }

    #[test]
    fn test_custom_equals_named() {
        let custom = HttpHeader::Custom("Authorization".into());
        assert_eq!(custom, HttpHeader::Authorization);

        let mut map = HashMap::new();
        map.insert(HttpHeader::Authorization, "a");
        map.insert(custom, "b");
        assert_eq!(map.len(), 1);
        assert_eq!(map[&HttpHeader::Authorization], "b");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(HttpHeader::from("Accept"), HttpHeader::Accept);
        assert_ne!(HttpHeader::from("X-Other"), HttpHeader::Accept);
    }

    #[test]
    fn test_authorization_values() {
        assert_eq!(Authorization::Basic("dG9rZW4=".into()).header_value(), "Basic dG9rZW4=");
        assert_eq!(Authorization::Bearer("abc".into()).header_value(), "Bearer abc");
        assert_eq!(
            Authorization::Other("Token xyz".into()).header_value(),
            "Token xyz"
        );
    }

    #[test]
    fn test_basic_credentials() {
        let auth = Authorization::basic_credentials("user", "pass");
        assert_eq!(auth, Authorization::Basic("dXNlcjpwYXNz".into()));
    }
}

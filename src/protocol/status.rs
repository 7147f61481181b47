//! Response status classification.
//!
//! [`Status::from_code`] is total: every numeric code maps to exactly one
//! [`Status`]. The canonical codes get a named category, anything else is kept
//! verbatim in [`Status::Other`].
//!
//! | Code | Status |
//! |------|--------|
//! | 200 | [`Status::Success`] |
//! | 300 | [`Status::MultipleChoices`] |
//! | 400 | [`Status::BadRequest`] |
//! | 401 | [`Status::Unauthorized`] |
//! | 403 | [`Status::Forbidden`] |
//! | 404 | [`Status::NotFound`] |
//! | 500 | [`Status::InternalServerError`] |
//! | 502, 503 | [`Status::ServiceUnavailable`] |
//! | anything else | [`Status::Other`] |
//!
//! 502 and 503 share one category, so the round trip `code -> Status -> code`
//! turns 502 into 503. [`Status::BadGateway`] can still be named (for example
//! as a refresh trigger) and reports 502, but classification never yields it.

use std::fmt;
use std::ops::Range;

/// Semantic response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200
    Success,
    /// 300
    MultipleChoices,
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    InternalServerError,
    /// 502; never produced by [`Status::from_code`]
    BadGateway,
    /// 503 (also what 502 classifies to)
    ServiceUnavailable,
    /// Any code without a named category
    Other(u16),
}

impl Status {
    /// Classify a numeric response code.
    ///
    /// # Examples
    ///
    /// ```
    /// use netman::Status;
    ///
    /// assert_eq!(Status::from_code(401), Status::Unauthorized);
    /// assert_eq!(Status::from_code(502), Status::ServiceUnavailable);
    /// assert_eq!(Status::from_code(418), Status::Other(418));
    /// ```
    pub fn from_code(code: u16) -> Self {
        match code {
            200 => Status::Success,
            300 => Status::MultipleChoices,
            400 => Status::BadRequest,
            401 => Status::Unauthorized,
            403 => Status::Forbidden,
            404 => Status::NotFound,
            500 => Status::InternalServerError,
            502 | 503 => Status::ServiceUnavailable,
            other => Status::Other(other),
        }
    }

    /// Representative numeric code of this status.
    pub fn code(&self) -> u16 {
        match self {
            Status::Success => 200,
            Status::MultipleChoices => 300,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
            Status::BadGateway => 502,
            Status::ServiceUnavailable => 503,
            Status::Other(code) => *code,
        }
    }

    /// Range of codes treated as success: `[200, 300)`.
    pub fn success_codes() -> Range<u16> {
        Status::Success.code()..Status::MultipleChoices.code()
    }

    /// Whether the underlying code lies in [`Status::success_codes`].
    #[inline]
    pub fn is_success(&self) -> bool {
        Self::success_codes().contains(&self.code())
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Self {
        Status::from_code(code)
    }
}

impl From<http::StatusCode> for Status {
    fn from(code: http::StatusCode) -> Self {
        Status::from_code(code.as_u16())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: [u16; 9] = [200, 300, 400, 401, 403, 404, 500, 502, 503];

    #[test]
    fn test_canonical_round_trip() {
        for code in CANONICAL {
            let expected = if code == 502 { 503 } else { code };
            assert_eq!(Status::from_code(code).code(), expected, "code {code}");
        }
    }

    #[test]
    fn test_bad_gateway_collapses_into_service_unavailable() {
        // The one non-bijective mapping.
        assert_eq!(Status::from_code(502), Status::from_code(503));
        assert_eq!(Status::from_code(502), Status::ServiceUnavailable);
        assert_eq!(Status::BadGateway.code(), 502);
        assert_ne!(Status::from_code(Status::BadGateway.code()), Status::BadGateway);
    }

    #[test]
    fn test_other_codes_preserved() {
        for code in [0, 1, 100, 201, 204, 301, 302, 304, 402, 405, 418, 429, 501, 504, 599, 999, u16::MAX] {
            assert_eq!(Status::from_code(code), Status::Other(code));
            assert_eq!(Status::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_is_success() {
        for code in 0..=1000u16 {
            assert_eq!(
                Status::from_code(code).is_success(),
                (200..300).contains(&code),
                "code {code}"
            );
        }
    }

    #[test]
    fn test_success_codes() {
        assert_eq!(Status::success_codes(), 200..300);
    }

    #[test]
    fn test_from_http_status_code() {
        assert_eq!(Status::from(http::StatusCode::NOT_FOUND), Status::NotFound);
        assert_eq!(Status::from(http::StatusCode::CREATED), Status::Other(201));
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Unauthorized.to_string(), "401");
        assert_eq!(Status::Other(418).to_string(), "418");
    }
}

//! HTTP status codes understood by the term service.

use std::fmt;

/// An HTTP status code as returned by the term service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200: the requested term was returned.
    pub const OK: StatusCode = StatusCode(200);
    /// 201: the term was created.
    pub const CREATED: StatusCode = StatusCode(201);
    /// 304: the term has not changed since the given date.
    pub const NOT_MODIFIED: StatusCode = StatusCode(304);
    /// 400: the request was malformed.
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 403: the API key may not perform this request.
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    /// 404: no such term.
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 405: the method is not allowed on the resource.
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    /// 409: the term already exists.
    pub const CONFLICT: StatusCode = StatusCode(409);
    /// 410: the term was deleted.
    pub const GONE: StatusCode = StatusCode(410);
    /// 500: the service failed.
    pub const SERVER_ERROR: StatusCode = StatusCode(500);

    /// Wraps a raw status code.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true for 2xx codes.
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns a short description of the code, if it is one the service uses.
    pub fn reason(&self) -> Option<&'static str> {
        let reason = match *self {
            Self::OK => "OK",
            Self::CREATED => "Created",
            Self::NOT_MODIFIED => "Not modified",
            Self::BAD_REQUEST => "Bad request",
            Self::FORBIDDEN => "Forbidden",
            Self::NOT_FOUND => "Not found",
            Self::METHOD_NOT_ALLOWED => "Method not allowed",
            Self::CONFLICT => "Conflict",
            Self::GONE => "Gone",
            Self::SERVER_ERROR => "Server error",
            _ => return None,
        };
        Some(reason)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} {}", self.0, reason),
            None => write!(f, "{}", self.0),
        }
    }
}

//! Resource paths and request headers.

use crate::ids::TermId;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// Header carrying the application's API key.
pub const AUTHORIZATION_HEADER: &str = "X-Folksaurus-Authorization";

/// Conditional request header.
pub const IF_MODIFIED_SINCE_HEADER: &str = "If-Modified-Since";

/// Default number of entries returned by a term-list search.
pub const DEFAULT_TERM_LIST_LIMIT: u32 = 25;

/// RFC 3986 unreserved characters stay as they are, everything else is escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A resource on the term service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<'a> {
    /// A term addressed by its service id.
    TermById(&'a TermId),
    /// A term addressed by its name. Also the target of create requests.
    TermByName(&'a str),
    /// Terms whose names start with `prefix`, at most `limit` of them.
    TermList {
        /// Name prefix.
        prefix: &'a str,
        /// Maximum number of entries.
        limit: u32,
    },
}

impl Resource<'_> {
    /// Returns the absolute URL of this resource under `base_url`.
    ///
    /// `base_url` is expected without a trailing slash.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self)
    }
}

impl fmt::Display for Resource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::TermById(id) => {
                write!(f, "/api/term/id/{}/", utf8_percent_encode(id.as_str(), PATH_SEGMENT))
            }
            Resource::TermByName(name) => {
                write!(f, "/api/term/{}/", utf8_percent_encode(name, PATH_SEGMENT))
            }
            Resource::TermList { prefix, limit } => write!(
                f,
                "/api/term-list/{}/{}/",
                utf8_percent_encode(prefix, PATH_SEGMENT),
                limit
            ),
        }
    }
}

/// Formats a unix timestamp as an HTTP date (`Sun, 06 Nov 1994 08:49:37 GMT`).
///
/// Timestamps outside the representable range are clamped to the epoch.
pub fn http_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Returns the authorization header for `api_key`.
pub fn authorization_header(api_key: &str) -> (String, String) {
    (AUTHORIZATION_HEADER.to_string(), api_key.to_string())
}

/// Returns the conditional header for a unix timestamp.
pub fn if_modified_since_header(timestamp: i64) -> (String, String) {
    (IF_MODIFIED_SINCE_HEADER.to_string(), http_date(timestamp))
}

//! Tagged result of a single remote call.

use crate::status::StatusCode;

/// What the service said in answer to one request.
///
/// Each variant corresponds to a status that drives a distinct branch of
/// term reconciliation. The payload travels with the status it arrived
/// under, so no caller ever has to ask a client for its "last" status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// 200 with a body.
    Found(T),
    /// 201 with a body.
    Created(T),
    /// 409 with a body naming the already existing term.
    Conflict(T),
    /// 304: unchanged since the given date.
    NotModified,
    /// 404.
    NotFound,
    /// 410: the term was deleted on the service.
    Gone,
    /// 403.
    Forbidden,
    /// Any other status, or a status that should carry a body but did not.
    Unexpected(StatusCode),
}

impl<T> Outcome<T> {
    /// Builds an outcome from a status and an optionally decoded payload.
    pub fn from_status(status: StatusCode, payload: Option<T>) -> Self {
        match (status, payload) {
            (StatusCode::OK, Some(value)) => Outcome::Found(value),
            (StatusCode::CREATED, Some(value)) => Outcome::Created(value),
            (StatusCode::CONFLICT, Some(value)) => Outcome::Conflict(value),
            (StatusCode::NOT_MODIFIED, _) => Outcome::NotModified,
            (StatusCode::NOT_FOUND, _) => Outcome::NotFound,
            (StatusCode::GONE, _) => Outcome::Gone,
            (StatusCode::FORBIDDEN, _) => Outcome::Forbidden,
            (status, _) => Outcome::Unexpected(status),
        }
    }

    /// Returns the status this outcome was built from.
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Found(_) => StatusCode::OK,
            Outcome::Created(_) => StatusCode::CREATED,
            Outcome::Conflict(_) => StatusCode::CONFLICT,
            Outcome::NotModified => StatusCode::NOT_MODIFIED,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::Gone => StatusCode::GONE,
            Outcome::Forbidden => StatusCode::FORBIDDEN,
            Outcome::Unexpected(status) => *status,
        }
    }

    /// Returns true if the outcome carries a payload.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            Outcome::Found(_) | Outcome::Created(_) | Outcome::Conflict(_)
        )
    }

    /// Returns the payload, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Found(value) | Outcome::Created(value) | Outcome::Conflict(value) => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Consumes the outcome and returns the payload, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Found(value) | Outcome::Created(value) | Outcome::Conflict(value) => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Maps the payload, keeping the status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::Created(value) => Outcome::Created(f(value)),
            Outcome::Conflict(value) => Outcome::Conflict(f(value)),
            Outcome::NotModified => Outcome::NotModified,
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Gone => Outcome::Gone,
            Outcome::Forbidden => Outcome::Forbidden,
            Outcome::Unexpected(status) => Outcome::Unexpected(status),
        }
    }

    /// Re-tags a payload-less outcome for a different payload type.
    ///
    /// Outcomes that carry a payload become `Unexpected` with their status.
    pub fn without_value<U>(&self) -> Outcome<U> {
        match self {
            Outcome::NotModified => Outcome::NotModified,
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Gone => Outcome::Gone,
            Outcome::Forbidden => Outcome::Forbidden,
            other => Outcome::Unexpected(other.status()),
        }
    }
}

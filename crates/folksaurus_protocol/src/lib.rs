//! # Folksaurus Protocol
//!
//! Wire types for the Folksaurus controlled-vocabulary service.
//!
//! This crate provides:
//! - `StatusCode` with the codes the term service answers with
//! - `TermRecord` / `SummaryRecord`, the flat JSON term records
//! - `Outcome`, the tagged result of a single remote call
//! - `Resource` paths and request header helpers
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod ids;
mod outcome;
mod record;
mod resource;
mod status;

pub use error::{ProtocolError, ProtocolResult};
pub use ids::{AppId, TermId};
pub use outcome::Outcome;
pub use record::{decode_id_body, decode_summaries, decode_term, SummaryRecord, TermRecord};
pub use resource::{
    authorization_header, http_date, if_modified_since_header, Resource, AUTHORIZATION_HEADER,
    DEFAULT_TERM_LIST_LIMIT, IF_MODIFIED_SINCE_HEADER,
};
pub use status::StatusCode;

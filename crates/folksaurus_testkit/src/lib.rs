//! # Folksaurus Testkit
//!
//! Test utilities for the Folksaurus client.
//!
//! This crate provides:
//! - An in-memory term service that speaks the HTTP protocol
//! - A local store that records every write
//! - Term fixtures and proptest generators
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folksaurus_testkit::prelude::*;
//!
//! #[test]
//! fn lookup_through_http() {
//!     let service = Arc::new(TermService::new(API_KEY));
//!     let foo = service.insert(foo_record());
//!     let manager = manager_for(&service, Arc::new(RecordingStore::new()));
//!     // ... lookups
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod service;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::service::*;
    pub use crate::store::*;
}

pub use fixtures::*;
pub use generators::*;
pub use service::*;
pub use store::*;

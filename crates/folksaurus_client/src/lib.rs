//! # Folksaurus Client
//!
//! Term retrieval and local cache synchronisation for the Folksaurus term
//! service.
//!
//! This crate provides:
//! - Term and term summary value objects with derived status
//! - A transport abstraction with an HTTP implementation
//! - The term manager, which reconciles cached terms with the service
//! - In-memory and file-backed local stores
//!
//! ## Reconciliation
//!
//! Every lookup runs in two phases:
//! 1. Look the term up in the local store
//! 2. If the cached copy is older than the expire time, ask the service and
//!    update the store with the answer
//!
//! ## Key Invariants
//!
//! - A fresh cached term never causes a remote call
//! - The service id is checked before the name
//! - A term the service reports gone is soft-deleted locally
//! - Any other failure to refresh returns the cached term

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod manager;
#[cfg(feature = "reqwest")]
mod reqwest_client;
mod store;
mod term;
mod transport;

pub use config::{ClientConfig, DEFAULT_EXPIRE_TIME, REQUIRED_KEYS};
pub use error::{FolksaurusError, FolksaurusResult};
pub use http::{HttpClient, HttpRequest, HttpResponse, HttpTransport, Method};
pub use manager::TermManager;
#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
pub use store::{FileStore, LocalStore, MemoryStore, StoredTerm};
pub use term::{Preferred, Term, TermResolver, TermStatus, TermSummary};
pub use transport::{MockTransport, TermTransport, TransportCall};

pub use folksaurus_protocol::{AppId, Outcome, StatusCode, SummaryRecord, TermId, TermRecord};

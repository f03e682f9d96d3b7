//! Blocking [`HttpClient`] over reqwest.

use crate::error::{FolksaurusError, FolksaurusResult};
use crate::http::{HttpClient, HttpRequest, HttpResponse, Method};
use folksaurus_protocol::StatusCode;
use std::time::Duration;

/// An [`HttpClient`] backed by `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Builds a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns a fatal transport error if the TLS backend cannot be set up.
    pub fn new(timeout: Duration) -> FolksaurusResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("folksaurus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FolksaurusError::transport_fatal(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Put => self.client.put(&request.url),
        };
        // reqwest derives Content-Length from the body.
        for (name, value) in &request.headers {
            if !name.eq_ignore_ascii_case("content-length") {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        let response = builder
            .body(request.body.clone())
            .send()
            .map_err(|e| e.to_string())?;
        let status = StatusCode::new(response.status().as_u16());
        let body = response.bytes().map_err(|e| e.to_string())?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

//! HTTP transport implementation.
//!
//! This module maps term operations onto the service's REST resources.
//! The actual HTTP client is abstracted via a trait so the transport can run
//! over reqwest, another HTTP library, or an in-process fake.

use crate::config::ClientConfig;
use crate::error::{FolksaurusError, FolksaurusResult};
use crate::transport::TermTransport;
use folksaurus_protocol::{
    authorization_header, decode_id_body, decode_summaries, decode_term,
    if_modified_since_header, Outcome, Resource, StatusCode, SummaryRecord, TermId, TermRecord,
};
use std::sync::Arc;
use tracing::debug;

/// HTTP method used by the term service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// PUT.
    Put,
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs, in the order they are sent.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Returns the value of the first header called `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. An `Err` means
/// no response was received at all; any received status, including 4xx and
/// 5xx, must be returned as `Ok`.
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the response.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        (**self).execute(request)
    }
}

/// HTTP-based term transport.
///
/// Every request carries the authorization header; conditional requests also
/// carry `If-Modified-Since`. Bodies are JSON.
pub struct HttpTransport<C: HttpClient> {
    api_key: String,
    /// Base URL of the term service, without trailing slash.
    base_url: String,
    client: C,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new HTTP transport.
    pub fn new(api_key: impl Into<String>, base_url: impl AsRef<str>, client: C) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url
                .as_ref()
                .trim_matches(|c| c == '/' || c == ' ')
                .to_string(),
            client,
        }
    }

    /// Creates a transport using the key and URL from `config`.
    pub fn from_config(config: &ClientConfig, client: C) -> Self {
        Self::new(config.api_key.clone(), &config.api_url, client)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn request(
        &self,
        method: Method,
        resource: &Resource<'_>,
        mut headers: Vec<(String, String)>,
    ) -> HttpRequest {
        headers.push(authorization_header(&self.api_key));
        HttpRequest {
            method,
            url: resource.url(&self.base_url),
            headers,
            body: Vec::new(),
        }
    }

    fn send(&self, request: HttpRequest) -> FolksaurusResult<HttpResponse> {
        let response = self
            .client
            .execute(&request)
            .map_err(FolksaurusError::transport_retryable)?;
        debug!(
            method = ?request.method,
            url = %request.url,
            status = response.status.as_u16(),
            "term service request"
        );
        Ok(response)
    }

    fn get_term(
        &self,
        resource: Resource<'_>,
        since: Option<i64>,
    ) -> FolksaurusResult<Outcome<TermRecord>> {
        let headers = since.map(if_modified_since_header).into_iter().collect();
        let response = self.send(self.request(Method::Get, &resource, headers))?;
        let record = if response.status.is_success() {
            decode_term(&response.body)?
        } else {
            None
        };
        Ok(Outcome::from_status(response.status, record))
    }
}

impl<C: HttpClient> TermTransport for HttpTransport<C> {
    fn get_term_by_id(&self, id: &TermId) -> FolksaurusResult<Outcome<TermRecord>> {
        self.get_term(Resource::TermById(id), None)
    }

    fn get_term_by_id_if_modified_since(
        &self,
        id: &TermId,
        since: i64,
    ) -> FolksaurusResult<Outcome<TermRecord>> {
        self.get_term(Resource::TermById(id), Some(since))
    }

    fn get_term_by_name(&self, name: &str) -> FolksaurusResult<Outcome<TermRecord>> {
        self.get_term(Resource::TermByName(name), None)
    }

    fn get_term_by_name_if_modified_since(
        &self,
        name: &str,
        since: i64,
    ) -> FolksaurusResult<Outcome<TermRecord>> {
        self.get_term(Resource::TermByName(name), Some(since))
    }

    fn create_term(&self, name: &str) -> FolksaurusResult<Outcome<TermId>> {
        let headers = vec![("Content-Length".to_string(), "0".to_string())];
        let request = self.request(Method::Put, &Resource::TermByName(name), headers);
        let response = self.send(request)?;
        let id = if response.status.is_success() || response.status == StatusCode::CONFLICT {
            decode_id_body(&response.body)?
        } else {
            None
        };
        Ok(Outcome::from_status(response.status, id))
    }

    fn get_term_list(
        &self,
        prefix: &str,
        limit: u32,
    ) -> FolksaurusResult<Outcome<Vec<SummaryRecord>>> {
        let resource = Resource::TermList { prefix, limit };
        let response = self.send(self.request(Method::Get, &resource, Vec::new()))?;
        let list = if response.status.is_success() {
            Some(decode_summaries(&response.body)?)
        } else {
            None
        };
        Ok(Outcome::from_status(response.status, list))
    }
}

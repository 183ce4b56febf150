//! HTTP client abstraction for the Twitch integrations.
//!
//! Token refreshes and Helix lookups go through [`HttpClient`] so they can be
//! exercised without real network requests. The default implementation wraps
//! reqwest; tests use `MockHttpClient` (unit tests) or
//! [`crate::test_utils::ScriptedHttpClient`] (integration tests).
//!
//! Non-success statuses are *not* errors at this layer: callers inspect
//! [`HttpResponse::status`] and decide. Only transport failures return `Err`.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest;

use crate::Error;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error>;

    /// POST with an `application/x-www-form-urlencoded` body.
    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<HttpResponse, Error>;
}

#[derive(Clone, Default)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<HttpResponse, Error> {
        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

// File: commandcenter-core/src/test_utils/helpers.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::Error;
use crate::clock::Clock;
use crate::http::{HttpClient, HttpResponse};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// One request seen by [`ScriptedHttpClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub form: Vec<(String, String)>,
}

/// Answers requests from canned responses keyed by URL substring and keeps a
/// log of every request. Unmatched URLs get a 404.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<Vec<(String, HttpResponse)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `status`/`body` for any URL containing `pattern`. Re-scripting
    /// the same pattern replaces the earlier response.
    pub fn respond(&self, pattern: &str, status: u16, body: &str) -> &Self {
        let mut routes = self.routes.lock();
        routes.retain(|(p, _)| p != pattern);
        routes.push((pattern.to_string(), HttpResponse::new(status, body)));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn count_matching(&self, pattern: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.url.contains(pattern)).count()
    }

    fn answer(&self, request: RecordedRequest) -> HttpResponse {
        let response = self
            .routes
            .lock()
            .iter()
            .find(|(p, _)| request.url.contains(p.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| HttpResponse::new(404, format!("no scripted response for {}", request.url)));
        self.requests.lock().push(request);
        response
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        Ok(self.answer(RecordedRequest {
            method: "GET",
            url,
            headers,
            form: Vec::new(),
        }))
    }

    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<HttpResponse, Error> {
        Ok(self.answer(RecordedRequest {
            method: "POST",
            url,
            headers: HashMap::new(),
            form,
        }))
    }
}

// HTTP transport boundary.
// All GitHub network I/O goes through `HttpTransport`; tests swap in `MockTransport`.

use async_trait::async_trait;
use thiserror::Error;

/// HTTP headers represented as key/value pairs.
///
/// Header names are treated case-insensitively by helper functions.
pub type HttpHeaders = Vec<(String, String)>;

/// A GET request. The API surface is read-only, so there is no method or body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HttpHeaders,
}

/// A minimal HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("no mock response registered for GET {url}")]
    NoMockResponse { url: String },
}

/// Transport boundary for all HTTP I/O.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Get the first header value matching `name` (case-insensitive).
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// A real HTTP transport backed by reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: std::time::Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.client.get(&request.url);
        for (k, v) in &request.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = resp.status();
        let headers: HttpHeaders = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
pub mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    /// In-memory mock transport.
    ///
    /// Responses are queued per URL and served in FIFO order. An optional
    /// latency makes each request suspend, which lets tests interleave
    /// concurrent callers under a paused tokio clock.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        inner: Arc<Mutex<MockTransportInner>>,
        latency: Option<Duration>,
    }

    #[derive(Default)]
    struct MockTransportInner {
        routes: HashMap<String, VecDeque<Result<HttpResponse, String>>>,
        requests: Vec<HttpRequest>,
        /// Extra latency for URLs starting with a prefix.
        slow_prefixes: Vec<(String, Duration)>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Delay requests whose URL starts with `prefix`, overriding the
        /// transport-wide latency.
        pub fn slow_down(&self, prefix: impl Into<String>, latency: Duration) {
            let mut inner = self.inner.lock().expect("mock transport lock");
            inner.slow_prefixes.push((prefix.into(), latency));
        }

        pub fn push_response(&self, url: impl Into<String>, response: HttpResponse) {
            let mut inner = self.inner.lock().expect("mock transport lock");
            inner
                .routes
                .entry(url.into())
                .or_default()
                .push_back(Ok(response));
        }

        /// Queue a JSON body with a 200 status.
        pub fn push_json(&self, url: impl Into<String>, body: serde_json::Value) {
            self.push_response(url, json_response(200, "OK", body, Vec::new()));
        }

        /// Queue a transport-level failure.
        pub fn push_failure(&self, url: impl Into<String>, message: impl Into<String>) {
            let mut inner = self.inner.lock().expect("mock transport lock");
            inner
                .routes
                .entry(url.into())
                .or_default()
                .push_back(Err(message.into()));
        }

        #[must_use]
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.inner.lock().expect("mock transport lock").requests.clone()
        }

        pub fn request_count(&self) -> usize {
            self.inner.lock().expect("mock transport lock").requests.len()
        }
    }

    pub fn json_response(
        status: u16,
        status_text: &str,
        body: serde_json::Value,
        headers: HttpHeaders,
    ) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            headers,
            body: serde_json::to_vec(&body).expect("serialize mock body"),
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let (next, latency) = {
                let mut inner = self.inner.lock().expect("mock transport lock");
                let url = request.url.clone();
                let latency = inner
                    .slow_prefixes
                    .iter()
                    .find(|(prefix, _)| url.starts_with(prefix.as_str()))
                    .map(|(_, latency)| *latency)
                    .or(self.latency);
                inner.requests.push(request);
                let next = inner.routes.get_mut(&url).and_then(|q| q.pop_front()).ok_or(url);
                (next, latency)
            };

            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }

            match next {
                Ok(Ok(resp)) => Ok(resp),
                Ok(Err(message)) => Err(HttpError::Transport(message)),
                Err(url) => Err(HttpError::NoMockResponse { url }),
            }
        }
    }
}

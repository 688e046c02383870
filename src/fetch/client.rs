//! HTTP fetcher backed by reqwest
//!
//! Production implementation of the `Fetcher` trait used by the cache
//! warmer binary. Responses are classified as basic (same-origin) or
//! opaque by comparing the final response URL against the app origin,
//! so redirects off-origin demote a response to opaque.

use async_trait::async_trait;
use http::StatusCode;

use super::{origin_of, FetchError, Fetcher, Request, Response, ResponseKind};

pub struct HttpFetcher {
    client: reqwest::Client,
    origin: String,
}

impl HttpFetcher {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.into(),
        }
    }

    fn classify(&self, final_url: &str) -> ResponseKind {
        match origin_of(final_url) {
            Some(o) if o == self.origin => ResponseKind::Basic,
            None => ResponseKind::Basic,
            _ => ResponseKind::Opaque,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let resp = self
            .client
            .request(method, &request.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    FetchError::NetworkUnavailable
                } else {
                    FetchError::RequestFailed(e.to_string())
                }
            })?;

        let kind = self.classify(resp.url().as_str());
        let status = StatusCode::from_u16(resp.status().as_u16())
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Response::new(status, headers, body, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_classifies_same_origin_as_basic() {
        let fetcher = HttpFetcher::new("https://app.example");
        assert_eq!(
            fetcher.classify("https://app.example/index.html"),
            ResponseKind::Basic
        );
    }

    #[test]
    fn test_http_fetcher_classifies_cross_origin_as_opaque() {
        let fetcher = HttpFetcher::new("https://app.example");
        assert_eq!(
            fetcher.classify("https://cdn.example/lib.js"),
            ResponseKind::Opaque
        );
    }

    #[test]
    fn test_http_fetcher_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpFetcher>();
    }
}

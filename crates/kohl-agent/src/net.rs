//! HTTP network backend
//!
//! Production [`Network`] implementation over reqwest. Same-origin paths
//! from the manifest are resolved against the configured origin.

use std::collections::HashMap;

use kohl_cache::CachedResponse;

use crate::fetch::{NetError, Network};

/// Network backend that fetches over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
    origin: String,
}

impl HttpNetwork {
    /// Create a backend rooted at `origin`, e.g. `https://kohlmeyer.app`.
    pub fn new(origin: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.origin, url)
        }
    }
}

impl Network for HttpNetwork {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, NetError> {
        let target = self.absolute(url);
        tracing::debug!(url = %target, "HTTP GET");

        let response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|err| NetError::Network(err.to_string()))?;

        let status = response.status();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| NetError::Network(err.to_string()))?
            .to_vec();

        Ok(CachedResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

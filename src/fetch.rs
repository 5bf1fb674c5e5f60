//! HTTP implementation of [`Fetcher`].

use crate::traits::{Fetched, Fetcher, LookupError};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("pkginfo/", env!("CARGO_PKG_VERSION"));

/// Issues plain GET requests over a shared, pooled client.
///
/// Client error statuses (4xx) are not failures here: package sites answer
/// unknown packages with an error page the adapters know how to read.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Fetched, LookupError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Network(format!("Request to {} timed out", url))
            } else {
                LookupError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        check_status(status, url)?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Network(format!("Failed to read response body: {}", e)))?;

        debug!(status = status.as_u16(), bytes = body.len(), "Response received");
        Ok(Fetched {
            body: body.to_vec(),
            content_type,
        })
    }
}

fn check_status(status: StatusCode, url: &str) -> Result<(), LookupError> {
    if status.is_server_error() {
        warn!("{} answered {}", url, status);
        return Err(LookupError::Network(format!("HTTP {} from {}", status, url)));
    }
    Ok(())
}

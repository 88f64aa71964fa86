//! HTTP range reads, e.g. against a pre-signed object URL.

use crate::error::{RemoteError, Result};
use crate::range::RangeRead;
use async_trait::async_trait;
use reqwest::header::RANGE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// [`RangeRead`] over a single HTTP(S) URL using `Range` requests.
#[derive(Debug, Clone)]
pub struct HttpRangeReader {
    http: Client,
    url: String,
}

impl HttpRangeReader {
    /// Create a reader with a default client.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("SoulBucketIndexer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Self::with_client(http, url)
    }

    /// Create a reader sharing an existing client.
    pub fn with_client(http: Client, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let parsed = url::Url::parse(&url).map_err(|e| RemoteError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        Ok(Self { http, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RangeRead for HttpRangeReader {
    async fn read(&self, length: usize, position: u64) -> Result<Vec<u8>> {
        if length == 0 {
            return Ok(Vec::new());
        }

        let last = position + length as u64 - 1;
        debug!(url = %self.url, position, length, "Range request");

        let response = self
            .http
            .get(&self.url)
            .header(RANGE, format!("bytes={}-{}", position, last))
            .send()
            .await?;

        let status = response.status();
        let mut body = match status {
            StatusCode::PARTIAL_CONTENT => response.bytes().await?.to_vec(),
            // Server ignored the Range header and sent the whole object
            StatusCode::OK => {
                let full = response.bytes().await?;
                let start = usize::try_from(position).unwrap_or(usize::MAX).min(full.len());
                full[start..].to_vec()
            }
            StatusCode::RANGE_NOT_SATISFIABLE => {
                return Err(RemoteError::ShortRead {
                    position,
                    requested: length,
                    received: 0,
                });
            }
            StatusCode::NOT_FOUND => return Err(RemoteError::ObjectNotFound(self.url.clone())),
            _ => {
                let message = response.text().await.unwrap_or_default();
                return Err(RemoteError::ServerError {
                    status: status.as_u16(),
                    message,
                });
            }
        };

        if body.len() < length {
            return Err(RemoteError::ShortRead {
                position,
                requested: length,
                received: body.len(),
            });
        }
        body.truncate(length);

        Ok(body)
    }
}

//! Remote asset retrieval for document decorations.
//!
//! Backgrounds, logos, and applicant photos are optional. A failed
//! download is reported as [`FetchedAsset::Absent`] and logged; it is never
//! surfaced as an error, so rendering can always continue.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::{AppError, Result};

/// Outcome of a single asset download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedAsset {
    /// Raw response body.
    Bytes(Bytes),
    /// Download failed or the URL was empty.
    Absent,
}

/// Source of binary decoration assets.
pub trait AssetSource: Send + Sync {
    /// Retrieve `url`, returning [`FetchedAsset::Absent`] on any failure.
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchedAsset> + Send + 'a>>;
}

/// HTTP(S) asset fetcher with a bounded per-request timeout.
#[derive(Clone)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|err| AppError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self { client })
    }

    /// Download `url` once. No retries.
    pub async fn get(&self, url: &str) -> FetchedAsset {
        if url.trim().is_empty() {
            return FetchedAsset::Absent;
        }

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%url, %err, "asset request failed");
                return FetchedAsset::Absent;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "asset request returned non-success status");
            return FetchedAsset::Absent;
        }

        match response.bytes().await {
            Ok(body) => {
                debug!(%url, bytes = body.len(), "asset fetched");
                FetchedAsset::Bytes(body)
            }
            Err(err) => {
                warn!(%url, %err, "asset body read failed");
                FetchedAsset::Absent
            }
        }
    }
}

impl AssetSource for HttpAssetFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchedAsset> + Send + 'a>> {
        Box::pin(self.get(url))
    }
}

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;

use crate::config::FetchOpts;
use crate::foundation::error::{FetchError, FetchErrorKind, VibeResult};

/// Raw bytes retrieved from a remote URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedAsset {
    /// Response body.
    pub bytes: Vec<u8>,
    /// `Content-Type` the server declared, if any.
    pub content_type: Option<String>,
}

impl FetchedAsset {
    /// Asset with a declared content type.
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        }
    }
}

/// Retrieves remote bytes for album covers and fonts.
///
/// Implementations must be safe to call concurrently; the pipeline issues all nine cover fetches
/// at once.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch `url`. Every failure is a [`FetchError`] naming the URL.
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError>;
}

#[async_trait]
impl<T: AssetFetcher + ?Sized> AssetFetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        (**self).fetch(url).await
    }
}

/// [`AssetFetcher`] backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: u64,
}

impl HttpFetcher {
    /// Build a client honouring the timeout, body limit and user agent in `opts`.
    pub fn new(opts: &FetchOpts) -> VibeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(opts.timeout())
            .user_agent(opts.user_agent.clone())
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            max_body_bytes: opts.max_body_bytes,
        })
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(FetchError::new(url, FetchErrorKind::EmptyUrl));
        }

        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, classify(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(url, FetchErrorKind::Status(status.as_u16())));
        }

        let limit = self.max_body_bytes;
        if resp.content_length().is_some_and(|len| len > limit) {
            return Err(FetchError::new(url, FetchErrorKind::TooLarge { limit }));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Content-Length may be absent or wrong; enforce the limit while streaming.
        let mut bytes = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| FetchError::new(url, classify(&e)))?
        {
            if (bytes.len() + chunk.len()) as u64 > limit {
                return Err(FetchError::new(url, FetchErrorKind::TooLarge { limit }));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(FetchError::new(url, FetchErrorKind::EmptyBody));
        }

        tracing::debug!(bytes = bytes.len(), content_type = ?content_type, "fetched asset");
        Ok(FetchedAsset {
            bytes,
            content_type,
        })
    }
}

fn classify(err: &reqwest::Error) -> FetchErrorKind {
    if err.is_timeout() {
        FetchErrorKind::Timeout
    } else if let Some(status) = err.status() {
        FetchErrorKind::Status(status.as_u16())
    } else {
        FetchErrorKind::Network(err.to_string())
    }
}

/// In-process [`AssetFetcher`] serving fixed responses by URL.
///
/// Unknown URLs answer with status 404. Used by tests and by offline CLI runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, FetchedAsset>,
}

impl MemoryFetcher {
    /// Empty fetcher; every URL answers 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `asset` for `url`.
    pub fn insert(&mut self, url: impl Into<String>, asset: FetchedAsset) {
        self.assets.insert(url.into(), asset);
    }

    /// Builder form of [`MemoryFetcher::insert`].
    pub fn with(mut self, url: impl Into<String>, asset: FetchedAsset) -> Self {
        self.insert(url, asset);
        self
    }
}

#[async_trait]
impl AssetFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(FetchError::new(url, FetchErrorKind::EmptyUrl));
        }
        let asset = self
            .assets
            .get(url)
            .ok_or_else(|| FetchError::new(url, FetchErrorKind::Status(404)))?;
        if asset.bytes.is_empty() {
            return Err(FetchError::new(url, FetchErrorKind::EmptyBody));
        }
        Ok(asset.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;

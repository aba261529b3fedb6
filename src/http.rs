//! HTTP access for the narration feed and its episode files.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a whole (small) document into memory.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Stream a (large) resource to `destination`, returning the number of
    /// bytes written.
    async fn download(&self, url: &str, destination: &Path) -> Result<u64>;
}

/// [`Fetcher`] backed by a shared [`reqwest::Client`].
pub struct ReqwestFetcher {
    client: reqwest::Client,
}
impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .or_raise(|| ErrorKind::Network)?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .or_raise(|| ErrorKind::Network)
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let body = self.get(url).await?.bytes().await.or_raise(|| ErrorKind::Network)?;
        tracing::debug!(bytes = body.len(), "Fetched document");
        Ok(body.to_vec())
    }

    #[instrument(skip(self, destination), fields(bytes))]
    async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        let mut response = self.get(url).await?;
        let mut file = tokio::fs::File::create(destination).await.or_raise(|| ErrorKind::Storage)?;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.or_raise(|| ErrorKind::Network)? {
            file.write_all(&chunk).await.or_raise(|| ErrorKind::Storage)?;
            written += chunk.len() as u64;
        }
        file.flush().await.or_raise(|| ErrorKind::Storage)?;
        tracing::Span::current().record("bytes", written);
        Ok(written)
    }
}

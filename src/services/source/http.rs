use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::MenuSource;

pub struct HttpMenuSource {
    url: String,
    client: reqwest::Client,
}

impl HttpMenuSource {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl MenuSource for HttpMenuSource {
    async fn fetch(&self) -> anyhow::Result<String> {
        let bytes = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("failed to fetch menu page {}", self.url))?
            .error_for_status()
            .context("menu page returned error")?
            .bytes()
            .await
            .context("failed to read menu page body")?;

        // The page is UTF-8 whatever its headers claim.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

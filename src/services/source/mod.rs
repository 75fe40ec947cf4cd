pub mod http;

use async_trait::async_trait;

/// Supplies the raw markup of the current week's menu page.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<String>;
}

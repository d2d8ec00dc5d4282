use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Request, Response};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes requests against the dashboard backend.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Plain reqwest client with request and connect timeouts.
pub struct BasicClient {
    inner: reqwest::Client,
}

impl BasicClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .gzip(true)
            .build()?;
        Ok(BasicClient { inner })
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.inner.execute(req).await
    }
}

use async_trait::async_trait;
use reqwest::Client;

use crate::{Error, Result, USER_AGENT};

/// Anything that can hand over the HTML behind a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    // Client uses Arc so we can clone cheaply
    client: Client,
}

impl HttpSource {
    /// Client that introduces itself as a desktop browser.
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    /// Requests a page and returns the HTML. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let html = res.text().await?;
        Ok(html)
    }
}

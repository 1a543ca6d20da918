//! Fetch a page and reduce it to the plain text of its main content block.

pub mod fetch;
pub mod readability;

use anyhow::Context;
use reqwest::Client;

use crate::{
    config::{ExtractorConfig, HttpClientConfig},
    error::DigestResult,
    util::url_norm::parse_article_url,
};

pub use readability::extract_article_text;

/// Owns the HTTP client; holds no per-page state, so one instance serves any
/// number of concurrent calls.
#[derive(Clone)]
pub struct Extractor {
    http: Client,
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(http_config: &HttpClientConfig, config: ExtractorConfig) -> anyhow::Result<Self> {
        let http = http_config
            .apply(Client::builder())
            .context("failed to apply http settings for extractor client")?
            .build()
            .context("failed to build extractor http client")?;

        Ok(Self { http, config })
    }

    pub fn with_client(http: Client, config: ExtractorConfig) -> Self {
        Self { http, config }
    }

    /// Fetch `url` and return the article body text. Nothing is retried.
    pub async fn extract(&self, url: &str) -> DigestResult<String> {
        let url = parse_article_url(url)?;
        let html = fetch::fetch_html(&self.http, &url, self.config.max_body_bytes).await?;
        let text = extract_article_text(&html, &self.config)?;
        tracing::debug!(%url, chars = text.chars().count(), "article text extracted");
        Ok(text)
    }
}

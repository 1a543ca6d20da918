use anyhow::Context;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::{HttpClientConfig, NewsApiConfig},
    model::Headline,
    util::url_norm::normalize_article_url,
};

#[derive(Debug, thiserror::Error)]
pub enum HeadlineError {
    #[error("Missing NEWSAPI_KEY")]
    NotConfigured,
    #[error("NewsAPI failed with status {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Client for the NewsAPI `top-headlines` endpoint.
pub struct NewsApiClient {
    http: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig, http_config: &HttpClientConfig) -> anyhow::Result<Self> {
        let http = http_config
            .apply_for(Client::builder(), &config.base_url)
            .context("failed to apply http settings for newsapi client")?
            .build()
            .context("failed to build newsapi http client")?;

        Ok(Self { http, config })
    }

    pub async fn top_headlines(&self) -> Result<Vec<Headline>, HeadlineError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(HeadlineError::NotConfigured)?;

        let base = self.config.base_url.trim_end_matches('/');
        let url = format!("{base}/v2/top-headlines");
        let page_size = self.config.page_size.to_string();

        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", api_key)
            .query(&[
                ("country", self.config.country.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .context("newsapi request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .ok()
                .and_then(|payload| payload.message)
                .unwrap_or(body);
            return Err(HeadlineError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let payload: HeadlinesPayload = response
            .json()
            .await
            .context("failed to parse newsapi response")?;

        debug!(
            total = payload.total_results.unwrap_or_default(),
            returned = payload.articles.len(),
            "headlines fetched"
        );

        Ok(payload
            .articles
            .into_iter()
            .filter_map(convert_article)
            .collect())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeadlinesPayload {
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<RawSource>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawSource {
    name: Option<String>,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

fn convert_article(raw: RawArticle) -> Option<Headline> {
    let title = raw.title?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    let raw_url = raw.url?;
    let url = match normalize_article_url(&raw_url) {
        Ok(normalized) => normalized,
        Err(err) => {
            warn!(error = %err, url = %raw_url, "skipping headline with unusable url");
            return None;
        }
    };

    Some(Headline {
        title,
        description: raw.description.filter(|s| !s.trim().is_empty()),
        content: raw.content.filter(|s| !s.trim().is_empty()),
        url,
        source: raw.source.and_then(|source| source.name),
        published_at: raw.published_at,
        summary: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_newsapi_payload() {
        let payload: HeadlinesPayload = serde_json::from_str(
            r#"{
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {
                        "source": {"id": null, "name": "Example News"},
                        "title": "Cats take over",
                        "description": "",
                        "content": "Body text",
                        "url": "https://example.com/cats/?utm_source=feed",
                        "publishedAt": "2024-05-01T10:00:00Z"
                    },
                    {"title": "No url here", "url": null}
                ]
            }"#,
        )
        .unwrap();

        let headlines: Vec<Headline> = payload
            .articles
            .into_iter()
            .filter_map(convert_article)
            .collect();

        assert_eq!(headlines.len(), 1);
        let headline = &headlines[0];
        assert_eq!(headline.url, "https://example.com/cats");
        assert_eq!(headline.description, None);
        assert_eq!(headline.content.as_deref(), Some("Body text"));
        assert_eq!(headline.source.as_deref(), Some("Example News"));
        assert!(headline.published_at.is_some());
    }
}

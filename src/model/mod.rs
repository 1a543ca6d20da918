use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DigestError;

#[derive(Debug, Deserialize)]
pub struct SummarizeQuery {
    pub url: Option<String>,
    pub sentences: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub url: String,
    pub summary: String,
    pub sentences: usize,
}

#[derive(Debug, Deserialize)]
pub struct BatchPayload {
    pub urls: Vec<String>,
    pub sentences: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BatchItemOut {
    pub url: String,
    pub summary: Option<String>,
    pub error: Option<ItemErrorOut>,
}

#[derive(Debug, Serialize)]
pub struct ItemErrorOut {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&DigestError> for ItemErrorOut {
    fn from(err: &DigestError) -> Self {
        Self {
            kind: err.kind().as_str(),
            message: err.to_string(),
            status: err.status(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchOut {
    pub items: Vec<BatchItemOut>,
}

/// One entry from the headline source.
#[derive(Debug, Clone, Serialize)]
pub struct Headline {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeadlineList {
    pub total: usize,
    pub articles: Vec<Headline>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HeadlineQuery {
    pub summarize: bool,
    pub sentences: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PodcastQuery {
    pub summary: Option<String>,
}

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
    error::{DigestError, DigestResult},
    extractor::Extractor,
    summarizer::{split_sentences, Summarizer},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub url: String,
    pub summary: String,
    pub sentences: usize,
}

/// Extractor followed by Summarizer. Stateless between calls.
#[derive(Clone)]
pub struct Pipeline {
    extractor: Extractor,
    summarizer: Summarizer,
}

impl Pipeline {
    pub fn new(extractor: Extractor, summarizer: Summarizer) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    pub async fn summarize_url(&self, url: &str, max_sentences: usize) -> DigestResult<Digest> {
        let url = url.trim();
        let text = self.extractor.extract(url).await?;
        let summary = self.summarizer.summarize(&text, max_sentences)?;
        let sentences = split_sentences(&summary).len();

        info!(%url, source_chars = text.len(), sentences, "article summarized");

        Ok(Digest {
            url: url.to_string(),
            summary,
            sentences,
        })
    }

    /// Summarize every URL with at most `concurrency` fetches in flight.
    /// Results come back in input order; one failure does not stop the rest.
    pub async fn summarize_many(
        self: &Arc<Self>,
        urls: Vec<String>,
        max_sentences: usize,
        concurrency: usize,
    ) -> Vec<(String, DigestResult<Digest>)> {
        let concurrency = concurrency.max(1);
        let mut results: Vec<Option<DigestResult<Digest>>> = vec![None; urls.len()];
        let mut set = JoinSet::new();

        debug!(count = urls.len(), concurrency, "starting summary batch");

        for (idx, url) in urls.iter().enumerate() {
            let pipeline = Arc::clone(self);
            let url = url.clone();
            set.spawn(async move { (idx, pipeline.summarize_url(&url, max_sentences).await) });

            if set.len() >= concurrency {
                if let Some(joined) = set.join_next().await {
                    store(&mut results, joined);
                }
            }
        }

        while let Some(joined) = set.join_next().await {
            store(&mut results, joined);
        }

        urls.into_iter()
            .zip(results)
            .map(|(url, result)| {
                let result = result.unwrap_or_else(|| {
                    Err(DigestError::ExtractionFailed(
                        "summary task did not complete".to_string(),
                    ))
                });
                (url, result)
            })
            .collect()
    }
}

fn store(
    results: &mut [Option<DigestResult<Digest>>],
    joined: Result<(usize, DigestResult<Digest>), tokio::task::JoinError>,
) {
    match joined {
        Ok((idx, result)) => {
            if let Err(err) = &result {
                debug!(error = %err, kind = err.kind().as_str(), "batch item failed");
            }
            results[idx] = Some(result);
        }
        Err(err) => warn!(error = ?err, "summary task panicked"),
    }
}

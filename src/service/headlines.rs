use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    error::AppResult,
    model::HeadlineList,
    service::digest::Pipeline,
    util::newsapi::NewsApiClient,
};

/// Fetch the current headlines, optionally summarizing each linked article.
/// Articles that cannot be summarized keep `summary: None`.
pub async fn list(
    client: &NewsApiClient,
    pipeline: &Arc<Pipeline>,
    summarize: Option<(usize, usize)>,
) -> AppResult<HeadlineList> {
    let mut articles = client.top_headlines().await?;

    if let Some((max_sentences, concurrency)) = summarize {
        // Syndicated stories often share a URL; fetch each page once.
        let mut seen = HashSet::new();
        let urls: Vec<String> = articles
            .iter()
            .filter(|a| seen.insert(a.url.clone()))
            .map(|a| a.url.clone())
            .collect();
        let summaries: HashMap<String, String> = pipeline
            .summarize_many(urls, max_sentences, concurrency)
            .await
            .into_iter()
            .filter_map(|(url, result)| match result {
                Ok(digest) => Some((url, digest.summary)),
                Err(err) => {
                    tracing::debug!(%url, error = %err, "headline left without summary");
                    None
                }
            })
            .collect();

        for article in &mut articles {
            article.summary = summaries.get(&article.url).cloned();
        }
    }

    tracing::debug!(count = articles.len(), "headlines listed");

    Ok(HeadlineList {
        total: articles.len(),
        articles,
    })
}

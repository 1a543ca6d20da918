use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use crate::{
    app::AppState,
    error::{AppError, AppResult},
    model::{BatchItemOut, BatchOut, BatchPayload, ItemErrorOut, SummarizeQuery, SummaryOut},
};

pub async fn summarize(
    State(state): State<AppState>,
    query: Result<Query<SummarizeQuery>, QueryRejection>,
) -> AppResult<Json<SummaryOut>> {
    let Query(query) = query?;
    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing url parameter".into()))?;
    let max_sentences = query.sentences.unwrap_or(state.digest.max_sentences);

    let digest = state.pipeline.summarize_url(&url, max_sentences).await?;

    Ok(Json(SummaryOut {
        url: digest.url,
        summary: digest.summary,
        sentences: digest.sentences,
    }))
}

pub async fn summarize_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchPayload>, JsonRejection>,
) -> AppResult<Json<BatchOut>> {
    let Json(payload) = payload?;
    if payload.urls.is_empty() {
        return Err(AppError::BadRequest("urls must not be empty".into()));
    }
    if payload.urls.len() > state.digest.max_batch {
        return Err(AppError::BadRequest(format!(
            "at most {} urls per batch",
            state.digest.max_batch
        )));
    }

    let max_sentences = payload.sentences.unwrap_or(state.digest.max_sentences);
    let results = state
        .pipeline
        .summarize_many(payload.urls, max_sentences, state.digest.batch_concurrency)
        .await;

    let items = results
        .into_iter()
        .map(|(url, result)| match result {
            Ok(digest) => BatchItemOut {
                url,
                summary: Some(digest.summary),
                error: None,
            },
            Err(err) => BatchItemOut {
                url,
                summary: None,
                error: Some(ItemErrorOut::from(&err)),
            },
        })
        .collect();

    Ok(Json(BatchOut { items }))
}

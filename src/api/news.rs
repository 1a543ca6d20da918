use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::{
    app::AppState,
    error::AppResult,
    model::{HeadlineList, HeadlineQuery},
    service,
};

pub async fn list_headlines(
    State(state): State<AppState>,
    query: Result<Query<HeadlineQuery>, QueryRejection>,
) -> AppResult<Json<HeadlineList>> {
    let Query(query) = query?;
    let summarize = query.summarize.then(|| {
        (
            query.sentences.unwrap_or(state.digest.max_sentences),
            state.digest.batch_concurrency,
        )
    });
    let list = service::headlines::list(&state.headlines, &state.pipeline, summarize).await?;
    Ok(Json(list))
}

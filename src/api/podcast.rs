use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{app::AppState, error::AppResult, model::PodcastQuery, service};

pub async fn podcast(
    State(state): State<AppState>,
    Query(query): Query<PodcastQuery>,
) -> AppResult<Response> {
    let audio = service::podcast::synthesize(&state.speech, query.summary.as_deref()).await?;
    Ok(([(header::CONTENT_TYPE, audio.content_type)], audio.bytes).into_response())
}

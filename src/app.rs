use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    api,
    config::{AppConfig, DigestConfig},
    extractor::Extractor,
    middleware::assign_trace_id,
    service::digest::Pipeline,
    summarizer::Summarizer,
    util::{newsapi::NewsApiClient, speech::SpeechClient},
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub digest: DigestConfig,
    pub headlines: Arc<NewsApiClient>,
    pub speech: Arc<SpeechClient>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let extractor = Extractor::new(&config.http_client, config.extractor.clone())?;
        let pipeline = Arc::new(Pipeline::new(extractor, Summarizer::english()));
        let headlines = Arc::new(NewsApiClient::new(
            config.newsapi.clone(),
            &config.http_client,
        )?);
        let speech = Arc::new(SpeechClient::new(
            config.speech.clone(),
            &config.http_client,
        )?);

        if headlines_disabled(config) {
            tracing::warn!("NEWSAPI_KEY not set; /api/news will return errors");
        }

        Ok(Self {
            pipeline,
            digest: config.digest.clone(),
            headlines,
            speech,
        })
    }
}

fn headlines_disabled(config: &AppConfig) -> bool {
    config
        .newsapi
        .api_key
        .as_deref()
        .map_or(true, |key| key.trim().is_empty())
}

pub fn build_router(config: &AppConfig) -> anyhow::Result<Router> {
    let state = AppState::from_config(config)?;
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(assign_trace_id));

    Router::new()
        .route("/healthz", get(api::health::health_check))
        .route("/api/summarize", get(api::summarize::summarize))
        .route("/api/summarize/batch", post(api::summarize::summarize_batch))
        .route("/api/news", get(api::news::list_headlines))
        .route("/api/podcast", get(api::podcast::podcast))
        .layer(middleware)
        .with_state(state)
}

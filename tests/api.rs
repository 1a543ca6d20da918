mod common;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use news_digest::{
    app::{router, AppState},
    config::{DigestConfig, ExtractorConfig, HttpClientConfig, NewsApiConfig, SpeechConfig},
    middleware::TRACE_HEADER,
    util::{newsapi::NewsApiClient, speech::SpeechClient},
    Extractor, Pipeline, Summarizer,
};
use reqwest::Client;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{spawn_site, FAKE_MP3, SOLAR_TOP_TWO, SPEECH_KEY};

fn app(site: SocketAddr, configured: bool) -> Router {
    app_for_country(site, configured, "us")
}

fn app_for_country(site: SocketAddr, configured: bool, country: &str) -> Router {
    let http_config = HttpClientConfig::default();
    let base_url = format!("http://{site}");

    let extractor = Extractor::with_client(
        Client::builder().no_proxy().build().unwrap(),
        ExtractorConfig::default(),
    );
    let newsapi = NewsApiConfig {
        api_key: configured.then(|| "news-key".to_string()),
        base_url: base_url.clone(),
        country: country.to_string(),
        ..NewsApiConfig::default()
    };
    let speech = SpeechConfig {
        api_key: configured.then(|| SPEECH_KEY.to_string()),
        base_url,
        ..SpeechConfig::default()
    };

    router(AppState {
        pipeline: Arc::new(Pipeline::new(extractor, Summarizer::english())),
        digest: DigestConfig {
            max_batch: 3,
            ..DigestConfig::default()
        },
        headlines: Arc::new(NewsApiClient::new(newsapi, &http_config).unwrap()),
        speech: Arc::new(SpeechClient::new(speech, &http_config).unwrap()),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_ok_with_trace_header() {
    let site = spawn_site().await;
    let response = app(site, true)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(TRACE_HEADER));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn summarize_returns_summary() {
    let site = spawn_site().await;
    let url = format!("http://{site}/article");
    let (status, body) = get(app(site, true), &format!("/api/summarize?url={url}&sentences=2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], url);
    assert_eq!(body["summary"], SOLAR_TOP_TWO);
    assert_eq!(body["sentences"], 2);
}

#[tokio::test]
async fn summarize_without_url_is_bad_request() {
    let site = spawn_site().await;
    let (status, body) = get(app(site, true), "/api/summarize").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing url parameter");
}

#[tokio::test]
async fn malformed_query_is_a_json_bad_request() {
    let site = spawn_site().await;
    let (status, body) = get(
        app(site, true),
        &format!("/api/summarize?url=http://{site}/article&sentences=abc"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BadRequest");

    let (status, body) = get(app(site, true), "/api/news?summarize=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BadRequest");
}

#[tokio::test]
async fn malformed_batch_body_is_a_json_bad_request() {
    let site = spawn_site().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/summarize/batch")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"urls\": \"not a list\"}"))
        .unwrap();
    let response = app(site, true).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], "BadRequest");
}

#[tokio::test]
async fn summarize_with_bad_scheme_is_invalid_input() {
    let site = spawn_site().await;
    let (status, body) = get(app(site, true), "/api/summarize?url=ftp://example.com/a").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "InvalidInput");
}

#[tokio::test]
async fn upstream_404_becomes_bad_gateway() {
    let site = spawn_site().await;
    let (status, body) =
        get(app(site, true), &format!("/api/summarize?url=http://{site}/missing")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "FetchError");
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn unreadable_page_is_server_error() {
    let site = spawn_site().await;
    let (status, body) =
        get(app(site, true), &format!("/api/summarize?url=http://{site}/empty")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "ExtractionFailed");
    assert_eq!(body["error"]["message"], "Could not extract article text");
}

#[tokio::test]
async fn batch_reports_each_item() {
    let site = spawn_site().await;
    let payload = json!({
        "urls": [format!("http://{site}/article"), format!("http://{site}/missing")],
        "sentences": 2
    });
    let (status, body) = post_json(app(site, true), "/api/summarize/batch", payload).await;

    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["summary"], SOLAR_TOP_TWO);
    assert!(items[0]["error"].is_null());
    assert!(items[1]["summary"].is_null());
    assert_eq!(items[1]["error"]["kind"], "FetchError");
    assert_eq!(items[1]["error"]["status"], 404);
}

#[tokio::test]
async fn batch_limits_are_enforced() {
    let site = spawn_site().await;

    let (status, _) = post_json(app(site, true), "/api/summarize/batch", json!({"urls": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let urls: Vec<String> = (0..4).map(|i| format!("http://{site}/article?i={i}")).collect();
    let (status, body) =
        post_json(app(site, true), "/api/summarize/batch", json!({ "urls": urls })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "at most 3 urls per batch");
}

#[tokio::test]
async fn news_lists_headlines() {
    let site = spawn_site().await;
    let (status, body) = get(app(site, true), "/api/news").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let first = &body["articles"][0];
    assert_eq!(first["title"], "Solar roof finished");
    assert_eq!(first["source"], "Example Gazette");
    assert!(first.get("summary").is_none());
}

#[tokio::test]
async fn news_can_attach_summaries() {
    let site = spawn_site().await;
    let (status, body) = get(app(site, true), "/api/news?summarize=true&sentences=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["articles"][0]["summary"], SOLAR_TOP_TWO);
    assert!(body["articles"][1].get("summary").is_none());
}

#[tokio::test]
async fn headlines_sharing_a_url_all_get_summaries() {
    let site = spawn_site().await;
    let (status, body) = get(
        app_for_country(site, true, "dup"),
        "/api/news?summarize=true&sentences=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let articles = body["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 2);
    for article in articles {
        assert_eq!(article["summary"], SOLAR_TOP_TWO);
    }
}

#[tokio::test]
async fn news_without_key_is_not_configured() {
    let site = spawn_site().await;
    let (status, body) = get(app(site, false), "/api/news").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Missing NEWSAPI_KEY");
}

#[tokio::test]
async fn podcast_requires_summary() {
    let site = spawn_site().await;
    let (status, body) = get(app(site, true), "/api/podcast").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing summary parameter");
}

#[tokio::test]
async fn podcast_streams_audio() {
    let site = spawn_site().await;
    let response = app(site, true)
        .oneshot(
            Request::builder()
                .uri("/api/podcast?summary=Solar%20panels%20now%20cover%20the%20roof.")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], FAKE_MP3);
}

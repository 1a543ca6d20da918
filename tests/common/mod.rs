#![allow(dead_code)]

use std::{collections::HashMap, net::SocketAddr};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

pub const SOLAR_ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Solar roof</title></head>
<body>
  <nav><a href="/">Home</a> <a href="/world">World</a> <a href="/business">Business</a></nav>
  <h1>Solar roof finished</h1>
  <div class="story">
    <p>Solar panels now cover the old factory roof.</p>
    <p>Engineers say the solar panels produce enough power for the whole factory.</p>
    <p>Lunch was served at noon.</p>
    <p>Local solar projects are growing, and solar engineers are in demand.</p>
    <p>Nobody expected rain.</p>
  </div>
  <footer><p>Copyright Example Gazette, all rights reserved.</p></footer>
</body>
</html>"#;

pub const SOLAR_TOP_TWO: &str = "Engineers say the solar panels produce enough power for the whole factory. \
     Local solar projects are growing, and solar engineers are in demand.";

pub const EMPTY_PAGE: &str =
    "<html><body><nav><a href=\"/\">Home</a></nav><div>Hi</div></body></html>";

pub const LATIN1_PAGE: &str = "<html><body><div class=\"content\">\
    <p>Le café du coin sert un très bon déjeuner chaque jour.</p>\
    </div></body></html>";

pub const SPEECH_KEY: &str = "test-key";
pub const FAKE_MP3: &[u8] = b"ID3\x04fake-audio";

/// Start a throw-away site on an ephemeral loopback port.
///
/// Routes: `/article`, `/empty`, `/latin1`, `/missing` (404), a NewsAPI-shaped
/// `/v2/top-headlines` linking back to this site (`country=dup` lists the
/// article twice under one URL), and an OpenAI-shaped
/// `/v1/audio/speech`.
pub async fn spawn_site() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{addr}");

    let router = Router::new()
        .route("/article", get(|| async { html(SOLAR_ARTICLE) }))
        .route("/empty", get(|| async { html(EMPTY_PAGE) }))
        .route("/latin1", get(latin1))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route("/v2/top-headlines", get(top_headlines))
        .route("/v1/audio/speech", post(speech))
        .with_state(base);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn html(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body)
}

async fn latin1() -> impl IntoResponse {
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(LATIN1_PAGE);
    (
        [(header::CONTENT_TYPE, "text/html; charset=iso-8859-1")],
        bytes.into_owned(),
    )
}

async fn top_headlines(
    State(base): State<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("news-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "message": "Your API key is invalid."})),
        );
    }

    if params.get("country").map(String::as_str) == Some("dup") {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "totalResults": 2,
                "articles": [
                    {
                        "source": {"id": null, "name": "Example Gazette"},
                        "title": "Solar roof finished",
                        "url": format!("{base}/article")
                    },
                    {
                        "source": {"id": null, "name": "Wire Service"},
                        "title": "Factory roof goes solar",
                        "url": format!("{base}/article")
                    }
                ]
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": null, "name": "Example Gazette"},
                    "title": "Solar roof finished",
                    "description": "Panels on the factory",
                    "content": null,
                    "url": format!("{base}/article"),
                    "publishedAt": "2024-05-01T10:00:00Z"
                },
                {
                    "source": {"id": null, "name": "Example Gazette"},
                    "title": "Gone story",
                    "url": format!("{base}/missing"),
                    "publishedAt": null
                }
            ]
        })),
    )
}

async fn speech(headers: HeaderMap, Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    let expected = format!("Bearer {SPEECH_KEY}");
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    if body["model"] != "tts-1" || body["voice"] != "alloy" || body["input"].as_str().is_none() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "bad request body").into_response();
    }
    ([(header::CONTENT_TYPE, "audio/mpeg")], FAKE_MP3).into_response()
}

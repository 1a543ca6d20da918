use std::time::Duration;

use anyhow::Context;
use axum::body::Bytes;
use reqwest::{header, Client};
use serde::Serialize;

use crate::config::{HttpClientConfig, SpeechConfig};

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech synthesis not configured")]
    NotConfigured,
    #[error("speech api returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct SpeechAudio {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Client for an OpenAI-compatible `/v1/audio/speech` endpoint.
pub struct SpeechClient {
    http: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig, http_config: &HttpClientConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http = http_config
            .apply_for(Client::builder(), &config.base_url)
            .context("failed to apply http settings for speech client")?
            .timeout(timeout)
            .build()
            .context("failed to build speech http client")?;

        Ok(Self { http, config })
    }

    pub async fn synthesize(&self, input: &str) -> Result<SpeechAudio, SpeechError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SpeechError::NotConfigured)?;

        let base = self.config.base_url.trim_end_matches('/');
        let url = format!("{base}/v1/audio/speech");

        let body = SpeechRequest {
            model: &self.config.model,
            input,
            voice: &self.config.voice,
            response_format: &self.config.response_format,
            speed: self.config.speed,
        };

        let response = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .context("speech request failed")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| content_type_for(&self.config.response_format).to_string());

        let bytes = response
            .bytes()
            .await
            .context("failed to read speech response body")?;

        tracing::info!(
            chars = input.chars().count(),
            bytes = bytes.len(),
            voice = %self.config.voice,
            "speech synthesized"
        );

        Ok(SpeechAudio {
            content_type,
            bytes,
        })
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    speed: f32,
}

fn content_type_for(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "opus" => "audio/ogg",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "pcm" => "audio/L16",
        _ => "audio/mpeg",
    }
}

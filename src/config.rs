use anyhow::{anyhow, Context};
use reqwest::{ClientBuilder, Proxy};
use serde::Deserialize;
use url::Url;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Shared settings for every outbound reqwest client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub proxy_url: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "NewsDigest/0.1".to_string(),
            request_timeout_secs: 15,
            proxy_url: None,
        }
    }
}

impl HttpClientConfig {
    pub fn apply(&self, builder: ClientBuilder) -> anyhow::Result<ClientBuilder> {
        let mut builder = builder
            .user_agent(self.user_agent.clone())
            .timeout(Duration::from_secs(self.request_timeout_secs.max(1)));
        if let Some(proxy) = self
            .proxy_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            let proxy = Proxy::all(proxy).with_context(|| format!("invalid proxy url {proxy}"))?;
            builder = builder.proxy(proxy);
        }
        Ok(builder)
    }

    /// Like [`apply`](Self::apply), but bypasses the proxy when `base_url`
    /// points at a loopback host.
    pub fn apply_for(&self, builder: ClientBuilder, base_url: &str) -> anyhow::Result<ClientBuilder> {
        let builder = self.apply(builder)?;
        if is_loopback(base_url) {
            Ok(builder.no_proxy())
        } else {
            Ok(builder)
        }
    }
}

fn is_loopback(base_url: &str) -> bool {
    Url::parse(base_url)
        .ok()
        .and_then(|parsed| {
            parsed.host().map(|host| match host {
                url::Host::Domain(domain) => domain.eq_ignore_ascii_case("localhost"),
                url::Host::Ipv4(addr) => addr.is_loopback(),
                url::Host::Ipv6(addr) => addr.is_loopback(),
            })
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Paragraphs shorter than this (in chars) do not vote for a content block.
    pub min_paragraph_len: usize,
    pub max_body_bytes: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_paragraph_len: 25,
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub max_sentences: usize,
    pub batch_concurrency: usize,
    pub max_batch: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            max_sentences: 5,
            batch_concurrency: 4,
            max_batch: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub country: String,
    pub page_size: u32,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org".to_string(),
            country: "us".to_string(),
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub voice: String,
    pub response_format: String,
    pub speed: f32,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            response_format: "mp3".to_string(),
            speed: 1.0,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "logs/news-digest.log".to_string(),
            level: Some("info".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub http_client: HttpClientConfig,
    pub extractor: ExtractorConfig,
    pub digest: DigestConfig,
    pub newsapi: NewsApiConfig,
    pub speech: SpeechConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let explicit_path = std::env::var("CONFIG_FILE").ok();
        let config = if let Some(path) = explicit_path {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(anyhow!("config file {:?} not found", path));
            }
            Self::load_from_file(&path)?
        } else {
            let path = locate_default_config();
            if let Some(path) = path {
                Self::load_from_file(&path)?
            } else {
                AppConfig::default()
            }
        };

        let config = Self::apply_env_overrides(config)?;
        Ok(config.normalized())
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("failed to parse config yaml")?;
        Ok(config.normalized())
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Ok(config)
    }

    fn apply_env_overrides(mut config: AppConfig) -> anyhow::Result<AppConfig> {
        if let Ok(bind) = std::env::var("SERVER_BIND") {
            config.server.bind = bind;
        }

        if let Ok(agent) = std::env::var("HTTP_USER_AGENT") {
            config.http_client.user_agent = agent;
        }

        if let Some(timeout) = parse_optional_env("HTTP_TIMEOUT_SECS")? {
            config.http_client.request_timeout_secs = timeout;
        }

        if let Ok(proxy) = std::env::var("HTTP_PROXY_URL") {
            config.http_client.proxy_url = Some(proxy);
        }

        if let Some(min_len) = parse_optional_env("EXTRACT_MIN_PARAGRAPH_LEN")? {
            config.extractor.min_paragraph_len = min_len;
        }

        if let Some(max_bytes) = parse_optional_env("EXTRACT_MAX_BODY_BYTES")? {
            config.extractor.max_body_bytes = max_bytes;
        }

        if let Some(sentences) = parse_optional_env("SUMMARY_MAX_SENTENCES")? {
            config.digest.max_sentences = sentences;
        }

        if let Some(concurrency) = parse_optional_env("DIGEST_BATCH_CONCURRENCY")? {
            config.digest.batch_concurrency = concurrency;
        }

        if let Ok(key) = std::env::var("NEWSAPI_KEY") {
            config.newsapi.api_key = Some(key);
        }

        if let Ok(country) = std::env::var("NEWSAPI_COUNTRY") {
            config.newsapi.country = country;
        }

        if let Some(page_size) = parse_optional_env("NEWSAPI_PAGE_SIZE")? {
            config.newsapi.page_size = page_size;
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.speech.api_key = Some(key);
        }

        if let Ok(base_url) = std::env::var("SPEECH_BASE_URL") {
            config.speech.base_url = base_url;
        }

        if let Ok(voice) = std::env::var("SPEECH_VOICE") {
            config.speech.voice = voice;
        }

        if let Ok(log_file) = std::env::var("LOG_FILE_PATH") {
            config.logging.file = log_file;
        }

        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            config.logging.level = Some(log_level);
        }

        Ok(config)
    }

    /// Replace zero values that would make a section unusable.
    fn normalized(mut self) -> Self {
        if self.http_client.request_timeout_secs == 0 {
            self.http_client.request_timeout_secs = 15;
        }
        if self.extractor.max_body_bytes == 0 {
            self.extractor.max_body_bytes = ExtractorConfig::default().max_body_bytes;
        }
        if self.digest.max_sentences == 0 {
            self.digest.max_sentences = 1;
        }
        if self.digest.batch_concurrency == 0 {
            self.digest.batch_concurrency = 1;
        }
        if self.digest.max_batch == 0 {
            self.digest.max_batch = DigestConfig::default().max_batch;
        }
        if self.newsapi.page_size == 0 {
            self.newsapi.page_size = 10;
        }
        if self.speech.timeout_secs == 0 {
            self.speech.timeout_secs = 60;
        }
        self
    }
}

fn parse_optional_env<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => Ok(Some(
            v.parse::<T>()
                .with_context(|| format!("{key} must be a valid value"))?,
        )),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn locate_default_config() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from("config/config.yaml"),
        PathBuf::from("../config/config.yaml"),
    ];

    for path in candidates {
        if path.exists() {
            return Some(path);
        }
    }

    None
}

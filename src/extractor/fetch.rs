use reqwest::{header, Client};
use tracing::debug;
use url::Url;

use crate::{
    error::{DigestError, DigestResult},
    util::html::decode_html,
};

/// GET `url` once and return the decoded body. Non-2xx statuses, transport
/// errors and bodies over `max_body_bytes` all come back as fetch errors.
pub async fn fetch_html(client: &Client, url: &Url, max_body_bytes: usize) -> DigestResult<String> {
    let mut response = client
        .get(url.clone())
        .header(header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|err| DigestError::fetch(err.status().map(|s| s.as_u16()), err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DigestError::fetch(
            Some(status.as_u16()),
            format!("unexpected status {status} for {url}"),
        ));
    }

    if let Some(length) = response.content_length() {
        if length > max_body_bytes as u64 {
            return Err(DigestError::fetch(
                Some(status.as_u16()),
                format!("response body of {length} bytes exceeds limit of {max_body_bytes}"),
            ));
        }
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|err| DigestError::fetch(Some(status.as_u16()), err.to_string()))?
    {
        if body.len() + chunk.len() > max_body_bytes {
            return Err(DigestError::fetch(
                Some(status.as_u16()),
                format!("response body exceeds limit of {max_body_bytes} bytes"),
            ));
        }
        body.extend_from_slice(&chunk);
    }

    debug!(
        %url,
        status = status.as_u16(),
        bytes = body.len(),
        content_type = content_type.as_deref().unwrap_or(""),
        "article fetched"
    );

    Ok(decode_html(&body, content_type.as_deref()))
}

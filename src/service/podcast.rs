use crate::{
    error::{AppError, AppResult},
    util::speech::{SpeechAudio, SpeechClient},
};

/// Longest input the speech endpoint accepts.
const MAX_INPUT_CHARS: usize = 4096;

pub async fn synthesize(client: &SpeechClient, summary: Option<&str>) -> AppResult<SpeechAudio> {
    let summary = summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing summary parameter".into()))?;

    if summary.chars().count() > MAX_INPUT_CHARS {
        return Err(AppError::BadRequest(format!(
            "summary exceeds {MAX_INPUT_CHARS} characters"
        )));
    }

    Ok(client.synthesize(summary).await?)
}

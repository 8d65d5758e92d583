//! Basic YouTube video identifier extraction.

use crate::error::{AsktubeError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn query_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&]v=([^&#]+)").expect("valid regex"))
}

fn path_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:youtu\.be/|/shorts/|/embed/|/live/)([A-Za-z0-9_-]{11})")
            .expect("valid regex")
    })
}

fn bare_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid regex"))
}

/// Extract a video id from a watch URL, a short link, or a bare id.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AsktubeError::InputValidation(
            "No video URL or id given".to_string(),
        ));
    }

    if let Some(caps) = query_pattern().captures(input) {
        return Ok(caps[1].to_string());
    }

    if let Some(caps) = path_pattern().captures(input) {
        return Ok(caps[1].to_string());
    }

    if bare_id_pattern().is_match(input) {
        return Ok(input.to_string());
    }

    Err(AsktubeError::InputValidation(format!(
        "Invalid YouTube URL: {}",
        input
    )))
}

/// Watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

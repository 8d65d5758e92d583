//! Caption track download from the YouTube watch page.

use crate::error::{AsktubeError, Result};
use crate::transcript::{Transcript, TranscriptFragment, TranscriptSource};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

/// Characters of a failed response body kept in the error message.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Fetches caption tracks published for a video.
pub struct CaptionClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for CaptionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: YOUTUBE_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
            return Err(AsktubeError::Api(format!(
                "YouTube request failed ({}): {}",
                status, excerpt
            )));
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Pull the caption track list out of the watch page's player response.
fn parse_caption_tracks(html: &str) -> Option<Vec<CaptionTrack>> {
    let start = html.find(CAPTION_TRACKS_KEY)? + CAPTION_TRACKS_KEY.len();
    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<Vec<CaptionTrack>>()
        .next()?
        .ok()
}

/// Choose a track by language preference, manual captions before generated ones.
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    if languages.is_empty() {
        return tracks.first();
    }

    languages.iter().find_map(|lang| {
        let matching = || tracks.iter().filter(move |t| t.language_code == *lang);
        matching()
            .find(|t| !t.is_generated())
            .or_else(|| matching().next())
    })
}

fn text_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<text start="([\d.]+)"(?: dur="([\d.]+)")?[^>]*>(.*?)</text>"#)
            .expect("valid regex")
    })
}

/// Parse the timedtext XML body into fragments.
fn parse_timedtext(xml: &str) -> Vec<TranscriptFragment> {
    text_pattern()
        .captures_iter(xml)
        .map(|caps| {
            let start = caps[1].parse::<f64>().ok().map(Duration::from_secs_f64);
            let duration = caps
                .get(2)
                .and_then(|d| d.as_str().parse::<f64>().ok())
                .map(Duration::from_secs_f64);
            // Caption bodies are escaped twice (`&amp;#39;`).
            let text = unescape_html(&unescape_html(&caps[3]));
            TranscriptFragment {
                text: text.replace('\n', " "),
                start,
                duration,
            }
        })
        .filter(|f| !f.text.trim().is_empty())
        .collect()
}

fn unescape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[async_trait]
impl TranscriptSource for CaptionClient {
    async fn fetch_transcript(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        let page_url = format!("{}/watch?v={}", self.base_url, video_id);
        debug!("Fetching watch page {}", page_url);
        let html = self.get_text(&page_url).await?;

        let tracks = parse_caption_tracks(&html).ok_or_else(|| {
            AsktubeError::TranscriptUnavailable(format!(
                "No captions are available for video {}",
                video_id
            ))
        })?;
        debug!("Found {} caption tracks", tracks.len());

        let track = select_track(&tracks, languages).ok_or_else(|| {
            let available: Vec<&str> = tracks.iter().map(|t| t.language_code.as_str()).collect();
            AsktubeError::TranscriptUnavailable(format!(
                "No captions in {} for video {} (available: {})",
                languages.join(", "),
                video_id,
                available.join(", ")
            ))
        })?;

        info!(
            "Using {} captions ({})",
            track.language_code,
            if track.is_generated() { "auto-generated" } else { "manual" }
        );

        let xml = self.get_text(&track.base_url).await?;
        let fragments = parse_timedtext(&xml);
        if fragments.is_empty() {
            return Err(AsktubeError::TranscriptUnavailable(format!(
                "Caption track for video {} is empty",
                video_id
            )));
        }

        Ok(Transcript {
            fragments,
            language: Some(track.language_code.clone()),
            audio: None,
        })
    }

    fn name(&self) -> &'static str {
        "YouTube captions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/{}", lang),
            language_code: lang.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_caption_tracks() {
        let html = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":{"simpleText":"English"},"languageCode":"en","kind":"asr"}],"audioTracks":[]}}};</script>"#;
        let tracks = parse_caption_tracks(html).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(
            tracks[0].base_url,
            "https://www.youtube.com/api/timedtext?v=abc&lang=en"
        );
        assert!(tracks[0].is_generated());
    }

    #[test]
    fn test_parse_caption_tracks_missing() {
        assert!(parse_caption_tracks("<html>no player here</html>").is_none());
    }

    #[test]
    fn test_select_track_prefers_manual() {
        let tracks = vec![track("de", None), track("en", Some("asr")), track("en", None)];
        let langs = vec!["en".to_string()];
        let selected = select_track(&tracks, &langs).unwrap();
        assert_eq!(selected.language_code, "en");
        assert!(!selected.is_generated());
    }

    #[test]
    fn test_select_track_follows_preference_order() {
        let tracks = vec![track("en", None), track("fr", None)];
        let langs = vec!["fr".to_string(), "en".to_string()];
        assert_eq!(select_track(&tracks, &langs).unwrap().language_code, "fr");

        let langs = vec!["es".to_string()];
        assert!(select_track(&tracks, &langs).is_none());
        assert_eq!(select_track(&tracks, &[]).unwrap().language_code, "en");
    }

    #[test]
    fn test_parse_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.25">it&amp;#39;s a test</text><text start="2.75" dur="1">line
break</text><text start="4">   </text></transcript>"#;
        let fragments = parse_timedtext(xml);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "it's a test");
        assert_eq!(fragments[0].start, Some(Duration::from_millis(500)));
        assert_eq!(fragments[0].duration, Some(Duration::from_millis(2250)));
        assert_eq!(fragments[1].text, "line break");
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("a &lt;b&gt; &amp; &quot;c&quot;"), "a <b> & \"c\"");
        assert_eq!(unescape_html("&#39;x&#x27;"), "'x'");
        assert_eq!(unescape_html("AT&T rocks"), "AT&T rocks");
    }
}

//! Audio pipeline: download the soundtrack with yt-dlp and transcribe it with Whisper.

use crate::error::{AsktubeError, Result};
use crate::transcript::{AudioArtifact, Transcript, TranscriptFragment, TranscriptSource};
use crate::video::watch_url;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

/// OpenAI Whisper API endpoint.
const WHISPER_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Maximum file size for Whisper API (25 MB).
const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// MP3 bitrate requested from yt-dlp. 64 kbit/s keeps ~50 minutes under the upload limit.
const AUDIO_QUALITY: &str = "64K";

/// Transcription models accepted by the endpoint, named as the API names them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhisperModel {
    #[default]
    #[serde(rename = "whisper-1")]
    Whisper1,
    #[serde(rename = "gpt-4o-transcribe")]
    Gpt4oTranscribe,
    #[serde(rename = "gpt-4o-mini-transcribe")]
    Gpt4oMiniTranscribe,
}

impl WhisperModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhisperModel::Whisper1 => "whisper-1",
            WhisperModel::Gpt4oTranscribe => "gpt-4o-transcribe",
            WhisperModel::Gpt4oMiniTranscribe => "gpt-4o-mini-transcribe",
        }
    }
}

impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WhisperModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whisper-1" => Ok(WhisperModel::Whisper1),
            "gpt-4o-transcribe" => Ok(WhisperModel::Gpt4oTranscribe),
            "gpt-4o-mini-transcribe" => Ok(WhisperModel::Gpt4oMiniTranscribe),
            _ => Err(format!(
                "Unknown Whisper model: {}. Use 'whisper-1', 'gpt-4o-transcribe', or 'gpt-4o-mini-transcribe'",
                s
            )),
        }
    }
}

/// Check that yt-dlp is installed and accessible.
pub async fn check_ytdlp() -> Result<()> {
    let output = Command::new("yt-dlp")
        .arg("--version")
        .output()
        .await
        .map_err(|e| {
            AsktubeError::AudioDownload(format!(
                "yt-dlp not found. Install it with: pipx install yt-dlp. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(AsktubeError::AudioDownload(
            "yt-dlp check failed".to_string(),
        ));
    }

    debug!(
        "yt-dlp {} is available",
        String::from_utf8_lossy(&output.stdout).trim()
    );
    Ok(())
}

/// Download a video's audio track as MP3 into `dir`, returning the file path.
pub async fn download_audio(video_id: &str, dir: &Path) -> Result<PathBuf> {
    check_ytdlp().await?;

    info!("Downloading audio for {}", video_id);

    let template = dir.join(format!("{}.%(ext)s", video_id));
    let output = Command::new("yt-dlp")
        .args([
            "--no-playlist",
            "--quiet",
            "-x",
            "--audio-format",
            "mp3",
            "--audio-quality",
            AUDIO_QUALITY,
            "-o",
        ])
        .arg(&template)
        .arg(watch_url(video_id))
        .output()
        .await
        .map_err(|e| AsktubeError::AudioDownload(format!("Failed to run yt-dlp: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AsktubeError::AudioDownload(format!(
            "yt-dlp failed: {}",
            stderr.trim()
        )));
    }

    let path = dir.join(format!("{}.mp3", video_id));
    if !path.exists() {
        return Err(AsktubeError::AudioDownload(
            "Output file was not created".to_string(),
        ));
    }

    info!("Audio downloaded to {}", path.display());
    Ok(path)
}

/// Transcript source that runs speech-to-text over the downloaded audio.
pub struct AudioTranscriber {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: WhisperModel,
}

impl AudioTranscriber {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url: WHISPER_API_URL.to_string(),
            model: WhisperModel::default(),
        }
    }

    pub fn with_model(mut self, model: WhisperModel) -> Self {
        self.model = model;
        self
    }

    /// Override the transcription endpoint (used by tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Transcribe an MP3 already on disk.
    pub async fn transcribe_file(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript> {
        let bytes = fs::read(audio_path).await?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(AsktubeError::TranscriptUnavailable(format!(
                "Audio too large for Whisper API: {} bytes (max {} bytes)",
                bytes.len(),
                MAX_FILE_SIZE
            )));
        }

        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let file_part = Part::bytes(bytes.clone())
            .file_name(file_name)
            .mime_str("audio/mpeg")?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.as_str())
            .text("response_format", "verbose_json");

        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self.call_api(form).await?;
        let mut transcript = parse_response(response);
        transcript.audio = Some(AudioArtifact {
            bytes,
            mime: "audio/mpeg",
        });
        Ok(transcript)
    }

    async fn call_api(&self, form: Form) -> Result<WhisperResponse> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!("Whisper API response status: {}", status);

        let body = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
            return Err(AsktubeError::Api(format!(
                "Whisper API error: {}",
                api_error.error.message
            )));
        }

        Err(AsktubeError::Api(format!(
            "Whisper API error ({}): {}",
            status, body
        )))
    }
}

/// Convert a Whisper response into transcript fragments.
fn parse_response(response: WhisperResponse) -> Transcript {
    let fragments = match response.segments {
        Some(segments) if !segments.is_empty() => segments
            .into_iter()
            .map(|seg| TranscriptFragment {
                text: seg.text.trim().to_string(),
                start: Some(Duration::from_secs_f64(seg.start.max(0.0))),
                duration: Some(Duration::from_secs_f64((seg.end - seg.start).max(0.0))),
            })
            .collect(),
        _ => vec![TranscriptFragment::new(response.text.trim())],
    };

    Transcript {
        fragments,
        language: response.language,
        audio: None,
    }
}

#[async_trait]
impl TranscriptSource for AudioTranscriber {
    async fn fetch_transcript(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        let temp_dir = TempDir::new()?;
        let audio_path = download_audio(video_id, temp_dir.path()).await?;

        let transcript = self
            .transcribe_file(&audio_path, languages.first().map(String::as_str))
            .await?;

        if transcript.is_empty() {
            return Err(AsktubeError::TranscriptUnavailable(format!(
                "No speech recognized in video {}",
                video_id
            )));
        }

        Ok(transcript)
    }

    fn name(&self) -> &'static str {
        "yt-dlp + OpenAI Whisper"
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    segments: Option<Vec<WhisperSegment>>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

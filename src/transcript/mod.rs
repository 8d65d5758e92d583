pub mod audio;
pub mod captions;
pub mod file;

pub use audio::{download_audio, AudioTranscriber, WhisperModel};
pub use captions::CaptionClient;
pub use file::FileTranscriptSource;

use crate::config::{Config, TranscriptSourceKind};
use crate::error::{AsktubeError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// One caption line or transcription segment.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFragment {
    pub text: String,
    pub start: Option<Duration>,
    pub duration: Option<Duration>,
}

impl TranscriptFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// Audio downloaded while acquiring a transcript, handed through untouched.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub fragments: Vec<TranscriptFragment>,
    pub language: Option<String>,
    pub audio: Option<AudioArtifact>,
}

impl Transcript {
    pub fn from_fragments(fragments: Vec<TranscriptFragment>) -> Self {
        Self {
            fragments,
            ..Self::default()
        }
    }

    /// Fragments joined in order with a single space.
    pub fn full_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.text.trim().is_empty())
    }
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript for a video, trying `languages` in order.
    async fn fetch_transcript(&self, video_id: &str, languages: &[String]) -> Result<Transcript>;
    fn name(&self) -> &'static str;
}

/// Build the transcript source selected on the command line.
pub fn create_source(
    kind: TranscriptSourceKind,
    config: &Config,
    transcript_dir: Option<PathBuf>,
) -> Result<Box<dyn TranscriptSource>> {
    match kind {
        TranscriptSourceKind::Captions => Ok(Box::new(CaptionClient::new())),
        TranscriptSourceKind::Audio => {
            let api_key = config.openai_api_key.as_ref().ok_or_else(|| {
                AsktubeError::Config(
                    "OpenAI API key not set. Set OPENAI_API_KEY environment variable.".to_string(),
                )
            })?;
            Ok(Box::new(
                AudioTranscriber::new(api_key.clone()).with_model(config.whisper_model),
            ))
        }
        TranscriptSourceKind::File => {
            let dir = transcript_dir.unwrap_or_else(|| PathBuf::from("."));
            Ok(Box::new(FileTranscriptSource::new(dir)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_joins_with_single_space() {
        let transcript = Transcript::from_fragments(vec![
            TranscriptFragment::new("Hello there."),
            TranscriptFragment::new("  "),
            TranscriptFragment::new(" General Kenobi. "),
        ]);
        assert_eq!(transcript.full_text(), "Hello there. General Kenobi.");
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::default();
        assert_eq!(transcript.full_text(), "");
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_create_audio_source_requires_key() {
        let config = Config::default();
        assert!(create_source(TranscriptSourceKind::Audio, &config, None).is_err());

        let source = create_source(TranscriptSourceKind::Captions, &config, None).unwrap();
        assert_eq!(source.name(), "YouTube captions");
    }
}

use crate::error::{AsktubeError, Result};
use crate::transcript::WhisperModel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chunk capacity in characters.
pub const DEFAULT_MAX_CHUNK_CAPACITY: usize = 800;

/// Default summarization model on the Hugging Face Inference API.
pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSourceKind {
    #[default]
    Captions,
    Audio,
    File,
}

impl std::fmt::Display for TranscriptSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSourceKind::Captions => write!(f, "captions"),
            TranscriptSourceKind::Audio => write!(f, "audio"),
            TranscriptSourceKind::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for TranscriptSourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "captions" => Ok(TranscriptSourceKind::Captions),
            "audio" => Ok(TranscriptSourceKind::Audio),
            "file" => Ok(TranscriptSourceKind::File),
            _ => Err(format!(
                "Unknown transcript source: {}. Use 'captions', 'audio', or 'file'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
    Text,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "text" | "txt" => Ok(ReportFormat::Text),
            _ => Err(format!(
                "Unknown format: {}. Use 'markdown', 'json', or 'text'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hf_api_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub summary_model: String,
    /// Speech-to-text model for the audio source.
    pub whisper_model: WhisperModel,
    pub max_chunk_capacity: usize,
    pub summary_max_len: usize,
    pub summary_min_len: usize,
    pub languages: Vec<String>,
    pub default_source: TranscriptSourceKind,
    pub default_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hf_api_token: None,
            openai_api_key: None,
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            whisper_model: WhisperModel::default(),
            max_chunk_capacity: DEFAULT_MAX_CHUNK_CAPACITY,
            summary_max_len: 120,
            summary_min_len: 40,
            languages: vec!["en".to_string()],
            default_source: TranscriptSourceKind::default(),
            default_format: ReportFormat::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents).map_err(|e| {
                    AsktubeError::Config(format!("{}: {}", config_path.display(), e))
                })?;
            }
        }

        // Override with environment variables
        if let Ok(token) = std::env::var("HF_API_TOKEN") {
            config.hf_api_token = Some(token);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("ASKTUBE_SUMMARY_MODEL") {
            config.summary_model = model;
        }
        if let Ok(model) = std::env::var("ASKTUBE_WHISPER_MODEL") {
            config.whisper_model = model.parse().map_err(AsktubeError::Config)?;
        }
        if let Ok(source) = std::env::var("ASKTUBE_SOURCE") {
            if let Ok(s) = source.parse() {
                config.default_source = s;
            }
        }
        if let Ok(max_chunk) = std::env::var("ASKTUBE_MAX_CHUNK") {
            if let Ok(n) = max_chunk.parse() {
                config.max_chunk_capacity = n;
            }
        }

        Ok(config)
    }

    pub fn validate(&self, source: TranscriptSourceKind) -> Result<()> {
        if self.hf_api_token.is_none() {
            return Err(AsktubeError::Config(
                "HF_API_TOKEN not set. Create one at https://huggingface.co/settings/tokens"
                    .to_string(),
            ));
        }

        if source == TranscriptSourceKind::Audio && self.openai_api_key.is_none() {
            return Err(AsktubeError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-...".to_string(),
            ));
        }

        if self.max_chunk_capacity == 0 {
            return Err(AsktubeError::Config(
                "Chunk capacity must be greater than 0".to_string(),
            ));
        }

        if self.summary_min_len > self.summary_max_len {
            return Err(AsktubeError::Config(format!(
                "summary_min_len ({}) exceeds summary_max_len ({})",
                self.summary_min_len, self.summary_max_len
            )));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("asktube").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_source_parsing() {
        assert_eq!(
            "captions".parse::<TranscriptSourceKind>().unwrap(),
            TranscriptSourceKind::Captions
        );
        assert_eq!(
            "AUDIO".parse::<TranscriptSourceKind>().unwrap(),
            TranscriptSourceKind::Audio
        );
        assert_eq!(
            "file".parse::<TranscriptSourceKind>().unwrap(),
            TranscriptSourceKind::File
        );
        assert!("rss".parse::<TranscriptSourceKind>().is_err());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("txt".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_chunk_capacity, 800);
        assert_eq!(config.summary_max_len, 120);
        assert_eq!(config.summary_min_len, 40);
        assert_eq!(config.languages, vec!["en".to_string()]);
        assert_eq!(config.summary_model, "facebook/bart-large-cnn");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("max_chunk_capacity = 500\n").unwrap();
        assert_eq!(config.max_chunk_capacity, 500);
        assert_eq!(config.summary_max_len, 120);
        assert_eq!(config.default_source, TranscriptSourceKind::Captions);
    }

    #[test]
    fn test_whisper_model_from_toml() {
        let config: Config = toml::from_str("whisper_model = \"gpt-4o-mini-transcribe\"\n").unwrap();
        assert_eq!(config.whisper_model, WhisperModel::Gpt4oMiniTranscribe);
        assert_eq!(Config::default().whisper_model, WhisperModel::Whisper1);
        assert!(toml::from_str::<Config>("whisper_model = \"whisper-9\"\n").is_err());
    }

    #[test]
    fn test_validate_missing_keys() {
        let mut config = Config::default();
        assert_err!(config.validate(TranscriptSourceKind::Captions));

        config.hf_api_token = Some("hf_test".to_string());
        assert_ok!(config.validate(TranscriptSourceKind::Captions));
        assert_err!(config.validate(TranscriptSourceKind::Audio));

        config.openai_api_key = Some("sk-test".to_string());
        assert_ok!(config.validate(TranscriptSourceKind::Audio));
    }

    #[test]
    fn test_validate_lengths() {
        let mut config = Config {
            hf_api_token: Some("hf_test".to_string()),
            ..Config::default()
        };
        config.summary_min_len = 200;
        assert!(config.validate(TranscriptSourceKind::File).is_err());

        config.summary_min_len = 40;
        config.max_chunk_capacity = 0;
        assert!(config.validate(TranscriptSourceKind::File).is_err());
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsktubeError {
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Summarization failed on chunk {index}: {source}")]
    Summarization {
        index: usize,
        #[source]
        source: Box<AsktubeError>,
    },

    #[error("Rendering failed: {0}")]
    Rendering(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AsktubeError {
    /// Pipeline stage the error belongs to, for caller-facing reports.
    pub fn stage(&self) -> &'static str {
        match self {
            AsktubeError::InputValidation(_) => "input",
            AsktubeError::TranscriptUnavailable(_) | AsktubeError::AudioDownload(_) => "transcript",
            AsktubeError::Summarization { .. } => "summarize",
            AsktubeError::Rendering(_) => "render",
            AsktubeError::Config(_) => "config",
            AsktubeError::Api(_)
            | AsktubeError::Io(_)
            | AsktubeError::Http(_)
            | AsktubeError::Json(_) => "io",
        }
    }

    /// Index of the failing chunk, when the failure is tied to one.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            AsktubeError::Summarization { index, .. } => Some(*index),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AsktubeError>;

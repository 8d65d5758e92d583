pub mod driver;
pub mod huggingface;

pub use driver::{
    NoProgress, ProgressBarObserver, ProgressObserver, SummarizationDriver, SummarizationRun,
    SummarizationStats,
};
pub use huggingface::HuggingFaceSummarizer;

use crate::config::Config;
use crate::error::{AsktubeError, Result};
use async_trait::async_trait;

/// Length bounds and decoding mode passed to the summarizer on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    pub max_len: usize,
    pub min_len: usize,
    /// Greedy decoding, so repeated runs on the same input agree.
    pub deterministic: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            max_len: 120,
            min_len: 40,
            deterministic: true,
        }
    }
}

impl SummaryParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_len: config.summary_max_len,
            min_len: config.summary_min_len,
            deterministic: true,
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String>;
    fn name(&self) -> &str;
}

/// Build the configured summarizer.
pub fn create_summarizer(config: &Config) -> Result<Box<dyn Summarizer>> {
    let token = config.hf_api_token.as_ref().ok_or_else(|| {
        AsktubeError::Config(
            "Hugging Face token not set. Set HF_API_TOKEN environment variable.".to_string(),
        )
    })?;

    Ok(Box::new(
        HuggingFaceSummarizer::new(token.clone()).with_model(config.summary_model.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = SummaryParams::default();
        assert_eq!(params.max_len, 120);
        assert_eq!(params.min_len, 40);
        assert!(params.deterministic);
    }

    #[test]
    fn test_create_summarizer() {
        let mut config = Config::default();
        assert!(create_summarizer(&config).is_err());

        config.hf_api_token = Some("hf_test".to_string());
        let summarizer = create_summarizer(&config).unwrap();
        assert_eq!(summarizer.name(), "facebook/bart-large-cnn");
    }
}

//! Summarization through the Hugging Face Inference API.

use crate::config::DEFAULT_SUMMARY_MODEL;
use crate::error::{AsktubeError, Result};
use crate::summarize::{Summarizer, SummaryParams};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const INFERENCE_API_URL: &str = "https://api-inference.huggingface.co";

pub struct HuggingFaceSummarizer {
    client: Client,
    api_token: String,
    base_url: String,
    model: String,
}

impl HuggingFaceSummarizer {
    pub fn new(api_token: String) -> Self {
        Self {
            client: Client::new(),
            api_token,
            base_url: INFERENCE_API_URL.to_string(),
            model: DEFAULT_SUMMARY_MODEL.to_string(),
        }
    }

    /// Set a different model (e.g., "sshleifer/distilbart-cnn-12-6").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
    options: RequestOptions,
}

#[derive(Serialize)]
struct SummarizationParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Deserialize, Debug)]
struct SummarizationOutput {
    summary_text: String,
}

#[derive(Deserialize, Debug)]
struct InferenceError {
    error: String,
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String> {
        let request = SummarizationRequest {
            inputs: text,
            parameters: SummarizationParameters {
                max_length: params.max_len,
                min_length: params.min_len,
                do_sample: !params.deterministic,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        debug!("Summarizing {} chars with {}", text.len(), self.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<InferenceError>(&body) {
                return Err(AsktubeError::Api(format!(
                    "Inference API error ({}): {}",
                    status, api_error.error
                )));
            }
            return Err(AsktubeError::Api(format!(
                "Inference API error ({}): {}",
                status, body
            )));
        }

        let outputs: Vec<SummarizationOutput> = serde_json::from_str(&body)?;
        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .ok_or_else(|| AsktubeError::Api("Inference API returned no summary".to_string()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let summarizer = HuggingFaceSummarizer::new("hf_test".to_string())
            .with_base_url("http://localhost:8080/")
            .with_model("org/model");
        assert_eq!(summarizer.endpoint(), "http://localhost:8080/models/org/model");
        assert_eq!(summarizer.name(), "org/model");
    }

    #[test]
    fn test_request_body_is_greedy() {
        let request = SummarizationRequest {
            inputs: "text",
            parameters: SummarizationParameters {
                max_length: 120,
                min_length: 40,
                do_sample: !SummaryParams::default().deterministic,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["parameters"]["do_sample"], false);
        assert_eq!(json["parameters"]["max_length"], 120);
        assert_eq!(json["options"]["wait_for_model"], true);
    }
}

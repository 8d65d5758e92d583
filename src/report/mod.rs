//! Text reports of a run: transcript, final summary and bullet points.

pub mod json;
pub mod markdown;
pub mod text;

use crate::aggregate::BulletItem;
use crate::config::ReportFormat;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub video_id: String,
    pub transcript: String,
    pub final_summary: String,
    pub bullets: Vec<BulletItem>,
}

pub trait ReportFormatter {
    fn format(&self, report: &SummaryReport) -> String;
    fn extension(&self) -> &'static str;
}

pub fn create_formatter(format: ReportFormat, include_transcript: bool) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Markdown => Box::new(markdown::MarkdownFormatter { include_transcript }),
        ReportFormat::Json => Box::new(json::JsonFormatter { include_transcript }),
        ReportFormat::Text => Box::new(text::TextFormatter { include_transcript }),
    }
}

#[cfg(test)]
pub(crate) fn sample_report() -> SummaryReport {
    SummaryReport {
        video_id: "dQw4w9WgXcQ".to_string(),
        transcript: "We're no strangers to love. You know the rules.".to_string(),
        final_summary: "A song about commitment. It promises loyalty.".to_string(),
        bullets: vec![
            BulletItem {
                ordinal: 1,
                text: "A song about commitment.".to_string(),
            },
            BulletItem {
                ordinal: 2,
                text: "It promises loyalty.".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_formatter_extensions() {
        assert_eq!(create_formatter(ReportFormat::Markdown, true).extension(), "md");
        assert_eq!(create_formatter(ReportFormat::Json, true).extension(), "json");
        assert_eq!(create_formatter(ReportFormat::Text, true).extension(), "txt");
    }

    #[test]
    fn test_create_formatter_drops_transcript() {
        let report = sample_report();
        for format in [ReportFormat::Markdown, ReportFormat::Json, ReportFormat::Text] {
            let with = create_formatter(format, true).format(&report);
            let without = create_formatter(format, false).format(&report);
            assert!(with.contains("strangers to love"), "{format}");
            assert!(!without.contains("strangers to love"), "{format}");
            assert!(without.contains("It promises loyalty."), "{format}");
        }
    }
}

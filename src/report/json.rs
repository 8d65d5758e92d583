// JSON report format
use super::{ReportFormatter, SummaryReport};
use serde::Serialize;

pub struct JsonFormatter {
    /// Emit the `transcript` field.
    pub include_transcript: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self {
            include_transcript: true,
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    video_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<&'a str>,
    final_summary: &'a str,
    bullet_count: usize,
    bullets: &'a [crate::aggregate::BulletItem],
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &SummaryReport) -> String {
        let output = JsonOutput {
            video_id: &report.video_id,
            transcript: self.include_transcript.then_some(report.transcript.as_str()),
            final_summary: &report.final_summary,
            bullet_count: report.bullets.len(),
            bullets: &report.bullets,
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

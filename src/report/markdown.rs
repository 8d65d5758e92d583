// Markdown report with transcript and summary sections
use super::{ReportFormatter, SummaryReport};

pub struct MarkdownFormatter {
    pub include_transcript: bool,
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self {
            include_transcript: true,
        }
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &SummaryReport) -> String {
        let mut output = format!("# Video Summary: {}\n\n", report.video_id);

        if self.include_transcript {
            output.push_str("## Full Transcript\n\n");
            output.push_str(&report.transcript);
            output.push_str("\n\n");
        }
        output.push_str("## Final Summary\n\n");
        output.push_str(&report.final_summary);
        output.push_str("\n\n### Summary in Bullet Points\n\n");

        for bullet in &report.bullets {
            output.push_str(&format!("- **Part {}:** {}\n", bullet.ordinal, bullet.text));
        }

        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_report;

    #[test]
    fn test_markdown_format() {
        let output = MarkdownFormatter::default().format(&sample_report());

        assert!(output.starts_with("# Video Summary: dQw4w9WgXcQ\n\n"));
        assert!(output.contains("## Full Transcript\n\nWe're no strangers to love."));
        assert!(output.contains("## Final Summary\n\nA song about commitment. It promises loyalty."));
        assert!(output.contains("- **Part 1:** A song about commitment.\n- **Part 2:** It promises loyalty.\n"));
    }
}

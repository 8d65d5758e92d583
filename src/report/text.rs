// Plain text report for terminal display
use super::{ReportFormatter, SummaryReport};

pub struct TextFormatter {
    /// Print the full transcript above the summary.
    pub include_transcript: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            include_transcript: true,
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &SummaryReport) -> String {
        let rule = "=".repeat(60);
        let mut output = String::new();

        if self.include_transcript {
            output.push_str(&format!("{rule}\nFULL TRANSCRIPT\n{rule}\n{}\n\n", report.transcript));
        }

        output.push_str(&format!("{rule}\nFINAL SUMMARY\n{rule}\n{}\n\n", report.final_summary));
        output.push_str(&format!("{rule}\nKEY POINTS\n{rule}\n"));

        for bullet in &report.bullets {
            output.push_str(&format!("{:>3}. {}\n", bullet.ordinal, bullet.text));
        }

        output
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_report;

    #[test]
    fn test_text_format() {
        let output = TextFormatter::default().format(&sample_report());
        assert!(output.contains("FULL TRANSCRIPT"));
        assert!(output.contains("  1. A song about commitment.\n  2. It promises loyalty.\n"));
    }

    #[test]
    fn test_text_format_without_transcript() {
        let formatter = TextFormatter {
            include_transcript: false,
        };
        let output = formatter.format(&sample_report());
        assert!(!output.contains("FULL TRANSCRIPT"));
        assert!(output.contains("FINAL SUMMARY"));
    }
}

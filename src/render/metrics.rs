//! Text measurement and greedy line wrapping for the base-14 Helvetica font.

use crate::error::{AsktubeError, Result};

pub const FONT_REGULAR: &str = "Helvetica";
pub const FONT_BOLD: &str = "Helvetica-Bold";

/// Measures text and breaks it into lines that fit a width budget.
pub trait TextMeasurer: Send + Sync {
    fn measure_and_wrap(&self, text: &str, font: &str, size: f32, max_width: f32)
        -> Result<Vec<String>>;
}

/// Advance widths for Helvetica, code points 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a-z
    334, 260, 334, 584, // {..~
];

const DEFAULT_WIDTH: u16 = 556;

/// Metrics for the regular Helvetica face.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    fn char_width(c: char) -> u16 {
        match c as u32 {
            cp @ 32..=126 => HELVETICA_WIDTHS[(cp - 32) as usize],
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| Self::char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }

    /// Break a word wider than the line into the longest fitting pieces.
    fn hard_break(word: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut width = 0.0;

        for c in word.chars() {
            let w = Self::char_width(c) as f32 * size / 1000.0;
            if !current.is_empty() && width + w > max_width {
                pieces.push(std::mem::take(&mut current));
                width = 0.0;
            }
            current.push(c);
            width += w;
        }

        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }
}

impl TextMeasurer for HelveticaMetrics {
    fn measure_and_wrap(
        &self,
        text: &str,
        font: &str,
        size: f32,
        max_width: f32,
    ) -> Result<Vec<String>> {
        if font != FONT_REGULAR {
            return Err(AsktubeError::Rendering(format!(
                "No metrics for font '{}'",
                font
            )));
        }
        if !(size > 0.0 && max_width > 0.0) {
            return Err(AsktubeError::Rendering(format!(
                "Invalid font size {} or line width {}",
                size, max_width
            )));
        }

        let space = Self::text_width(" ", size);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut width = 0.0;

        for word in text.split_whitespace() {
            let word_width = Self::text_width(word, size);

            if !current.is_empty() && width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                width += space + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if word_width <= max_width {
                current.push_str(word);
                width = word_width;
            } else {
                let mut pieces = Self::hard_break(word, size, max_width);
                let last = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                width = Self::text_width(&last, size);
                current = last;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        let width = HelveticaMetrics::text_width("Hi", 10.0);
        assert!((width - 9.44).abs() < 1e-4);
        assert_eq!(HelveticaMetrics::text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "The quick brown fox jumps over the lazy dog and keeps running far away";
        let lines = HelveticaMetrics
            .measure_and_wrap(text, FONT_REGULAR, 11.0, 100.0)
            .unwrap();

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(HelveticaMetrics::text_width(line, 11.0) <= 100.0, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_empty_text() {
        let lines = HelveticaMetrics
            .measure_and_wrap("   ", FONT_REGULAR, 11.0, 100.0)
            .unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_wrap_hard_breaks_long_word() {
        let word = "a".repeat(100);
        let lines = HelveticaMetrics
            .measure_and_wrap(&format!("x {}", word), FONT_REGULAR, 10.0, 50.0)
            .unwrap();

        assert_eq!(lines[0], "x");
        assert_eq!(lines[1..].concat(), word);
        for line in &lines {
            assert!(HelveticaMetrics::text_width(line, 10.0) <= 50.0);
        }
    }

    #[test]
    fn test_unknown_font_is_error() {
        let result = HelveticaMetrics.measure_and_wrap("text", "Comic Sans", 11.0, 100.0);
        assert!(matches!(result, Err(AsktubeError::Rendering(_))));
        let result = HelveticaMetrics.measure_and_wrap("text", FONT_REGULAR, 0.0, 100.0);
        assert!(result.is_err());
    }
}

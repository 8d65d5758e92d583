//! Paginated layout of the summary document.
//!
//! Layout is pure: it produces a [`Document`] of positioned lines, and
//! [`pdf::write_pdf`] turns that into bytes. Coordinates are PDF points with
//! the origin at the bottom-left corner, so the cursor moves down by
//! decreasing `y`.

pub mod metrics;
pub mod pdf;

pub use metrics::{HelveticaMetrics, TextMeasurer, FONT_BOLD, FONT_REGULAR};
pub use pdf::{write_pdf, PDF_MIME};

use crate::aggregate::BulletItem;
use crate::error::Result;
use tracing::debug;

/// Line height as a multiple of the body font size.
pub const LINE_SPACING: f32 = 1.4;

/// Page geometry, fonts and spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    /// Left, right and top margin.
    pub margin: f32,
    /// Lowest `y` a line may be drawn at.
    pub bottom_margin: f32,
    pub title: String,
    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub line_height: f32,
    /// Left offset of bullet continuation lines from the margin.
    pub bullet_indent: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageLayout {
    pub fn a4() -> Self {
        let body_size = 11.0;
        Self {
            width: 595.0,
            height: 842.0,
            margin: 50.0,
            bottom_margin: 50.0,
            title: "YouTube Video Summary".to_string(),
            title_size: 16.0,
            heading_size: 13.0,
            body_size,
            line_height: body_size * LINE_SPACING,
            bullet_indent: 15.0,
        }
    }

    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            ..Self::a4()
        }
    }

    /// Usable line width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Heading,
    Summary,
    /// First line of a bullet, carrying the `"{ordinal}. "` prefix.
    Bullet,
    BulletContinuation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x: f32,
    pub y: f32,
    pub font: &'static str,
    pub size: f32,
    pub text: String,
    pub kind: LineKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    /// Lines of the given kinds, across all pages.
    pub fn count_lines(&self, kinds: &[LineKind]) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.lines)
            .filter(|l| kinds.contains(&l.kind))
            .count()
    }
}

/// Drawing position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
    pub page_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    Continue(Cursor),
    NeedsNewPage,
}

/// Move the cursor down one line, or report that the page is full.
pub fn advance(cursor: Cursor, line_height: f32, bottom_margin: f32) -> Advance {
    let y = cursor.y - line_height;
    if y < bottom_margin {
        Advance::NeedsNewPage
    } else {
        Advance::Continue(Cursor { y, ..cursor })
    }
}

struct PageWriter<'a> {
    layout: &'a PageLayout,
    pages: Vec<Page>,
    cursor: Cursor,
}

impl<'a> PageWriter<'a> {
    fn new(layout: &'a PageLayout) -> Self {
        Self {
            layout,
            pages: vec![Page::default()],
            cursor: Cursor {
                x: layout.margin,
                y: layout.top(),
                page_index: 0,
            },
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = Cursor {
            x: self.layout.margin,
            y: self.layout.top(),
            page_index: self.pages.len() - 1,
        };
        debug!("Starting page {}", self.pages.len());
    }

    /// Move down by `height`, breaking to a new page when space runs out.
    fn feed(&mut self, height: f32) {
        match advance(self.cursor, height, self.layout.bottom_margin) {
            Advance::Continue(next) => self.cursor = next,
            Advance::NeedsNewPage => self.new_page(),
        }
    }

    fn emit(&mut self, x_offset: f32, font: &'static str, size: f32, text: String, kind: LineKind) {
        let line = Line {
            x: self.cursor.x + x_offset,
            y: self.cursor.y,
            font,
            size,
            text,
            kind,
        };
        self.pages[self.cursor.page_index].lines.push(line);
        self.feed(self.layout.line_height);
    }

    fn finish(self) -> Document {
        Document {
            width: self.layout.width,
            height: self.layout.height,
            pages: self.pages,
        }
    }
}

/// Lay out the title, final summary and numbered bullets onto pages.
///
/// Lines that would fall below the bottom margin move to the next page; no
/// text is dropped. The last page is kept even when nothing was drawn on it.
pub fn render(
    final_summary: &str,
    bullets: &[BulletItem],
    layout: &PageLayout,
    measurer: &dyn TextMeasurer,
) -> Result<Document> {
    let mut writer = PageWriter::new(layout);
    let width = layout.content_width();

    writer.emit(
        0.0,
        FONT_BOLD,
        layout.title_size,
        layout.title.clone(),
        LineKind::Title,
    );
    writer.feed(layout.line_height);

    writer.emit(
        0.0,
        FONT_BOLD,
        layout.heading_size,
        "Summary".to_string(),
        LineKind::Heading,
    );
    for line in measurer.measure_and_wrap(final_summary, FONT_REGULAR, layout.body_size, width)? {
        writer.emit(0.0, FONT_REGULAR, layout.body_size, line, LineKind::Summary);
    }
    writer.feed(layout.line_height);

    writer.emit(
        0.0,
        FONT_BOLD,
        layout.heading_size,
        "Key Points".to_string(),
        LineKind::Heading,
    );

    // Continuation lines sit `bullet_indent` to the right, so every wrapped
    // line gets the narrower width.
    let bullet_width = width - layout.bullet_indent;
    for bullet in bullets {
        let text = format!("{}. {}", bullet.ordinal, bullet.text);
        let lines = measurer.measure_and_wrap(&text, FONT_REGULAR, layout.body_size, bullet_width)?;

        for (i, line) in lines.into_iter().enumerate() {
            if i == 0 {
                writer.emit(0.0, FONT_REGULAR, layout.body_size, line, LineKind::Bullet);
            } else {
                writer.emit(
                    layout.bullet_indent,
                    FONT_REGULAR,
                    layout.body_size,
                    line,
                    LineKind::BulletContinuation,
                );
            }
        }
        writer.feed(layout.line_height);
    }

    let document = writer.finish();
    debug!("Laid out {} pages", document.pages.len());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AsktubeError;

    /// Every character is 1 point wide; wraps on spaces.
    struct FixedWidth;

    impl TextMeasurer for FixedWidth {
        fn measure_and_wrap(
            &self,
            text: &str,
            _font: &str,
            _size: f32,
            max_width: f32,
        ) -> Result<Vec<String>> {
            let mut lines: Vec<String> = Vec::new();
            for word in text.split_whitespace() {
                match lines.last_mut() {
                    Some(last) if (last.len() + 1 + word.len()) as f32 <= max_width => {
                        last.push(' ');
                        last.push_str(word);
                    }
                    _ => lines.push(word.to_string()),
                }
            }
            Ok(lines)
        }
    }

    struct Broken;

    impl TextMeasurer for Broken {
        fn measure_and_wrap(&self, _: &str, _: &str, _: f32, _: f32) -> Result<Vec<String>> {
            Err(AsktubeError::Rendering("font file corrupt".to_string()))
        }
    }

    fn small_layout() -> PageLayout {
        PageLayout {
            width: 60.0,
            height: 200.0,
            margin: 10.0,
            bottom_margin: 20.0,
            line_height: 10.0,
            bullet_indent: 5.0,
            ..PageLayout::a4()
        }
    }

    fn bullets(texts: &[&str]) -> Vec<BulletItem> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| BulletItem {
                ordinal: i + 1,
                text: t.to_string(),
            })
            .collect()
    }

    fn all_lines(doc: &Document) -> Vec<&Line> {
        doc.pages.iter().flat_map(|p| &p.lines).collect()
    }

    #[test]
    fn test_advance() {
        let cursor = Cursor {
            x: 10.0,
            y: 40.0,
            page_index: 0,
        };
        assert_eq!(
            advance(cursor, 15.0, 20.0),
            Advance::Continue(Cursor { y: 25.0, ..cursor })
        );
        assert_eq!(advance(cursor, 25.0, 20.0), Advance::NeedsNewPage);
    }

    #[test]
    fn test_a4_spacing() {
        let layout = PageLayout::a4();
        assert!((layout.line_height - 15.4).abs() < 1e-4);
        assert_eq!(layout.content_width(), 495.0);
        assert_eq!(PageLayout::letter().line_height, layout.line_height);
    }

    #[test]
    fn test_empty_summary_renders_one_page() {
        let doc = render("", &[], &PageLayout::a4(), &HelveticaMetrics).unwrap();
        assert_eq!(doc.pages.len(), 1);

        let lines = all_lines(&doc);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, LineKind::Title);
        assert_eq!(lines[0].text, "YouTube Video Summary");
        assert_eq!(lines[0].y, 792.0);
        assert_eq!(lines[1].text, "Summary");
        assert_eq!(lines[2].text, "Key Points");
    }

    #[test]
    fn test_no_line_below_bottom_margin() {
        let layout = small_layout();
        let summary = "word ".repeat(120);
        let items = bullets(&["alpha beta gamma delta epsilon zeta eta theta"; 8]);
        let doc = render(&summary, &items, &layout, &FixedWidth).unwrap();

        assert!(doc.pages.len() > 2);
        for line in all_lines(&doc) {
            assert!(line.y >= layout.bottom_margin, "line at {}", line.y);
            assert!(line.y <= layout.height - layout.margin);
        }
    }

    #[test]
    fn test_pagination_keeps_every_line() {
        let layout = small_layout();
        let summary = "lorem ipsum dolor sit amet ".repeat(30);
        let items = bullets(&[
            "first point with some words in it",
            "second",
            "third point that also wraps around a few times",
        ]);
        let doc = render(&summary, &items, &layout, &FixedWidth).unwrap();

        let width = layout.content_width();
        let expected_summary = FixedWidth
            .measure_and_wrap(&summary, FONT_REGULAR, 11.0, width)
            .unwrap()
            .len();
        let expected_bullets: usize = items
            .iter()
            .map(|b| {
                FixedWidth
                    .measure_and_wrap(
                        &format!("{}. {}", b.ordinal, b.text),
                        FONT_REGULAR,
                        11.0,
                        width - layout.bullet_indent,
                    )
                    .unwrap()
                    .len()
            })
            .sum();

        assert_eq!(doc.count_lines(&[LineKind::Summary]), expected_summary);
        assert_eq!(
            doc.count_lines(&[LineKind::Bullet, LineKind::BulletContinuation]),
            expected_bullets
        );
        assert_eq!(doc.count_lines(&[LineKind::Bullet]), 3);
    }

    #[test]
    fn test_bullet_numbering_and_indent_across_page_break() {
        let layout = small_layout();
        // Ten summary lines leave the second bullet's first line in the last
        // slot of page one.
        let filler = "x ".repeat(200);
        let items = bullets(&["short", "aaa bbb ccc ddd eee fff ggg hhh iii jjj kkk lll mmm"]);
        let doc = render(&filler, &items, &layout, &FixedWidth).unwrap();

        let lines = all_lines(&doc);
        let bullet_lines: Vec<&&Line> = lines
            .iter()
            .filter(|l| matches!(l.kind, LineKind::Bullet | LineKind::BulletContinuation))
            .collect();

        assert!(bullet_lines[0].text.starts_with("1. "));
        let second = bullet_lines
            .iter()
            .position(|l| l.text.starts_with("2. "))
            .unwrap();
        let continuations = &bullet_lines[second + 1..];
        assert!(!continuations.is_empty());
        for line in continuations {
            assert_eq!(line.kind, LineKind::BulletContinuation);
            assert_eq!(line.x, layout.margin + layout.bullet_indent);
        }

        let last_page = doc.pages.last().unwrap();
        assert!(doc.pages.len() > 1);
        assert!(last_page
            .lines
            .iter()
            .any(|l| l.kind == LineKind::BulletContinuation));
        // The broken bullet resumes at the top of the new page.
        let first_on_page = last_page.lines.first().unwrap();
        assert_eq!(first_on_page.y, layout.height - layout.margin);
    }

    #[test]
    fn test_measure_failure_is_fatal() {
        let result = render("some text", &[], &PageLayout::a4(), &Broken);
        assert!(matches!(result, Err(AsktubeError::Rendering(_))));
    }

    #[test]
    fn test_letter_layout() {
        let layout = PageLayout::letter();
        assert_eq!(layout.width, 612.0);
        assert_eq!(layout.content_width(), 512.0);
    }
}

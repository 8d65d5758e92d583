use crate::aggregate::{aggregate, Aggregate};
use crate::chunker::chunk_text;
use crate::config::{Config, DEFAULT_MAX_CHUNK_CAPACITY};
use crate::error::{AsktubeError, Result};
use crate::render::{render, write_pdf, PageLayout, TextMeasurer};
use crate::report::SummaryReport;
use crate::summarize::{
    NoProgress, ProgressBarObserver, ProgressObserver, SummarizationDriver, SummarizationStats,
    Summarizer, SummaryParams,
};
use crate::transcript::{Transcript, TranscriptSource};
use crate::video::extract_video_id;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Cursor;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Options for one summarization run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum chunk size in bytes handed to the summarizer.
    pub max_chunk_capacity: usize,
    pub params: SummaryParams,
    /// Transcript language preference, most preferred first.
    pub languages: Vec<String>,
    pub layout: PageLayout,
    /// Show spinners and the per-chunk progress bar.
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_chunk_capacity: DEFAULT_MAX_CHUNK_CAPACITY,
            params: SummaryParams::default(),
            languages: vec!["en".to_string()],
            layout: PageLayout::default(),
            show_progress: true,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_chunk_capacity: config.max_chunk_capacity,
            params: SummaryParams::from_config(config),
            languages: config.languages.clone(),
            ..Self::default()
        }
    }
}

/// Output of the chunk, summarize and aggregate stages.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub chunks: Vec<String>,
    pub partials: Vec<String>,
    pub aggregate: Aggregate,
    pub stats: SummarizationStats,
}

/// A serialized PDF ready to hand to a sink.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Cursor<Vec<u8>>,
    pub page_count: usize,
    pub file_name: String,
}

/// Statistics from the pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub total_time: Duration,
    pub fetch_time: Duration,
    pub summarize_time: Duration,
    pub transcript_chars: usize,
    pub chunks: usize,
    pub source: String,
    pub summarizer: String,
}

#[derive(Debug)]
pub struct PipelineResult {
    pub video_id: String,
    pub transcript: Transcript,
    pub outcome: SummaryOutcome,
    /// The document is a detachable artifact: a rendering failure lands here
    /// while the summary and bullets stay usable.
    pub document: Result<RenderedPdf>,
    pub stats: PipelineStats,
}

impl PipelineResult {
    pub fn report(&self) -> SummaryReport {
        SummaryReport {
            video_id: self.video_id.clone(),
            transcript: self.transcript.full_text(),
            final_summary: self.outcome.aggregate.final_summary.clone(),
            bullets: self.outcome.aggregate.bullets.clone(),
        }
    }
}

/// Suggested file name for the rendered document.
pub fn pdf_file_name(video_id: &str) -> String {
    format!("{}_summary.pdf", video_id)
}

/// Default file name for a saved report with the given extension.
pub fn report_file_name(video_id: &str, extension: &str) -> String {
    format!("{}_summary.{}", video_id, extension)
}

/// Chunk the transcript, summarize each chunk in order and aggregate.
pub async fn summarize_transcript(
    text: &str,
    summarizer: &dyn Summarizer,
    options: &PipelineOptions,
    observer: &dyn ProgressObserver,
) -> Result<SummaryOutcome> {
    let chunks = chunk_text(text, options.max_chunk_capacity);
    info!(
        "Split transcript into {} chunks (capacity {})",
        chunks.len(),
        options.max_chunk_capacity
    );

    let driver = SummarizationDriver::new(summarizer, options.params);
    let run = driver.summarize_all(&chunks, observer).await?;
    let aggregate = aggregate(&run.partials);

    Ok(SummaryOutcome {
        chunks,
        partials: run.partials,
        aggregate,
        stats: run.stats,
    })
}

/// Lay out and serialize the summary document.
pub fn render_document(
    video_id: &str,
    aggregate: &Aggregate,
    layout: &PageLayout,
    measurer: &dyn TextMeasurer,
) -> Result<RenderedPdf> {
    let document = render(&aggregate.final_summary, &aggregate.bullets, layout, measurer)?;
    let bytes = write_pdf(&document)?;

    Ok(RenderedPdf {
        bytes,
        page_count: document.pages.len(),
        file_name: pdf_file_name(video_id),
    })
}

fn spinner(show: bool, message: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Summarize a YouTube video end to end.
///
/// 1. Extracts the video id
/// 2. Fetches the transcript from `source`
/// 3. Chunks and summarizes it with `summarizer`
/// 4. Renders the PDF, wrapping text with `measurer`
pub async fn run_pipeline(
    input: &str,
    source: &dyn TranscriptSource,
    summarizer: &dyn Summarizer,
    measurer: &dyn TextMeasurer,
    options: &PipelineOptions,
) -> Result<PipelineResult> {
    let start_time = Instant::now();
    let video_id = extract_video_id(input)?;

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 1: Transcript
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 1/3: Fetching transcript for {} via {}", video_id, source.name());
    let fetch_start = Instant::now();
    let fetch_pb = spinner(options.show_progress, "Fetching transcript...");

    let fetched = source.fetch_transcript(&video_id, &options.languages).await;
    let transcript = match fetched {
        Ok(t) => t,
        Err(e) => {
            if let Some(pb) = fetch_pb {
                pb.finish_and_clear();
            }
            return Err(e);
        }
    };
    let text = transcript.full_text();

    if let Some(pb) = fetch_pb {
        pb.finish_with_message(format!("✓ Transcript fetched ({} chars)", text.len()));
    }
    let fetch_time = fetch_start.elapsed();
    info!(
        "Transcript fetched: {} fragments, {} chars in {:.2}s",
        transcript.fragments.len(),
        text.len(),
        fetch_time.as_secs_f64()
    );

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 2: Summaries
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 2/3: Summarizing with {}", summarizer.name());
    let summarize_start = Instant::now();

    let observer: Box<dyn ProgressObserver> = if options.show_progress {
        Box::new(ProgressBarObserver::new())
    } else {
        Box::new(NoProgress)
    };
    let outcome = summarize_transcript(&text, summarizer, options, observer.as_ref()).await?;
    let summarize_time = summarize_start.elapsed();

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 3: Document
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 3/3: Rendering PDF");
    let document = render_document(&video_id, &outcome.aggregate, &options.layout, measurer);
    match &document {
        Ok(pdf) => info!("Rendered {} pages", pdf.page_count),
        Err(e) => warn!("Document generation failed: {}", e),
    }

    let stats = PipelineStats {
        total_time: start_time.elapsed(),
        fetch_time,
        summarize_time,
        transcript_chars: text.len(),
        chunks: outcome.chunks.len(),
        source: source.name().to_string(),
        summarizer: summarizer.name().to_string(),
    };

    Ok(PipelineResult {
        video_id,
        transcript,
        outcome,
        document,
        stats,
    })
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult, pdf_path: Option<&std::path::Path>) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                      Video Summary Complete                    ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Video:      {}", result.video_id);
    println!("  Source:     {}", result.stats.source);
    println!("  Model:      {}", result.stats.summarizer);
    println!("  Transcript: {} chars", result.stats.transcript_chars);
    println!("  Chunks:     {}", result.stats.chunks);
    match (&result.document, pdf_path) {
        (Ok(pdf), Some(path)) => {
            println!("  PDF:        {} ({} pages)", path.display(), pdf.page_count)
        }
        (Ok(pdf), None) => println!("  PDF:        {} pages (not saved)", pdf.page_count),
        (Err(e), _) => println!("  PDF:        failed ({})", e),
    }
    println!();
    println!("  Timing:");
    println!("    Fetch:       {:.2}s", result.stats.fetch_time.as_secs_f64());
    println!(
        "    Summarize:   {:.2}s ({:.2}s/chunk)",
        result.stats.summarize_time.as_secs_f64(),
        result.outcome.stats.avg_chunk_time.as_secs_f64()
    );
    println!("    Total:       {:.2}s", result.stats.total_time.as_secs_f64());
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}

/// Map a failure to the exit message shown to the user.
pub fn describe_error(error: &AsktubeError) -> String {
    match error.chunk_index() {
        Some(index) => format!("[{}] chunk {}: {}", error.stage(), index, error),
        None => format!("[{}] {}", error.stage(), error),
    }
}

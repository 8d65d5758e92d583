use crate::error::{AsktubeError, Result};
use crate::summarize::{Summarizer, SummaryParams};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Receives one notification per chunk, before its summarizer call.
pub trait ProgressObserver: Send + Sync {
    fn on_chunk(&self, index: usize, total: usize);
    fn on_complete(&self, total: usize);
}

/// Observer that reports nothing.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_chunk(&self, _index: usize, _total: usize) {}
    fn on_complete(&self, _total: usize) {}
}

/// Terminal progress bar, one tick per summarized chunk.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBarObserver {
    /// The bar's length is set from the first notification.
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_chunk(&self, index: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(index as u64);
        self.bar
            .set_message(format!("Summarizing chunk {}/{}...", index + 1, total));
    }

    fn on_complete(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(total as u64);
        self.bar.finish_with_message("Summaries complete");
    }
}

/// Timing for one driver run.
#[derive(Debug, Clone)]
pub struct SummarizationStats {
    pub total_chunks: usize,
    pub total_time: Duration,
    pub avg_chunk_time: Duration,
}

/// Partial summaries, index-aligned with the input chunks.
#[derive(Debug, Clone)]
pub struct SummarizationRun {
    pub partials: Vec<String>,
    pub stats: SummarizationStats,
}

/// Calls the summarizer once per chunk, strictly in order.
pub struct SummarizationDriver<'a> {
    summarizer: &'a dyn Summarizer,
    params: SummaryParams,
}

impl<'a> SummarizationDriver<'a> {
    pub fn new(summarizer: &'a dyn Summarizer, params: SummaryParams) -> Self {
        Self { summarizer, params }
    }

    /// Summarize every chunk in order.
    ///
    /// The first failure aborts the run; summaries already produced are
    /// dropped and the error carries the failing chunk index.
    pub async fn summarize_all(
        &self,
        chunks: &[String],
        observer: &dyn ProgressObserver,
    ) -> Result<SummarizationRun> {
        let total = chunks.len();
        let start_time = Instant::now();

        info!(
            "Summarizing {} chunks sequentially using {}",
            total,
            self.summarizer.name()
        );

        let mut partials = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            observer.on_chunk(index, total);

            let chunk_start = Instant::now();
            debug!("Starting summary of chunk {} ({} chars)", index, chunk.len());

            let summary = self
                .summarizer
                .summarize(chunk, &self.params)
                .await
                .map_err(|e| {
                    warn!("Chunk {} failed: {}", index, e);
                    AsktubeError::Summarization {
                        index,
                        source: Box::new(e),
                    }
                })?;

            debug!(
                "Chunk {} completed in {}ms",
                index,
                chunk_start.elapsed().as_millis()
            );
            partials.push(summary);
        }

        observer.on_complete(total);

        let total_time = start_time.elapsed();
        let avg_chunk_time = if total > 0 {
            total_time / total as u32
        } else {
            Duration::ZERO
        };

        info!(
            "Summarization complete: {} chunks in {:.2}s (avg {:.2}s/chunk)",
            total,
            total_time.as_secs_f64(),
            avg_chunk_time.as_secs_f64()
        );

        Ok(SummarizationRun {
            partials,
            stats: SummarizationStats {
                total_chunks: total,
                total_time,
                avg_chunk_time,
            },
        })
    }
}

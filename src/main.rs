use anyhow::{Context, Result};
use asktube::config::{Config, ReportFormat, TranscriptSourceKind};
use asktube::interactive::run_interactive_wizard;
use asktube::pipeline::{describe_error, pdf_file_name, report_file_name, PipelineResult};
use asktube::render::{HelveticaMetrics, PageLayout};
use asktube::report::create_formatter;
use asktube::summarize::create_summarizer;
use asktube::transcript::create_source;
use asktube::{extract_video_id, print_summary, run_pipeline, AsktubeError, PipelineOptions};
use clap::Parser;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "asktube")]
#[command(version, about = "Summarize YouTube videos from their transcripts")]
#[command(long_about = "Fetch a YouTube transcript, summarize it chunk by chunk with a Hugging Face model, and write the summary as a PDF.")]
struct Cli {
    /// YouTube URL or video id (prompted for when omitted)
    url: Option<String>,

    /// Transcript source: captions, audio, file
    #[arg(short, long)]
    source: Option<String>,

    /// Directory holding <video_id>.txt transcripts for the file source
    #[arg(long)]
    transcript_dir: Option<PathBuf>,

    /// Output PDF path (defaults to <video_id>_summary.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format printed after the run: markdown, json, text
    #[arg(short, long)]
    format: Option<String>,

    /// Write the report to a file instead of stdout (defaults to <video_id>_summary.<ext>)
    #[arg(long, value_name = "FILE")]
    report: Option<Option<PathBuf>>,

    /// Leave the full transcript out of the report
    #[arg(long)]
    no_transcript: bool,

    /// Maximum characters per summarized chunk
    #[arg(long)]
    max_chunk: Option<usize>,

    /// Preferred transcript language, repeatable (e.g., -l en -l de)
    #[arg(short, long)]
    language: Vec<String>,

    /// Use US Letter pages instead of A4
    #[arg(long)]
    letter: bool,

    /// Save the downloaded audio as <video_id>.mp3 (audio source only)
    #[arg(long)]
    keep_audio: bool,

    /// Disable progress bars
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Reject a bad URL before anything else, then check the keys the run needs.
fn check_inputs(
    url: &str,
    config: &Config,
    source: TranscriptSourceKind,
) -> std::result::Result<String, AsktubeError> {
    let video_id = extract_video_id(url)?;
    config.validate(source)?;
    Ok(video_id)
}

fn write_pdf_file(result: &PipelineResult, path: &Path) -> Result<()> {
    if let Ok(pdf) = &result.document {
        let mut reader = pdf.bytes.clone();
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        std::io::copy(&mut reader, &mut file)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn write_audio_file(result: &PipelineResult) -> Result<Option<PathBuf>> {
    let Some(audio) = &result.transcript.audio else {
        return Ok(None);
    };
    let path = PathBuf::from(format!("{}.mp3", result.video_id));
    fs::write(&path, &audio.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} audio to {}", audio.mime, path.display());
    Ok(Some(path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Without a URL, ask for everything interactively
    let (url, mut config, source_kind, format) = match cli.url {
        Some(url) => {
            let config = Config::load().context("Failed to load configuration")?;
            let source_kind: TranscriptSourceKind = match &cli.source {
                Some(s) => s.parse().map_err(|e: String| anyhow::anyhow!(e))?,
                None => config.default_source,
            };
            let format: ReportFormat = match &cli.format {
                Some(f) => f.parse().map_err(|e: String| anyhow::anyhow!(e))?,
                None => config.default_format,
            };
            (url, config, source_kind, format)
        }
        None => {
            let wizard = run_interactive_wizard()?;
            (wizard.url, wizard.config, wizard.source, wizard.format)
        }
    };

    if let Some(max_chunk) = cli.max_chunk {
        config.max_chunk_capacity = max_chunk;
    }
    if !cli.language.is_empty() {
        config.languages = cli.language.clone();
    }

    let video_id = check_inputs(&url, &config, source_kind)
        .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;

    let source = create_source(source_kind, &config, cli.transcript_dir.clone())?;
    let summarizer = create_summarizer(&config)?;

    let mut options = PipelineOptions::from_config(&config);
    options.show_progress = !cli.no_progress;
    if cli.letter {
        options.layout = PageLayout::letter();
    }

    info!("Video:    {}", video_id);
    info!("Source:   {}", source_kind);
    info!("Model:    {}", summarizer.name());
    info!("Chunk:    {} chars", options.max_chunk_capacity);

    let result = match run_pipeline(
        &url,
        source.as_ref(),
        summarizer.as_ref(),
        &HelveticaMetrics,
        &options,
    )
    .await
    {
        Ok(result) => result,
        Err(e) => anyhow::bail!(describe_error(&e)),
    };

    // Report
    let formatter = create_formatter(format, !cli.no_transcript);
    let report = formatter.format(&result.report());
    match &cli.report {
        Some(path) => {
            let path = path.clone().unwrap_or_else(|| {
                PathBuf::from(report_file_name(&result.video_id, formatter.extension()))
            });
            fs::write(&path, &report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", report),
    }

    // PDF
    let pdf_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(pdf_file_name(&result.video_id)));
    write_pdf_file(&result, &pdf_path)?;

    if cli.keep_audio {
        write_audio_file(&result)?;
    }

    print_summary(&result, result.document.is_ok().then_some(pdf_path.as_path()));

    if let Err(e) = &result.document {
        anyhow::bail!(describe_error(e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "asktube",
            "https://youtu.be/dQw4w9WgXcQ",
            "-s",
            "file",
            "-l",
            "en",
            "-l",
            "de",
            "--max-chunk",
            "500",
            "--no-progress",
        ]);
        assert_eq!(cli.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(cli.source.as_deref(), Some("file"));
        assert_eq!(cli.language, vec!["en", "de"]);
        assert_eq!(cli.max_chunk, Some(500));
        assert!(cli.no_progress);
        assert!(!cli.letter);
    }

    #[test]
    fn test_cli_url_optional() {
        let cli = Cli::parse_from(["asktube"]);
        assert!(cli.url.is_none());
        assert!(cli.report.is_none());
        assert!(!cli.no_transcript);
    }

    #[test]
    fn test_cli_report_path_optional() {
        let cli = Cli::parse_from(["asktube", "dQw4w9WgXcQ", "--no-transcript", "--report"]);
        assert_eq!(cli.report, Some(None));
        assert!(cli.no_transcript);

        let cli = Cli::parse_from(["asktube", "dQw4w9WgXcQ", "--report", "out.md"]);
        assert_eq!(cli.report, Some(Some(PathBuf::from("out.md"))));
    }

    #[test]
    fn test_bad_url_reported_before_missing_token() {
        let config = Config::default();
        let err = check_inputs("https://example.com/watch", &config, TranscriptSourceKind::Captions)
            .unwrap_err();
        assert!(matches!(err, AsktubeError::InputValidation(_)));

        let err = check_inputs("dQw4w9WgXcQ", &config, TranscriptSourceKind::Captions).unwrap_err();
        assert!(matches!(err, AsktubeError::Config(_)));

        let config = Config {
            hf_api_token: Some("hf_test".to_string()),
            ..Config::default()
        };
        assert_eq!(
            check_inputs("https://youtu.be/dQw4w9WgXcQ", &config, TranscriptSourceKind::Captions)
                .unwrap(),
            "dQw4w9WgXcQ"
        );
    }
}

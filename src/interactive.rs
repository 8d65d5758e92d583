use crate::config::{Config, ReportFormat, TranscriptSourceKind};
use crate::video::extract_video_id;
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;

pub struct InteractiveResult {
    pub url: String,
    pub source: TranscriptSourceKind,
    pub format: ReportFormat,
    pub config: Config,
}

pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    // Step 1: Check/Setup API token
    let mut config = setup_api_token()?;

    // Step 2: Video URL
    let (url, video_id) = prompt_video_url()?;

    // Step 3: Transcript source
    let source = select_source(config.default_source)?;
    if source == TranscriptSourceKind::Audio && config.openai_api_key.is_none() {
        let key: String = Input::new()
            .with_prompt("Enter your OpenAI API key (for Whisper)")
            .interact_text()?;
        if key.trim().is_empty() {
            anyhow::bail!("OpenAI API key is required for the audio source");
        }
        config.openai_api_key = Some(key.trim().to_string());
    }

    // Step 4: Report format
    let format = select_report_format(config.default_format)?;

    // Step 5: Confirm
    print_summary(&video_id, source, format);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    Ok(InteractiveResult {
        url,
        source,
        format,
        config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        asktube - YouTube Video Summarizer         ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn setup_api_token() -> anyhow::Result<Config> {
    let mut config = Config::load().unwrap_or_default();

    if config.hf_api_token.is_some() {
        println!("{} Hugging Face token configured", style("✓").green());
        return Ok(config);
    }

    println!("{} Hugging Face token not found", style("!").yellow());
    println!("  Create one at: https://huggingface.co/settings/tokens\n");

    let token: String = Input::new()
        .with_prompt("Enter your Hugging Face token")
        .interact_text()?;

    if token.trim().is_empty() {
        anyhow::bail!("Hugging Face token is required");
    }

    config.hf_api_token = Some(token.trim().to_string());

    // Offer to save
    if Confirm::new()
        .with_prompt("Save token to config file?")
        .default(true)
        .interact()?
    {
        save_config(&config)?;
        println!("{} Token saved to config\n", style("✓").green());
    }

    Ok(config)
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_dir) = dirs::config_dir() {
        let asktube_dir = config_dir.join("asktube");
        fs::create_dir_all(&asktube_dir)?;

        let config_path = asktube_dir.join("config.toml");
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn prompt_video_url() -> anyhow::Result<(String, String)> {
    let url: String = Input::new()
        .with_prompt("Paste a YouTube URL")
        .validate_with(|input: &String| -> Result<(), String> {
            extract_video_id(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    let video_id = extract_video_id(&url)?;
    Ok((url, video_id))
}

fn select_source(default: TranscriptSourceKind) -> anyhow::Result<TranscriptSourceKind> {
    let sources = [
        ("Captions", "Published or auto-generated captions (fast)", TranscriptSourceKind::Captions),
        ("Audio", "Download audio and run Whisper (needs yt-dlp)", TranscriptSourceKind::Audio),
        ("File", "Read <video_id>.txt from the current directory", TranscriptSourceKind::File),
    ];

    let items: Vec<String> = sources
        .iter()
        .map(|(name, desc, _)| format!("{} - {}", name, desc))
        .collect();
    let default_idx = sources.iter().position(|s| s.2 == default).unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select transcript source")
        .items(&items)
        .default(default_idx)
        .interact()?;

    Ok(sources[selection].2)
}

fn select_report_format(default: ReportFormat) -> anyhow::Result<ReportFormat> {
    let formats = [
        ("Markdown", "Transcript, summary and bullet points", ReportFormat::Markdown),
        ("Text", "Plain terminal output", ReportFormat::Text),
        ("JSON", "Programmatic access", ReportFormat::Json),
    ];

    let items: Vec<String> = formats
        .iter()
        .map(|(name, desc, _)| format!("{} - {}", name, desc))
        .collect();
    let default_idx = formats.iter().position(|f| f.2 == default).unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select report format")
        .items(&items)
        .default(default_idx)
        .interact()?;

    Ok(formats[selection].2)
}

fn print_summary(video_id: &str, source: TranscriptSourceKind, format: ReportFormat) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Video:     {}", style(video_id).cyan());
    println!("  Source:    {}", source);
    println!("  Report:    {}", format);
    println!("  PDF:       {}", style(crate::pipeline::pdf_file_name(video_id)).cyan());
    println!();
}

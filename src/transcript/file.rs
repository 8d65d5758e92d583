use crate::error::{AsktubeError, Result};
use crate::transcript::{Transcript, TranscriptFragment, TranscriptSource};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads transcripts saved as `<dir>/<video_id>.txt`, one fragment per line.
pub struct FileTranscriptSource {
    dir: PathBuf,
}

impl FileTranscriptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, video_id: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", video_id))
    }
}

#[async_trait]
impl TranscriptSource for FileTranscriptSource {
    async fn fetch_transcript(&self, video_id: &str, _languages: &[String]) -> Result<Transcript> {
        let path = self.path_for(video_id);
        debug!("Reading transcript from {}", path.display());

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AsktubeError::TranscriptUnavailable(format!(
                    "No transcript file at {}",
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let fragments = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(TranscriptFragment::new)
            .collect();

        Ok(Transcript::from_fragments(fragments))
    }

    fn name(&self) -> &'static str {
        "local transcript file"
    }
}

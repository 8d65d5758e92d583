pub mod aggregate;
pub mod chunker;
pub mod config;
pub mod error;
pub mod interactive;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod summarize;
pub mod transcript;
pub mod video;

pub use aggregate::{aggregate, Aggregate, BulletItem};
pub use chunker::{chunk_text, split_into_units};
pub use config::Config;
pub use error::{AsktubeError, Result};
pub use pipeline::{
    print_summary, run_pipeline, summarize_transcript, PipelineOptions, PipelineResult,
    PipelineStats, SummaryOutcome,
};
pub use video::extract_video_id;

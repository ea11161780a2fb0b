pub mod cache;
pub mod config;
pub mod error;
pub mod feedback;
pub mod fetch;
pub mod pipeline;
pub mod segment;
pub mod summarize;
pub mod transcribe;

pub use cache::{CacheEntry, ResultCache};
pub use config::{Config, ModelSize};
pub use error::{Result, YtsumError};
pub use pipeline::{
    write_artifacts, EngineRegistry, Orchestrator, PipelineProgress, PipelineRun,
    MAX_DURATION_SECS,
};
pub use segment::segment;

use peel_compose::ConfigError;
use peel_traits::{BuildError, ExecutorError, ExtractorError};
use std::path::PathBuf;
use thiserror::Error;

/// Failure while analyzing a single page image.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("cannot open image '{path}': {source}")]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot write image '{path}': {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("layout extraction failed: {0}")]
    Extract(#[from] ExtractorError),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A comprehensive error type for the deck reconstruction pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Analysis of page {page_index} ('{path}') failed: {source}")]
    Analysis {
        page_index: usize,
        path: PathBuf,
        #[source]
        source: AnalysisError,
    },

    #[error("No valid images found")]
    NoValidImages,

    #[error("Document building failed: {0}")]
    Build(#[from] BuildError),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError::Config(e.to_string())
    }
}

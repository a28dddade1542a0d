//! Layout extraction capability.
//!
//! An extractor turns one page (or one cropped sub-region) into a shallow list
//! of [`EditableElement`]s in that image's own pixel frame. Ids and global
//! frames are assigned by the caller.

use peel_types::EditableElement;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed layout data in '{path}': {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Extractor backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },
}

/// Output of one extraction call.
///
/// `errors` carries recoverable, per-item problems (skipped entries, missing
/// sidecars) that did not prevent the call from producing a result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    pub elements: Vec<EditableElement>,
    pub errors: Vec<String>,
}

impl ExtractionResult {
    pub fn new(elements: Vec<EditableElement>) -> Self {
        Self {
            elements,
            errors: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends another result's elements and errors after this one's.
    pub fn merge(&mut self, other: ExtractionResult) {
        self.elements.extend(other.elements);
        self.errors.extend(other.errors);
    }
}

pub trait ElementExtractor: Send + Sync + Debug {
    fn extract(&self, image_path: &Path) -> Result<ExtractionResult, ExtractorError>;

    /// Short backend name used in logs.
    fn name(&self) -> &str;
}

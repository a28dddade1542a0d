#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

use peel_traits::{ElementExtractor, ExtractionResult, ExtractorError};
use std::path::Path;

/// Runs several extractors in order and concatenates what they find.
///
/// A single extractor failing is recorded in the result's `errors`; the call
/// only fails when every extractor fails.
#[derive(Debug, Default)]
pub struct CompositeExtractor {
    extractors: Vec<Box<dyn ElementExtractor>>,
}

impl CompositeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, extractor: impl ElementExtractor + 'static) -> Self {
        self.push(Box::new(extractor));
        self
    }

    pub fn push(&mut self, extractor: Box<dyn ElementExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl ElementExtractor for CompositeExtractor {
    fn extract(&self, image_path: &Path) -> Result<ExtractionResult, ExtractorError> {
        let mut combined = ExtractionResult::default();
        let mut last_error = None;
        let mut succeeded = 0usize;

        for extractor in &self.extractors {
            match extractor.extract(image_path) {
                Ok(result) => {
                    succeeded += 1;
                    combined.merge(result);
                }
                Err(e) => {
                    log::warn!(
                        "Extractor '{}' failed on {}: {}",
                        extractor.name(),
                        image_path.display(),
                        e
                    );
                    combined.errors.push(format!("{}: {}", extractor.name(), e));
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if succeeded == 0 => Err(e),
            _ => Ok(combined),
        }
    }

    fn name(&self) -> &str {
        "composite"
    }
}

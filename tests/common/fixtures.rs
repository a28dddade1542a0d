use image::{Rgb, RgbImage};
use peel::{ContentListExtractor, ElementExtractor};
use peel_traits::{ExtractionResult, ExtractorError};
use std::path::{Path, PathBuf};

/// Writes a solid slide render with a darker band where content would be.
pub fn write_slide(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let mut img = RgbImage::from_pixel(width, height, Rgb([245, 245, 240]));
    for y in height / 3..height / 2 {
        for x in width / 8..width / 2 {
            img.put_pixel(x, y, Rgb([30, 60, 120]));
        }
    }
    img.save(&path).expect("write slide fixture");
    path
}

/// Writes a content-list sidecar named `<stem>.json`.
pub fn write_sidecar(dir: &Path, stem: &str, items: serde_json::Value) -> PathBuf {
    let path = dir.join(format!("{}.json", stem));
    let bytes = serde_json::to_vec_pretty(&items).expect("serialize sidecar");
    std::fs::write(&path, bytes).expect("write sidecar");
    path
}

/// Reads sidecars like `ContentListExtractor` but fails on chosen images.
#[derive(Debug)]
pub struct FailingOn {
    pub inner: ContentListExtractor,
    pub file_names: Vec<String>,
}

impl FailingOn {
    pub fn new(inner: ContentListExtractor, file_names: &[&str]) -> Self {
        Self {
            inner,
            file_names: file_names.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ElementExtractor for FailingOn {
    fn extract(&self, image_path: &Path) -> Result<ExtractionResult, ExtractorError> {
        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.file_names.contains(&name) {
            return Err(ExtractorError::Backend {
                backend: "failing-on".to_string(),
                message: format!("layout service rejected {}", name),
            });
        }
        self.inner.extract(image_path)
    }

    fn name(&self) -> &str {
        "failing-on"
    }
}

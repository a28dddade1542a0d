//! Whole-image generative strategy.
//!
//! One natural-language edit is applied to the entire image; regions are
//! ignored. Useful when element geometry is unreliable or too scattered to mask.

use image::{DynamicImage, ImageFormat};
use peel_traits::{InpaintError, InpaintProvider};
use peel_types::{BBox, ElementType};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

pub const CLEAN_BACKGROUND_INSTRUCTION: &str = "Remove all text, icons, charts, tables and other \
foreground elements from this slide. Keep the background, its colours, gradients, textures and \
decorative shapes exactly as they are, and keep the original layout and aspect ratio. Fill removed \
areas so they blend seamlessly with the surrounding background.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditOptions {
    /// Defaults to `"16:9"`.
    pub aspect_ratio: String,
    /// Defaults to `"2K"`.
    pub resolution: String,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            resolution: "2K".to_string(),
        }
    }
}

/// A generative image-edit service.
///
/// `image_path` only has to exist for the duration of the call. `Ok(None)`
/// means the service answered without an image.
pub trait ImageEditor: Send + Sync + Debug {
    fn edit_image(
        &self,
        instruction: &str,
        image_path: &Path,
        options: &EditOptions,
    ) -> Result<Option<DynamicImage>, InpaintError>;
}

#[derive(Debug, Clone)]
pub struct GenerativeInpaintProvider<E> {
    editor: E,
    options: EditOptions,
    instruction: String,
}

impl<E: ImageEditor> GenerativeInpaintProvider<E> {
    pub fn new(editor: E) -> Self {
        Self {
            editor,
            options: EditOptions::default(),
            instruction: CLEAN_BACKGROUND_INSTRUCTION.to_string(),
        }
    }

    pub fn with_options(mut self, options: EditOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    fn run(&self, image: &DynamicImage) -> Result<Option<DynamicImage>, InpaintError> {
        // Removed when `input` drops, on every return path.
        let input = tempfile::Builder::new()
            .prefix("peel-inpaint-")
            .suffix(".png")
            .tempfile()
            .map_err(|source| InpaintError::Io {
                path: std::env::temp_dir(),
                source,
            })?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        log::info!("Generative inpaint: editing {}x{} image", image.width(), image.height());
        self.editor.edit_image(&self.instruction, input.path(), &self.options)
    }
}

impl<E: ImageEditor> InpaintProvider for GenerativeInpaintProvider<E> {
    fn inpaint_regions(
        &self,
        image: &DynamicImage,
        _regions: &[BBox],
        _types: Option<&[ElementType]>,
    ) -> Option<DynamicImage> {
        match self.run(image) {
            Ok(Some(result)) => {
                log::info!("Generative inpaint: done");
                Some(result)
            }
            Ok(None) => {
                log::error!("Generative inpaint: editor returned no image");
                None
            }
            Err(e) => {
                log::error!("Generative inpaint failed: {}", e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "generative"
    }
}

use crate::mask::{MaskOptions, build_mask, prepare_regions};
use image::{DynamicImage, GrayImage};
use peel_traits::{InpaintError, InpaintProvider};
use peel_types::{BBox, ElementType};
use std::fmt::Debug;

/// Redraws the masked pixels of an image.
///
/// `mask` has the image's dimensions; non-zero pixels are to be replaced.
pub trait BackgroundReconstructor: Send + Sync + Debug {
    fn reconstruct(
        &self,
        image: &DynamicImage,
        mask: &GrayImage,
    ) -> Result<DynamicImage, InpaintError>;

    fn name(&self) -> &str;
}

/// Region-precise strategy: mask the given regions, then reconstruct.
#[derive(Debug, Clone)]
pub struct RegionInpaintProvider<R> {
    reconstructor: R,
    options: MaskOptions,
}

impl<R: BackgroundReconstructor> RegionInpaintProvider<R> {
    pub fn new(reconstructor: R) -> Self {
        Self {
            reconstructor,
            options: MaskOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MaskOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MaskOptions {
        &self.options
    }

    fn run(&self, image: &DynamicImage, regions: &[BBox]) -> Result<DynamicImage, InpaintError> {
        if regions.is_empty() {
            return Err(InpaintError::NoRegions);
        }
        let prepared = prepare_regions(regions, image.width(), image.height(), &self.options);
        if prepared.is_empty() {
            return Err(InpaintError::NoRegions);
        }
        log::debug!(
            "{}: masking {} region(s) ({} requested) on {}x{} image",
            self.reconstructor.name(),
            prepared.len(),
            regions.len(),
            image.width(),
            image.height()
        );
        let mask = build_mask(image.width(), image.height(), &prepared);
        self.reconstructor.reconstruct(image, &mask)
    }
}

impl<R: BackgroundReconstructor> InpaintProvider for RegionInpaintProvider<R> {
    fn inpaint_regions(
        &self,
        image: &DynamicImage,
        regions: &[BBox],
        _types: Option<&[ElementType]>,
    ) -> Option<DynamicImage> {
        match self.run(image, regions) {
            Ok(result) => Some(result),
            Err(e) => {
                log::error!("Region inpaint via {} failed: {}", self.reconstructor.name(), e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "region"
    }
}

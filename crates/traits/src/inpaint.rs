//! Background reconstruction capability.
//!
//! Given an image and the regions occupied by extracted elements, a provider
//! returns a plausible background with those regions removed. Providers never
//! surface errors to their caller: any internal failure yields `None`, and the
//! caller falls back to the unmodified image.

use image::DynamicImage;
use peel_types::{BBox, ElementType};
use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

/// Internal failure of an inpaint strategy or of the service behind it.
#[derive(Error, Debug)]
pub enum InpaintError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No regions to inpaint")]
    NoRegions,

    #[error("Mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    MaskMismatch {
        mask_width: u32,
        mask_height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Inpaint backend failed: {0}")]
    Backend(String),
}

pub trait InpaintProvider: Send + Sync + Debug {
    /// Removes the given regions from `image`.
    ///
    /// `regions` are in the image's own pixel frame. `types`, when given, is
    /// parallel to `regions`. Strategies are free to ignore either.
    fn inpaint_regions(
        &self,
        image: &DynamicImage,
        regions: &[BBox],
        types: Option<&[ElementType]>,
    ) -> Option<DynamicImage>;

    fn name(&self) -> &str;
}

impl<P: InpaintProvider + ?Sized> InpaintProvider for Box<P> {
    fn inpaint_regions(
        &self,
        image: &DynamicImage,
        regions: &[BBox],
        types: Option<&[ElementType]>,
    ) -> Option<DynamicImage> {
        (**self).inpaint_regions(image, regions, types)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

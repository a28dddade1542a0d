use crate::region::BackgroundReconstructor;
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use peel_traits::InpaintError;

/// Fills masked pixels with the mean colour of the unmasked ones.
///
/// Good enough for flat slide backgrounds, and needs no external service.
#[derive(Debug, Clone, Default)]
pub struct SolidFillReconstructor;

impl SolidFillReconstructor {
    pub fn new() -> Self {
        Self
    }
}

impl BackgroundReconstructor for SolidFillReconstructor {
    fn reconstruct(
        &self,
        image: &DynamicImage,
        mask: &GrayImage,
    ) -> Result<DynamicImage, InpaintError> {
        let mut rgba: RgbaImage = image.to_rgba8();
        if rgba.dimensions() != mask.dimensions() {
            return Err(InpaintError::MaskMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                image_width: rgba.width(),
                image_height: rgba.height(),
            });
        }

        let mut sums = [0u64; 4];
        let mut count = 0u64;
        for (pixel, m) in rgba.pixels().zip(mask.pixels()) {
            if m.0[0] == 0 {
                for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                    *sum += u64::from(channel);
                }
                count += 1;
            }
        }
        if count == 0 {
            return Err(InpaintError::Backend(
                "mask covers the whole image, no background to sample".to_string(),
            ));
        }
        let fill = Rgba(sums.map(|sum| (sum / count) as u8));

        for (pixel, m) in rgba.pixels_mut().zip(mask.pixels()) {
            if m.0[0] != 0 {
                *pixel = fill;
            }
        }
        Ok(DynamicImage::ImageRgba8(rgba))
    }

    fn name(&self) -> &str {
        "solid-fill"
    }
}

//! Mask geometry for region-precise inpainting.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use peel_types::BBox;
use serde::{Deserialize, Serialize};

const MASKED: Luma<u8> = Luma([255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    /// Margin added on every side of each region before masking.
    ///
    /// Defaults to `10`.
    pub expand_pixels: u32,
    /// Merge regions closer than `merge_distance` into their union.
    ///
    /// Defaults to `false`.
    pub merge_regions: bool,
    /// Defaults to `20`.
    pub merge_distance: u32,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            expand_pixels: 10,
            merge_regions: false,
            merge_distance: 20,
        }
    }
}

/// Expands, clamps and optionally merges `regions` for an image of the given size.
///
/// Regions that end up empty after clamping are dropped.
pub fn prepare_regions(
    regions: &[BBox],
    width: u32,
    height: u32,
    options: &MaskOptions,
) -> Vec<BBox> {
    let Ok(bounds) = BBox::from_size(f64::from(width), f64::from(height)) else {
        return Vec::new();
    };
    let expanded: Vec<BBox> = regions
        .iter()
        .map(|r| r.expand(f64::from(options.expand_pixels)).clamp_to(&bounds))
        .filter(|r| !r.is_empty())
        .collect();

    if options.merge_regions {
        merge_nearby(expanded, f64::from(options.merge_distance))
    } else {
        expanded
    }
}

/// Repeatedly replaces any two boxes within `distance` of each other by their
/// union until no such pair is left.
pub fn merge_nearby(mut regions: Vec<BBox>, distance: f64) -> Vec<BBox> {
    loop {
        let mut merged_any = false;
        let mut out: Vec<BBox> = Vec::with_capacity(regions.len());
        for region in regions {
            match out.iter_mut().find(|existing| existing.gap_to(&region) <= distance) {
                Some(existing) => {
                    *existing = existing.union(&region);
                    merged_any = true;
                }
                None => out.push(region),
            }
        }
        regions = out;
        if !merged_any {
            return regions;
        }
    }
}

/// Binary mask of `width`×`height`: 255 inside any region, 0 elsewhere.
///
/// Fractional edges are rounded outward so partially covered pixels are masked.
pub fn build_mask(width: u32, height: u32, regions: &[BBox]) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    for region in regions {
        let x0 = region.x0().floor().max(0.0) as i64;
        let y0 = region.y0().floor().max(0.0) as i64;
        let x1 = (region.x1().ceil() as i64).min(i64::from(width));
        let y1 = (region.y1().ceil() as i64).min(i64::from(height));
        if x1 <= x0 || y1 <= y0 {
            continue;
        }
        let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
        draw_filled_rect_mut(&mut mask, rect, MASKED);
    }
    mask
}

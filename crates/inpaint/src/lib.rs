//! Inpaint strategies.
//!
//! Two interchangeable [`InpaintProvider`](peel_traits::InpaintProvider)s:
//!
//! - [`RegionInpaintProvider`]: masks the given regions and hands image and
//!   mask to a [`BackgroundReconstructor`].
//! - [`GenerativeInpaintProvider`]: ignores regions and asks an [`ImageEditor`]
//!   to strip text and iconography from the whole image.
//!
//! [`SolidFillReconstructor`] is a local reconstructor that needs no service.

pub mod fill;
pub mod generative;
pub mod mask;
pub mod region;

pub use fill::SolidFillReconstructor;
pub use generative::{
    CLEAN_BACKGROUND_INSTRUCTION, EditOptions, GenerativeInpaintProvider, ImageEditor,
};
pub use mask::{MaskOptions, build_mask, merge_nearby, prepare_regions};
pub use region::{BackgroundReconstructor, RegionInpaintProvider};

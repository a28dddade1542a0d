//! PDF output for composed slides using lopdf.
//!
//! [`LopdfBuilder`] implements [`DocumentBuilder`](peel_traits::DocumentBuilder):
//! pixel geometry is mapped onto a 10in-wide page with the slide's aspect
//! ratio, images become XObjects shared across pages, and text uses the
//! standard Helvetica faces.

mod builder;
mod xobject;
mod text;

pub use builder::{LopdfBuilder, PAGE_WIDTH_PT};

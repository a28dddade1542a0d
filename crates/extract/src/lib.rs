//! Element extractors.
//!
//! - [`ContentListExtractor`]: reads precomputed layout sidecars in the
//!   MinerU content-list shape.
//! - [`CompositeExtractor`]: chains several extractors.

pub mod composite;
pub mod content_list;

pub use composite::CompositeExtractor;
pub use content_list::ContentListExtractor;

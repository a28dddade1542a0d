//! Deck reconstruction pipeline.
//!
//! - [`PipelineBuilder`]: fluent construction and validation
//! - [`AnalysisStage`]: page images to element trees, in parallel
//! - [`DeckPipeline`]: analysis plus composition onto any
//!   [`DocumentBuilder`](peel_traits::DocumentBuilder)
//! - [`compose_flat`]: image-only export
//!
//! # Example
//!
//! ```ignore
//! use peel::{ContentListExtractor, PipelineBuilder};
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_extractor(ContentListExtractor::with_layout_dir("layouts"))
//!     .with_fill_inpainting()
//!     .with_worker_count(4)
//!     .build()?;
//!
//! pipeline.generate_to_file(&slides, "deck.pdf")?;
//! ```

pub mod analysis;
mod builder;
pub mod config;
mod export;
pub mod flat;

pub use analysis::{AnalysisStage, PageAnalyzer};
pub use builder::PipelineBuilder;
pub use config::{AnalysisConfig, PipelineConfig};
pub use export::{ComposeReport, DeckPipeline, compose_pages};
pub use flat::compose_flat;

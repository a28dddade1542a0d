//! Rebuilds flat slide renders into editable documents.
//!
//! Page images are analyzed into trees of [`EditableElement`]s, which are then
//! composed onto a [`DocumentBuilder`] as independently positioned text,
//! images and placeholders.

pub mod error;
pub mod pipeline;

pub use error::{AnalysisError, PipelineError};
pub use pipeline::{
    AnalysisConfig, AnalysisStage, ComposeReport, DeckPipeline, PageAnalyzer, PipelineBuilder,
    PipelineConfig, compose_flat, compose_pages,
};

pub use peel_compose::{Composer, CompositionConfig, CompositionStats, Operation, RecordingBuilder};
pub use peel_extract::{CompositeExtractor, ContentListExtractor};
pub use peel_inpaint::{MaskOptions, RegionInpaintProvider, SolidFillReconstructor};
pub use peel_render_lopdf::LopdfBuilder;
pub use peel_traits::{BuildError, DocumentBuilder, ElementExtractor, InpaintProvider};
pub use peel_types::{BBox, EditableElement, EditableImage, ElementType, PageSize};

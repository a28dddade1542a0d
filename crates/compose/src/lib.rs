//! Composition engine.
//!
//! Walks one page's element tree and emits positioned text, image and
//! placeholder operations against a [`DocumentBuilder`](peel_traits::DocumentBuilder).
//! The engine only reads the tree; it never touches pixels itself.

pub mod config;
pub mod engine;
pub mod frame;
pub mod recorder;

pub use config::{CompositionConfig, ConfigError};
pub use engine::{Composer, CompositionStats};
pub use frame::{placement_bbox, placement_rect};
pub use recorder::{Operation, RecordingBuilder};

pub mod builder;
pub mod executor;
pub mod extractor;
pub mod inpaint;

pub use builder::{Alignment, BuildError, DocumentBuilder, Emphasis, PageHandle, TextStyle};
pub use executor::{Executor, ExecutorError, SyncExecutor};
pub use extractor::{ElementExtractor, ExtractionResult, ExtractorError};
pub use inpaint::{InpaintError, InpaintProvider};

use super::analysis::{AnalysisStage, PageAnalyzer};
use super::config::PipelineConfig;
use super::export::DeckPipeline;
use crate::error::PipelineError;
use peel_compose::Composer;
use peel_executor::ExecutorImpl;
use peel_inpaint::{RegionInpaintProvider, SolidFillReconstructor};
use peel_traits::{ElementExtractor, InpaintProvider};
use peel_types::PageSize;
use std::path::PathBuf;
use std::sync::Arc;

/// How page backgrounds are reconstructed.
#[derive(Debug, Clone, Default)]
enum InpaintChoice {
    /// Elements stay visible in the background image.
    #[default]
    None,
    /// Region-precise solid fill, configured from `PipelineConfig::mask`.
    Fill,
    Provider(Arc<dyn InpaintProvider>),
}

/// A builder for creating a `DeckPipeline`.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    extractor: Option<Arc<dyn ElementExtractor>>,
    inpaint: InpaintChoice,
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with default settings and no extractor.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the layout backend. Required.
    pub fn with_extractor(mut self, extractor: impl ElementExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn with_shared_extractor(mut self, extractor: Arc<dyn ElementExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_inpaint_provider(mut self, provider: impl InpaintProvider + 'static) -> Self {
        self.inpaint = InpaintChoice::Provider(Arc::new(provider));
        self
    }

    /// Reconstructs backgrounds by filling element regions with the surrounding colour.
    pub fn with_fill_inpainting(mut self) -> Self {
        self.inpaint = InpaintChoice::Fill;
        self
    }

    /// Replaces the whole configuration. Apply before the individual `with_*` setters.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.analysis.max_depth = max_depth;
        self
    }

    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.config.analysis.worker_count = workers;
        self
    }

    pub fn with_page_size(mut self, page: PageSize) -> Self {
        self.config.page = page;
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.config.work_dir = work_dir.into();
        self
    }

    pub fn with_dominant_child_threshold(mut self, threshold: f64) -> Self {
        self.config.composition.dominant_child_threshold = threshold;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Consumes the builder and creates the `DeckPipeline`.
    ///
    /// Fails before any page is touched when no extractor is configured or a
    /// setting is out of range.
    pub fn build(self) -> Result<DeckPipeline, PipelineError> {
        let extractor = self.extractor.ok_or_else(|| {
            PipelineError::Config(
                "No layout extractor has been configured. Use `with_extractor`.".to_string(),
            )
        })?;
        self.config.validate()?;

        let inpaint: Option<Arc<dyn InpaintProvider>> = match self.inpaint {
            InpaintChoice::None => None,
            InpaintChoice::Fill => Some(Arc::new(
                RegionInpaintProvider::new(SolidFillReconstructor::new())
                    .with_options(self.config.mask),
            )),
            InpaintChoice::Provider(provider) => Some(provider),
        };
        match &inpaint {
            Some(provider) => log::info!("Background reconstruction: {}", provider.name()),
            None => log::info!("Background reconstruction disabled."),
        }

        let executor = ExecutorImpl::with_workers(self.config.analysis.worker_count)?;
        let analyzer = PageAnalyzer::new(
            extractor,
            inpaint,
            self.config.analysis,
            self.config.work_dir.clone(),
        );
        let stage = AnalysisStage::new(analyzer, executor);
        let composer = Composer::new(self.config.composition);

        Ok(DeckPipeline::new(stage, composer, self.config))
    }
}

use super::analysis::AnalysisStage;
use super::config::PipelineConfig;
use crate::error::PipelineError;
use peel_compose::{Composer, CompositionStats};
use peel_render_lopdf::LopdfBuilder;
use peel_traits::DocumentBuilder;
use peel_types::{EditableImage, PageSize};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome of composing a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeReport {
    /// One entry per page, in page order.
    pub pages: Vec<CompositionStats>,
}

impl ComposeReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn total(&self) -> CompositionStats {
        let mut total = CompositionStats::default();
        for page in &self.pages {
            total += *page;
        }
        total
    }
}

/// Composes already-analyzed pages onto `builder`, one page each.
///
/// Element failures are absorbed per page and show up in the report; only
/// the builder refusing a new page is an error.
pub fn compose_pages<B: DocumentBuilder>(
    composer: &Composer,
    page_size: PageSize,
    pages: &[EditableImage],
    mut builder: B,
) -> Result<(B, ComposeReport), PipelineError> {
    let mut report = ComposeReport::default();
    for (index, image) in pages.iter().enumerate() {
        let page = builder.new_page(page_size)?;
        let stats = composer.compose_page(&mut builder, page, image, page_size);
        log::debug!(
            "Page {}: {} placed, {} placeholder(s), {} failed, {} skipped",
            index,
            stats.placed,
            stats.placeholders,
            stats.failed,
            stats.skipped
        );
        report.pages.push(stats);
    }
    let total = report.total();
    log::info!(
        "Composed {} page(s): {} placed, {} placeholder(s), {} failed",
        report.page_count(),
        total.placed,
        total.placeholders,
        total.failed
    );
    Ok((builder, report))
}

/// Analysis followed by composition: page images in, editable document out.
#[derive(Debug)]
pub struct DeckPipeline {
    analysis: AnalysisStage,
    composer: Composer,
    config: PipelineConfig,
}

impl DeckPipeline {
    pub(crate) fn new(analysis: AnalysisStage, composer: Composer, config: PipelineConfig) -> Self {
        Self {
            analysis,
            composer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn analyze(&self, paths: &[PathBuf]) -> Result<Vec<EditableImage>, PipelineError> {
        self.analysis.analyze_batch(paths)
    }

    /// Composes pre-analyzed pages; no analysis is run.
    pub fn compose<B: DocumentBuilder>(
        &self,
        pages: &[EditableImage],
        builder: B,
    ) -> Result<(B, ComposeReport), PipelineError> {
        compose_pages(&self.composer, self.config.page, pages, builder)
    }

    /// Analyzes `paths` and composes the result. A failing page fails the
    /// whole deck before anything is composed.
    pub fn generate<B: DocumentBuilder>(
        &self,
        paths: &[PathBuf],
        builder: B,
    ) -> Result<(B, ComposeReport), PipelineError> {
        let start = Instant::now();
        let pages = self.analyze(paths)?;
        log::info!("Analysis finished in {:.2?}", start.elapsed());
        self.compose(&pages, builder)
    }

    /// Generates a PDF at `output`.
    pub fn generate_to_file<P: AsRef<Path>>(
        &self,
        paths: &[PathBuf],
        output: P,
    ) -> Result<ComposeReport, PipelineError> {
        let (builder, report) = self.generate(paths, LopdfBuilder::new())?;
        builder.serialize_to(output.as_ref())?;
        log::info!("Wrote {}", output.as_ref().display());
        Ok(report)
    }
}

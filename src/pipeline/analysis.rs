//! Page analysis: turns page images into element trees.
//!
//! Each page is extracted, its visual elements are cropped to disk, a clean
//! background is reconstructed, and large enough visual regions are analyzed
//! again on their crop. Pages are independent and run through an [`Executor`].

use super::config::AnalysisConfig;
use crate::error::{AnalysisError, PipelineError};
use image::DynamicImage;
use peel_executor::{Executor, ExecutorImpl};
use peel_traits::{ElementExtractor, InpaintProvider};
use peel_types::{BBox, EditableElement, EditableImage, ElementId, ElementType, Scale};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CLEAN_BACKGROUND_FILE: &str = "clean_background.png";

/// Analyzes one page at a time. Cheap to clone; clones share the extractor
/// and inpaint provider.
#[derive(Debug, Clone)]
pub struct PageAnalyzer {
    extractor: Arc<dyn ElementExtractor>,
    inpaint: Option<Arc<dyn InpaintProvider>>,
    config: AnalysisConfig,
    work_dir: PathBuf,
}

impl PageAnalyzer {
    pub fn new(
        extractor: Arc<dyn ElementExtractor>,
        inpaint: Option<Arc<dyn InpaintProvider>>,
        config: AnalysisConfig,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor,
            inpaint,
            config,
            work_dir: work_dir.into(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Directory holding the crops and backgrounds of page `page_index`.
    pub fn page_dir(&self, page_index: usize) -> PathBuf {
        self.work_dir.join(format!("page_{:04}", page_index))
    }

    /// Builds the element tree of one page.
    ///
    /// Unreadable images and page-level extraction errors fail the page.
    /// Failures below the page only stop recursion at the affected element.
    pub fn analyze(&self, page_index: usize, path: &Path) -> Result<EditableImage, AnalysisError> {
        let image = image::open(path).map_err(|source| AnalysisError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let extraction = self.extractor.extract(path)?;
        for message in &extraction.errors {
            log::debug!("[page {}] {}", page_index, message);
        }

        let mut elements: Vec<EditableElement> = extraction
            .elements
            .into_iter()
            .enumerate()
            .map(|(i, mut element)| {
                element.bbox_global = None;
                assign_ids(element, ElementId::top_level(page_index, i))
            })
            .collect();

        let mut page = EditableImage::new(path, image.width(), image.height());
        if elements.is_empty() {
            log::info!("Page {} has no extractable elements", page_index);
            return Ok(page);
        }

        let page_dir = self.page_dir(page_index);
        fs::create_dir_all(&page_dir).map_err(|source| AnalysisError::Io {
            path: page_dir.clone(),
            source,
        })?;

        let regions: Vec<BBox> = elements.iter().map(|e| e.bbox).collect();
        materialize_crops(&image, &mut elements, &regions, &page_dir)?;

        let clean_path = page_dir.join(CLEAN_BACKGROUND_FILE);
        if self.reconstruct_background(&image, &elements, &regions, &clean_path)? {
            page.clean_background = Some(clean_path);
        }

        for element in &mut elements {
            self.expand(element, 0, &page_dir)?;
        }

        page.elements = elements;
        log::info!(
            "Analyzed page {} ({} element(s), tree depth {})",
            page_index,
            page.element_count(),
            page.elements.iter().map(|e| e.subtree_depth()).max().unwrap_or(0)
        );
        Ok(page)
    }

    /// Whether the crop of `element` is worth analyzing again.
    fn qualifies(&self, element: &EditableElement) -> bool {
        if !element.element_type.is_visual() {
            return false;
        }
        let region = element.best_known_bbox();
        let min_side = f64::from(self.config.min_image_size);
        region.width() >= min_side
            && region.height() >= min_side
            && region.area() >= self.config.min_image_area as f64
    }

    /// Gives `element` children and a background to layer them on.
    ///
    /// Sub-elements found on the crop win; without them, children that came
    /// with the page layout are kept.
    fn expand(
        &self,
        element: &mut EditableElement,
        depth: usize,
        page_dir: &Path,
    ) -> Result<(), AnalysisError> {
        if depth >= self.config.max_depth {
            return Ok(());
        }
        let Some(crop_path) = element.image_path.clone().filter(|p| p.is_file()) else {
            return Ok(());
        };
        let indent = "  ".repeat(depth + 1);

        let crop = match image::open(&crop_path) {
            Ok(crop) => crop,
            Err(e) => {
                log::warn!("{}Cannot reopen crop of {}: {}", indent, element.element_id, e);
                return Ok(());
            }
        };
        let parent_global = *element.best_known_bbox();
        let to_page = crop_to_page_scale(&parent_global, &crop);

        let mut children = if self.qualifies(element) {
            self.sub_elements(element, &crop_path, &parent_global, to_page, &indent)
        } else {
            Vec::new()
        };
        if children.is_empty() {
            if element.children.is_empty() {
                return Ok(());
            }
            children = std::mem::take(&mut element.children);
            for child in children.iter_mut().filter(|c| c.bbox_global.is_none()) {
                place_in_page(child, &parent_global, Scale::IDENTITY);
            }
            log::debug!(
                "{}{}: keeping {} child(ren) from the page layout",
                indent,
                element.element_id,
                children.len()
            );
        }

        let regions: Vec<BBox> = children
            .iter()
            .map(|child| region_in_crop(child, &parent_global, to_page))
            .collect();
        materialize_crops(&crop, &mut children, &regions, page_dir)?;

        let background_path = page_dir.join(format!("{}_background.png", element.element_id));
        if self.reconstruct_background(&crop, &children, &regions, &background_path)? {
            element.inpainted_background_path = Some(background_path);
        }

        for child in &mut children {
            self.expand(child, depth + 1, page_dir)?;
        }
        element.children = children;
        Ok(())
    }

    /// Analyzes the crop of `element`; children come back in the page frame.
    fn sub_elements(
        &self,
        element: &EditableElement,
        crop_path: &Path,
        parent_global: &BBox,
        to_page: Scale,
        indent: &str,
    ) -> Vec<EditableElement> {
        let extraction = match self.extractor.extract(crop_path) {
            Ok(extraction) => extraction,
            Err(e) => {
                log::warn!("{}Sub-region analysis of {} failed: {}", indent, element.element_id, e);
                return Vec::new();
            }
        };
        if extraction.elements.is_empty() {
            log::debug!("{}{} has no sub-elements", indent, element.element_id);
            return Vec::new();
        }
        log::debug!(
            "{}{}: {} sub-element(s)",
            indent,
            element.element_id,
            extraction.elements.len()
        );
        extraction
            .elements
            .into_iter()
            .enumerate()
            .map(|(j, child)| {
                let mut child = assign_ids(child, element.element_id.child(j));
                place_in_page(&mut child, parent_global, to_page);
                child
            })
            .collect()
    }

    /// Inpaints `elements` out of `image` and saves the result to `out`.
    ///
    /// Returns `false` when no provider is configured or it produced nothing.
    /// `regions[i]` is the box of `elements[i]` in `image` pixels.
    fn reconstruct_background(
        &self,
        image: &DynamicImage,
        elements: &[EditableElement],
        regions: &[BBox],
        out: &Path,
    ) -> Result<bool, AnalysisError> {
        let Some(provider) = &self.inpaint else {
            return Ok(false);
        };
        let types: Vec<ElementType> = elements.iter().map(|e| e.element_type).collect();

        match provider.inpaint_regions(image, regions, Some(&types)) {
            Some(background) => {
                background.save(out).map_err(|source| AnalysisError::ImageWrite {
                    path: out.to_path_buf(),
                    source,
                })?;
                log::debug!("Saved background from '{}' to {}", provider.name(), out.display());
                Ok(true)
            }
            None => {
                log::warn!(
                    "Inpaint provider '{}' returned nothing; keeping the original image",
                    provider.name()
                );
                Ok(false)
            }
        }
    }
}

/// Replaces extractor-provided ids with positional ones below `id`.
fn assign_ids(mut element: EditableElement, id: ElementId) -> EditableElement {
    element.children = std::mem::take(&mut element.children)
        .into_iter()
        .enumerate()
        .map(|(i, child)| assign_ids(child, id.child(i)))
        .collect();
    element.element_id = id;
    element
}

/// Page pixels per crop pixel. Crops written by this stage map 1:1; images
/// supplied by an extractor may have been rendered at another resolution.
fn crop_to_page_scale(parent_global: &BBox, crop: &DynamicImage) -> Scale {
    let axis = |page_extent: f64, crop_extent: u32| {
        if crop_extent == 0 {
            1.0
        } else {
            page_extent / f64::from(crop_extent)
        }
    };
    Scale::new(
        axis(parent_global.width(), crop.width()),
        axis(parent_global.height(), crop.height()),
    )
}

/// Box of `element` in the pixels of its parent's crop.
fn region_in_crop(element: &EditableElement, parent_global: &BBox, to_page: Scale) -> BBox {
    let invert = |s: f64| if s > 0.0 { 1.0 / s } else { 1.0 };
    element
        .best_known_bbox()
        .translate(-parent_global.x0(), -parent_global.y0())
        .resized(Scale::new(invert(to_page.x), invert(to_page.y)))
}

/// Derives `bbox_global` for `element` and its subtree from their local boxes.
fn place_in_page(element: &mut EditableElement, parent_global: &BBox, scale: Scale) {
    let global = element
        .bbox
        .resized(scale)
        .translate(parent_global.x0(), parent_global.y0())
        .clamp_to(parent_global);
    element.bbox_global = Some(global);
    for child in &mut element.children {
        place_in_page(child, &global, scale);
    }
}

/// Integer crop window of `region` inside a `width` x `height` image, edges rounded outward.
fn crop_window(region: &BBox, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (f64::from(width), f64::from(height));
    let x0 = region.x0().floor().clamp(0.0, w) as u32;
    let y0 = region.y0().floor().clamp(0.0, h) as u32;
    let x1 = region.x1().ceil().clamp(0.0, w) as u32;
    let y1 = region.y1().ceil().clamp(0.0, h) as u32;
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1 - x0, y1 - y0))
}

/// Writes a PNG crop for each visual element that has no usable image yet.
/// `regions[i]` locates `elements[i]` in `source`.
fn materialize_crops(
    source: &DynamicImage,
    elements: &mut [EditableElement],
    regions: &[BBox],
    dir: &Path,
) -> Result<(), AnalysisError> {
    for (element, region) in elements.iter_mut().zip(regions) {
        if !element.element_type.is_visual() || element.image_path().is_some_and(Path::is_file) {
            continue;
        }
        let Some((x, y, w, h)) = crop_window(region, source.width(), source.height()) else {
            log::debug!("{} lies outside its image; no crop", element.element_id);
            continue;
        };
        let path = dir.join(format!("{}.png", element.element_id));
        source
            .crop_imm(x, y, w, h)
            .save(&path)
            .map_err(|source| AnalysisError::ImageWrite {
                path: path.clone(),
                source,
            })?;
        element.image_path = Some(path);
    }
    Ok(())
}

/// Runs a [`PageAnalyzer`] over a batch of pages.
#[derive(Debug, Clone)]
pub struct AnalysisStage {
    analyzer: PageAnalyzer,
    executor: ExecutorImpl,
}

impl AnalysisStage {
    pub fn new(analyzer: PageAnalyzer, executor: ExecutorImpl) -> Self {
        Self { analyzer, executor }
    }

    pub fn analyzer(&self) -> &PageAnalyzer {
        &self.analyzer
    }

    /// Analyzes every page, returning trees in input order.
    ///
    /// The first failing page fails the whole batch; no partial result is returned.
    pub fn analyze_batch(&self, paths: &[PathBuf]) -> Result<Vec<EditableImage>, PipelineError> {
        log::info!(
            "Analyzing {} page(s) with {} (parallelism {})",
            paths.len(),
            self.executor.name(),
            self.executor.parallelism()
        );
        let items: Vec<(usize, PathBuf)> = paths.iter().cloned().enumerate().collect();
        let analyzer = self.analyzer.clone();

        self.executor.try_execute_all(items, move |(page_index, path)| {
            analyzer
                .analyze(page_index, &path)
                .map_err(|source| PipelineError::Analysis {
                    page_index,
                    path,
                    source,
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use peel_traits::{ExtractionResult, ExtractorError};
    use std::collections::HashMap;
    use tempfile::{TempDir, tempdir};

    fn bbox(x0: f64, y0: f64, x1: f64, y1: f64) -> BBox {
        BBox::new(x0, y0, x1, y1).unwrap()
    }

    /// Returns canned elements keyed by image file name.
    #[derive(Debug, Default)]
    struct ByFileName {
        results: HashMap<String, Vec<EditableElement>>,
        failing: Vec<String>,
    }

    impl ByFileName {
        fn with(mut self, file: &str, elements: Vec<EditableElement>) -> Self {
            self.results.insert(file.to_string(), elements);
            self
        }

        fn failing_on(mut self, file: &str) -> Self {
            self.failing.push(file.to_string());
            self
        }
    }

    impl ElementExtractor for ByFileName {
        fn extract(&self, image_path: &Path) -> Result<ExtractionResult, ExtractorError> {
            let name = image_path.file_name().unwrap().to_string_lossy().to_string();
            if self.failing.contains(&name) {
                return Err(ExtractorError::Backend {
                    backend: "stub".into(),
                    message: format!("cannot read {}", name),
                });
            }
            Ok(ExtractionResult::new(self.results.get(&name).cloned().unwrap_or_default()))
        }

        fn name(&self) -> &str {
            "by-file-name"
        }
    }

    /// Returns the input unchanged.
    #[derive(Debug)]
    struct Identity;

    impl InpaintProvider for Identity {
        fn inpaint_regions(
            &self,
            image: &DynamicImage,
            _: &[BBox],
            _: Option<&[ElementType]>,
        ) -> Option<DynamicImage> {
            Some(image.clone())
        }

        fn name(&self) -> &str {
            "identity"
        }
    }

    #[derive(Debug)]
    struct Declining;

    impl InpaintProvider for Declining {
        fn inpaint_regions(
            &self,
            _: &DynamicImage,
            _: &[BBox],
            _: Option<&[ElementType]>,
        ) -> Option<DynamicImage> {
            None
        }

        fn name(&self) -> &str {
            "declining"
        }
    }

    fn page_image(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(width, height, Rgb([200, 210, 220])).save(&path).unwrap();
        path
    }

    fn analyzer(
        extractor: ByFileName,
        inpaint: Option<Arc<dyn InpaintProvider>>,
        config: AnalysisConfig,
        work: &TempDir,
    ) -> PageAnalyzer {
        PageAnalyzer::new(Arc::new(extractor), inpaint, config, work.path())
    }

    fn chart_with_children() -> ByFileName {
        ByFileName::default()
            .with(
                "slide.png",
                vec![
                    EditableElement::new("x", ElementType::Title, bbox(10.0, 10.0, 300.0, 60.0))
                        .with_content("Sales"),
                    EditableElement::new("y", ElementType::Chart, bbox(100.0, 100.0, 500.0, 400.0)),
                ],
            )
            .with(
                "p0000_e1.png",
                vec![
                    EditableElement::new("a", ElementType::Text, bbox(10.0, 20.0, 110.0, 60.0))
                        .with_content("Q1"),
                    EditableElement::new("b", ElementType::Image, bbox(200.0, 100.0, 600.0, 400.0)),
                ],
            )
    }

    #[test]
    fn test_ids_crops_and_clean_background() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 640, 480);

        let page = analyzer(
            chart_with_children(),
            Some(Arc::new(Identity)),
            AnalysisConfig { max_depth: 0, ..Default::default() },
            &work,
        )
        .analyze(0, &slide)
        .unwrap();

        assert_eq!((page.width, page.height), (640, 480));
        let ids: Vec<_> = page.elements.iter().map(|e| e.element_id.as_str()).collect();
        assert_eq!(ids, vec!["p0000_e0", "p0000_e1"]);

        assert!(page.elements[0].image_path.is_none());
        let crop = page.elements[1].image_path().unwrap();
        assert_eq!(crop, work.path().join("page_0000").join("p0000_e1.png"));
        assert_eq!(image::image_dimensions(crop).unwrap(), (400, 300));

        let clean = page.clean_background.as_ref().unwrap();
        assert!(clean.is_file());
        assert!(page.elements.iter().all(EditableElement::is_leaf));
    }

    #[test]
    fn test_recursion_sets_global_frames() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 640, 480);

        let page = analyzer(
            chart_with_children(),
            Some(Arc::new(Identity)),
            AnalysisConfig { max_depth: 1, ..Default::default() },
            &work,
        )
        .analyze(0, &slide)
        .unwrap();

        let chart = &page.elements[1];
        assert!(chart.bbox_global.is_none());
        assert_eq!(chart.children.len(), 2);
        assert!(chart.inpainted_background_path().unwrap().is_file());

        let label = &chart.children[0];
        assert_eq!(label.element_id.as_str(), "p0000_e1_c0");
        assert_eq!(label.bbox, bbox(10.0, 20.0, 110.0, 60.0));
        assert_eq!(label.bbox_global, Some(bbox(110.0, 120.0, 210.0, 160.0)));

        // Overhangs the chart, so the page-frame box is clamped to it.
        let inner = &chart.children[1];
        assert_eq!(inner.bbox_global, Some(bbox(300.0, 200.0, 500.0, 400.0)));
        assert!(inner.image_path().unwrap().is_file());
        assert!(inner.is_leaf());
    }

    #[test]
    fn test_declined_inpaint_leaves_background_unset() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 640, 480);

        let declining: Arc<dyn InpaintProvider> = Arc::new(Declining);
        let config = AnalysisConfig::default();
        let page = analyzer(chart_with_children(), Some(declining), config, &work)
            .analyze(3, &slide)
            .unwrap();

        assert!(page.clean_background.is_none());
        assert!(page.elements[1].inpainted_background_path.is_none());
        assert_eq!(page.elements[1].children.len(), 2);
        assert_eq!(page.elements[0].element_id.as_str(), "p0003_e0");
    }

    #[test]
    fn test_small_regions_are_not_reanalyzed() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 640, 480);
        let config = AnalysisConfig {
            min_image_size: 350,
            ..Default::default()
        };

        let page = analyzer(chart_with_children(), None, config, &work).analyze(0, &slide).unwrap();
        assert!(page.elements[1].is_leaf());
    }

    #[test]
    fn test_layout_children_are_kept_and_layered() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 640, 480);
        let table = EditableElement::new("t", ElementType::Table, bbox(100.0, 100.0, 500.0, 400.0))
            .with_children(vec![
                EditableElement::new("a", ElementType::TableCell, bbox(10.0, 10.0, 190.0, 50.0))
                    .with_bbox_global(bbox(110.0, 110.0, 290.0, 150.0))
                    .with_content("A1"),
                // No page-frame box: derived from the table's.
                EditableElement::new("b", ElementType::TableCell, bbox(200.0, 10.0, 390.0, 50.0))
                    .with_content("B1"),
            ]);
        let extractor = ByFileName::default().with("slide.png", vec![table]);

        let page = analyzer(extractor, Some(Arc::new(Identity)), AnalysisConfig::default(), &work)
            .analyze(0, &slide)
            .unwrap();

        let table = &page.elements[0];
        assert!(table.inpainted_background_path().unwrap().is_file());
        let ids: Vec<_> = table.children.iter().map(|c| c.element_id.as_str()).collect();
        assert_eq!(ids, vec!["p0000_e0_c0", "p0000_e0_c1"]);
        assert_eq!(table.children[0].bbox_global, Some(bbox(110.0, 110.0, 290.0, 150.0)));
        assert_eq!(table.children[1].bbox_global, Some(bbox(300.0, 110.0, 490.0, 150.0)));
    }

    #[test]
    fn test_crop_analysis_replaces_layout_children() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 640, 480);
        let stale = EditableElement::new("s", ElementType::Text, bbox(0.0, 0.0, 50.0, 20.0))
            .with_content("old");
        let chart = EditableElement::new("c", ElementType::Chart, bbox(100.0, 100.0, 500.0, 400.0))
            .with_children(vec![stale]);
        let label = EditableElement::new("a", ElementType::Text, bbox(10.0, 20.0, 110.0, 60.0))
            .with_content("Q1");
        let extractor = ByFileName::default()
            .with("slide.png", vec![chart])
            .with("p0000_e0.png", vec![label]);

        let page = analyzer(extractor, None, AnalysisConfig::default(), &work)
            .analyze(0, &slide)
            .unwrap();
        let children = &page.elements[0].children;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].content.as_deref(), Some("Q1"));
    }

    // Edge case tests

    #[test]
    fn test_sub_region_failure_leaves_element_a_leaf() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 640, 480);

        let page = analyzer(
            chart_with_children().failing_on("p0000_e1.png"),
            None,
            AnalysisConfig::default(),
            &work,
        )
        .analyze(0, &slide)
        .unwrap();
        assert_eq!(page.elements.len(), 2);
        assert!(page.elements[1].is_leaf());
    }

    #[test]
    fn test_page_level_failure_fails_the_page() {
        let input = tempdir().unwrap();
        let work = tempdir().unwrap();
        let slide = page_image(&input, "slide.png", 64, 48);

        let err = analyzer(
            ByFileName::default().failing_on("slide.png"),
            None,
            AnalysisConfig::default(),
            &work,
        )
        .analyze(0, &slide)
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Extract(_)));
    }

    #[test]
    fn test_unreadable_page_image() {
        let work = tempdir().unwrap();
        let err = analyzer(ByFileName::default(), None, AnalysisConfig::default(), &work)
            .analyze(0, Path::new("/nonexistent/slide.png"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ImageOpen { .. }));
    }

    #[test]
    fn test_crop_window_clamps_and_rejects_outside() {
        assert_eq!(crop_window(&bbox(-5.0, 10.2, 50.5, 20.0), 40, 40), Some((0, 10, 40, 10)));
        assert_eq!(crop_window(&bbox(50.0, 50.0, 60.0, 60.0), 40, 40), None);
    }
}

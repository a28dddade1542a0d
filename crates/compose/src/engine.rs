use crate::config::CompositionConfig;
use crate::frame::{placement_bbox, placement_rect};
use peel_traits::{DocumentBuilder, PageHandle, TextStyle};
use peel_types::{BBox, EditableElement, EditableImage, ElementType, PageSize, PixelRect, Scale};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::path::Path;

/// Per-page outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionStats {
    /// Successful text and image placements, backgrounds included.
    pub placed: usize,
    /// Elements drawn as placeholders because their asset was missing.
    pub placeholders: usize,
    /// Builder calls that returned an error; the element was skipped.
    pub failed: usize,
    /// Elements that produced no operation (empty text, unknown type).
    pub skipped: usize,
}

impl CompositionStats {
    /// Number of operations actually emitted to the builder.
    pub fn emitted(&self) -> usize {
        self.placed + self.placeholders
    }
}

impl AddAssign for CompositionStats {
    fn add_assign(&mut self, other: Self) {
        self.placed += other.placed;
        self.placeholders += other.placeholders;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Recursive placement of element trees.
///
/// Sibling order is preserved in the emitted operations. A failing builder
/// call only costs the element that made it; composition always continues
/// with the next sibling.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: CompositionConfig,
}

impl Composer {
    pub fn new(config: CompositionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Places the page background and then every element tree of `image`.
    ///
    /// The background is the clean render when it exists on disk, otherwise
    /// the original. Element geometry is scaled from the analyzed image size
    /// onto `page_size`.
    pub fn compose_page<B>(
        &self,
        builder: &mut B,
        page: PageHandle,
        image: &EditableImage,
        page_size: PageSize,
    ) -> CompositionStats
    where
        B: DocumentBuilder + ?Sized,
    {
        let mut stats = CompositionStats::default();

        let background = page_background(image);
        match builder.add_image(page, background, PixelRect::full_page(page_size)) {
            Ok(()) => stats.placed += 1,
            Err(e) => {
                log::error!("Failed to place page background {}: {}", background.display(), e);
                stats.failed += 1;
            }
        }

        let scale = Scale::between(image.width, image.height, page_size);
        if !scale.is_identity() {
            log::debug!(
                "Scaling {}x{} analysis onto {}x{} page ({:.4}, {:.4})",
                image.width,
                image.height,
                page_size.width,
                page_size.height,
                scale.x,
                scale.y
            );
        }
        stats += self.compose_elements(builder, page, &image.elements, scale, 0);
        stats
    }

    /// Places `elements` (siblings at `depth`) and their subtrees.
    pub fn compose_elements<B>(
        &self,
        builder: &mut B,
        page: PageHandle,
        elements: &[EditableElement],
        scale: Scale,
        depth: usize,
    ) -> CompositionStats
    where
        B: DocumentBuilder + ?Sized,
    {
        let mut stats = CompositionStats::default();
        for element in elements {
            self.compose_element(builder, page, element, scale, depth, &mut stats);
        }
        stats
    }

    fn compose_element<B>(
        &self,
        builder: &mut B,
        page: PageHandle,
        element: &EditableElement,
        scale: Scale,
        depth: usize,
        stats: &mut CompositionStats,
    ) where
        B: DocumentBuilder + ?Sized,
    {
        let indent = "  ".repeat(depth);
        let rect = placement_rect(element, depth, scale);
        log::debug!(
            "{}[{}] {} at ({}, {}, {}, {})",
            indent,
            element.element_id,
            element.element_type,
            rect.x0,
            rect.y0,
            rect.x1,
            rect.y1
        );

        match element.element_type {
            ElementType::Text | ElementType::Title => {
                let style = if element.element_type == ElementType::Title {
                    TextStyle::bold()
                } else {
                    TextStyle::default()
                };
                place_text(builder, page, element, rect, style, stats);
            }
            ElementType::TableCell => {
                place_text(builder, page, element, rect, TextStyle::centered(), stats);
            }
            ElementType::Table => match self.recursion_background(element, depth) {
                Some(background) => self.compose_layered(
                    builder, page, element, background, rect, scale, depth, stats,
                ),
                None => place_flattened(builder, page, element, rect, stats),
            },
            ElementType::Image | ElementType::Figure | ElementType::Chart => {
                let background = self.recursion_background(element, depth).filter(|_| {
                    let parent = placement_bbox(element, depth);
                    if self.has_dominant_child(element, parent) {
                        log::debug!(
                            "{}  dominant child covers more than {:.2} of {}, flattening",
                            indent,
                            self.config.dominant_child_threshold,
                            element.element_id
                        );
                        false
                    } else {
                        true
                    }
                });
                match background {
                    Some(background) => self.compose_layered(
                        builder, page, element, background, rect, scale, depth, stats,
                    ),
                    None => place_flattened(builder, page, element, rect, stats),
                }
            }
            ElementType::Unknown => {
                log::debug!(
                    "{}  unsupported element type, skipping {}",
                    indent,
                    element.element_id
                );
                stats.skipped += 1;
            }
        }
    }

    /// Background to layer children on, if `element` may be recursed into.
    fn recursion_background<'e>(
        &self,
        element: &'e EditableElement,
        depth: usize,
    ) -> Option<&'e Path> {
        if element.children.is_empty() {
            return None;
        }
        let background = element.inpainted_background_path().filter(|p| p.is_file())?;
        if depth + 1 >= self.config.max_recursion_depth {
            log::warn!(
                "Element {} exceeds recursion depth {}, flattening",
                element.element_id,
                self.config.max_recursion_depth
            );
            return None;
        }
        Some(background)
    }

    /// True when one child covers more of `parent` than the configured threshold.
    ///
    /// Children are measured in their page frame when known. A degenerate parent
    /// has zero coverage for every child.
    fn has_dominant_child(&self, element: &EditableElement, parent: &BBox) -> bool {
        let threshold = self.config.dominant_child_threshold;
        element
            .children
            .iter()
            .any(|child| child.best_known_bbox().coverage_of(parent) > threshold)
    }

    #[allow(clippy::too_many_arguments)]
    fn compose_layered<B>(
        &self,
        builder: &mut B,
        page: PageHandle,
        element: &EditableElement,
        background: &Path,
        rect: PixelRect,
        scale: Scale,
        depth: usize,
        stats: &mut CompositionStats,
    ) where
        B: DocumentBuilder + ?Sized,
    {
        match builder.add_image(page, background, rect) {
            Ok(()) => stats.placed += 1,
            Err(e) => {
                // The children are still placed on whatever is underneath.
                log::warn!("Failed to place background for {}: {}", element.element_id, e);
                stats.failed += 1;
            }
        }
        *stats += self.compose_elements(builder, page, &element.children, scale, depth + 1);
    }
}

fn page_background(image: &EditableImage) -> &Path {
    match image.clean_background.as_deref() {
        Some(clean) if clean.is_file() => clean,
        Some(clean) => {
            log::warn!(
                "Clean background {} not found, using original render",
                clean.display()
            );
            &image.image_path
        }
        None => &image.image_path,
    }
}

fn place_text<B>(
    builder: &mut B,
    page: PageHandle,
    element: &EditableElement,
    rect: PixelRect,
    style: TextStyle,
    stats: &mut CompositionStats,
) where
    B: DocumentBuilder + ?Sized,
{
    let Some(text) = element.trimmed_content() else {
        stats.skipped += 1;
        return;
    };
    match builder.add_text(page, text, rect, style) {
        Ok(()) => stats.placed += 1,
        Err(e) => {
            log::warn!("Failed to place text {}: {}", element.element_id, e);
            stats.failed += 1;
        }
    }
}

fn place_flattened<B>(
    builder: &mut B,
    page: PageHandle,
    element: &EditableElement,
    rect: PixelRect,
    stats: &mut CompositionStats,
) where
    B: DocumentBuilder + ?Sized,
{
    match element.image_path().filter(|p| p.is_file()) {
        Some(path) => match builder.add_image(page, path, rect) {
            Ok(()) => stats.placed += 1,
            Err(e) => {
                log::warn!("Failed to place image {}: {}", element.element_id, e);
                stats.failed += 1;
            }
        },
        None => {
            log::warn!(
                "No image for {} ({}), adding placeholder",
                element.element_id,
                element.element_type
            );
            builder.add_placeholder(page, rect);
            stats.placeholders += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{Operation, RecordingBuilder};
    use peel_traits::{Alignment, BuildError, Emphasis};
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn bbox(x0: f64, y0: f64, x1: f64, y1: f64) -> BBox {
        BBox::new(x0, y0, x1, y1).unwrap()
    }

    fn asset(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"not really a png").unwrap();
        path
    }

    fn compose(elements: &[EditableElement], scale: Scale) -> (RecordingBuilder, CompositionStats) {
        let mut builder = RecordingBuilder::new();
        let page = builder.new_page(PageSize::default()).unwrap();
        let stats = Composer::default().compose_elements(&mut builder, page, elements, scale, 0);
        (builder, stats)
    }

    fn placements(builder: &RecordingBuilder) -> Vec<Operation> {
        builder
            .page_operations(PageHandle(0))
            .into_iter()
            .cloned()
            .collect()
    }

    /// Builder that rejects images at one path and records everything else.
    struct FailingImageBuilder {
        inner: RecordingBuilder,
        reject: PathBuf,
    }

    impl DocumentBuilder for FailingImageBuilder {
        fn new_page(&mut self, size: PageSize) -> Result<PageHandle, BuildError> {
            self.inner.new_page(size)
        }

        fn add_text(
            &mut self,
            page: PageHandle,
            text: &str,
            rect: PixelRect,
            style: TextStyle,
        ) -> Result<(), BuildError> {
            self.inner.add_text(page, text, rect, style)
        }

        fn add_image(
            &mut self,
            page: PageHandle,
            path: &Path,
            rect: PixelRect,
        ) -> Result<(), BuildError> {
            if path == self.reject {
                return Err(BuildError::ImageDecode {
                    path: path.to_path_buf(),
                    message: "corrupt".into(),
                });
            }
            self.inner.add_image(page, path, rect)
        }

        fn add_placeholder(&mut self, page: PageHandle, rect: PixelRect) {
            self.inner.add_placeholder(page, rect)
        }

        fn serialize(self) -> Result<Vec<u8>, BuildError> {
            self.inner.serialize()
        }
    }

    /// An image parent at (0,0)-(100,10), area 1000, with one child of the given area.
    fn visual_with_child(dir: &TempDir, child_area: f64) -> EditableElement {
        let frame = bbox(0.0, 0.0, child_area / 10.0, 10.0);
        let child = EditableElement::new("p0000_e0_c0", ElementType::Text, frame)
            .with_bbox_global(frame)
            .with_content("inner");
        EditableElement::new("p0000_e0", ElementType::Image, bbox(0.0, 0.0, 100.0, 10.0))
            .with_image_path(asset(dir, "flat.png"))
            .with_inpainted_background(asset(dir, "bg.png"))
            .with_children(vec![child])
    }

    #[test]
    fn test_title_is_bold_and_text_is_plain() {
        let elements = vec![
            EditableElement::new("t", ElementType::Title, bbox(0.0, 0.0, 100.0, 20.0))
                .with_content(" Agenda "),
            EditableElement::new("b", ElementType::Text, bbox(0.0, 30.0, 100.0, 50.0))
                .with_content("Body"),
        ];
        let (builder, stats) = compose(&elements, Scale::IDENTITY);
        let ops = placements(&builder);
        assert_eq!(stats.placed, 2);
        match &ops[0] {
            Operation::Text { text, style, .. } => {
                assert_eq!(text, "Agenda");
                assert_eq!(style.emphasis, Emphasis::Bold);
            }
            other => panic!("expected text, got {:?}", other),
        }
        match &ops[1] {
            Operation::Text { style, .. } => assert_eq!(style.emphasis, Emphasis::Normal),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_text_produces_no_operation() {
        let elements = vec![
            EditableElement::new("t", ElementType::Text, bbox(0.0, 0.0, 10.0, 10.0))
                .with_content("  "),
        ];
        let (builder, stats) = compose(&elements, Scale::IDENTITY);
        assert!(placements(&builder).is_empty());
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn test_top_level_table_cell_is_centered_text() {
        let elements = vec![
            EditableElement::new("c", ElementType::TableCell, bbox(0.0, 0.0, 10.0, 10.0))
                .with_content("7"),
        ];
        let (builder, _) = compose(&elements, Scale::IDENTITY);
        match &placements(&builder)[0] {
            Operation::Text { style, .. } => {
                assert_eq!(style.alignment, Some(Alignment::Center));
                assert_eq!(style.emphasis, Emphasis::Normal);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_zero_uses_local_bbox_even_with_global() {
        let elements = vec![
            EditableElement::new("t", ElementType::Text, bbox(10.0, 20.0, 30.0, 40.0))
                .with_bbox_global(bbox(500.0, 500.0, 600.0, 600.0))
                .with_content("x"),
        ];
        let (builder, _) = compose(&elements, Scale::IDENTITY);
        assert_eq!(placements(&builder)[0].rect(), Some(PixelRect::new(10, 20, 30, 40)));
    }

    #[test]
    fn test_children_are_placed_in_page_frame() {
        let dir = tempdir().unwrap();
        let cell = EditableElement::new("c", ElementType::TableCell, bbox(5.0, 5.0, 25.0, 15.0))
            .with_bbox_global(bbox(405.0, 305.0, 425.0, 315.0))
            .with_content("42");
        let table = EditableElement::new("t", ElementType::Table, bbox(400.0, 300.0, 600.0, 400.0))
            .with_image_path(asset(&dir, "table.png"))
            .with_inpainted_background(asset(&dir, "table_bg.png"))
            .with_children(vec![cell]);

        let (builder, stats) = compose(&[table], Scale::IDENTITY);
        let ops = placements(&builder);
        assert_eq!(ops.len(), 2);
        match &ops[0] {
            Operation::Image { path, rect, .. } => {
                assert!(path.ends_with("table_bg.png"));
                assert_eq!(*rect, PixelRect::new(400, 300, 600, 400));
            }
            other => panic!("expected background image, got {:?}", other),
        }
        assert_eq!(ops[1].rect(), Some(PixelRect::new(405, 305, 425, 315)));
        assert_eq!(stats.placed, 2);
    }

    #[test]
    fn test_scale_floors_every_coordinate() {
        let elements = vec![
            EditableElement::new("t", ElementType::Text, bbox(3.0, 3.0, 7.0, 9.0))
                .with_content("x"),
        ];
        for (sx, sy) in [(0.5, 0.5), (1.5, 2.0 / 3.0), (1920.0 / 1280.0, 1080.0 / 720.0)] {
            let (builder, _) = compose(&elements, Scale::new(sx, sy));
            let expected = PixelRect::new(
                (3.0 * sx).floor() as i64,
                (3.0 * sy).floor() as i64,
                (7.0 * sx).floor() as i64,
                (9.0 * sy).floor() as i64,
            );
            assert_eq!(placements(&builder)[0].rect(), Some(expected));
        }
    }

    #[test]
    fn test_child_at_849_of_1000_recurses() {
        let dir = tempdir().unwrap();
        let (builder, _) = compose(&[visual_with_child(&dir, 849.0)], Scale::IDENTITY);
        let ops = placements(&builder);
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], Operation::Image { path, .. } if path.ends_with("bg.png")));
        assert!(matches!(&ops[1], Operation::Text { .. }));
    }

    #[test]
    fn test_child_at_851_of_1000_flattens() {
        let dir = tempdir().unwrap();
        let (builder, _) = compose(&[visual_with_child(&dir, 851.0)], Scale::IDENTITY);
        let ops = placements(&builder);
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], Operation::Image { path, .. } if path.ends_with("flat.png")));
    }

    #[test]
    fn test_dominant_threshold_is_configurable() {
        let dir = tempdir().unwrap();
        let composer = Composer::new(CompositionConfig {
            dominant_child_threshold: 0.95,
            ..CompositionConfig::default()
        });
        let mut builder = RecordingBuilder::new();
        let page = builder.new_page(PageSize::default()).unwrap();
        let elements = [visual_with_child(&dir, 900.0)];
        composer.compose_elements(&mut builder, page, &elements, Scale::IDENTITY, 0);
        assert_eq!(builder.page_operations(page).len(), 2);
    }

    #[test]
    fn test_table_without_children_flattens_to_image() {
        let dir = tempdir().unwrap();
        let table = EditableElement::new("t", ElementType::Table, bbox(0.0, 0.0, 50.0, 50.0))
            .with_image_path(asset(&dir, "table.png"));
        let (builder, _) = compose(&[table], Scale::IDENTITY);
        let ops = placements(&builder);
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], Operation::Image { path, .. } if path.ends_with("table.png")));
    }

    #[test]
    fn test_table_with_missing_background_never_recurses() {
        let dir = tempdir().unwrap();
        let cell = EditableElement::new("c", ElementType::TableCell, bbox(0.0, 0.0, 5.0, 5.0))
            .with_content("1");
        let with_image = EditableElement::new("t", ElementType::Table, bbox(0.0, 0.0, 50.0, 50.0))
            .with_image_path(asset(&dir, "table.png"))
            .with_inpainted_background(dir.path().join("missing_bg.png"))
            .with_children(vec![cell.clone()]);
        let without_image =
            EditableElement::new("u", ElementType::Table, bbox(60.0, 0.0, 90.0, 50.0))
                .with_children(vec![cell]);

        let (builder, stats) = compose(&[with_image, without_image], Scale::IDENTITY);
        let ops = placements(&builder);
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], Operation::Image { path, .. } if path.ends_with("table.png")));
        assert!(matches!(&ops[1], Operation::Placeholder { .. }));
        assert_eq!(stats.placeholders, 1);
    }

    #[test]
    fn test_visual_without_asset_becomes_placeholder() {
        let chart = EditableElement::new("c", ElementType::Chart, bbox(0.0, 0.0, 10.0, 10.0))
            .with_image_path("/nonexistent/peel/chart.png");
        let (builder, stats) = compose(&[chart], Scale::IDENTITY);
        assert!(matches!(placements(&builder)[0], Operation::Placeholder { .. }));
        assert_eq!(stats.placeholders, 1);
    }

    #[test]
    fn test_failed_image_does_not_stop_siblings() {
        let dir = tempdir().unwrap();
        let broken = asset(&dir, "broken.png");
        let elements = vec![
            EditableElement::new("a", ElementType::Text, bbox(0.0, 0.0, 10.0, 10.0))
                .with_content("before"),
            EditableElement::new("b", ElementType::Image, bbox(0.0, 0.0, 10.0, 10.0))
                .with_image_path(&broken),
            visual_with_child(&dir, 100.0),
            EditableElement::new("d", ElementType::Text, bbox(0.0, 0.0, 10.0, 10.0))
                .with_content("after"),
        ];
        let total: usize = elements.iter().map(EditableElement::subtree_len).sum();

        let mut builder = FailingImageBuilder {
            inner: RecordingBuilder::new(),
            reject: broken,
        };
        let page = builder.new_page(PageSize::default()).unwrap();
        let stats =
            Composer::default().compose_elements(&mut builder, page, &elements, Scale::IDENTITY, 0);

        assert_eq!(stats.failed, 1);
        assert_eq!(builder.inner.page_operations(page).len(), total - 1);
    }

    #[test]
    fn test_failed_layer_background_still_places_children() {
        let dir = tempdir().unwrap();
        let parent = visual_with_child(&dir, 100.0);
        let reject = parent.inpainted_background_path.clone().unwrap();
        let mut builder = FailingImageBuilder {
            inner: RecordingBuilder::new(),
            reject,
        };
        let page = builder.new_page(PageSize::default()).unwrap();
        let stats =
            Composer::default().compose_elements(&mut builder, page, &[parent], Scale::IDENTITY, 0);

        assert_eq!(stats.failed, 1);
        let ops = builder.inner.page_operations(page);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], Operation::Text { .. }));
    }

    #[test]
    fn test_page_with_no_elements_places_only_background() {
        let dir = tempdir().unwrap();
        let image = EditableImage::new(asset(&dir, "slide.png"), 1920, 1080);
        let mut builder = RecordingBuilder::new();
        let page = builder.new_page(PageSize::default()).unwrap();
        let stats =
            Composer::default().compose_page(&mut builder, page, &image, PageSize::default());

        let ops = builder.page_operations(page);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].rect(), Some(PixelRect::new(0, 0, 1920, 1080)));
        assert_eq!(stats.placed, 1);
    }

    #[test]
    fn test_page_background_prefers_clean_render() {
        let dir = tempdir().unwrap();
        let original = asset(&dir, "slide.png");
        let clean = asset(&dir, "clean_background.png");

        let with_clean = EditableImage::new(&original, 1920, 1080).with_clean_background(&clean);
        let without_clean = EditableImage::new(&original, 1920, 1080);

        for (image, expected) in [(with_clean, &clean), (without_clean, &original)] {
            let mut builder = RecordingBuilder::new();
            let page = builder.new_page(PageSize::default()).unwrap();
            Composer::default().compose_page(&mut builder, page, &image, PageSize::default());
            match builder.page_operations(page)[0] {
                Operation::Image { path, rect, .. } => {
                    assert_eq!(path, expected);
                    assert_eq!(*rect, PixelRect::full_page(PageSize::default()));
                }
                other => panic!("expected background, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_compose_page_scales_to_output_size() {
        let dir = tempdir().unwrap();
        let image = EditableImage::new(asset(&dir, "slide.png"), 960, 540).with_elements(vec![
            EditableElement::new("t", ElementType::Text, bbox(10.0, 10.0, 100.0, 50.0))
                .with_content("x"),
        ]);
        let mut builder = RecordingBuilder::new();
        let page = builder.new_page(PageSize::default()).unwrap();
        Composer::default().compose_page(&mut builder, page, &image, PageSize::default());
        assert_eq!(builder.page_operations(page)[1].rect(), Some(PixelRect::new(20, 20, 200, 100)));
    }

    // Edge case tests

    #[test]
    fn test_unknown_type_is_skipped() {
        let elements = vec![
            EditableElement::new("u", ElementType::Unknown, bbox(0.0, 0.0, 10.0, 10.0))
                .with_content("?"),
        ];
        let (builder, stats) = compose(&elements, Scale::IDENTITY);
        assert!(placements(&builder).is_empty());
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_degenerate_parent_never_has_dominant_child() {
        let dir = tempdir().unwrap();
        let child = EditableElement::new("c", ElementType::Text, bbox(0.0, 0.0, 10.0, 10.0))
            .with_bbox_global(bbox(0.0, 0.0, 10.0, 10.0))
            .with_content("x");
        let parent = EditableElement::new("p", ElementType::Figure, bbox(0.0, 0.0, 0.0, 10.0))
            .with_inpainted_background(asset(&dir, "bg.png"))
            .with_children(vec![child]);
        let (builder, _) = compose(&[parent], Scale::IDENTITY);
        assert_eq!(placements(&builder).len(), 2);
    }

    #[test]
    fn test_recursion_ceiling_flattens() {
        let dir = tempdir().unwrap();
        let composer = Composer::new(CompositionConfig {
            max_recursion_depth: 1,
            ..CompositionConfig::default()
        });
        let mut builder = RecordingBuilder::new();
        let page = builder.new_page(PageSize::default()).unwrap();
        let elements = [visual_with_child(&dir, 100.0)];
        composer.compose_elements(&mut builder, page, &elements, Scale::IDENTITY, 0);
        let ops = builder.page_operations(page);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], Operation::Image { path, .. } if path.ends_with("flat.png")));
    }
}

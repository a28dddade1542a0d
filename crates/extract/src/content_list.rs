//! Reader for MinerU-style content-list sidecars.
//!
//! A sidecar is a JSON array of items:
//!
//! ```json
//! [
//!   { "type": "text", "text": "Revenue", "text_level": 1, "bbox": [40, 30, 600, 90] },
//!   { "type": "image", "img_path": "images/chart.jpg", "bbox": [100, 200, 900, 700] }
//! ]
//! ```
//!
//! Item boxes are in the analyzed image's pixel frame. Nested `children`
//! are also page-frame; they are stored with a parent-local `bbox` and the
//! original box as `bbox_global`.

use peel_traits::{ElementExtractor, ExtractionResult, ExtractorError};
use peel_types::{BBox, EditableElement, ElementId, ElementType};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    bbox: Option<Vec<f64>>,
    #[serde(default)]
    img_path: Option<String>,
    #[serde(default)]
    text_level: Option<u32>,
    #[serde(default)]
    children: Vec<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ContentListExtractor {
    layout_dir: Option<PathBuf>,
}

impl ContentListExtractor {
    /// Looks for sidecars next to each image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks for sidecars in `dir` first, then next to each image.
    pub fn with_layout_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            layout_dir: Some(dir.into()),
        }
    }

    /// Candidate sidecar locations for `image_path`, in lookup order.
    fn sidecar_candidates(&self, image_path: &Path) -> Vec<PathBuf> {
        let Some(stem) = image_path.file_stem().and_then(|s| s.to_str()) else {
            return Vec::new();
        };
        let names = [format!("{}.json", stem), format!("{}_content_list.json", stem)];
        let image_dir = image_path.parent().unwrap_or_else(|| Path::new(""));

        self.layout_dir
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(image_dir))
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .collect()
    }

    fn find_sidecar(&self, image_path: &Path) -> Option<PathBuf> {
        self.sidecar_candidates(image_path)
            .into_iter()
            .find(|candidate| candidate.is_file())
    }
}

/// Resolves an item's `img_path` against the sidecar directory.
///
/// Tries `dir/img_path`, `dir/images/<name>` and `dir/<name>`; the first that
/// exists wins. Unresolvable paths are returned as given.
fn resolve_image_path(sidecar_dir: &Path, img_path: &str) -> PathBuf {
    let raw = Path::new(img_path);
    let mut candidates = vec![sidecar_dir.join(raw)];
    if let Some(name) = raw.file_name() {
        candidates.push(sidecar_dir.join("images").join(name));
        candidates.push(sidecar_dir.join(name));
    }
    match candidates.into_iter().find(|p| p.exists()) {
        Some(found) => found,
        None => {
            log::debug!("Image '{}' not found under {}", img_path, sidecar_dir.display());
            raw.to_path_buf()
        }
    }
}

fn element_type(item: &ContentItem) -> ElementType {
    match ElementType::from_label(&item.kind) {
        ElementType::Text if item.text_level == Some(1) => ElementType::Title,
        other => other,
    }
}

/// Converts one raw item. `parent` is the enclosing element's page-frame box.
fn convert_item(
    value: Value,
    id: ElementId,
    parent: Option<&BBox>,
    sidecar_dir: &Path,
    errors: &mut Vec<String>,
) -> Option<EditableElement> {
    let item: ContentItem = match serde_json::from_value(value) {
        Ok(item) => item,
        Err(e) => {
            errors.push(format!("{}: unreadable item: {}", id, e));
            return None;
        }
    };
    let Some(coords) = item.bbox.as_deref() else {
        errors.push(format!("{}: missing bbox", id));
        return None;
    };
    let page_bbox = match BBox::from_slice(coords) {
        Ok(bbox) => bbox,
        Err(e) => {
            errors.push(format!("{}: {}", id, e));
            return None;
        }
    };

    let element_type = element_type(&item);
    let mut element = match parent {
        Some(parent) => {
            let local = page_bbox.translate(-parent.x0(), -parent.y0());
            EditableElement::new(id.clone(), element_type, local).with_bbox_global(page_bbox)
        }
        None => EditableElement::new(id.clone(), element_type, page_bbox),
    };
    if let Some(text) = item.text {
        element = element.with_content(text);
    }
    if let Some(img_path) = item.img_path.as_deref().filter(|p| !p.is_empty()) {
        element = element.with_image_path(resolve_image_path(sidecar_dir, img_path));
    }

    element.children = item
        .children
        .into_iter()
        .enumerate()
        .filter_map(|(i, child)| {
            convert_item(child, id.child(i), Some(&page_bbox), sidecar_dir, errors)
        })
        .collect();
    Some(element)
}

impl ElementExtractor for ContentListExtractor {
    fn extract(&self, image_path: &Path) -> Result<ExtractionResult, ExtractorError> {
        let Some(sidecar) = self.find_sidecar(image_path) else {
            return Ok(ExtractionResult::default()
                .with_error(format!("no layout sidecar for {}", image_path.display())));
        };

        let raw = std::fs::read_to_string(&sidecar).map_err(|source| ExtractorError::Io {
            path: sidecar.clone(),
            source,
        })?;
        let items: Vec<Value> = serde_json::from_str(&raw).map_err(|e| ExtractorError::Malformed {
            path: sidecar.clone(),
            message: e.to_string(),
        })?;
        let sidecar_dir = sidecar.parent().unwrap_or_else(|| Path::new(""));

        let mut errors = Vec::new();
        let elements: Vec<EditableElement> = items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let id = ElementId::new(format!("e{}", i));
                convert_item(item, id, None, sidecar_dir, &mut errors)
            })
            .collect();

        log::debug!(
            "Read {} element(s) from {} ({} skipped)",
            elements.len(),
            sidecar.display(),
            errors.len()
        );
        Ok(ExtractionResult { elements, errors })
    }

    fn name(&self) -> &str {
        "content-list"
    }
}

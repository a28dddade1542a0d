//! The recovered layout tree.
//!
//! A page is an [`EditableImage`] holding a list of top-level
//! [`EditableElement`]s. Elements discovered by re-analyzing a cropped
//! sub-region are attached as `children` and carry two frames: `bbox`,
//! relative to the crop, and `bbox_global`, relative to the page.
//!
//! Trees are finite and acyclic by construction; consumers do not re-check.

use crate::geometry::BBox;
use crate::ids::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Text,
    Title,
    Table,
    TableCell,
    Image,
    Figure,
    Chart,
    Unknown,
}

impl ElementType {
    /// Maps a layout backend's type label onto an element type.
    ///
    /// Equations are rendered bitmaps in every backend we read, so they become images.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "text" | "paragraph" | "list" => ElementType::Text,
            "title" | "heading" => ElementType::Title,
            "table" => ElementType::Table,
            "table_cell" | "cell" => ElementType::TableCell,
            "image" | "equation" | "interline_equation" => ElementType::Image,
            "figure" => ElementType::Figure,
            "chart" => ElementType::Chart,
            _ => ElementType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Title => "title",
            ElementType::Table => "table",
            ElementType::TableCell => "table_cell",
            ElementType::Image => "image",
            ElementType::Figure => "figure",
            ElementType::Chart => "chart",
            ElementType::Unknown => "unknown",
        }
    }

    /// Types that are drawn as bitmaps when flattened and that may be decomposed further.
    pub fn is_visual(&self) -> bool {
        matches!(
            self,
            ElementType::Table | ElementType::Image | ElementType::Figure | ElementType::Chart
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the recovered layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableElement {
    pub element_id: ElementId,
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Frame of the immediate parent (the crop this node was found in).
    pub bbox: BBox,
    /// Frame of the root page; set for every node below the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox_global: Option<BBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inpainted_background_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EditableElement>,
}

impl EditableElement {
    pub fn new(element_id: impl Into<ElementId>, element_type: ElementType, bbox: BBox) -> Self {
        Self {
            element_id: element_id.into(),
            element_type,
            content: None,
            bbox,
            bbox_global: None,
            image_path: None,
            inpainted_background_path: None,
            children: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_bbox_global(mut self, bbox_global: BBox) -> Self {
        self.bbox_global = Some(bbox_global);
        self
    }

    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_inpainted_background(mut self, path: impl Into<PathBuf>) -> Self {
        self.inpainted_background_path = Some(path.into());
        self
    }

    pub fn with_children(mut self, children: Vec<EditableElement>) -> Self {
        self.children = children;
        self
    }

    /// Text payload with surrounding whitespace removed, or `None` if nothing is left.
    pub fn trimmed_content(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The page-frame box when known, otherwise the local one.
    pub fn best_known_bbox(&self) -> &BBox {
        self.bbox_global.as_ref().unwrap_or(&self.bbox)
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn inpainted_background_path(&self) -> Option<&Path> {
        self.inpainted_background_path.as_deref()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(EditableElement::subtree_len).sum::<usize>()
    }

    /// Height of this subtree; a leaf has depth 0.
    pub fn subtree_depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.subtree_depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// One analyzed input page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableImage {
    /// The original render.
    pub image_path: PathBuf,
    /// Pixel dimensions of the original render; `0` when unknown.
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Full-page render with all extracted elements removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_background: Option<PathBuf>,
    #[serde(default)]
    pub elements: Vec<EditableElement>,
}

impl EditableImage {
    pub fn new(image_path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            image_path: image_path.into(),
            width,
            height,
            clean_background: None,
            elements: Vec::new(),
        }
    }

    pub fn with_clean_background(mut self, path: impl Into<PathBuf>) -> Self {
        self.clean_background = Some(path.into());
        self
    }

    pub fn with_elements(mut self, elements: Vec<EditableElement>) -> Self {
        self.elements = elements;
        self
    }

    /// Total number of nodes across all element trees of the page.
    pub fn element_count(&self) -> usize {
        self.elements.iter().map(EditableElement::subtree_len).sum()
    }
}

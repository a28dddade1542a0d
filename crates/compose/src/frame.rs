//! Coordinate-frame selection.
//!
//! Nodes found by re-analyzing a crop report `bbox` relative to that crop.
//! Below the top level only `bbox_global` can be placed on the page directly.

use peel_types::{BBox, EditableElement, PixelRect, Scale};

/// The box to place `element` with at recursion `depth`, before scaling.
///
/// Depth 0 always uses `bbox`, even when `bbox_global` is set. Deeper nodes use
/// `bbox_global` unless it is missing or degenerate.
pub fn placement_bbox(element: &EditableElement, depth: usize) -> &BBox {
    if depth == 0 {
        return &element.bbox;
    }
    match &element.bbox_global {
        Some(global) if !global.is_empty() => global,
        _ => &element.bbox,
    }
}

/// Scaled, floor-truncated placement rectangle for `element` at `depth`.
pub fn placement_rect(element: &EditableElement, depth: usize, scale: Scale) -> PixelRect {
    placement_bbox(element, depth).scaled(scale)
}

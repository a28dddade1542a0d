pub mod element;
pub mod geometry;
pub mod ids;

pub use element::{EditableElement, EditableImage, ElementType};
pub use geometry::{BBox, GeometryError, PageSize, PixelRect, Scale};
pub use ids::ElementId;

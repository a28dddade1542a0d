use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("inverted bbox ({x0}, {y0}, {x1}, {y1}): expected x1 >= x0 and y1 >= y0")]
    Inverted { x0: f64, y0: f64, x1: f64, y1: f64 },

    #[error("bbox coordinate is not a finite number")]
    NonFinite,

    #[error("bbox needs 4 coordinates, got {0}")]
    Arity(usize),
}

/// An axis-aligned rectangle in a page's pixel space.
///
/// Construction validates `x1 >= x0` and `y1 >= y0`; the value is immutable
/// afterwards. Serialized as `{ "x0": .., "y0": .., "x1": .., "y1": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBBox", into = "RawBBox")]
pub struct BBox {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

#[derive(Serialize, Deserialize)]
struct RawBBox {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl TryFrom<RawBBox> for BBox {
    type Error = GeometryError;

    fn try_from(raw: RawBBox) -> Result<Self, Self::Error> {
        BBox::new(raw.x0, raw.y0, raw.x1, raw.y1)
    }
}

impl From<BBox> for RawBBox {
    fn from(b: BBox) -> Self {
        RawBBox { x0: b.x0, y0: b.y0, x1: b.x1, y1: b.y1 }
    }
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, GeometryError> {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if x1 < x0 || y1 < y0 {
            return Err(GeometryError::Inverted { x0, y0, x1, y1 });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Builds a box from a `[x0, y0, x1, y1]` slice, as layout backends report them.
    pub fn from_slice(coords: &[f64]) -> Result<Self, GeometryError> {
        match coords {
            [x0, y0, x1, y1] => Self::new(*x0, *y0, *x1, *y1),
            _ => Err(GeometryError::Arity(coords.len())),
        }
    }

    /// A box anchored at the origin, used for whole-image regions.
    pub fn from_size(width: f64, height: f64) -> Result<Self, GeometryError> {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn y0(&self) -> f64 {
        self.y0
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// A degenerate box (zero width or height) carries no placement information.
    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }

    /// Fraction of `parent`'s area covered by this box's area.
    ///
    /// Returns `0.0` when the parent is degenerate.
    pub fn coverage_of(&self, parent: &BBox) -> f64 {
        let parent_area = parent.area();
        if parent_area > 0.0 {
            self.area() / parent_area
        } else {
            0.0
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> BBox {
        BBox {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    /// Clamps every edge into `bounds`. Ordering is preserved, so the result is always valid.
    pub fn clamp_to(&self, bounds: &BBox) -> BBox {
        BBox {
            x0: self.x0.clamp(bounds.x0, bounds.x1),
            y0: self.y0.clamp(bounds.y0, bounds.y1),
            x1: self.x1.clamp(bounds.x0, bounds.x1),
            y1: self.y1.clamp(bounds.y0, bounds.y1),
        }
    }

    /// Grows the box by `margin` on every side.
    pub fn expand(&self, margin: f64) -> BBox {
        let margin = margin.max(0.0);
        BBox {
            x0: self.x0 - margin,
            y0: self.y0 - margin,
            x1: self.x1 + margin,
            y1: self.y1 + margin,
        }
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Largest axis gap between the two boxes; `0.0` when they touch or overlap.
    pub fn gap_to(&self, other: &BBox) -> f64 {
        let dx = (other.x0 - self.x1).max(self.x0 - other.x1).max(0.0);
        let dy = (other.y0 - self.y1).max(self.y0 - other.y1).max(0.0);
        dx.max(dy)
    }

    /// Applies independent, non-negative axis scales, keeping sub-pixel precision.
    pub fn resized(&self, scale: Scale) -> BBox {
        let sx = scale.x.max(0.0);
        let sy = scale.y.max(0.0);
        BBox {
            x0: self.x0 * sx,
            y0: self.y0 * sy,
            x1: self.x1 * sx,
            y1: self.y1 * sy,
        }
    }

    /// Applies independent axis scales and truncates each coordinate with `floor`.
    pub fn scaled(&self, scale: Scale) -> PixelRect {
        PixelRect {
            x0: (self.x0 * scale.x).floor() as i64,
            y0: (self.y0 * scale.y).floor() as i64,
            x1: (self.x1 * scale.x).floor() as i64,
            y1: (self.y1 * scale.y).floor() as i64,
        }
    }
}

/// Integer device-space rectangle handed to document builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelRect {
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The rectangle covering an entire page.
    pub fn full_page(size: PageSize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: i64::from(size.width),
            y1: i64::from(size.height),
        }
    }

    pub fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i64 {
        self.y1 - self.y0
    }
}

/// Output page dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    /// 16:9 slide at 1080p.
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Independent horizontal and vertical scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale mapping an analyzed image of `source` pixels onto `target`.
    ///
    /// Falls back to identity on any axis whose source extent is unknown (zero).
    pub fn between(source_width: u32, source_height: u32, target: PageSize) -> Self {
        let axis = |src: u32, dst: u32| {
            if src == 0 {
                1.0
            } else {
                f64::from(dst) / f64::from(src)
            }
        };
        Self {
            x: axis(source_width, target.width),
            y: axis(source_height, target.height),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.x == 1.0 && self.y == 1.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

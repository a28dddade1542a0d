//! A [`DocumentBuilder`] that records operations instead of rendering them.
//!
//! Serializes to a JSON operation log, which doubles as a machine-readable
//! output format and as the reference double in tests.

use peel_traits::{BuildError, DocumentBuilder, PageHandle, TextStyle};
use peel_types::{PageSize, PixelRect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    NewPage {
        page: PageHandle,
        size: PageSize,
    },
    Text {
        page: PageHandle,
        text: String,
        rect: PixelRect,
        style: TextStyle,
    },
    Image {
        page: PageHandle,
        path: PathBuf,
        rect: PixelRect,
    },
    Placeholder {
        page: PageHandle,
        rect: PixelRect,
    },
}

impl Operation {
    pub fn page(&self) -> PageHandle {
        match self {
            Operation::NewPage { page, .. }
            | Operation::Text { page, .. }
            | Operation::Image { page, .. }
            | Operation::Placeholder { page, .. } => *page,
        }
    }

    /// Placement rectangle, or `None` for page creation.
    pub fn rect(&self) -> Option<PixelRect> {
        match self {
            Operation::NewPage { .. } => None,
            Operation::Text { rect, .. }
            | Operation::Image { rect, .. }
            | Operation::Placeholder { rect, .. } => Some(*rect),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBuilder {
    pages: Vec<PageSize>,
    operations: Vec<Operation>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Placement operations recorded for `page`, without the page creation itself.
    pub fn page_operations(&self, page: PageHandle) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|op| op.page() == page && !matches!(op, Operation::NewPage { .. }))
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn check_page(&self, page: PageHandle) -> Result<(), BuildError> {
        if page.index() < self.pages.len() {
            Ok(())
        } else {
            Err(BuildError::UnknownPage(page.index()))
        }
    }
}

impl DocumentBuilder for RecordingBuilder {
    fn new_page(&mut self, size: PageSize) -> Result<PageHandle, BuildError> {
        if size.width == 0 || size.height == 0 {
            return Err(BuildError::InvalidPageSize {
                width: size.width,
                height: size.height,
            });
        }
        let page = PageHandle(self.pages.len());
        self.pages.push(size);
        self.operations.push(Operation::NewPage { page, size });
        Ok(page)
    }

    fn add_text(
        &mut self,
        page: PageHandle,
        text: &str,
        rect: PixelRect,
        style: TextStyle,
    ) -> Result<(), BuildError> {
        self.check_page(page)?;
        self.operations.push(Operation::Text {
            page,
            text: text.to_string(),
            rect,
            style,
        });
        Ok(())
    }

    fn add_image(
        &mut self,
        page: PageHandle,
        path: &Path,
        rect: PixelRect,
    ) -> Result<(), BuildError> {
        self.check_page(page)?;
        let meta = std::fs::metadata(path).map_err(|source| BuildError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(BuildError::ImageDecode {
                path: path.to_path_buf(),
                message: "not a regular file".to_string(),
            });
        }
        self.operations.push(Operation::Image {
            page,
            path: path.to_path_buf(),
            rect,
        });
        Ok(())
    }

    fn add_placeholder(&mut self, page: PageHandle, rect: PixelRect) {
        if self.check_page(page).is_err() {
            log::warn!("Placeholder for unknown page {} dropped", page.index());
            return;
        }
        self.operations.push(Operation::Placeholder { page, rect });
    }

    fn serialize(self) -> Result<Vec<u8>, BuildError> {
        serde_json::to_vec_pretty(&self.operations)
            .map_err(|e| BuildError::Serialize(e.to_string()))
    }
}

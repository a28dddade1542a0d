//! Output document capability.
//!
//! The composition engine only ever talks to a [`DocumentBuilder`]; it never
//! sees the serialized format. All geometry is in output-page pixels.

use peel_types::{PageSize, PixelRect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Cannot read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode image '{path}': {message}")]
    ImageDecode { path: PathBuf, message: String },

    #[error("Unknown page handle {0}")]
    UnknownPage(usize),

    #[error("Invalid page size {width}x{height}")]
    InvalidPageSize { width: u32, height: u32 },

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque reference to a page created by [`DocumentBuilder::new_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageHandle(pub usize);

impl PageHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    pub emphasis: Emphasis,
    /// `None` leaves alignment to the backend's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl TextStyle {
    pub fn bold() -> Self {
        Self {
            emphasis: Emphasis::Bold,
            alignment: None,
        }
    }

    pub fn centered() -> Self {
        Self {
            emphasis: Emphasis::Normal,
            alignment: Some(Alignment::Center),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.emphasis == Emphasis::Bold
    }
}

pub trait DocumentBuilder {
    fn new_page(&mut self, size: PageSize) -> Result<PageHandle, BuildError>;

    fn add_text(
        &mut self,
        page: PageHandle,
        text: &str,
        rect: PixelRect,
        style: TextStyle,
    ) -> Result<(), BuildError>;

    /// Places the image at `path`. Fails if the file cannot be read or decoded.
    fn add_image(
        &mut self,
        page: PageHandle,
        path: &Path,
        rect: PixelRect,
    ) -> Result<(), BuildError>;

    /// Marks a region whose asset is unavailable. Never fails.
    fn add_placeholder(&mut self, page: PageHandle, rect: PixelRect);

    fn serialize(self) -> Result<Vec<u8>, BuildError>
    where
        Self: Sized;

    fn serialize_to(self, path: &Path) -> Result<(), BuildError>
    where
        Self: Sized,
    {
        let bytes = self.serialize()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

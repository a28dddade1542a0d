//! Newtype wrapper for element identifiers.
//!
//! Keeps element ids from being confused with paths or text payloads, which are
//! also plain strings in the layout tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in a page's layout tree (e.g. `p0003_e2_c5`).
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the top-level element `index` on page `page`.
    pub fn top_level(page: usize, index: usize) -> Self {
        Self(format!("p{:04}_e{}", page, index))
    }

    /// Id of the `index`-th child of this element.
    pub fn child(&self, index: usize) -> Self {
        Self(format!("{}_c{}", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

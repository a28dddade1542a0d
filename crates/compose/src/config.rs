use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("dominant_child_threshold must be in (0, 1], got {0}")]
    Threshold(f64),

    #[error("max_recursion_depth must be at least 1")]
    RecursionDepth,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// A visual element is flattened when any single child covers more than
    /// this fraction of its area.
    ///
    /// Defaults to `0.85`.
    pub dominant_child_threshold: f64,

    /// Number of tree levels the engine composes. A node whose children would
    /// fall beyond this is flattened. Analysis already bounds tree depth; this
    /// only guards hand-built trees.
    ///
    /// Defaults to `16`.
    pub max_recursion_depth: usize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            dominant_child_threshold: 0.85,
            max_recursion_depth: 16,
        }
    }
}

impl CompositionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.dominant_child_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::Threshold(t));
        }
        if self.max_recursion_depth == 0 {
            return Err(ConfigError::RecursionDepth);
        }
        Ok(())
    }
}

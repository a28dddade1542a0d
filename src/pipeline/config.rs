use crate::error::PipelineError;
use peel_compose::CompositionConfig;
use peel_inpaint::MaskOptions;
use peel_types::PageSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Bounds on how deep and on what the page analysis recurses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Levels of sub-region analysis below the page. `0` disables recursion.
    ///
    /// Defaults to `2`.
    pub max_depth: usize,
    /// Minimum width and height, in page pixels, of a region worth re-analyzing.
    ///
    /// Defaults to `200`.
    pub min_image_size: u32,
    /// Defaults to `40000`.
    pub min_image_area: u64,
    /// Pages analyzed concurrently.
    ///
    /// Defaults to `4`.
    pub worker_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            min_image_size: 200,
            min_image_area: 40_000,
            worker_count: 4,
        }
    }
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join("peel")
}

/// Every tunable of the pipeline, loadable from a JSON file.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub analysis: AnalysisConfig,
    pub composition: CompositionConfig,
    pub mask: MaskOptions,
    /// Output slide size in pixels.
    pub page: PageSize,
    /// Where crops and reconstructed backgrounds are written.
    pub work_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            composition: CompositionConfig::default(),
            mask: MaskOptions::default(),
            page: PageSize::default(),
            work_dir: default_work_dir(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config from '{}': {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.composition.validate()?;
        if self.analysis.worker_count == 0 {
            return Err(PipelineError::Config("worker_count must be at least 1".to_string()));
        }
        if self.page.width == 0 || self.page.height == 0 {
            return Err(PipelineError::Config(format!(
                "page size must be non-zero, got {}x{}",
                self.page.width, self.page.height
            )));
        }
        Ok(())
    }
}

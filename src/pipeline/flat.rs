//! Image-only export: one full-page picture per input, nothing editable.

use crate::error::PipelineError;
use peel_traits::DocumentBuilder;
use peel_types::{PageSize, PixelRect};
use std::path::PathBuf;

/// Adds each existing image in `paths` as a full-page picture.
///
/// Missing inputs are skipped with a warning. Returns the number of pages
/// added, or `NoValidImages` when every input was missing.
pub fn compose_flat<B: DocumentBuilder + ?Sized>(
    builder: &mut B,
    paths: &[PathBuf],
    page_size: PageSize,
) -> Result<usize, PipelineError> {
    let valid: Vec<&PathBuf> = paths
        .iter()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                log::warn!("Skipping missing image {}", path.display());
            }
            exists
        })
        .collect();
    if valid.is_empty() {
        return Err(PipelineError::NoValidImages);
    }

    for path in &valid {
        let page = builder.new_page(page_size)?;
        builder.add_image(page, path, PixelRect::full_page(page_size))?;
    }
    log::info!("Exported {} flat page(s)", valid.len());
    Ok(valid.len())
}

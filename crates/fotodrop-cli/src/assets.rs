//! Local asset discovery for a model's folder.

use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List the image files in `{images_dir}/{model_id}`, sorted by filename so
/// upload order matches what the operator sees in their file browser.
/// `Ok(None)` means the folder does not exist at all.
pub fn list_assets(images_dir: &Path, model_id: &str) -> std::io::Result<Option<Vec<PathBuf>>> {
    let folder = images_dir.join(model_id);
    if !folder.is_dir() {
        return Ok(None);
    }

    let mut assets: Vec<PathBuf> = std::fs::read_dir(&folder)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    assets.sort();
    Ok(Some(assets))
}

//! Input directory listing

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{BatchResizeError, Result};
use crate::processing::formats::is_recognized_image;

/// One recognized image found directly inside the input folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredImage {
    /// Bare file name, reused unchanged for the output file
    pub file_name: OsString,
    pub path: PathBuf,
}

impl DiscoveredImage {
    /// File name for console notices
    pub fn display_name(&self) -> String {
        self.file_name.to_string_lossy().into_owned()
    }
}

/// List the recognized images directly inside `input_dir`
///
/// Entries keep the order the filesystem returns them in. Nothing is
/// recursed into; sub-directories and non-matching names are dropped.
pub async fn discover_images(input_dir: &Path) -> Result<Vec<DiscoveredImage>> {
    let mut entries = fs::read_dir(input_dir)
        .await
        .map_err(|e| BatchResizeError::read_dir(input_dir, e))?;

    let mut images = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| BatchResizeError::read_dir(input_dir, e))?
    {
        let file_name = entry.file_name();
        let path = entry.path();

        if !is_recognized_image(&file_name) {
            debug!("Skipping {:?}: extension not recognized", file_name);
            continue;
        }

        // Follows symlinks, so a link to an image is still processed
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| BatchResizeError::metadata(&path, e))?;
        if !metadata.is_file() {
            debug!("Skipping {:?}: not a regular file", file_name);
            continue;
        }

        images.push(DiscoveredImage { file_name, path });
    }

    debug!("Discovered {} image(s) in {:?}", images.len(), input_dir);
    Ok(images)
}

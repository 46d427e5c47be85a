//! Image format detection and handling

use std::ffi::OsStr;
use std::path::Path;

use crate::error::{BatchResizeError, Result};

/// File name suffixes picked up by a batch run, without the leading dot
pub const RECOGNIZED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Image formats a batch run reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Gif,
}

/// Convert our ImageFormat to image crate format
impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

/// Case-insensitive suffix match of a file name against the recognized set
///
/// The whole name is matched, so `.png` on its own counts. Bytes that are
/// not valid UTF-8 are replaced before matching; the suffix still counts.
pub fn is_recognized_image(file_name: &OsStr) -> bool {
    let name = file_name.to_string_lossy().to_lowercase();

    RECOGNIZED_EXTENSIONS
        .iter()
        .any(|ext| name.ends_with(&format!(".{}", ext)))
}

/// Detect image format from the file name suffix
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ImageFormat> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .ok_or_else(|| BatchResizeError::invalid_parameters(
            format!("No usable file name in {:?}", path)
        ))?;

    let extension = name.rsplit_once('.').map_or("", |(_, ext)| ext);

    match extension {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "bmp" => Ok(ImageFormat::Bmp),
        "gif" => Ok(ImageFormat::Gif),
        _ => Err(BatchResizeError::invalid_parameters(
            format!("Unrecognized image extension '{}' ({:?})", extension, path)
        )),
    }
}

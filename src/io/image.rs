//! Loading source images and exporting rasterized PNGs

use crate::io::error::{RasterError, Result};
use crate::raster::RasterBitmap;
use std::path::Path;

/// File extensions accepted as source images
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Whether `path` carries a supported image extension, case-insensitively
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Decode a PNG or JPEG into a bitmap
///
/// # Errors
///
/// Returns `RasterError::ImageLoad` when the file cannot be read or decoded.
pub fn load_bitmap(path: &Path) -> Result<RasterBitmap> {
    let decoded = image::open(path).map_err(|source| RasterError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        decoded.width(),
        decoded.height()
    );
    Ok(RasterBitmap::from(decoded))
}

/// Write a bitmap as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_bitmap(bitmap: &RasterBitmap, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| RasterError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source,
        })?;
    }

    let saved = match bitmap {
        RasterBitmap::Rgba(rgba) => rgba.save_with_format(path, image::ImageFormat::Png),
        RasterBitmap::Gray(gray) => gray.save_with_format(path, image::ImageFormat::Png),
    };
    saved.map_err(|source| RasterError::ImageExport {
        path: path.to_path_buf(),
        source,
    })
}

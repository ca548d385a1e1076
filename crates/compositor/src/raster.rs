//! Loading and saving rasters.

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use panel_common::{PanelError, PanelResult};
use tracing::{debug, info};

/// Load a panel background. Its dimensions become the canvas dimensions.
pub fn load_background(path: &Path) -> PanelResult<RgbaImage> {
    if !path.is_file() {
        return Err(PanelError::MissingBackground(path.to_path_buf()));
    }
    let canvas = image::open(path)?.to_rgba8();
    info!(
        path = %path.display(),
        width = canvas.width(),
        height = canvas.height(),
        "Loaded background"
    );
    Ok(canvas)
}

/// Load an overlay that another tool rendered to disk.
pub fn load_overlay(path: &Path) -> PanelResult<RgbaImage> {
    if !path.is_file() {
        return Err(PanelError::MissingOverlay(path.to_path_buf()));
    }
    Ok(image::open(path)?.to_rgba8())
}

/// Decode a downloaded chart (PNG, GIF, JPEG, ...) into RGBA.
pub fn decode_rgba(bytes: &[u8]) -> PanelResult<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    debug!(width = img.width(), height = img.height(), "Decoded image");
    Ok(img.to_rgba8())
}

/// Write a canvas as PNG, creating parent directories as needed.
pub fn save_png(canvas: &RgbaImage, path: &Path) -> PanelResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    canvas.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

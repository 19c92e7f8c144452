//! CLI command implementations

pub mod codecs;
pub mod convert;
pub mod info;

use anyhow::{Context, Result};
use raster_io::{CodecRegistry, Image};
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    raster_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(image: &Image, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Empty image bound to the codec registered for the extension of `path`.
pub fn image_for_path(path: &Path) -> Result<Image> {
    CodecRegistry::global()
        .create_for_path(path)
        .with_context(|| format!("No codec registered for: {}", path.display()))
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_image_for_unknown_extension() {
        assert!(image_for_path(Path::new("frame.xyz")).is_err());
        assert!(image_for_path(Path::new("frame.bmp")).is_ok());
    }
}

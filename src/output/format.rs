use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::AtlasError;

/// Save a frame image as PNG, optionally with compression
pub fn save_frame_image(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    // Encode to PNG in memory
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| AtlasError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            AtlasError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AtlasError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, output_data).map_err(|e| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("onigiri-save-{}", std::process::id()));
        let path = dir.join("nested/frame.png");

        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([1, 2, 3, 255]));
        save_frame_image(&img, &path, Some(CompressionLevel::Level(0))).unwrap();

        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded, img);

        std::fs::remove_dir_all(&dir).ok();
    }
}

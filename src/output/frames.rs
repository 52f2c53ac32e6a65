use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{RgbaImage, imageops};
use log::{debug, warn};
use rayon::prelude::*;

use crate::atlas::{LoadedAtlas, TextureRegion};
use crate::cli::CompressionLevel;
use crate::output::save_frame_image;

/// How extracted frames are written
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Composite onto the untrimmed canvas described by the offsets
    pub untrim: bool,
    /// Keep quarter-turned frames sideways, as stored. Not combinable with
    /// `untrim`, which always composites upright frames.
    pub keep_rotation: bool,
    pub compress: Option<CompressionLevel>,
}

/// Write each frame of an atlas to `<output_dir>/<frame name>.png`.
///
/// Frames whose bounds are malformed or outside the image are skipped with a
/// warning. Returns the number of files written.
pub fn extract_frames(
    atlas: &LoadedAtlas,
    output_dir: &Path,
    options: ExtractOptions,
) -> Result<usize> {
    let written: Result<Vec<bool>> = atlas
        .info
        .frames
        .par_iter()
        .filter_map(|frame| {
            atlas
                .regions
                .get(&frame.name)
                .map(|region| (frame.name.as_str(), region))
        })
        .map(|(name, region)| {
            let Some(image) = render_frame(region, options) else {
                warn!("Skipping frame '{}': bounds {:?} not readable", name, region.frame);
                return Ok(false);
            };

            let Some(path) = frame_path(output_dir, name) else {
                warn!("Skipping frame '{}': name has no usable file name", name);
                return Ok(false);
            };
            save_frame_image(&image, &path, options.compress)?;
            debug!("Wrote {}", path.display());
            Ok(true)
        })
        .collect();

    Ok(written?.into_iter().filter(|w| *w).count())
}

fn render_frame(region: &TextureRegion, options: ExtractOptions) -> Option<RgbaImage> {
    let image = match (options.untrim, options.keep_rotation) {
        (true, _) => region.to_untrimmed_image()?,
        (false, false) => region.to_image()?,
        (false, true) => {
            let upright = region.to_image()?;
            if region.is_rotated() {
                imageops::rotate90(&upright)
            } else {
                upright
            }
        }
    };
    Some(image)
}

/// Output path for a frame; names may contain `/` to form subdirectories.
/// `None` when nothing of the name is left after dropping `.`, `..` and
/// empty segments.
fn frame_path(output_dir: &Path, name: &str) -> Option<PathBuf> {
    let parts: Vec<&str> = name
        .split('/')
        .filter(|p| !p.is_empty() && *p != "." && *p != "..")
        .collect();

    let (last, dirs) = parts.split_last()?;
    let mut path = output_dir.to_path_buf();
    path.extend(dirs);
    path.push(format!("{}.png", last));
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::atlas::{build_texture_regions, group_frames_by_prefix, parse_atlas_text};
    use image::Rgba;

    fn loaded(text: &str, image: RgbaImage) -> LoadedAtlas {
        let info = parse_atlas_text(text);
        let image = Arc::new(image);
        LoadedAtlas {
            source: PathBuf::from("test.atlas"),
            regions: build_texture_regions(Arc::clone(&image), &info),
            groups: group_frames_by_prefix(&info.frames),
            info,
            image,
        }
    }

    #[test]
    fn test_frame_path() {
        let out = Path::new("out");
        assert_eq!(frame_path(out, "idle0"), Some(PathBuf::from("out/idle0.png")));
        assert_eq!(
            frame_path(out, "face/blink"),
            Some(PathBuf::from("out/face/blink.png"))
        );
        assert_eq!(frame_path(out, "../escape"), Some(PathBuf::from("out/escape.png")));
        assert_eq!(frame_path(out, "hero.v2"), Some(PathBuf::from("out/hero.v2.png")));
        assert_eq!(frame_path(out, "/"), None);
        assert_eq!(frame_path(out, ".."), None);
        assert_eq!(frame_path(out, "./"), None);
    }

    #[test]
    fn test_extract_writes_readable_frames() {
        let dir = std::env::temp_dir().join(format!("onigiri-extract-{}", std::process::id()));
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(0, 0, Rgba([9, 9, 9, 255]));

        let atlas = loaded(
            "a.png\nsize:4,4\nidle0\nbounds:0,0,2,2\nturned\nbounds:2,0,2,4\nrotate:90\nbroken\nbounds:x,0,1,1\n..\nbounds:0,0,1,1\n",
            img,
        );

        let count = extract_frames(&atlas, &dir, ExtractOptions::default()).unwrap();
        assert_eq!(count, 2);

        let idle = image::open(dir.join("idle0.png")).unwrap().into_rgba8();
        assert_eq!(*idle.get_pixel(0, 0), Rgba([9, 9, 9, 255]));

        let turned = image::open(dir.join("turned.png")).unwrap().into_rgba8();
        assert_eq!(turned.dimensions(), (4, 2));
        assert!(!dir.join("broken.png").exists());
        assert!(dir.is_dir());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_keep_rotation_writes_stored_orientation() {
        let atlas = loaded(
            "a.png\nturned\nbounds:0,0,2,4\nrotate:90\n",
            RgbaImage::new(2, 4),
        );
        let options = ExtractOptions {
            keep_rotation: true,
            ..Default::default()
        };

        let region = atlas.regions.get("turned").unwrap();
        let image = render_frame(region, options).unwrap();
        assert_eq!(image.dimensions(), (2, 4));
    }
}

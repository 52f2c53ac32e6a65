use std::collections::HashMap;
use std::sync::Arc;

use image::{RgbaImage, imageops};
use log::debug;

use super::{AtlasInfo, PixelRect, Rect};

/// How a frame's pixels are stored in the atlas image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    /// Stored turned 90 degrees clockwise
    QuarterTurn,
}

impl Rotation {
    /// Only exactly 90 degrees is honoured; every other value reads unrotated
    pub fn from_degrees(degrees: Option<f64>) -> Self {
        match degrees {
            Some(d) if d == 90.0 => Rotation::QuarterTurn,
            _ => Rotation::None,
        }
    }
}

/// A view of one frame inside a shared atlas image
#[derive(Debug, Clone)]
pub struct TextureRegion {
    image: Arc<RgbaImage>,
    /// Rectangle in source-image pixels
    pub frame: Rect,
    pub rotation: Rotation,
    /// Trim metadata, carried for compositing and never applied here
    pub offsets: Option<Rect>,
}

impl TextureRegion {
    /// The atlas image this region points into
    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation == Rotation::QuarterTurn
    }

    /// Frame rectangle in whole pixels, if it is well formed
    pub fn pixel_rect(&self) -> Option<PixelRect> {
        self.frame.to_pixels()
    }

    /// Copy the frame's pixels out of the atlas, upright.
    ///
    /// The rectangle is clamped to the image. Returns `None` when the frame
    /// rectangle is malformed or falls entirely outside the image.
    pub fn to_image(&self) -> Option<RgbaImage> {
        let rect = self.pixel_rect()?;
        let cropped =
            imageops::crop_imm(&*self.image, rect.x, rect.y, rect.width, rect.height).to_image();
        if cropped.width() == 0 || cropped.height() == 0 {
            return None;
        }

        Some(match self.rotation {
            Rotation::None => cropped,
            Rotation::QuarterTurn => imageops::rotate270(&cropped),
        })
    }

    /// Copy the frame's pixels and place them on the untrimmed canvas.
    ///
    /// Offsets follow the libGDX convention: `x` from the left edge, `y` from
    /// the bottom edge, `w`/`h` the original size. Without usable offsets this
    /// is the same as [`TextureRegion::to_image`].
    pub fn to_untrimmed_image(&self) -> Option<RgbaImage> {
        let trimmed = self.to_image()?;
        let Some(offsets) = self.offsets.and_then(|o| o.to_pixels()) else {
            return Some(trimmed);
        };

        let mut canvas = RgbaImage::new(offsets.width.max(1), offsets.height.max(1));
        let top = i64::from(offsets.height)
            - i64::from(trimmed.height())
            - i64::from(offsets.y);
        imageops::overlay(&mut canvas, &trimmed, i64::from(offsets.x), top);
        Some(canvas)
    }
}

/// Frame name to region lookup for one atlas
#[derive(Debug, Clone, Default)]
pub struct TextureRegions {
    regions: HashMap<String, TextureRegion>,
}

impl TextureRegions {
    pub fn get(&self, name: &str) -> Option<&TextureRegion> {
        self.regions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TextureRegion)> {
        self.regions.iter().map(|(name, region)| (name.as_str(), region))
    }
}

/// Build one region per frame, all sharing the decoded atlas image.
///
/// Bounds are used as-is: no scaling and no check against the image size.
/// A repeated name overwrites the earlier region.
pub fn build_texture_regions(image: Arc<RgbaImage>, info: &AtlasInfo) -> TextureRegions {
    let mut regions = HashMap::with_capacity(info.frames.len());

    for frame in &info.frames {
        let rotation = Rotation::from_degrees(frame.rotate);
        if frame.rotate.is_some_and(|d| d != 0.0) && rotation == Rotation::None {
            debug!(
                "Frame '{}' has unsupported rotation {:?}, reading unrotated",
                frame.name, frame.rotate
            );
        }

        regions.insert(
            frame.name.clone(),
            TextureRegion {
                image: Arc::clone(&image),
                frame: frame.bounds,
                rotation,
                offsets: frame.offsets,
            },
        );
    }

    TextureRegions { regions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::parse_atlas_text;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn build(text: &str, image: RgbaImage) -> TextureRegions {
        build_texture_regions(Arc::new(image), &parse_atlas_text(text))
    }

    #[test]
    fn test_regions_keyed_by_name() {
        let regions = build(
            "a.png\nsize:16,16\nscale:2\nidle0\nbounds:0,0,8,8\nidle1\nbounds:8,0,8,8\n",
            RgbaImage::new(16, 16),
        );

        assert_eq!(regions.len(), 2);
        // Scale is metadata only
        assert_eq!(regions.get("idle1").unwrap().frame, Rect::new(8.0, 0.0, 8.0, 8.0));
        assert!(regions.get("missing").is_none());
        assert!(!regions.contains("missing"));
    }

    #[test]
    fn test_rotation_flags() {
        let regions = build(
            "a.png\nturned\nbounds:0,0,4,4\nrotate:90\nodd\nbounds:0,0,4,4\nrotate:45\nplain\nbounds:0,0,4,4\n",
            RgbaImage::new(8, 8),
        );

        assert_eq!(regions.get("turned").unwrap().rotation, Rotation::QuarterTurn);
        assert_eq!(regions.get("odd").unwrap().rotation, Rotation::None);
        assert_eq!(regions.get("plain").unwrap().rotation, Rotation::None);
    }

    #[test]
    fn test_regions_share_image() {
        let regions = build(
            "a.png\nidle0\nbounds:0,0,4,4\nidle1\nbounds:4,0,4,4\n",
            RgbaImage::new(8, 4),
        );

        let a = regions.get("idle0").unwrap();
        let b = regions.get("idle1").unwrap();
        assert!(Arc::ptr_eq(a.image(), b.image()));
    }

    #[test]
    fn test_offsets_carried() {
        let regions = build(
            "a.png\nidle0\nbounds:0,0,4,4\noffsets:1,2,8,8\n",
            RgbaImage::new(8, 8),
        );
        assert_eq!(
            regions.get("idle0").unwrap().offsets,
            Some(Rect::new(1.0, 2.0, 8.0, 8.0))
        );
    }

    #[test]
    fn test_out_of_range_bounds_still_build() {
        let regions = build("a.png\nfar\nbounds:100,100,4,4\n", RgbaImage::new(8, 8));

        let region = regions.get("far").unwrap();
        assert!(region.to_image().is_none());
    }

    #[test]
    fn test_to_image_crops() {
        let mut img = RgbaImage::new(8, 4);
        for y in 0..4 {
            for x in 4..8 {
                img.put_pixel(x, y, RED);
            }
        }

        let regions = build("a.png\nright\nbounds:4,0,4,4\n", img);
        let frame = regions.get("right").unwrap().to_image().unwrap();

        assert_eq!(frame.dimensions(), (4, 4));
        assert!(frame.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_to_image_undoes_quarter_turn() {
        // Upright frame is 3 wide, 2 tall with a red top-left pixel.
        // Turned clockwise it is stored 2 wide, 3 tall with red at top-right.
        let mut img = RgbaImage::new(2, 3);
        img.put_pixel(1, 0, RED);

        let regions = build("a.png\nturned\nbounds:0,0,2,3\nrotate:90\n", img);
        let frame = regions.get("turned").unwrap().to_image().unwrap();

        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(*frame.get_pixel(0, 0), RED);
    }

    #[test]
    fn test_to_untrimmed_image() {
        let mut img = RgbaImage::new(2, 2);
        for pixel in img.pixels_mut() {
            *pixel = BLUE;
        }

        // 2x2 trimmed frame, 1px from the left and 3px from the bottom of 6x8
        let regions = build("a.png\nidle0\nbounds:0,0,2,2\noffsets:1,3,6,8\n", img);
        let canvas = regions.get("idle0").unwrap().to_untrimmed_image().unwrap();

        assert_eq!(canvas.dimensions(), (6, 8));
        // top = 8 - 2 - 3 = 3
        assert_eq!(*canvas.get_pixel(1, 3), BLUE);
        assert_eq!(*canvas.get_pixel(2, 4), BLUE);
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
        assert_eq!(canvas.get_pixel(1, 5)[3], 0);
    }

    #[test]
    fn test_to_untrimmed_without_offsets() {
        let regions = build("a.png\nidle0\nbounds:0,0,2,2\n", RgbaImage::new(2, 2));
        let canvas = regions.get("idle0").unwrap().to_untrimmed_image().unwrap();
        assert_eq!(canvas.dimensions(), (2, 2));
    }
}

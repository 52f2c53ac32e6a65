use serde::Serialize;

/// Canvas dimensions declared by the descriptor header
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

/// A rectangle as written in the descriptor.
///
/// Components are kept verbatim; a token that is not a number becomes NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Integral pixel rectangle, if every component is a finite non-negative integer
    pub fn to_pixels(&self) -> Option<PixelRect> {
        Some(PixelRect {
            x: to_pixel(self.x)?,
            y: to_pixel(self.y)?,
            width: to_pixel(self.w)?,
            height: to_pixel(self.h)?,
        })
    }

    /// Returns true if any component failed to parse
    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.w.is_nan() || self.h.is_nan()
    }
}

/// A validated rectangle in source-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Check if this rectangle lies within a canvas of the given size
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range and integrality are checked first"
)]
fn to_pixel(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

/// One named region of the atlas image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub name: String,
    /// Rectangle in source-image pixels, never pre-scaled
    pub bounds: Rect,
    /// Trim metadata: offset of the cropped pixels and the original size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsets: Option<Rect>,
    /// Rotation in degrees; only 90 has a meaning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
}

/// A parsed atlas descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasInfo {
    /// Image file, relative to the descriptor's location
    pub image_path: String,
    pub size: Size,
    /// Display density hint for the consumer
    pub scale: f64,
    /// Frames in order of appearance
    pub frames: Vec<FrameRecord>,
}

impl Default for AtlasInfo {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            size: Size::default(),
            scale: 1.0,
            frames: Vec::new(),
        }
    }
}

impl AtlasInfo {
    /// Find a frame by name
    pub fn frame(&self, name: &str) -> Option<&FrameRecord> {
        self.frames.iter().find(|f| f.name == name)
    }
}

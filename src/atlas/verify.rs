use std::collections::HashSet;
use std::fmt;

use super::{AtlasInfo, FrameRecord, Rect};

/// A problem found by [`verify_atlas`]
#[derive(Debug, Clone, PartialEq)]
pub enum AtlasIssue {
    MissingImagePath,
    InvalidSize { w: f64, h: f64 },
    InvalidScale(f64),
    NonNumeric { frame: String, field: &'static str },
    EmptyBounds { frame: String },
    OutOfCanvas { frame: String },
    UnsupportedRotation { frame: String, degrees: f64 },
    DuplicateName { frame: String },
}

impl fmt::Display for AtlasIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasIssue::MissingImagePath => write!(f, "descriptor does not name an image file"),
            AtlasIssue::InvalidSize { w, h } => write!(f, "invalid atlas size {}x{}", w, h),
            AtlasIssue::InvalidScale(scale) => write!(f, "invalid scale {}", scale),
            AtlasIssue::NonNumeric { frame, field } => {
                write!(f, "frame '{}': {} has a non-numeric value", frame, field)
            }
            AtlasIssue::EmptyBounds { frame } => write!(f, "frame '{}': bounds are empty", frame),
            AtlasIssue::OutOfCanvas { frame } => {
                write!(f, "frame '{}': bounds extend past the atlas size", frame)
            }
            AtlasIssue::UnsupportedRotation { frame, degrees } => {
                write!(f, "frame '{}': rotation {} is not supported", frame, degrees)
            }
            AtlasIssue::DuplicateName { frame } => write!(f, "frame '{}' is defined twice", frame),
        }
    }
}

/// Check a parsed atlas for values the lenient parser let through.
///
/// The parser never calls this; it is for callers that need well-formed
/// geometry before rendering.
pub fn verify_atlas(info: &AtlasInfo) -> Vec<AtlasIssue> {
    let mut issues = Vec::new();

    if info.image_path.is_empty() {
        issues.push(AtlasIssue::MissingImagePath);
    }

    let canvas = Rect::new(0.0, 0.0, info.size.w, info.size.h).to_pixels();
    let canvas = match canvas {
        Some(c) if c.width > 0 && c.height > 0 => Some(c),
        _ => {
            issues.push(AtlasIssue::InvalidSize {
                w: info.size.w,
                h: info.size.h,
            });
            None
        }
    };

    if !(info.scale.is_finite() && info.scale > 0.0) {
        issues.push(AtlasIssue::InvalidScale(info.scale));
    }

    let mut seen = HashSet::new();
    for frame in &info.frames {
        if !seen.insert(frame.name.as_str()) {
            issues.push(AtlasIssue::DuplicateName {
                frame: frame.name.clone(),
            });
        }
        verify_frame(frame, canvas.map(|c| (c.width, c.height)), &mut issues);
    }

    issues
}

fn verify_frame(frame: &FrameRecord, canvas: Option<(u32, u32)>, issues: &mut Vec<AtlasIssue>) {
    let name = || frame.name.clone();

    match frame.bounds.to_pixels() {
        None => issues.push(AtlasIssue::NonNumeric {
            frame: name(),
            field: "bounds",
        }),
        Some(rect) => {
            if rect.width == 0 || rect.height == 0 {
                issues.push(AtlasIssue::EmptyBounds { frame: name() });
            }
            if let Some((w, h)) = canvas
                && !rect.fits_within(w, h)
            {
                issues.push(AtlasIssue::OutOfCanvas { frame: name() });
            }
        }
    }

    if let Some(offsets) = frame.offsets
        && offsets.has_nan()
    {
        issues.push(AtlasIssue::NonNumeric {
            frame: name(),
            field: "offsets",
        });
    }

    if let Some(degrees) = frame.rotate {
        if degrees.is_nan() {
            issues.push(AtlasIssue::NonNumeric {
                frame: name(),
                field: "rotate",
            });
        } else if degrees != 0.0 && degrees != 90.0 {
            issues.push(AtlasIssue::UnsupportedRotation {
                frame: name(),
                degrees,
            });
        }
    }
}

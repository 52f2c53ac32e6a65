use std::collections::HashMap;

use log::debug;

use super::{AtlasInfo, FrameRecord, Rect, Size};

/// Raster extensions recognised as the header's image line
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Parse an atlas descriptor with the default image extensions.
///
/// Never fails: frames without `bounds` are dropped, unknown properties are
/// skipped and malformed numbers come through as NaN.
pub fn parse_atlas_text(text: &str) -> AtlasInfo {
    AtlasParser::new().parse(text)
}

/// Line-oriented atlas descriptor parser
#[derive(Debug, Clone)]
pub struct AtlasParser {
    image_extensions: Vec<String>,
}

impl Default for AtlasParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AtlasParser {
    pub fn new() -> Self {
        Self {
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }

    /// Replace the list of extensions that mark the header's image line
    pub fn image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.image_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn parse(&self, text: &str) -> AtlasInfo {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}'))
            .filter(|line| !line.is_empty())
            .collect();

        let mut info = AtlasInfo::default();
        let mut cursor = 0;

        // Header
        while let Some(&line) = lines.get(cursor) {
            if self.is_image_line(line) {
                info.image_path = line.to_string();
            } else if let Some(value) = line.strip_prefix("size:") {
                let [w, h] = parse_fields::<2>(value);
                info.size = Size { w, h };
            } else if let Some(value) = line.strip_prefix("scale:") {
                info.scale = parse_float_prefix(value);
            } else if line.starts_with("filter:") || line.starts_with("repeat:") {
                // Page sampling hints have no effect on frame geometry
            } else {
                break;
            }
            cursor += 1;
        }

        // Frames
        let mut positions: HashMap<String, usize> = HashMap::new();
        while let Some(&name) = lines.get(cursor) {
            cursor += 1;

            let mut bounds = None;
            let mut offsets = None;
            let mut rotate = None;

            while let Some(&line) = lines.get(cursor) {
                if !line.contains(':') {
                    break;
                }
                if let Some(value) = line.strip_prefix("bounds:") {
                    bounds = Some(parse_rect(value));
                } else if let Some(value) = line.strip_prefix("offsets:") {
                    offsets = Some(parse_rect(value));
                } else if let Some(value) = line.strip_prefix("rotate:") {
                    rotate = Some(parse_int_prefix(value));
                }
                cursor += 1;
            }

            let Some(bounds) = bounds else {
                debug!("Skipping frame '{}' without bounds", name);
                continue;
            };

            let record = FrameRecord {
                name: name.to_string(),
                bounds,
                offsets,
                rotate,
            };

            // Last definition of a name wins, keeping the first position
            match positions.get(name) {
                Some(&index) => {
                    debug!("Frame '{}' redefined, replacing earlier record", name);
                    info.frames[index] = record;
                }
                None => {
                    positions.insert(record.name.clone(), info.frames.len());
                    info.frames.push(record);
                }
            }
        }

        info
    }

    fn is_image_line(&self, line: &str) -> bool {
        line.rsplit_once('.').is_some_and(|(_, ext)| {
            let ext = ext.to_lowercase();
            self.image_extensions.iter().any(|known| *known == ext)
        })
    }
}

fn parse_rect(value: &str) -> Rect {
    let [x, y, w, h] = parse_fields::<4>(value);
    Rect { x, y, w, h }
}

/// Split on commas and convert the first `N` parts; missing parts are NaN
fn parse_fields<const N: usize>(value: &str) -> [f64; N] {
    let mut fields = [f64::NAN; N];
    for (slot, part) in fields.iter_mut().zip(value.split(',')) {
        *slot = parse_number(part);
    }
    fields
}

/// Whole-token number conversion: blank is zero, anything not a plain
/// decimal literal is NaN.
fn parse_number(token: &str) -> f64 {
    let token = token.trim();
    if token.is_empty() {
        return 0.0;
    }
    if !is_decimal_literal(token) {
        return f64::NAN;
    }
    token.parse().unwrap_or(f64::NAN)
}

fn is_decimal_literal(token: &str) -> bool {
    decimal_prefix_len(token) == token.len()
}

/// Longest leading decimal float literal, NaN if there is none
fn parse_float_prefix(value: &str) -> f64 {
    let value = value.trim_start();
    let len = decimal_prefix_len(value);
    if len == 0 {
        return f64::NAN;
    }
    value[..len].parse().unwrap_or(f64::NAN)
}

/// Longest leading signed integer, NaN if there is none
fn parse_int_prefix(value: &str) -> f64 {
    let value = value.trim_start();
    let bytes = value.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return f64::NAN;
    }
    value[..sign_len + digits].parse().unwrap_or(f64::NAN)
}

/// Length of the leading `[+-]digits[.digits][(e|E)[+-]digits]` literal.
/// Returns 0 when no mantissa digits are present.
fn decimal_prefix_len(value: &str) -> usize {
    let bytes = value.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j.min(bytes.len())..]);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    i
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

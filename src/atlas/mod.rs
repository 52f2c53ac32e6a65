mod groups;
mod loader;
mod parser;
mod regions;
mod types;
mod verify;

pub use groups::{AnimationGroups, frame_prefix, group_frames_by_prefix};
pub use loader::{LoadedAtlas, load_atlas, load_atlas_image, load_atlas_with};
pub use parser::{AtlasParser, DEFAULT_IMAGE_EXTENSIONS, parse_atlas_text};
pub use regions::{Rotation, TextureRegion, TextureRegions, build_texture_regions};
pub use types::{AtlasInfo, FrameRecord, PixelRect, Rect, Size};
pub use verify::{AtlasIssue, verify_atlas};

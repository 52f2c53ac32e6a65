mod format;
mod frames;
mod json;

pub use format::save_frame_image;
pub use frames::{ExtractOptions, extract_frames};
pub use json::{atlas_to_json, atlases_to_json, groups_to_json, write_json};

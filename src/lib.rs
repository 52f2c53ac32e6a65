pub mod animation;
pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use animation::{AnimationName, CharacterController, CharacterState, FramePlayer, LoopMode};
pub use atlas::{
    AnimationGroups, AtlasInfo, AtlasParser, FrameRecord, LoadedAtlas, TextureRegion,
    TextureRegions, build_texture_regions, group_frames_by_prefix, parse_atlas_text,
};
pub use cli::{CliArgs, Command, CommonArgs};
pub use error::AtlasError;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageReader, RgbaImage};
use log::{debug, info};

use super::{
    AnimationGroups, AtlasInfo, AtlasParser, TextureRegions, build_texture_regions,
    group_frames_by_prefix,
};
use crate::error::AtlasError;

/// Read and parse an atlas descriptor
pub fn load_atlas(path: &Path) -> Result<AtlasInfo, AtlasError> {
    load_atlas_with(path, &AtlasParser::new())
}

/// Read an atlas descriptor and parse it with a configured parser.
///
/// The parser only runs once the whole text has been read.
pub fn load_atlas_with(path: &Path, parser: &AtlasParser) -> Result<AtlasInfo, AtlasError> {
    let text = std::fs::read_to_string(path).map_err(|e| AtlasError::AtlasLoad {
        source_id: path.to_path_buf(),
        source: e,
    })?;

    let info = parser.parse(&text);
    debug!(
        "Parsed {}: image '{}', {} frames",
        path.display(),
        info.image_path,
        info.frames.len()
    );
    Ok(info)
}

/// Decode the image an atlas refers to, resolved next to the descriptor
pub fn load_atlas_image(atlas_path: &Path, info: &AtlasInfo) -> Result<Arc<RgbaImage>, AtlasError> {
    if info.image_path.is_empty() {
        return Err(AtlasError::MissingImagePath(atlas_path.to_path_buf()));
    }

    let path = resolve_image_path(atlas_path, &info.image_path);
    let image = ImageReader::open(&path)
        .map_err(|e| AtlasError::ImageLoad {
            path: path.clone(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.clone(),
            source: e,
        })?
        .into_rgba8();

    Ok(Arc::new(image))
}

fn resolve_image_path(atlas_path: &Path, image_path: &str) -> PathBuf {
    atlas_path
        .parent()
        .map(|dir| dir.join(image_path))
        .unwrap_or_else(|| PathBuf::from(image_path))
}

/// An atlas with its decoded image, frame regions and animation groups
#[derive(Debug, Clone)]
pub struct LoadedAtlas {
    /// Descriptor the atlas was read from
    pub source: PathBuf,
    pub info: AtlasInfo,
    pub image: Arc<RgbaImage>,
    pub regions: TextureRegions,
    pub groups: AnimationGroups,
}

impl LoadedAtlas {
    pub fn open(path: &Path) -> Result<Self, AtlasError> {
        Self::open_with(path, &AtlasParser::new())
    }

    pub fn open_with(path: &Path, parser: &AtlasParser) -> Result<Self, AtlasError> {
        let info = load_atlas_with(path, parser)?;
        let image = load_atlas_image(path, &info)?;
        let regions = build_texture_regions(Arc::clone(&image), &info);
        let groups = group_frames_by_prefix(&info.frames);

        info!(
            "Loaded atlas {}: {}x{} image, {} frames in {} groups",
            path.display(),
            image.width(),
            image.height(),
            regions.len(),
            groups.len()
        );

        Ok(Self {
            source: path.to_path_buf(),
            info,
            image,
            regions,
            groups,
        })
    }
}

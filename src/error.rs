use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Failed to load atlas from '{source_id}': {source}")]
    AtlasLoad {
        source_id: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load atlas image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Atlas '{0}' does not name an image file")]
    MissingImagePath(PathBuf),

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("No atlas descriptors found in input")]
    NoAtlases,

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}

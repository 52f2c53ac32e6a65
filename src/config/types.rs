use serde::{Deserialize, Serialize};

use crate::atlas::DEFAULT_IMAGE_EXTENSIONS;

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Onigiri configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OnigiriConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Atlas descriptor paths or glob patterns
    pub input: Vec<String>,
    /// Output directory for extracted frames and metadata
    pub output_dir: String,
    /// File extensions that mark the image line of a descriptor header
    pub image_extensions: Vec<String>,
    /// Composite extracted frames back onto their untrimmed canvas
    pub untrim: bool,
    /// Write rotated frames as stored instead of upright
    pub keep_rotation: bool,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for OnigiriConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            untrim: false,
            keep_rotation: false,
            compress: None,
        }
    }
}

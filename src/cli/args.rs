use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "onigiri")]
#[command(version, about = "Sprite atlas inspector and frame extractor", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print atlas metadata and frames
    Inspect(ReportArgs),
    /// Print animation groups derived from frame names
    Groups(ReportArgs),
    /// Check atlases for malformed or out-of-range values
    Verify(CommonArgs),
    /// Write every frame as its own PNG
    Extract(ExtractArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Inspect(args) | Command::Groups(args) => &args.common,
            Command::Verify(args) => args,
            Command::Extract(args) => &args.common,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Atlas descriptor files
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from an onigiri config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra image extension recognised in descriptor headers (repeatable)
    #[arg(long = "image-ext", value_name = "EXT")]
    pub image_extensions: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print JSON instead of a text summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output directory for frame images [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Place each frame on its untrimmed canvas using the atlas offsets
    #[arg(long, conflicts_with = "keep_rotation")]
    pub untrim: bool,

    /// Write rotated frames as stored in the atlas
    #[arg(long)]
    pub keep_rotation: bool,

    /// Also write <atlas>.json with frames and animation groups
    #[arg(long)]
    pub metadata: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

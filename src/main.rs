use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rayon::prelude::*;

use onigiri::atlas::{
    AtlasInfo, AtlasParser, DEFAULT_IMAGE_EXTENSIONS, LoadedAtlas, group_frames_by_prefix,
    load_atlas_with, verify_atlas,
};
use onigiri::cli::{CliArgs, Command, CommonArgs, CompressionLevel};
use onigiri::config::{CompressConfig, LoadedConfig};
use onigiri::error::AtlasError;
use onigiri::output::{
    ExtractOptions, atlases_to_json, extract_frames, groups_to_json, write_json,
};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let merged = merge_config_with_args(&cli.command)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Onigiri atlas tool v{}", env!("CARGO_PKG_VERSION"));

    if merged.input.is_empty() {
        return Err(AtlasError::NoAtlases.into());
    }
    for path in &merged.input {
        if !path.exists() {
            return Err(AtlasError::InputNotFound(path.clone()).into());
        }
    }

    let parser = AtlasParser::new().image_extensions(&merged.image_extensions);

    match &cli.command {
        Command::Inspect(args) => {
            let atlases = parse_all(&merged.input, &parser)?;
            report_inspect(&atlases, args.json)?;
        }
        Command::Groups(args) => {
            let atlases = parse_all(&merged.input, &parser)?;
            report_groups(&atlases, args.json)?;
        }
        Command::Verify(_) => {
            let atlases = parse_all(&merged.input, &parser)?;
            let mut total = 0;
            for (path, info) in &atlases {
                let issues = verify_atlas(info);
                for issue in &issues {
                    warn!("{}: {}", path.display(), issue);
                }
                if issues.is_empty() {
                    info!("{}: ok ({} frames)", path.display(), info.frames.len());
                }
                total += issues.len();
            }
            if total > 0 {
                anyhow::bail!("found {} issue(s) in {} atlas(es)", total, atlases.len());
            }
        }
        Command::Extract(args) => {
            if !merged.output.exists() {
                fs::create_dir_all(&merged.output)?;
            }

            let atlases: Vec<LoadedAtlas> = merged
                .input
                .par_iter()
                .map(|path| LoadedAtlas::open_with(path, &parser))
                .collect::<Result<_, _>>()?;

            let options = ExtractOptions {
                untrim: merged.untrim,
                keep_rotation: merged.keep_rotation,
                compress: merged.compress,
            };

            for atlas in &atlases {
                let base_name = atlas_base_name(&atlas.source);
                let dir = if atlases.len() > 1 {
                    merged.output.join(&base_name)
                } else {
                    merged.output.clone()
                };

                let count = extract_frames(atlas, &dir, options)
                    .with_context(|| format!("failed to extract {}", atlas.source.display()))?;
                info!("Extracted {} frames from {}", count, atlas.source.display());

                if args.metadata {
                    fs::create_dir_all(&dir)?;
                    write_json(atlas, &dir, &base_name)?;
                    info!("Generated {}.json", base_name);
                }
            }
        }
    }

    info!("Done!");

    Ok(())
}

/// Parse every descriptor in parallel, keeping input order
fn parse_all(inputs: &[PathBuf], parser: &AtlasParser) -> Result<Vec<(PathBuf, AtlasInfo)>> {
    let atlases = inputs
        .par_iter()
        .map(|path| load_atlas_with(path, parser).map(|info| (path.clone(), info)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(atlases)
}

#[allow(clippy::print_stdout)]
fn report_inspect(atlases: &[(PathBuf, AtlasInfo)], json: bool) -> Result<()> {
    if json {
        println!("{}", atlases_to_json(atlases)?);
        return Ok(());
    }

    for (path, info) in atlases {
        println!("{}", path.display());
        println!(
            "  image: {}  size: {}x{}  scale: {}",
            info.image_path, info.size.w, info.size.h, info.scale
        );
        for frame in &info.frames {
            let b = frame.bounds;
            let mut line = format!("  {:<24} {},{} {}x{}", frame.name, b.x, b.y, b.w, b.h);
            if frame.rotate == Some(90.0) {
                line.push_str("  rotated");
            }
            if let Some(o) = frame.offsets {
                line.push_str(&format!("  offsets {},{} {}x{}", o.x, o.y, o.w, o.h));
            }
            println!("{}", line);
        }
        println!("  {} frames", info.frames.len());
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn report_groups(atlases: &[(PathBuf, AtlasInfo)], json: bool) -> Result<()> {
    if json {
        println!("{}", groups_to_json(atlases)?);
        return Ok(());
    }

    for (path, info) in atlases {
        let groups = group_frames_by_prefix(&info.frames);
        println!("{}", path.display());
        for (prefix, names) in groups.iter() {
            println!("  {} ({}): {}", prefix, names.len(), names.join(", "));
        }
    }
    Ok(())
}

fn atlas_base_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("atlas")
        .to_string()
}

/// Drop repeated CLI inputs so no atlas is opened or extracted twice
fn dedupe_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .filter(|path| seen.insert(path.as_path()))
        .cloned()
        .collect()
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    image_extensions: Vec<String>,
    untrim: bool,
    keep_rotation: bool,
    compress: Option<CompressionLevel>,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(command: &Command) -> Result<MergedConfig> {
    let args: &CommonArgs = command.common();

    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine input files: CLI args override config
    let input = if !args.input.is_empty() {
        dedupe_inputs(&args.input)
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        Vec::new()
    };

    // Image extensions: config list (or defaults) plus any given on the CLI
    let mut image_extensions = loaded_config
        .as_ref()
        .map(|lc| lc.config.image_extensions.clone())
        .unwrap_or_else(|| {
            DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect()
        });
    image_extensions.extend(args.image_extensions.iter().cloned());

    let extract = match command {
        Command::Extract(extract) => Some(extract),
        _ => None,
    };

    // Determine output directory: CLI > config > default
    let output = extract
        .and_then(|e| e.output.clone())
        .unwrap_or_else(|| {
            loaded_config
                .as_ref()
                .map(|lc| lc.resolve_output_dir())
                .unwrap_or_else(|| PathBuf::from("."))
        });

    // Boolean flags: CLI presence sets them to true, otherwise use config
    let untrim = extract.is_some_and(|e| e.untrim)
        || loaded_config.as_ref().is_some_and(|lc| lc.config.untrim);

    let keep_rotation = extract.is_some_and(|e| e.keep_rotation)
        || loaded_config.as_ref().is_some_and(|lc| lc.config.keep_rotation);

    if untrim && keep_rotation {
        anyhow::bail!("untrim and keep_rotation cannot both be set");
    }

    // Compress: CLI option overrides config
    let compress = if let Some(level) = extract.and_then(|e| e.compress) {
        Some(level)
    } else if let Some(ref lc) = loaded_config {
        match &lc.config.compress {
            Some(CompressConfig::Level(n)) if *n <= 6 => Some(CompressionLevel::Level(*n)),
            Some(CompressConfig::Max(s)) if s.eq_ignore_ascii_case("max") => {
                Some(CompressionLevel::Max)
            }
            Some(other) => {
                anyhow::bail!(
                    "invalid compress value {:?} in config file. Valid values: 0-6, \"max\"",
                    other
                )
            }
            None => None,
        }
    } else {
        None
    };

    // Verbose is CLI-only
    let verbose = args.verbose;

    Ok(MergedConfig {
        input,
        output,
        image_extensions,
        untrim,
        keep_rotation,
        compress,
        verbose,
    })
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use super::types::OnigiriConfig;

/// An onigiri config together with the directory its relative paths start from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: OnigiriConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: OnigiriConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Atlas descriptors named by the config's `input` entries.
    ///
    /// Each descriptor appears once, at its first mention, even when a plain
    /// path and a glob (or two globs) both name it. Glob matches that are not
    /// files are skipped, and a glob with no matching descriptor is reported.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut atlases = Vec::new();

        for entry in &self.config.input {
            let candidates = if is_glob_pattern(entry) {
                let matches = self.expand_glob(entry)?;
                if matches.is_empty() {
                    warn!(
                        "Pattern '{}' matched no atlas descriptors under {}",
                        entry,
                        self.config_dir.display()
                    );
                }
                matches
            } else {
                vec![self.config_dir.join(entry)]
            };

            for path in candidates {
                if seen.insert(path.clone()) {
                    atlases.push(path);
                } else {
                    debug!("Ignoring repeated atlas input {}", path.display());
                }
            }
        }

        Ok(atlases)
    }

    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = self.config_dir.join(pattern);
        let paths = glob::glob(&full_pattern.to_string_lossy())
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;

        let mut files = Vec::new();
        for path in paths {
            let path = path.with_context(|| format!("failed to read glob entry: {}", pattern))?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Where extracted frames go, relative to the config file
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

fn is_glob_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("onigiri-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("atlases")).unwrap();
        dir
    }

    fn loaded(dir: &Path, input: &[&str]) -> LoadedConfig {
        LoadedConfig {
            config: OnigiriConfig {
                input: input.iter().map(|s| (*s).to_string()).collect(),
                ..Default::default()
            },
            config_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.atlas"));
        assert!(is_glob_pattern("characters/**/*.atlas"));
        assert!(is_glob_pattern("hero?.atlas"));
        assert!(is_glob_pattern("hero[0-9].atlas"));
        assert!(!is_glob_pattern("hero.atlas"));
        assert!(!is_glob_pattern("characters/hero.atlas"));
    }

    #[test]
    fn test_load_and_resolve() {
        let dir = scratch_dir("config");
        std::fs::write(dir.join("atlases/a.atlas"), "").unwrap();
        std::fs::write(dir.join("atlases/b.atlas"), "").unwrap();
        std::fs::write(dir.join("atlases/notes.txt"), "").unwrap();

        let config_path = dir.join("onigiri.json");
        std::fs::write(
            &config_path,
            r#"{ "input": ["atlases/*.atlas", "extra.atlas"], "output_dir": "frames" }"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&config_path).unwrap();
        let mut inputs = loaded.resolve_inputs().unwrap();
        inputs.sort();

        assert_eq!(
            inputs,
            vec![
                dir.join("atlases/a.atlas"),
                dir.join("atlases/b.atlas"),
                dir.join("extra.atlas"),
            ]
        );
        assert_eq!(loaded.resolve_output_dir(), dir.join("frames"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_repeated_inputs_resolve_once() {
        let dir = scratch_dir("dedupe");
        std::fs::write(dir.join("atlases/a.atlas"), "").unwrap();
        std::fs::write(dir.join("atlases/b.atlas"), "").unwrap();

        let config = loaded(
            &dir,
            &["atlases/b.atlas", "atlases/*.atlas", "atlases/?.atlas", "atlases/b.atlas"],
        );

        assert_eq!(
            config.resolve_inputs().unwrap(),
            vec![dir.join("atlases/b.atlas"), dir.join("atlases/a.atlas")]
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_glob_resolves_to_nothing() {
        let dir = scratch_dir("emptyglob");
        std::fs::create_dir_all(dir.join("atlases/nested.atlas")).unwrap();

        // Only a directory matches, which is not a descriptor
        let config = loaded(&dir, &["atlases/*.atlas"]);
        assert!(config.resolve_inputs().unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = scratch_dir("badconfig");
        let config_path = dir.join("broken.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let err = LoadedConfig::load(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));

        std::fs::remove_dir_all(&dir).ok();
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::atlas::{AnimationGroups, AtlasInfo, LoadedAtlas, group_frames_by_prefix};
use crate::error::AtlasError;

#[derive(Serialize)]
struct JsonOutput<'a> {
    meta: Meta,
    atlas: &'a AtlasInfo,
    groups: &'a AnimationGroups,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

/// Render atlas metadata and animation groups as pretty JSON
pub fn atlas_to_json(info: &AtlasInfo, groups: &AnimationGroups) -> Result<String> {
    let output = JsonOutput {
        meta: Meta {
            app: "onigiri",
            version: env!("CARGO_PKG_VERSION"),
        },
        atlas: info,
        groups,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: String,
    atlas: &'a AtlasInfo,
    groups: AnimationGroups,
}

#[derive(Serialize)]
struct JsonGroupsReport {
    source: String,
    groups: AnimationGroups,
}

/// Render several parsed atlases as one JSON array, one entry per descriptor
pub fn atlases_to_json(atlases: &[(PathBuf, AtlasInfo)]) -> Result<String> {
    let reports: Vec<_> = atlases
        .iter()
        .map(|(path, info)| JsonReport {
            source: path.display().to_string(),
            atlas: info,
            groups: group_frames_by_prefix(&info.frames),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}

/// Render the animation groups of several atlases as one JSON array
pub fn groups_to_json(atlases: &[(PathBuf, AtlasInfo)]) -> Result<String> {
    let reports: Vec<_> = atlases
        .iter()
        .map(|(path, info)| JsonGroupsReport {
            source: path.display().to_string(),
            groups: group_frames_by_prefix(&info.frames),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}

/// Write `<base_name>.json` describing a loaded atlas
pub fn write_json(atlas: &LoadedAtlas, output_dir: &Path, base_name: &str) -> Result<()> {
    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = atlas_to_json(&atlas.info, &atlas.groups)?;

    fs::write(&json_path, content).map_err(|e| AtlasError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::parse_atlas_text;

    #[test]
    fn test_several_atlases_form_one_array() {
        let atlases = vec![
            (
                PathBuf::from("hero.atlas"),
                parse_atlas_text("hero.png\nidle0\nbounds:0,0,8,8\n"),
            ),
            (
                PathBuf::from("cat.atlas"),
                parse_atlas_text("cat.png\nwalk1\nbounds:0,0,8,8\nwalk0\nbounds:8,0,8,8\n"),
            ),
        ];

        let value: serde_json::Value =
            serde_json::from_str(&atlases_to_json(&atlases).unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["source"], "hero.atlas");
        assert_eq!(entries[1]["atlas"]["imagePath"], "cat.png");
        assert_eq!(entries[1]["groups"]["walk"][0], "walk0");

        let value: serde_json::Value =
            serde_json::from_str(&groups_to_json(&atlases).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["groups"]["idle"][0], "idle0");
    }

    #[test]
    fn test_json_shape() {
        let info = parse_atlas_text(
            "hero.png\nsize:64,32\nidle0\nbounds:0,0,32,32\nrotate:90\nidle1\nbounds:32,0,32,32\noffsets:1,1,34,34\n",
        );
        let groups = group_frames_by_prefix(&info.frames);

        let json = atlas_to_json(&info, &groups).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["meta"]["app"], "onigiri");
        assert_eq!(value["atlas"]["imagePath"], "hero.png");
        assert_eq!(value["atlas"]["size"]["w"], 64.0);
        assert_eq!(value["atlas"]["scale"], 1.0);
        assert_eq!(value["atlas"]["frames"][0]["rotate"], 90.0);
        assert!(value["atlas"]["frames"][0].get("offsets").is_none());
        assert_eq!(value["atlas"]["frames"][1]["offsets"]["w"], 34.0);
        assert_eq!(value["groups"]["idle"][1], "idle1");
    }
}

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::FrameRecord;

/// Animation sequences keyed by frame-name prefix.
///
/// Groups iterate in order of first appearance. Members are sorted as
/// strings, so `walk10` comes before `walk2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationGroups {
    groups: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl AnimationGroups {
    /// Ordered member names of a group
    pub fn get(&self, prefix: &str) -> Option<&[String]> {
        self.index
            .get(prefix)
            .map(|&i| self.groups[i].1.as_slice())
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.index.contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(prefix, _)| prefix.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(prefix, names)| (prefix.as_str(), names.as_slice()))
    }

    fn push(&mut self, prefix: &str, name: &str) {
        let slot = match self.index.get(prefix) {
            Some(&i) => i,
            None => {
                self.index.insert(prefix.to_string(), self.groups.len());
                self.groups.push((prefix.to_string(), Vec::new()));
                self.groups.len() - 1
            }
        };
        self.groups[slot].1.push(name.to_string());
    }
}

impl Serialize for AnimationGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (prefix, names) in &self.groups {
            map.serialize_entry(prefix, names)?;
        }
        map.end()
    }
}

/// Group frames into animation sequences by stripping trailing digits
pub fn group_frames_by_prefix(frames: &[FrameRecord]) -> AnimationGroups {
    let mut groups = AnimationGroups::default();

    for frame in frames {
        let prefix = frame_prefix(&frame.name).unwrap_or(frame.name.as_str());
        groups.push(prefix, &frame.name);
    }

    for (_, names) in &mut groups.groups {
        names.sort();
    }

    groups
}

/// Name with its trailing digit run removed.
///
/// `None` when there are no trailing digits. The prefix always keeps at least
/// one character, so `"123"` yields `"1"`.
pub fn frame_prefix(name: &str) -> Option<&str> {
    let digits = name
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let split = (name.len() - digits).max(1);
    if split >= name.len() {
        return None;
    }
    Some(&name[..split])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Rect;

    fn frames(names: &[&str]) -> Vec<FrameRecord> {
        names
            .iter()
            .map(|name| FrameRecord {
                name: (*name).to_string(),
                bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
                offsets: None,
                rotate: None,
            })
            .collect()
    }

    #[test]
    fn test_lexicographic_member_order() {
        let groups = group_frames_by_prefix(&frames(&["walk1", "walk2", "walk10"]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("walk").unwrap(), ["walk1", "walk10", "walk2"]);
    }

    #[test]
    fn test_singleton_without_digits() {
        let groups = group_frames_by_prefix(&frames(&["blink"]));
        assert_eq!(groups.get("blink").unwrap(), ["blink"]);
    }

    #[test]
    fn test_group_order_is_first_appearance() {
        let groups = group_frames_by_prefix(&frames(&[
            "talk0", "idle1", "talk1", "blink", "idle0",
        ]));

        let prefixes: Vec<_> = groups.prefixes().collect();
        assert_eq!(prefixes, ["talk", "idle", "blink"]);
        assert_eq!(groups.get("idle").unwrap(), ["idle0", "idle1"]);
    }

    #[test]
    fn test_unknown_group_is_absent() {
        let groups = group_frames_by_prefix(&frames(&["idle0"]));
        assert!(groups.get("wave").is_none());
        assert!(!groups.contains("wave"));
    }

    #[test]
    fn test_independent_of_input_order() {
        let a = group_frames_by_prefix(&frames(&["idle2", "idle0", "idle1"]));
        let b = group_frames_by_prefix(&frames(&["idle1", "idle2", "idle0"]));
        assert_eq!(a.get("idle"), b.get("idle"));
    }

    #[test]
    fn test_singleton_shares_key_with_prefix_group() {
        // "idle" is both a bare name and the prefix of "idle0"
        let groups = group_frames_by_prefix(&frames(&["idle", "idle0"]));
        assert_eq!(groups.get("idle").unwrap(), ["idle", "idle0"]);
    }

    #[test]
    fn test_frame_prefix() {
        assert_eq!(frame_prefix("walk10"), Some("walk"));
        assert_eq!(frame_prefix("happy_03"), Some("happy_"));
        assert_eq!(frame_prefix("blink"), None);
        assert_eq!(frame_prefix("a1b"), None);
        assert_eq!(frame_prefix("123"), Some("1"));
        assert_eq!(frame_prefix("7"), None);
        assert_eq!(frame_prefix(""), None);
    }

    #[test]
    fn test_serializes_in_group_order() {
        let groups = group_frames_by_prefix(&frames(&["wave1", "idle0", "wave0"]));
        let json = serde_json::to_string(&groups).unwrap();
        assert_eq!(json, r#"{"wave":["wave0","wave1"],"idle":["idle0"]}"#);
    }
}

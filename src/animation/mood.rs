use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::atlas::AnimationGroups;

/// Named animations the character can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationName {
    #[default]
    Idle,
    Talking,
    Thinking,
    Happy,
    Sad,
    Surprised,
    Waving,
}

impl AnimationName {
    pub const ALL: [AnimationName; 7] = [
        AnimationName::Idle,
        AnimationName::Talking,
        AnimationName::Thinking,
        AnimationName::Happy,
        AnimationName::Sad,
        AnimationName::Surprised,
        AnimationName::Waving,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnimationName::Idle => "idle",
            AnimationName::Talking => "talking",
            AnimationName::Thinking => "thinking",
            AnimationName::Happy => "happy",
            AnimationName::Sad => "sad",
            AnimationName::Surprised => "surprised",
            AnimationName::Waving => "waving",
        }
    }
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationName::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown animation: {}", s))
    }
}

/// Where the character is in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterState {
    #[default]
    Idle,
    Speaking,
    Listening,
    Thinking,
}

impl CharacterState {
    /// Animation shown when entering this state
    pub fn default_animation(self) -> AnimationName {
        match self {
            CharacterState::Speaking => AnimationName::Talking,
            CharacterState::Thinking => AnimationName::Thinking,
            CharacterState::Listening | CharacterState::Idle => AnimationName::Idle,
        }
    }
}

/// Pick an emotion for a reply from keywords in its text.
///
/// Rules are checked in order and the first match wins. Matching is on
/// substrings, so "this" counts as a greeting.
pub fn animation_for_message(content: &str) -> AnimationName {
    let lower = content.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["hello", "hi"]) {
        AnimationName::Waving
    } else if has(&["?"]) {
        AnimationName::Thinking
    } else if has(&["!", "great", "awesome"]) {
        AnimationName::Happy
    } else if has(&["sad", "sorry"]) {
        AnimationName::Sad
    } else if has(&["wow", "amazing"]) {
        AnimationName::Surprised
    } else {
        AnimationName::Talking
    }
}

/// Frames for an animation, falling back to the idle group
pub fn resolve_animation(groups: &AnimationGroups, animation: AnimationName) -> Option<&[String]> {
    groups
        .get(animation.as_str())
        .or_else(|| groups.get(AnimationName::Idle.as_str()))
}

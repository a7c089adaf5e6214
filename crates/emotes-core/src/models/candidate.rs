use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog grouping attached to every candidate.
///
/// Parsing is case-insensitive; anything unrecognised lands in [`EmoteCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmoteCategory {
    Gesture,
    Dance,
    Funny,
    Action,
    Pose,
    Emotion,
    Other,
}

impl EmoteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmoteCategory::Gesture => "Gesture",
            EmoteCategory::Dance => "Dance",
            EmoteCategory::Funny => "Funny",
            EmoteCategory::Action => "Action",
            EmoteCategory::Pose => "Pose",
            EmoteCategory::Emotion => "Emotion",
            EmoteCategory::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "gesture" => EmoteCategory::Gesture,
            "dance" => EmoteCategory::Dance,
            "funny" => EmoteCategory::Funny,
            "action" => EmoteCategory::Action,
            "pose" => EmoteCategory::Pose,
            "emotion" => EmoteCategory::Emotion,
            _ => EmoteCategory::Other,
        }
    }

    /// Case-insensitive exact match against a client-supplied category name.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for EmoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known identifier that may or may not currently be a purchasable emote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub id: String,
    pub name: String,
    pub category: EmoteCategory,
}

impl CandidateEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: EmoteCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
        }
    }
}

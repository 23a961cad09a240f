//! Commit message style preferences.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Register and word choice of the generated message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    #[default]
    Casual,
    Friendly,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Professional, Tone::Casual, Tone::Friendly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
        }
    }

    /// Short human description, used by the configuration editor.
    pub fn description(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional - formal and matter-of-fact",
            Tone::Casual => "Casual - light but clear",
            Tone::Friendly => "Friendly - warm and approachable",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structure of the generated message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    /// Subject line only.
    #[default]
    Short,
    /// Subject plus 1-4 bullets.
    Normal,
    /// Subject plus 2-6 bullets.
    Long,
}

impl Length {
    pub const ALL: [Length; 3] = [Length::Short, Length::Normal, Length::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            Length::Short => "short",
            Length::Normal => "normal",
            Length::Long => "long",
        }
    }

    /// Inclusive range of body bullets, `None` when no body is wanted.
    pub fn bullet_range(&self) -> Option<(u8, u8)> {
        match self {
            Length::Short => None,
            Length::Normal => Some((1, 4)),
            Length::Long => Some((2, 6)),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Length::Short => "Short - subject only (no body)",
            Length::Normal => "Normal - subject + optional body (1-4 bullets)",
            Length::Long => "Long - subject + detailed body (2-6 bullets)",
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User style preferences. Always fully populated: fields missing on disk
/// take their individual defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub use_emoji: bool,
    pub use_conventional: bool,
    pub tone: Tone,
    pub length: Length,
}

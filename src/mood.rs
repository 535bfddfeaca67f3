//! Mood vocabulary shared by journal entries and session records.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color shown for moods that are missing or not recognized.
pub const NEUTRAL_COLOR: &str = "#9CA3AF";

/// Highest value returned by [`Mood::score`].
pub const MAX_MOOD_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Calm,
    Neutral,
    Sad,
    Anxious,
    Angry,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Neutral,
        Mood::Sad,
        Mood::Anxious,
        Mood::Angry,
    ];

    /// Wellness score on a 1..=5 scale.
    pub fn score(self) -> u8 {
        match self {
            Mood::Happy => 5,
            Mood::Calm => 4,
            Mood::Neutral => 3,
            Mood::Sad | Mood::Anxious => 2,
            Mood::Angry => 1,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Mood::Happy => "#FACC15",
            Mood::Calm => "#34D399",
            Mood::Neutral => NEUTRAL_COLOR,
            Mood::Sad => "#60A5FA",
            Mood::Anxious => "#A78BFA",
            Mood::Angry => "#F87171",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
            Mood::Anxious => "anxious",
            Mood::Angry => "angry",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == normalized)
            .ok_or_else(|| anyhow!("unknown mood {raw:?}"))
    }
}

/// Color for an optional mood, falling back to the neutral swatch.
pub fn color_for(mood: Option<Mood>) -> &'static str {
    mood.map(Mood::color).unwrap_or(NEUTRAL_COLOR)
}

/// Accept any stored mood value; unrecognized strings read back as no mood.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Mood>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| text.parse().ok()))
}

//! Localized time-of-day greetings.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display language selected by the user.
///
/// Stored as its two-letter code; unknown codes read back as English.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    Pt,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Pt,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Pt => "pt",
        }
    }

    /// Resolve a language code such as `es` or `pt-BR`.
    pub fn from_code(raw: &str) -> Language {
        let primary = raw
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|language| language.code() == primary)
            .unwrap_or_default()
    }
}

impl From<String> for Language {
    fn from(raw: String) -> Self {
        Language::from_code(&raw)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket a 24-hour clock hour.
    pub fn from_hour(hour: u32) -> TimeOfDay {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }
}

pub fn greeting(language: Language, time: TimeOfDay) -> &'static str {
    use TimeOfDay::*;
    match (language, time) {
        (Language::En, Morning) => "Good morning",
        (Language::En, Afternoon) => "Good afternoon",
        (Language::En, Evening) => "Good evening",
        (Language::En, Night) => "Good night",
        (Language::Es, Morning) => "Buenos días",
        (Language::Es, Afternoon | Evening) => "Buenas tardes",
        (Language::Es, Night) => "Buenas noches",
        (Language::Fr, Morning) => "Bonjour",
        (Language::Fr, Afternoon) => "Bon après-midi",
        (Language::Fr, Evening) => "Bonsoir",
        (Language::Fr, Night) => "Bonne nuit",
        (Language::De, Morning) => "Guten Morgen",
        (Language::De, Afternoon) => "Guten Tag",
        (Language::De, Evening) => "Guten Abend",
        (Language::De, Night) => "Gute Nacht",
        (Language::Pt, Morning) => "Bom dia",
        (Language::Pt, Afternoon) => "Boa tarde",
        (Language::Pt, Evening | Night) => "Boa noite",
    }
}

pub fn greeting_for_hour(language: Language, hour: u32) -> &'static str {
    greeting(language, TimeOfDay::from_hour(hour))
}

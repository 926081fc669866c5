//! Display languages.
//!
//! The language list is agreed with the server out of band. On the wire a
//! language is its ISO 639-1 code; parsing also accepts the English name so
//! that older clients sending `"spanish"` still decode.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;

/// Display language of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Language {
    /// English (`en`)
    English,
    /// Spanish (`es`)
    Spanish,
    /// French (`fr`)
    French,
    /// German (`de`)
    German,
    /// Italian (`it`)
    Italian,
    /// Portuguese (`pt`)
    Portuguese,
    /// Chinese (`zh`)
    Chinese,
    /// Japanese (`ja`)
    Japanese,
    /// Korean (`ko`)
    Korean,
    /// Russian (`ru`)
    Russian,
    /// Arabic (`ar`)
    Arabic,
    /// Hindi (`hi`)
    Hindi,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Self; 12] = [
        Self::English,
        Self::Spanish,
        Self::French,
        Self::German,
        Self::Italian,
        Self::Portuguese,
        Self::Chinese,
        Self::Japanese,
        Self::Korean,
        Self::Russian,
        Self::Arabic,
        Self::Hindi,
    ];

    /// ISO 639-1 code used on the wire.
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Italian => "it",
            Self::Portuguese => "pt",
            Self::Chinese => "zh",
            Self::Japanese => "ja",
            Self::Korean => "ko",
            Self::Russian => "ru",
            Self::Arabic => "ar",
            Self::Hindi => "hi",
        }
    }

    /// English name, used for display.
    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Italian => "Italian",
            Self::Portuguese => "Portuguese",
            Self::Chinese => "Chinese",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::Russian => "Russian",
            Self::Arabic => "Arabic",
            Self::Hindi => "Hindi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(tag) || lang.name().eq_ignore_ascii_case(tag)
            })
            .ok_or_else(|| ProtocolError::UnknownLanguage(tag.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for &'static str {
    fn from(lang: Language) -> Self {
        lang.code()
    }
}

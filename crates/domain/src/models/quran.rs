//! Quran reference data: verse coordinates, hizb boundaries and verse text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// A verse coordinate, written `surah:ayah` (e.g. `2:255`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerseKey {
    pub surah: i32,
    pub ayah: i32,
}

impl VerseKey {
    pub fn new(surah: i32, ayah: i32) -> Self {
        Self { surah, ayah }
    }
}

impl FromStr for VerseKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid verse key: {}", s);
        let (surah, ayah) = s.split_once(':').ok_or_else(invalid)?;
        let surah: i32 = surah.trim().parse().map_err(|_| invalid())?;
        let ayah: i32 = ayah.trim().parse().map_err(|_| invalid())?;
        if surah <= 0 || ayah <= 0 {
            return Err(invalid());
        }
        Ok(Self { surah, ayah })
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

/// Boundaries of one hizb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HizbIndexEntry {
    pub hizb: i32,
    pub start_surah: i32,
    pub start_ayah: i32,
    pub end_surah: i32,
    pub end_ayah: i32,
}

impl HizbIndexEntry {
    pub fn new(hizb: i32, start: VerseKey, end: VerseKey) -> Self {
        Self {
            hizb,
            start_surah: start.surah,
            start_ayah: start.ayah,
            end_surah: end.surah,
            end_ayah: end.ayah,
        }
    }

    pub fn start(&self) -> VerseKey {
        VerseKey::new(self.start_surah, self.start_ayah)
    }

    pub fn end(&self) -> VerseKey {
        VerseKey::new(self.end_surah, self.end_ayah)
    }
}

/// Arabic text of a single verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QuranAyah {
    pub surah: i32,
    pub ayah: i32,
    pub text_ar: String,
}

impl QuranAyah {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.surah, self.ayah)
    }
}

/// Query for the text of a participant's portion.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_reading_query"))]
pub struct ReadingQuery {
    #[validate(range(min = 1, max = 60, message = "Plage de hizb invalide."))]
    pub start_hizb: i32,

    #[validate(range(min = 1, max = 60, message = "Plage de hizb invalide."))]
    pub end_hizb: i32,
}

fn validate_reading_query(query: &ReadingQuery) -> Result<(), ValidationError> {
    if query.start_hizb > query.end_hizb {
        let mut err = ValidationError::new("hizb_range");
        err.message = Some("Plage de hizb invalide.".into());
        return Err(err);
    }
    Ok(())
}

/// Verses covering a range of hizb.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReadingPassage {
    pub start_hizb: i32,
    pub end_hizb: i32,
    pub from: VerseKey,
    pub to: VerseKey,
    pub ayahs: Vec<QuranAyah>,
}

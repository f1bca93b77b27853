//! Reference data entities (hizb_index and quran_ayahs tables).

use domain::models::{HizbIndexEntry, QuranAyah};
use sqlx::FromRow;

/// Database row mapping for the hizb_index table.
#[derive(Debug, Clone, FromRow)]
pub struct HizbIndexEntity {
    pub hizb: i32,
    pub start_surah: i32,
    pub start_ayah: i32,
    pub end_surah: i32,
    pub end_ayah: i32,
}

impl From<HizbIndexEntity> for HizbIndexEntry {
    fn from(entity: HizbIndexEntity) -> Self {
        Self {
            hizb: entity.hizb,
            start_surah: entity.start_surah,
            start_ayah: entity.start_ayah,
            end_surah: entity.end_surah,
            end_ayah: entity.end_ayah,
        }
    }
}

/// Database row mapping for the quran_ayahs table.
#[derive(Debug, Clone, FromRow)]
pub struct QuranAyahEntity {
    pub surah: i32,
    pub ayah: i32,
    pub text_ar: String,
}

impl From<QuranAyahEntity> for QuranAyah {
    fn from(entity: QuranAyahEntity) -> Self {
        Self {
            surah: entity.surah,
            ayah: entity.ayah,
            text_ar: entity.text_ar,
        }
    }
}

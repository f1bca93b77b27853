//! Domain models for Selka.

pub mod group;
pub mod participation;
pub mod quran;

pub use group::Group;
pub use participation::{GroupProgress, HizbRange, Participation};
pub use quran::{HizbIndexEntry, QuranAyah, VerseKey};

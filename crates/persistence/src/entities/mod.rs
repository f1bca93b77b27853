//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod group;
pub mod participation;
pub mod quran;

pub use group::GroupEntity;
pub use participation::ParticipationEntity;
pub use quran::{HizbIndexEntity, QuranAyahEntity};

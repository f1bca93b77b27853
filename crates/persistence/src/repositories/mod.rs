//! Repository implementations for database operations.

pub mod group;
pub mod participation;
pub mod quran;

pub use group::GroupRepository;
pub use participation::{NewParticipation, ParticipationRepository};
pub use quran::{HizbIndexRepository, QuranAyahRepository};

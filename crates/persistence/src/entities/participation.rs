//! Participation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the participations table.
///
/// `edit_token_hash` is never selected back.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipationEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub display_name: String,
    pub name_initial: String,
    pub hizb_taken: i32,
    pub start_hizb: i32,
    pub end_hizb: i32,
    pub completed: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ParticipationEntity> for domain::models::Participation {
    fn from(entity: ParticipationEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            display_name: entity.display_name,
            name_initial: entity.name_initial,
            hizb_taken: entity.hizb_taken,
            start_hizb: entity.start_hizb,
            end_hizb: entity.end_hizb,
            completed: entity.completed,
            cancelled_at: entity.cancelled_at,
            created_at: entity.created_at,
        }
    }
}

//! Participation domain models: a participant's claimed range of hizb.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Inclusive, contiguous range of hizb numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HizbRange {
    pub start: i32,
    pub end: i32,
}

impl HizbRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Number of hizb covered by the range.
    pub fn len(&self) -> i32 {
        (self.end - self.start + 1).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &HizbRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A participant's claim on a range of a group's hizb.
///
/// The edit token is deliberately absent: it is handed out once at join time
/// and only its digest is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Participation {
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

impl Participation {
    pub fn range(&self) -> HizbRange {
        HizbRange::new(self.start_hizb, self.end_hizb)
    }

    /// Cancelled participations no longer hold their range.
    pub fn is_active(&self) -> bool {
        self.cancelled_at.is_none()
    }
}

/// Request to join a group by claiming a portion.
///
/// When `start_hizb`/`end_hizb` are omitted the next free slot is assigned.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct JoinGroupRequest {
    #[validate(length(min = 1, max = 50, message = "Le nom doit contenir 1 à 50 caractères"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub display_name: String,

    #[validate(custom(function = "shared::validation::validate_name_initial"))]
    pub name_initial: String,

    #[validate(custom(function = "shared::validation::validate_hizb_portion"))]
    pub hizb_taken: i32,

    #[validate(custom(function = "shared::validation::validate_hizb_number"))]
    pub start_hizb: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_hizb_number"))]
    pub end_hizb: Option<i32>,
}

impl JoinGroupRequest {
    /// The explicitly requested range, if both bounds were given.
    pub fn requested_range(&self) -> Option<HizbRange> {
        match (self.start_hizb, self.end_hizb) {
            (Some(start), Some(end)) => Some(HizbRange::new(start, end)),
            _ => None,
        }
    }
}

/// Response after joining a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinGroupResponse {
    pub participation: Participation,
    /// Secret required for later updates. Returned only once.
    pub edit_token: String,
}

/// Query for a returning participant looking up their own claims.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct FindByNameQuery {
    #[validate(length(min = 1, max = 50, message = "Le nom doit contenir 1 à 50 caractères"))]
    pub display_name: String,

    #[validate(length(min = 1, max = 4, message = "Initiale invalide."))]
    pub name_initial: String,
}

/// A participation matched by name, without its edit capability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParticipationMatch {
    pub id: Uuid,
    pub display_name: String,
    pub name_initial: String,
    pub start_hizb: i32,
    pub end_hizb: i32,
    pub completed: bool,
}

impl From<Participation> for ParticipationMatch {
    fn from(p: Participation) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name,
            name_initial: p.name_initial,
            start_hizb: p.start_hizb,
            end_hizb: p.end_hizb,
            completed: p.completed,
        }
    }
}

/// Reading progress of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupProgress {
    pub total_hizb: i32,
    pub claimed_hizb: i32,
    pub completed_hizb: i32,
    pub remaining_hizb: i32,
    pub participant_count: usize,
}

/// Response for listing a group's active participations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListParticipationsResponse {
    pub data: Vec<Participation>,
    pub progress: GroupProgress,
}

/// Response for a name lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FindByNameResponse {
    pub data: Vec<ParticipationMatch>,
}

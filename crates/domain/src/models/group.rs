//! Group domain models for collective reading groups.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Number of hizb in a complete reading; the capacity of every group.
pub const TOTAL_HIZB: i32 = 60;

/// Length of a join code.
pub const JOIN_CODE_LENGTH: usize = 6;

/// Days a finished group stays available before it expires.
pub const FINISHED_GROUP_RETENTION_DAYS: i64 = 3;

lazy_static::lazy_static! {
    static ref JOIN_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-HJ-NP-Z2-9]{6}$").unwrap();
}

/// Represents a reading group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub total_hizb: i32,
    pub join_code: String,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Group {
    /// Returns true once the group has been marked finished.
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// Request to create a new group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Le nom doit contenir 1 à 100 caractères"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
}

/// Response after creating a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupResponse {
    pub id: Uuid,
    pub name: String,
    pub join_code: String,
    pub total_hizb: i32,
}

impl From<Group> for CreateGroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            join_code: group.join_code,
            total_hizb: group.total_hizb,
        }
    }
}

/// Generate a random join code, e.g. `K7MQ2X`.
pub fn generate_join_code() -> String {
    shared::crypto::random_code(JOIN_CODE_LENGTH)
}

/// Normalizes a join code typed by a user (surrounding spaces, lower case).
pub fn normalize_join_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Returns true if `code` has the shape of a generated join code.
pub fn is_valid_join_code(code: &str) -> bool {
    JOIN_CODE_REGEX.is_match(code)
}

/// Expiry timestamp for a group finished at `finished_at`.
pub fn expiry_after_finish(finished_at: DateTime<Utc>) -> DateTime<Utc> {
    finished_at + Duration::days(FINISHED_GROUP_RETENTION_DAYS)
}

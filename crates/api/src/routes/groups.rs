//! Reading group routes: creation, lookup by join code, and finishing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::group::{
    expiry_after_finish, generate_join_code, is_valid_join_code, normalize_join_code,
    CreateGroupRequest, CreateGroupResponse, TOTAL_HIZB,
};
use domain::models::Group;
use persistence::repositories::GroupRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{ApiError, ResultExt};
use crate::middleware::metrics::{record_group_created, record_group_finished};

const GROUP_NOT_FOUND: &str = "Groupe introuvable";

/// Create a new reading group.
///
/// POST /api/v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), ApiError> {
    request.validate()?;

    let repo = GroupRepository::new(state.pool.clone());

    let group: Group = repo
        .create_with_unique_code(request.name.trim(), TOTAL_HIZB, generate_join_code)
        .await
        .context("Impossible de créer le groupe")?
        .into();

    record_group_created();
    info!(
        group_id = %group.id,
        join_code = %group.join_code,
        "Group created"
    );

    Ok((StatusCode::CREATED, Json(group.into())))
}

/// Get a group by its join code.
///
/// GET /api/v1/groups/by-code/:code
pub async fn get_group_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let code = normalize_join_code(&code);
    if !is_valid_join_code(&code) {
        return Err(ApiError::NotFound(GROUP_NOT_FOUND.into()));
    }
    let repo = GroupRepository::new(state.pool.clone());

    let group = repo
        .find_by_code(&code)
        .await
        .context("Impossible de récupérer le groupe par code")?
        .ok_or_else(|| ApiError::NotFound(GROUP_NOT_FOUND.into()))?;

    Ok(Json(group.into()))
}

/// Mark a group finished.
///
/// POST /api/v1/groups/:group_id/finish
///
/// Finishing an already finished group returns it unchanged.
pub async fn finish_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Group>, ApiError> {
    const CONTEXT: &str = "Impossible de terminer le groupe";
    let repo = GroupRepository::new(state.pool.clone());

    let now = Utc::now();
    let finished = repo
        .finish_group(group_id, now, expiry_after_finish(now))
        .await
        .context(CONTEXT)?;

    if let Some(group) = finished {
        record_group_finished();
        info!(
            group_id = %group.id,
            expires_at = ?group.expires_at,
            "Group finished"
        );
        return Ok(Json(group.into()));
    }

    let group = repo
        .find_by_id(group_id)
        .await
        .context(CONTEXT)?
        .ok_or_else(|| ApiError::NotFound(GROUP_NOT_FOUND.into()))?;

    Ok(Json(group.into()))
}

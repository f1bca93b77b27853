//! Participation routes: joining a group, listing and looking up claims, and
//! the token-gated updates of a single participation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::participation::{
    FindByNameQuery, FindByNameResponse, JoinGroupRequest, JoinGroupResponse,
    ListParticipationsResponse, ParticipationMatch,
};
use domain::models::{Group, HizbRange, Participation};
use domain::services::{compute_next_slot, find_overlap, group_progress, validate_range, SlotError};
use persistence::repositories::{GroupRepository, NewParticipation, ParticipationRepository};
use shared::crypto::{generate_edit_token, sha256_hex};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{ApiError, ResultExt};
use crate::extractors::EditToken;
use crate::middleware::metrics::{record_participation_completed, record_participation_joined};

const PARTICIPATION_NOT_FOUND: &str = "Participation introuvable";

/// Picks the range a joiner gets in a locked group.
///
/// An explicit range is checked against the group's capacity and the active
/// claims; otherwise the first free slot of the requested size is assigned.
fn choose_range(
    group: &Group,
    active: &[Participation],
    hizb_taken: i32,
    requested: Option<HizbRange>,
) -> Result<HizbRange, ApiError> {
    if group.is_finished() {
        return Err(ApiError::Conflict("Ce groupe est terminé.".into()));
    }

    let Some(range) = requested else {
        return Ok(compute_next_slot(active, hizb_taken, group.total_hizb)?);
    };

    let range = validate_range(hizb_taken, range, group.total_hizb)?;
    if let Some(taken) = find_overlap(active, range) {
        return Err(SlotError::AlreadyTaken(taken.range()).into());
    }
    Ok(range)
}

/// List a group's active participations with its progress.
///
/// GET /api/v1/groups/:group_id/participations
pub async fn list_participations(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ListParticipationsResponse>, ApiError> {
    const CONTEXT: &str = "Impossible de lister les participations";

    let group = GroupRepository::new(state.pool.clone())
        .find_by_id(group_id)
        .await
        .context(CONTEXT)?
        .ok_or_else(|| ApiError::NotFound("Groupe introuvable".into()))?;

    let data: Vec<Participation> = ParticipationRepository::new(state.pool.clone())
        .list_active(group_id)
        .await
        .context(CONTEXT)?
        .into_iter()
        .map(Into::into)
        .collect();

    let progress = group_progress(&data, group.total_hizb);
    Ok(Json(ListParticipationsResponse { data, progress }))
}

/// Join a group by claiming one or two hizb.
///
/// POST /api/v1/groups/:group_id/participations
///
/// The edit token is returned only in this response.
pub async fn join_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(request): Json<JoinGroupRequest>,
) -> Result<(StatusCode, Json<JoinGroupResponse>), ApiError> {
    request.validate()?;
    if request.start_hizb.is_some() != request.end_hizb.is_some() {
        return Err(ApiError::Validation("Plage de hizb invalide.".into()));
    }

    let edit_token = generate_edit_token();
    let edit_token_hash = sha256_hex(&edit_token);
    let new = NewParticipation {
        display_name: request.display_name.trim(),
        name_initial: request.name_initial.trim(),
        hizb_taken: request.hizb_taken,
        edit_token_hash: &edit_token_hash,
    };
    let requested = request.requested_range();

    let participation: Participation = ParticipationRepository::new(state.pool.clone())
        .join_group(group_id, new, |group, active| {
            choose_range(&Group::from(group.clone()), active, request.hizb_taken, requested)
        })
        .await
        .context("Impossible de rejoindre le groupe")?
        .ok_or_else(|| ApiError::NotFound("Groupe introuvable".into()))?
        .into();

    record_participation_joined(participation.hizb_taken);
    info!(
        group_id = %group_id,
        participation_id = %participation.id,
        start_hizb = participation.start_hizb,
        end_hizb = participation.end_hizb,
        "Participation joined"
    );

    Ok((
        StatusCode::CREATED,
        Json(JoinGroupResponse {
            participation,
            edit_token,
        }),
    ))
}

/// Find a returning participant's claims by name.
///
/// GET /api/v1/groups/:group_id/participations/search?display_name=&name_initial=
pub async fn find_by_name(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<FindByNameQuery>,
) -> Result<Json<FindByNameResponse>, ApiError> {
    query.validate()?;

    let data = ParticipationRepository::new(state.pool.clone())
        .find_by_name(group_id, &query.display_name, &query.name_initial)
        .await
        .context("Impossible de verifier le nom")?
        .into_iter()
        .map(|entity| ParticipationMatch::from(Participation::from(entity)))
        .collect();

    Ok(Json(FindByNameResponse { data }))
}

/// Mark a participation completed.
///
/// POST /api/v1/participations/:id/complete
pub async fn complete_participation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    token: EditToken,
) -> Result<Json<Participation>, ApiError> {
    let participation: Participation = ParticipationRepository::new(state.pool.clone())
        .mark_completed(id, &token.hash)
        .await
        .context("Impossible de marquer la participation terminée")?
        .ok_or_else(|| ApiError::NotFound(PARTICIPATION_NOT_FOUND.into()))?
        .into();

    record_participation_completed();
    info!(participation_id = %id, "Participation completed");

    Ok(Json(participation))
}

/// Cancel a participation, releasing its range.
///
/// POST /api/v1/participations/:id/cancel
pub async fn cancel_participation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    token: EditToken,
) -> Result<Json<Participation>, ApiError> {
    let participation: Participation = ParticipationRepository::new(state.pool.clone())
        .cancel(id, &token.hash, Utc::now())
        .await
        .context("Impossible d'annuler la participation")?
        .ok_or_else(|| ApiError::NotFound(PARTICIPATION_NOT_FOUND.into()))?
        .into();

    info!(participation_id = %id, "Participation cancelled");

    Ok(Json(participation))
}

/// Permanently delete a participation.
///
/// DELETE /api/v1/participations/:id
pub async fn delete_participation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    token: EditToken,
) -> Result<Json<Participation>, ApiError> {
    let participation: Participation = ParticipationRepository::new(state.pool.clone())
        .delete(id, &token.hash)
        .await
        .context("Impossible de supprimer la participation")?
        .ok_or_else(|| ApiError::NotFound(PARTICIPATION_NOT_FOUND.into()))?
        .into();

    info!(
        participation_id = %id,
        group_id = %participation.group_id,
        "Participation deleted"
    );

    Ok(Json(participation))
}

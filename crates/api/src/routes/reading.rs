//! Reading passage route: the verses of a range of hizb.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::quran::{ReadingPassage, ReadingQuery};
use domain::models::{HizbIndexEntry, QuranAyah};
use persistence::repositories::{HizbIndexRepository, QuranAyahRepository};
use validator::Validate;

use crate::app::AppState;
use crate::error::{ApiError, ResultExt};

/// Get the text of a range of hizb.
///
/// GET /api/v1/reading?start_hizb=&end_hizb=
pub async fn get_reading(
    State(state): State<AppState>,
    Query(query): Query<ReadingQuery>,
) -> Result<Json<ReadingPassage>, ApiError> {
    query.validate()?;

    const CONTEXT: &str = "Impossible de charger le texte";

    let index: Vec<HizbIndexEntry> = HizbIndexRepository::new(state.pool.clone())
        .find_range(query.start_hizb, query.end_hizb)
        .await
        .context(CONTEXT)?
        .into_iter()
        .map(Into::into)
        .collect();

    let expected = (query.end_hizb - query.start_hizb + 1) as usize;
    let (Some(first), Some(last)) = (index.first(), index.last()) else {
        return Err(ApiError::NotFound("Index des hizb introuvable".into()));
    };
    if index.len() != expected {
        return Err(ApiError::NotFound("Index des hizb incomplet".into()));
    }

    let (from, to) = (first.start(), last.end());
    let ayahs: Vec<QuranAyah> = QuranAyahRepository::new(state.pool.clone())
        .find_between(from, to)
        .await
        .context(CONTEXT)?
        .into_iter()
        .map(Into::into)
        .collect();

    if ayahs.is_empty() {
        return Err(ApiError::NotFound("Texte introuvable".into()));
    }

    tracing::debug!(
        start_hizb = query.start_hizb,
        end_hizb = query.end_hizb,
        ayah_count = ayahs.len(),
        "Reading passage loaded"
    );

    Ok(Json(ReadingPassage {
        start_hizb: query.start_hizb,
        end_hizb: query.end_hizb,
        from,
        to,
        ayahs,
    }))
}

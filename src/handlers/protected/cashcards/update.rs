use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::CashCardPayload;
use crate::error::ApiError;

/// PUT /cashcards/:id - replace the amount of a card the caller owns
///
/// Lookup and save are separate store calls; concurrent updates are last write wins.
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(payload): Json<CashCardPayload>,
) -> Result<StatusCode, ApiError> {
    let existing = state
        .repository
        .find_by_id_and_owner(id, &principal.name)
        .await?
        .ok_or_else(ApiError::not_found)?;

    state.repository.upsert(existing.with_amount(payload.amount)).await?;
    tracing::info!("Updated cash card {} for {}", id, principal.name);

    Ok(StatusCode::NO_CONTENT)
}

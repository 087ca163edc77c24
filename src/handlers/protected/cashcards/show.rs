use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::CashCard;
use crate::error::ApiError;

/// GET /cashcards/:id - a single card, if the caller owns it
pub async fn show(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<CashCard>, ApiError> {
    state
        .repository
        .find_by_id_and_owner(id, &principal.name)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

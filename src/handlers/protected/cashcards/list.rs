use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::CashCard;
use crate::error::ApiError;
use crate::paging::PageRequest;

/// GET /cashcards?page=&size=&sort= - one page of the caller's cards
///
/// A page index past the last card yields an empty array, not an error.
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<CashCard>>, ApiError> {
    let page = PageRequest::from_query(&params, &state.config.paging)?;
    tracing::debug!("Listing cash cards for {} with {:?}", principal.name, page);

    let cards = state.repository.find_page_by_owner(&principal.name, &page).await?;
    Ok(Json(cards))
}

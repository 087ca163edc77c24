use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::{CashCard, CashCardPayload};
use crate::error::ApiError;

use super::COLLECTION_PATH;

/// POST /cashcards - store a new card owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
    Json(payload): Json<CashCardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // id and owner from the body are never trusted
    let card = CashCard::new(payload.amount, principal.name.as_str());
    let saved = state.repository.insert(card).await?;

    let id = saved
        .id
        .ok_or_else(|| ApiError::internal_server_error("Store returned a card without an id"))?;
    tracing::info!("Created cash card {} for {}", id, principal.name);

    Ok((StatusCode::CREATED, [(header::LOCATION, location_of(&headers, id))]))
}

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Absolute URI of a card when the request named its host, else the path alone.
/// Behind a TLS-terminating proxy the scheme comes from `X-Forwarded-Proto`.
pub(crate) fn location_of(headers: &HeaderMap, id: i64) -> String {
    let path = format!("{}/{}", COLLECTION_PATH, id);
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) if !host.is_empty() => format!("{}://{}{}", scheme_of(headers), host, path),
        _ => path,
    }
}

/// First hop of `X-Forwarded-Proto` if it is http or https, otherwise http
fn scheme_of(headers: &HeaderMap) -> &'static str {
    let forwarded = headers
        .get(FORWARDED_PROTO)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);

    match forwarded {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    }
}

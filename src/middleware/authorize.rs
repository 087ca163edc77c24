use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{Principal, Role};
use crate::error::ApiError;

use super::is_protected_path;

/// Role gate for `/cashcards/**`. Runs after `basic_auth_middleware`
/// and turns away principals without the card owner role before any lookup.
pub async fn require_card_owner(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_protected_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let principal = request.extensions().get::<Principal>().ok_or_else(|| {
        ApiError::unauthorized(
            state.config.security.realm.clone(),
            "Authentication required before role check",
        )
    })?;

    if !principal.has_role(Role::CardOwner) {
        tracing::warn!(
            "User '{}' lacks role {} for {}",
            principal.name,
            Role::CardOwner,
            request.uri().path()
        );
        return Err(ApiError::forbidden(format!("User '{}' may not access cash cards", principal.name)));
    }

    Ok(next.run(request).await)
}

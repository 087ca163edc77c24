use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::app::AppState;
use crate::auth::AuthError;
use crate::error::ApiError;

use super::is_protected_path;

/// HTTP Basic authentication middleware that verifies credentials and injects
/// the resulting `Principal` into the request. Paths outside `/cashcards/**`
/// pass through untouched.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_protected_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let realm = &state.config.security.realm;

    let (username, password) = extract_basic_credentials(request.headers()).map_err(|e| {
        tracing::debug!("Rejected request to {}: {}", request.uri().path(), e);
        ApiError::unauthorized(realm.clone(), e.to_string())
    })?;

    let principal = state
        .users
        .authenticate(&username, &password)
        .await
        .map_err(|e| match e {
            AuthError::BadCredentials | AuthError::MalformedHeader(_) => {
                tracing::warn!("Authentication failed for user '{}'", username);
                ApiError::unauthorized(realm.clone(), e.to_string())
            }
            other => {
                tracing::error!("Credential check failed for user '{}': {}", username, other);
                ApiError::internal_server_error("Unable to verify credentials")
            }
        })?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract a username/password pair from a Basic Authorization header
pub fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MalformedHeader("missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("header is not valid ASCII"))?;

    let (scheme, encoded) = auth_str
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader("expected 'Basic <credentials>'"))?;

    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MalformedHeader("Authorization header must use Basic scheme"));
    }

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedHeader("credentials are not valid base64"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::MalformedHeader("credentials are not valid UTF-8"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedHeader("credentials must be 'user:password'"))?;

    if username.is_empty() {
        return Err(AuthError::MalformedHeader("empty username"));
    }

    Ok((username.to_string(), password.to_string()))
}

use crate::error::ApiError;

/// Anything no route claims. Runs behind the auth layers, so unknown paths
/// under `/cashcards` are still authenticated first.
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

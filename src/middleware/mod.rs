pub mod auth;
pub mod authorize;

pub use auth::basic_auth_middleware;
pub use authorize::require_card_owner;

use crate::handlers::protected::cashcards::COLLECTION_PATH;

/// True for the collection root and anything below it, routed or not
pub fn is_protected_path(path: &str) -> bool {
    match path.strip_prefix(COLLECTION_PATH) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

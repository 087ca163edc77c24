use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::UserStore;
use crate::config::AppConfig;
use crate::database::{CashCardRepository, DatabaseManager};
use crate::handlers::{protected::cashcards, public};
use crate::middleware::{basic_auth_middleware, require_card_owner};

/// Shared, cheaply clonable handles every request needs
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn CashCardRepository>,
    pub users: Arc<UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repository: Arc<dyn CashCardRepository>, users: UserStore, config: AppConfig) -> Self {
        Self {
            repository,
            users: Arc::new(users),
            config: Arc::new(config),
        }
    }

    /// Open the configured store and hash the built-in credentials
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let repository = DatabaseManager::open(&config.database).await?;
        let users = UserStore::with_demo_users(config.security.bcrypt_cost)?;
        Ok(Self::new(repository, users, config))
    }
}

pub fn app(state: AppState) -> Router {
    let cors = if state.config.security.enable_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Public
        .route("/health", get(public::health))
        // Protected
        .merge(cashcard_routes())
        .fallback(public::not_found)
        // Applied app-wide so unrouted `/cashcards/**` paths are gated too.
        // Layers run bottom-up: authenticate first, then check the role.
        .layer(from_fn_with_state(state.clone(), require_card_owner))
        .layer(from_fn_with_state(state.clone(), basic_auth_middleware))
        .with_state(state)
        // Global middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

fn cashcard_routes() -> Router<AppState> {
    Router::new()
        .route(
            cashcards::COLLECTION_PATH,
            get(cashcards::list).post(cashcards::create),
        )
        .route(
            "/cashcards/:id",
            get(cashcards::show).put(cashcards::update),
        )
}

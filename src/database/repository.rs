use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::CashCard;
use crate::paging::PageRequest;

/// Errors from a cash card store
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Card already has id {0}")]
    IdAlreadyAssigned(i64),

    #[error("Card has no id")]
    MissingId,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owner-scoped persistence for cash cards.
///
/// Every read takes the owner explicitly; implementations never return a card
/// whose `owner` differs from the one asked for.
#[async_trait]
pub trait CashCardRepository: Send + Sync {
    /// Persist a card that has no id yet and return it with its new id.
    async fn insert(&self, card: CashCard) -> Result<CashCard, RepositoryError>;

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<CashCard>, RepositoryError>;

    async fn find_page_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<CashCard>, RepositoryError>;

    /// Overwrite the card stored under `card.id`. A card without an id is inserted.
    async fn upsert(&self, card: CashCard) -> Result<CashCard, RepositoryError>;

    /// Store a card under its own id unless that id is taken, whoever owns
    /// it. Returns whether the card was written.
    async fn insert_if_absent(&self, card: CashCard) -> Result<bool, RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}

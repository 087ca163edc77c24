use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single owned monetary record.
///
/// `id` is `None` until the repository assigns one. `owner` is always the
/// authenticated principal that created the card and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CashCard {
    pub id: Option<i64>,
    pub amount: f64,
    pub owner: String,
}

impl CashCard {
    /// Unsaved card for `owner`, ready for `insert`.
    pub fn new(amount: f64, owner: impl Into<String>) -> Self {
        Self {
            id: None,
            amount,
            owner: owner.into(),
        }
    }

    /// Copy of an existing card with only the amount replaced.
    pub fn with_amount(&self, amount: f64) -> Self {
        Self {
            id: self.id,
            amount,
            owner: self.owner.clone(),
        }
    }
}

/// Request body for create and update.
///
/// Clients may send the full record shape; `id` and `owner` are dropped
/// during deserialization and never reach the store.
#[derive(Debug, Clone, Deserialize)]
pub struct CashCardPayload {
    pub amount: f64,
}

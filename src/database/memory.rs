use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::models::CashCard;
use crate::database::repository::{CashCardRepository, RepositoryError};
use crate::paging::PageRequest;

/// Process-local store keyed by id.
pub struct MemoryRepository {
    inner: RwLock<MemoryState>,
}

struct MemoryState {
    cards: BTreeMap<i64, CashCard>,
    next_id: i64,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn store(&mut self, id: i64, card: CashCard) -> CashCard {
        let stored = CashCard { id: Some(id), ..card };
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        self.cards.insert(id, stored.clone());
        stored
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryState {
                cards: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.cards.len()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CashCardRepository for MemoryRepository {
    async fn insert(&self, card: CashCard) -> Result<CashCard, RepositoryError> {
        if let Some(id) = card.id {
            return Err(RepositoryError::IdAlreadyAssigned(id));
        }
        let mut state = self.inner.write().await;
        let id = state.allocate_id();
        debug!("memory insert id={} owner={}", id, card.owner);
        Ok(state.store(id, card))
    }

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<CashCard>, RepositoryError> {
        let state = self.inner.read().await;
        Ok(state.cards.get(&id).filter(|c| c.owner == owner).cloned())
    }

    async fn find_page_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<CashCard>, RepositoryError> {
        let owned: Vec<CashCard> = {
            let state = self.inner.read().await;
            state.cards.values().filter(|c| c.owner == owner).cloned().collect()
        };
        Ok(page.apply(owned))
    }

    async fn upsert(&self, card: CashCard) -> Result<CashCard, RepositoryError> {
        let mut state = self.inner.write().await;
        let id = match card.id {
            Some(id) => id,
            None => state.allocate_id(),
        };
        debug!("memory upsert id={} owner={}", id, card.owner);
        Ok(state.store(id, card))
    }

    async fn insert_if_absent(&self, card: CashCard) -> Result<bool, RepositoryError> {
        let id = card.id.ok_or(RepositoryError::MissingId)?;
        let mut state = self.inner.write().await;
        if state.cards.contains_key(&id) {
            return Ok(false);
        }
        state.store(id, card);
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::{SortField, SortOrder};

    async fn seeded() -> MemoryRepository {
        let repo = MemoryRepository::new();
        for (id, amount, owner) in [(99, 123.45, "sarah1"), (100, 1.0, "sarah1"), (101, 150.0, "sarah1"), (102, 200.0, "kumar2")] {
            repo.upsert(CashCard { id: Some(id), amount, owner: owner.into() }).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn insert_assigns_ids_above_existing() {
        let repo = seeded().await;
        let saved = repo.insert(CashCard::new(250.0, "sarah1")).await.unwrap();
        assert_eq!(saved.id, Some(103));
        let next = repo.insert(CashCard::new(1.0, "kumar2")).await.unwrap();
        assert_eq!(next.id, Some(104));
    }

    #[tokio::test]
    async fn insert_rejects_card_with_id() {
        let repo = MemoryRepository::new();
        let err = repo
            .insert(CashCard { id: Some(5), amount: 1.0, owner: "sarah1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::IdAlreadyAssigned(5)));
    }

    #[tokio::test]
    async fn lookup_is_owner_scoped() {
        let repo = seeded().await;
        assert!(repo.find_by_id_and_owner(99, "sarah1").await.unwrap().is_some());
        assert!(repo.find_by_id_and_owner(102, "sarah1").await.unwrap().is_none());
        assert!(repo.find_by_id_and_owner(1000, "sarah1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn page_only_contains_owner_cards() {
        let repo = seeded().await;
        let page = PageRequest::new(0, 50, vec![SortOrder::desc(SortField::Amount)]);
        let cards = repo.find_page_by_owner("sarah1", &page).await.unwrap();
        assert_eq!(cards.len(), 3);
        assert!(cards.iter().all(|c| c.owner == "sarah1"));
        assert_eq!(cards[0].amount, 150.0);

        let none = repo.find_page_by_owner("nobody", &page).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let repo = seeded().await;
        let existing = repo.find_by_id_and_owner(99, "sarah1").await.unwrap().unwrap();
        repo.upsert(existing.with_amount(19.99)).await.unwrap();

        assert_eq!(repo.len().await, 4);
        let reloaded = repo.find_by_id_and_owner(99, "sarah1").await.unwrap().unwrap();
        assert_eq!(reloaded.amount, 19.99);
        assert_eq!(reloaded.owner, "sarah1");
    }

    #[tokio::test]
    async fn insert_if_absent_leaves_taken_ids_alone() {
        let repo = seeded().await;
        let written = repo
            .insert_if_absent(CashCard { id: Some(102), amount: 1.0, owner: "sarah1".into() })
            .await
            .unwrap();
        assert!(!written);
        assert_eq!(repo.find_by_id_and_owner(102, "kumar2").await.unwrap().unwrap().amount, 200.0);

        let written = repo
            .insert_if_absent(CashCard { id: Some(500), amount: 5.0, owner: "sarah1".into() })
            .await
            .unwrap();
        assert!(written);
        assert_eq!(repo.insert(CashCard::new(1.0, "sarah1")).await.unwrap().id, Some(501));

        let err = repo.insert_if_absent(CashCard::new(1.0, "sarah1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::MissingId));
    }
}

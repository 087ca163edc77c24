use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, info};

use crate::database::models::CashCard;
use crate::database::repository::{CashCardRepository, RepositoryError};
use crate::paging::page_order::PageOrder;
use crate::paging::PageRequest;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS cash_card (
        id     BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        amount DOUBLE PRECISION NOT NULL DEFAULT 0,
        owner  VARCHAR(256) NOT NULL
    )
"#;

/// Cash cards in a Postgres `cash_card` table
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        info!("Created database pool ({} connections)", max_connections);
        Ok(Self { pool })
    }

    /// Create the table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Move the identity sequence past any explicitly inserted ids
    pub async fn sync_id_sequence(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('cash_card', 'id'), COALESCE(MAX(id), 0) + 1, false) FROM cash_card",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CashCardRepository for PostgresRepository {
    async fn insert(&self, card: CashCard) -> Result<CashCard, RepositoryError> {
        if let Some(id) = card.id {
            return Err(RepositoryError::IdAlreadyAssigned(id));
        }
        let saved = sqlx::query_as::<_, CashCard>(
            "INSERT INTO cash_card (amount, owner) VALUES ($1, $2) RETURNING id, amount, owner",
        )
        .bind(card.amount)
        .bind(&card.owner)
        .fetch_one(&self.pool)
        .await?;
        debug!("inserted cash card {:?} for {}", saved.id, saved.owner);
        Ok(saved)
    }

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<CashCard>, RepositoryError> {
        let card = sqlx::query_as::<_, CashCard>(
            "SELECT id, amount, owner FROM cash_card WHERE id = $1 AND owner = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn find_page_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<CashCard>, RepositoryError> {
        // Sort columns come from a closed enum, so formatting them in is safe
        let order_by = PageOrder::generate(&page.sort_or_default());
        let sql = format!(
            "SELECT id, amount, owner FROM cash_card WHERE owner = $1 {} LIMIT $2 OFFSET $3",
            order_by
        );
        let offset = i64::try_from(page.offset())
            .map_err(|_| RepositoryError::QueryError(format!("page offset {} out of range", page.offset())))?;

        let cards = sqlx::query_as::<_, CashCard>(&sql)
            .bind(owner)
            .bind(page.size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(cards)
    }

    async fn upsert(&self, card: CashCard) -> Result<CashCard, RepositoryError> {
        let Some(id) = card.id else {
            return self.insert(card).await;
        };
        let saved = sqlx::query_as::<_, CashCard>(
            r#"
            INSERT INTO cash_card (id, amount, owner) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET amount = EXCLUDED.amount, owner = EXCLUDED.owner
            RETURNING id, amount, owner
            "#,
        )
        .bind(id)
        .bind(card.amount)
        .bind(&card.owner)
        .fetch_one(&self.pool)
        .await?;
        debug!("saved cash card {} for {}", id, saved.owner);
        Ok(saved)
    }

    async fn insert_if_absent(&self, card: CashCard) -> Result<bool, RepositoryError> {
        let id = card.id.ok_or(RepositoryError::MissingId)?;
        let result = sqlx::query(
            "INSERT INTO cash_card (id, amount, owner) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(card.amount)
        .bind(&card.owner)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// These run against a live server and are skipped unless DATABASE_URL is set.
// Each test writes under its own owner name so runs never see each other's rows.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::{SortField, SortOrder};

    async fn connect() -> Option<PostgresRepository> {
        let url = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty())?;
        let repo = PostgresRepository::connect(&url, 2).await.unwrap();
        repo.migrate().await.unwrap();
        Some(repo)
    }

    fn owner(label: &str) -> String {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("pg-{}-{}", label, nanos)
    }

    async fn max_id(repo: &PostgresRepository) -> i64 {
        sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(id) FROM cash_card")
            .fetch_one(&repo.pool)
            .await
            .unwrap()
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_reads_back() {
        let Some(repo) = connect().await else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let owner = owner("insert");

        let first = repo.insert(CashCard::new(12.5, owner.as_str())).await.unwrap();
        let second = repo.insert(CashCard::new(3.0, owner.as_str())).await.unwrap();
        let first_id = first.id.unwrap();
        assert!(second.id.unwrap() > first_id);
        assert_eq!(first.amount, 12.5);
        assert_eq!(first.owner, owner);

        let err = repo.insert(first.clone()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::IdAlreadyAssigned(id) if id == first_id));

        let loaded = repo.find_by_id_and_owner(first_id, &owner).await.unwrap();
        assert_eq!(loaded, Some(first));
    }

    #[tokio::test]
    async fn lookup_is_owner_scoped() {
        let Some(repo) = connect().await else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let alice = owner("alice");
        let bob = owner("bob");

        let card = repo.insert(CashCard::new(40.0, alice.as_str())).await.unwrap();
        let id = card.id.unwrap();

        assert!(repo.find_by_id_and_owner(id, &alice).await.unwrap().is_some());
        assert!(repo.find_by_id_and_owner(id, &bob).await.unwrap().is_none());
        assert!(repo.find_by_id_and_owner(i64::MAX, &alice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pages_are_sorted_and_sliced() {
        let Some(repo) = connect().await else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let other = owner("paging-other");
        let owner = owner("paging");
        for amount in [5.0, 1.0, 4.0, 2.0, 3.0] {
            repo.insert(CashCard::new(amount, owner.as_str())).await.unwrap();
        }
        repo.insert(CashCard::new(100.0, other.as_str())).await.unwrap();

        let desc = vec![SortOrder::desc(SortField::Amount)];
        let first = repo.find_page_by_owner(&owner, &PageRequest::new(0, 2, desc.clone())).await.unwrap();
        let amounts: Vec<f64> = first.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![5.0, 4.0]);

        let second = repo.find_page_by_owner(&owner, &PageRequest::new(1, 2, desc.clone())).await.unwrap();
        let amounts: Vec<f64> = second.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![3.0, 2.0]);

        let past_end = repo.find_page_by_owner(&owner, &PageRequest::new(3, 2, desc)).await.unwrap();
        assert!(past_end.is_empty());

        // No explicit sort means ascending amount
        let default = repo.find_page_by_owner(&owner, &PageRequest::new(0, 10, vec![])).await.unwrap();
        let amounts: Vec<f64> = default.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(default.iter().all(|c| c.owner == owner));
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let Some(repo) = connect().await else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let owner = owner("upsert");
        let card = repo.insert(CashCard::new(10.0, owner.as_str())).await.unwrap();

        let saved = repo.upsert(card.with_amount(19.99)).await.unwrap();
        assert_eq!(saved.id, card.id);
        assert_eq!(saved.amount, 19.99);

        let page = repo.find_page_by_owner(&owner, &PageRequest::new(0, 10, vec![])).await.unwrap();
        assert_eq!(page, vec![saved]);
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_existing_row() {
        let Some(repo) = connect().await else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let holder = owner("holder");
        let intruder = owner("intruder");
        let card = repo.insert(CashCard::new(8.0, holder.as_str())).await.unwrap();
        let id = card.id.unwrap();

        let written = repo
            .insert_if_absent(CashCard { id: Some(id), amount: 1.0, owner: intruder.clone() })
            .await
            .unwrap();
        assert!(!written);
        assert_eq!(repo.find_by_id_and_owner(id, &holder).await.unwrap(), Some(card));
        assert!(repo.find_by_id_and_owner(id, &intruder).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sequence_moves_past_explicit_ids() {
        let Some(repo) = connect().await else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let owner = owner("sequence");
        let explicit = max_id(&repo).await + 1000;

        let written = repo
            .insert_if_absent(CashCard { id: Some(explicit), amount: 1.0, owner: owner.clone() })
            .await
            .unwrap();
        assert!(written);

        repo.sync_id_sequence().await.unwrap();
        let next = repo.insert(CashCard::new(2.0, owner.as_str())).await.unwrap();
        assert!(next.id.unwrap() > explicit);
    }
}

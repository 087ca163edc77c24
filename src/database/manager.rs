use std::sync::Arc;

use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryRepository;
use crate::database::models::CashCard;
use crate::database::postgres::PostgresRepository;
use crate::database::repository::{CashCardRepository, RepositoryError};

/// Cards loaded at startup when `seed_demo_data` is on
pub const DEMO_CARDS: &[(i64, f64, &str)] = &[
    (99, 123.45, "sarah1"),
    (100, 1.0, "sarah1"),
    (101, 150.0, "sarah1"),
    (102, 200.0, "kumar2"),
];

/// Picks and prepares the store for the running process
pub struct DatabaseManager;

impl DatabaseManager {
    /// Postgres when a URL is configured, otherwise the in-memory store
    pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn CashCardRepository>, RepositoryError> {
        match config.url.as_deref() {
            Some(url) => {
                let repo = PostgresRepository::connect(url, config.max_connections).await?;
                repo.migrate().await?;
                if config.seed_demo_data {
                    Self::seed(&repo).await?;
                    repo.sync_id_sequence().await?;
                }
                info!("Using Postgres cash card store");
                Ok(Arc::new(repo))
            }
            None => {
                let repo = MemoryRepository::new();
                if config.seed_demo_data {
                    Self::seed(&repo).await?;
                }
                info!("Using in-memory cash card store");
                Ok(Arc::new(repo))
            }
        }
    }

    /// Store any demo card whose id is free. A taken id is left alone no
    /// matter who owns the row.
    pub async fn seed(repo: &dyn CashCardRepository) -> Result<(), RepositoryError> {
        let mut seeded = 0;
        for &(id, amount, owner) in DEMO_CARDS {
            let card = CashCard { id: Some(id), amount, owner: owner.to_string() };
            if repo.insert_if_absent(card).await? {
                seeded += 1;
            } else {
                debug!("Demo card {} already present, skipping", id);
            }
        }
        info!("Seeded {} demo cash cards", seeded);
        Ok(())
    }
}

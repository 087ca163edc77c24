pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::DatabaseManager;
pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;
pub use repository::{CashCardRepository, RepositoryError};

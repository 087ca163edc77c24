// handlers/public/mod.rs - Public handlers (no authentication required)

pub mod fallback;
pub mod health;

pub use fallback::not_found;
pub use health::health;

pub mod create;
pub mod list;
pub mod show;
pub mod update;

/// Root of the card collection; record paths are `COLLECTION_PATH/{id}`
pub const COLLECTION_PATH: &str = "/cashcards";

pub use create::create;
pub use list::list;
pub use show::show;
pub use update::update;

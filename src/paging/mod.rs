pub mod types;
pub mod page_order;
pub mod page_request;
pub mod error;

pub use error::PagingError;
pub use page_request::PageRequest;
pub use types::*;

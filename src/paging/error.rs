use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PagingError {
    #[error("Unknown sort property: {0}")]
    UnknownProperty(String),

    #[error("Sort parameter has no property: {0}")]
    MissingProperty(String),
}

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not complete the increment, read or write.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Key already exists: {0}")]
    Duplicate(String),
}

use thiserror::Error;

/// Failure taxonomy of the core operations.
///
/// Validation failures (`InvalidArgument`, `NotFound`, `Unauthorized`) are
/// always raised before any write. `StorageUnavailable` means the store could
/// not be reached or the atomic batch was rolled back: nothing was committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl CoreError {
    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

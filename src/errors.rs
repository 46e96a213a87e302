use thiserror::Error;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the origination engine.
///
/// Every failure is terminal for the call that produced it: the core never
/// retries. `Conflict` is the only variant a caller may retry, after
/// re-reading current state.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Concurrent modification rejected: {0}")]
    Conflict(String),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// Add From implementation for rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

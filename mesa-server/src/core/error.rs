use thiserror::Error;

/// Startup and serve-loop failures
///
/// Request-level failures use `shared::AppError`; this type only covers what
/// can stop the process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<shared::AppError> for ServerError {
    fn from(err: shared::AppError) -> Self {
        match err.code {
            shared::ErrorCode::DatabaseError => ServerError::Database(err.message),
            shared::ErrorCode::ConfigError => ServerError::Config(err.message),
            _ => ServerError::Internal(err.message),
        }
    }
}

/// Result type for startup code
pub type Result<T> = std::result::Result<T, ServerError>;

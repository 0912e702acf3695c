/// Errors from connection setup, migrations and health probes
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The pool could not be opened, even after retrying
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

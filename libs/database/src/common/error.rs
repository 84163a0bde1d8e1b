/// Unified database error type for all database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// PostgreSQL-specific errors (SeaORM)
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// The request deadline passed before the operation completed
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Migration error
    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl DatabaseError {
    /// Classified SQL error (unique or foreign key violation) when the
    /// underlying driver reported one.
    #[cfg(feature = "postgres")]
    pub fn sql_err(&self) -> Option<sea_orm::SqlErr> {
        match self {
            Self::Postgres(err) => err.sql_err(),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        #[cfg(feature = "postgres")]
        {
            matches!(
                self.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            )
        }
        #[cfg(not(feature = "postgres"))]
        {
            false
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        #[cfg(feature = "postgres")]
        {
            matches!(
                self.sql_err(),
                Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_))
            )
        }
        #[cfg(not(feature = "postgres"))]
        {
            false
        }
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

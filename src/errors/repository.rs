use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Store connectivity, query or write failure
    #[error("Database error: {0}")]
    Database(SqlxError),

    /// Write rejected because the short id is already taken
    #[error("Conflict error: {0}")]
    Conflict(String),
}

/// Postgres SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(code: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION)
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::Database(db_err) if is_unique_violation(db_err.code().as_deref()) => {
                Self::Conflict(db_err.message().to_string())
            }
            _ => Self::Database(err),
        }
    }
}

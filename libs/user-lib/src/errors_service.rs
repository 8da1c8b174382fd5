use crate::repository::errors::UserRepositoryError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UserServiceError {
    #[error("username already exists")]
    UsernameAlreadyExists,

    #[error("revision does not match the stored user")]
    RevisionConflict,

    #[error("resource not found")]
    NotFound,

    #[error("invalid UUID in database: {0}")]
    InvalidUuid(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UserRepositoryError> for UserServiceError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::UsernameAlreadyExists => UserServiceError::UsernameAlreadyExists,
            UserRepositoryError::RevisionConflict => UserServiceError::RevisionConflict,
            UserRepositoryError::NotFound => UserServiceError::NotFound,
            UserRepositoryError::Unavailable(e) => UserServiceError::StoreUnavailable(e.to_string()),
            UserRepositoryError::Sqlx(e) => UserServiceError::Internal(e.into()),
        }
    }
}

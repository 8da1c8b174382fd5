#[derive(Debug)]
pub enum UserRepositoryError {
    UsernameAlreadyExists,
    RevisionConflict,
    NotFound,
    Unavailable(sqlx::Error),
    Sqlx(sqlx::Error),
}

impl std::fmt::Display for UserRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRepositoryError::UsernameAlreadyExists => write!(f, "username already exists"),
            UserRepositoryError::RevisionConflict => write!(f, "revision conflict"),
            UserRepositoryError::NotFound => write!(f, "not found"),
            UserRepositoryError::Unavailable(e) => write!(f, "store unavailable: {e}"),
            UserRepositoryError::Sqlx(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for UserRepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UserRepositoryError::UsernameAlreadyExists => None,
            UserRepositoryError::RevisionConflict => None,
            UserRepositoryError::NotFound => None,
            UserRepositoryError::Unavailable(e) => Some(e),
            UserRepositoryError::Sqlx(e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for UserRepositoryError {
    fn from(value: sqlx::Error) -> Self {
        map_sqlx_error(value)
    }
}

fn extract_mysql_key_name(msg_lower: &str) -> Option<String> {
    // msg_lower is already lowercased
    let marker = "for key '";
    let start = msg_lower.find(marker)? + marker.len();
    let rest = &msg_lower[start..];
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

pub fn map_sqlx_error(err: sqlx::Error) -> UserRepositoryError {
    const USER_USERNAME_UNIQUE: &str = "user_username_unique";

    match &err {
        sqlx::Error::Database(db_err) => {
            // MySQL duplicate key violations surface as SQLSTATE 23000 with
            // "Duplicate entry 'will' for key 'users.user_username_unique'".
            let msg = db_err.message().to_lowercase();
            let is_duplicate_key = db_err.code().as_deref() == Some("23000")
                && msg.contains("duplicate entry")
                && msg.contains("for key");

            if is_duplicate_key {
                let key = extract_mysql_key_name(&msg).unwrap_or_default();
                // MySQL may prefix the key with the table name.
                if key.ends_with(USER_USERNAME_UNIQUE) || msg.contains(USER_USERNAME_UNIQUE) {
                    return UserRepositoryError::UsernameAlreadyExists;
                }
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            return UserRepositoryError::Unavailable(err);
        }
        _ => {}
    }

    UserRepositoryError::Sqlx(err)
}

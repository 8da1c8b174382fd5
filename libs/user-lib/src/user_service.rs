use crate::entities::{NewUser, User, UserChanges, UserPatch};
use crate::errors_service::UserServiceError;
use crate::password::hash_password;
use crate::repository::models::UserRow;
use crate::repository::traits::UserRepositoryTrait;
use crate::repository::UserRepository;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use uuid::Uuid;

fn parse_uuid(s: &str) -> Result<Uuid, UserServiceError> {
    Uuid::parse_str(s).map_err(|_| UserServiceError::InvalidUuid(s.to_string()))
}

const MAX_USERNAME_LENGTH: usize = 255;
const MAX_ROLE_NAME_LENGTH: usize = 255;

fn validate_username(username: &str) -> Result<String, UserServiceError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(UserServiceError::Validation(
            "username cannot be empty".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(UserServiceError::Validation(format!(
            "username cannot exceed {MAX_USERNAME_LENGTH} characters"
        )));
    }
    Ok(username.to_string())
}

fn validate_password(password: &SecretString) -> Result<(), UserServiceError> {
    if password.expose_secret().is_empty() {
        return Err(UserServiceError::Validation(
            "password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_roles(roles: &[String]) -> Result<Vec<String>, UserServiceError> {
    roles
        .iter()
        .map(|role| {
            let role = role.trim();
            if role.is_empty() {
                return Err(UserServiceError::Validation(
                    "role name cannot be empty".to_string(),
                ));
            }
            if role.chars().count() > MAX_ROLE_NAME_LENGTH {
                return Err(UserServiceError::Validation(format!(
                    "role name cannot exceed {MAX_ROLE_NAME_LENGTH} characters"
                )));
            }
            Ok(role.to_string())
        })
        .collect()
}

fn validate_revision(revision: i64) -> Result<(), UserServiceError> {
    if revision < 0 {
        return Err(UserServiceError::Validation(
            "revision cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn user_from_row(row: UserRow) -> Result<User, UserServiceError> {
    Ok(User {
        id: parse_uuid(&row.id)?,
        username: row.username,
        roles: row.roles.0,
        active: row.active,
        revision: row.revision,
    })
}

/// User lifecycle operations on top of a single document repository.
pub struct UserService<U: ?Sized = UserRepository> {
    pub user_repo: Arc<U>,
}

impl<U: ?Sized> Clone for UserService<U> {
    fn clone(&self) -> Self {
        Self {
            user_repo: Arc::clone(&self.user_repo),
        }
    }
}

impl UserService<UserRepository> {
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo: Arc::new(user_repo),
        }
    }
}

impl<U> UserService<U>
where
    U: UserRepositoryTrait + ?Sized,
{
    pub fn with_repo(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Create a user with a hashed credential and revision 0.
    pub async fn create_user(
        &self,
        username: &str,
        password: &SecretString,
        roles: &[String],
        active: bool,
    ) -> Result<User, UserServiceError> {
        let username = validate_username(username)?;
        validate_password(password)?;
        let roles = validate_roles(roles)?;

        let new_user = NewUser {
            username,
            password_hash: hash_password(password).await?,
            roles,
            active,
        };

        let row = self
            .user_repo
            .insert_user(&new_user)
            .await
            .map_err(UserServiceError::from)?;
        let user = user_from_row(row)?;

        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    pub async fn get_users(&self) -> Result<Vec<User>, UserServiceError> {
        self.user_repo
            .find_all()
            .await
            .map_err(UserServiceError::from)?
            .into_iter()
            .map(user_from_row)
            .collect()
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, UserServiceError> {
        let user_row = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(UserServiceError::from)?;
        user_row.map(user_from_row).transpose()
    }

    /// Apply `changes` if `revision` is still the stored one. Fields left as
    /// `None` keep their prior values.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        revision: i64,
        changes: UserChanges,
    ) -> Result<User, UserServiceError> {
        validate_revision(revision)?;

        let password_hash = match &changes.password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password).await?)
            }
            None => None,
        };

        let patch = UserPatch {
            username: changes.username.as_deref().map(validate_username).transpose()?,
            password_hash,
            roles: changes.roles.as_deref().map(validate_roles).transpose()?,
            active: changes.active,
        };

        if patch.is_empty() {
            tracing::debug!(user_id = %user_id, "update without changes, bumping revision only");
        }

        let row = self
            .user_repo
            .update_by_id(user_id, revision, &patch)
            .await
            .map_err(|e| {
                let err = UserServiceError::from(e);
                if matches!(err, UserServiceError::RevisionConflict) {
                    tracing::warn!(user_id = %user_id, revision, "stale revision on update");
                }
                err
            })?;
        let user = user_from_row(row)?;

        tracing::info!(user_id = %user.id, revision = user.revision, "user updated");
        Ok(user)
    }

    /// Remove a user, returning the record as it was before deletion.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<User, UserServiceError> {
        let row = self
            .user_repo
            .delete_by_id(user_id)
            .await
            .map_err(UserServiceError::from)?;
        let user = user_from_row(row)?;

        tracing::info!(user_id = %user.id, username = %user.username, "user deleted");
        Ok(user)
    }
}

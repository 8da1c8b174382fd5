use async_trait::async_trait;
use sqlx::types::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::{NewUser, UserPatch};
use crate::repository::errors::UserRepositoryError;
use crate::repository::models::UserRow;
use crate::repository::traits::UserRepositoryTrait;

/// Process-local user collection with the same uniqueness and revision
/// semantics as the MySQL store. Rows are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<UserRow>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Exact, case-sensitive comparison, matching the binary collation of the
/// MySQL `username` column.
fn username_taken(users: &[UserRow], username: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .any(|u| u.username == username && Some(u.id.as_str()) != except_id)
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    async fn insert_user(&self, user: &NewUser) -> Result<UserRow, UserRepositoryError> {
        let mut users = self.users.write().await;
        if username_taken(&users, &user.username, None) {
            return Err(UserRepositoryError::UsernameAlreadyExists);
        }

        let row = UserRow {
            id: Uuid::new_v4().to_string(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            roles: Json(user.roles.clone()),
            active: user.active,
            revision: 0,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<UserRow>, UserRepositoryError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, UserRepositoryError> {
        let id = user_id.to_string();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_by_id(
        &self,
        user_id: Uuid,
        expected_revision: i64,
        patch: &UserPatch,
    ) -> Result<UserRow, UserRepositoryError> {
        let id = user_id.to_string();
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(UserRepositoryError::NotFound)?;

        if users[index].revision != expected_revision {
            return Err(UserRepositoryError::RevisionConflict);
        }

        if let Some(username) = &patch.username {
            if username_taken(&users, username, Some(&id)) {
                return Err(UserRepositoryError::UsernameAlreadyExists);
            }
        }

        let row = &mut users[index];
        if let Some(username) = &patch.username {
            row.username = username.clone();
        }
        if let Some(password_hash) = &patch.password_hash {
            row.password_hash = password_hash.clone();
        }
        if let Some(roles) = &patch.roles {
            row.roles = Json(roles.clone());
        }
        if let Some(active) = patch.active {
            row.active = active;
        }
        row.revision += 1;

        Ok(row.clone())
    }

    async fn delete_by_id(&self, user_id: Uuid) -> Result<UserRow, UserRepositoryError> {
        let id = user_id.to_string();
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(UserRepositoryError::NotFound)?;
        Ok(users.remove(index))
    }
}

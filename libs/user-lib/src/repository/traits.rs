use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{NewUser, UserPatch};
use crate::repository::errors::UserRepositoryError;
use crate::repository::models::UserRow;

#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn insert_user(&self, user: &NewUser) -> Result<UserRow, UserRepositoryError>;
    async fn find_all(&self) -> Result<Vec<UserRow>, UserRepositoryError>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, UserRepositoryError>;
    /// Applies `patch` only when the stored revision equals `expected_revision`,
    /// bumping the revision by one.
    async fn update_by_id(
        &self,
        user_id: Uuid,
        expected_revision: i64,
        patch: &UserPatch,
    ) -> Result<UserRow, UserRepositoryError>;
    async fn delete_by_id(&self, user_id: Uuid) -> Result<UserRow, UserRepositoryError>;
}

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{query, query_as, query_scalar, MySqlPool};
use uuid::Uuid;
use crate::entities::{NewUser, UserPatch};
use crate::repository::models::UserRow;
use crate::repository::errors::UserRepositoryError;
use crate::repository::traits::UserRepositoryTrait;

/// MySQL-backed user document collection.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pub pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRow>, UserRepositoryError> {
        let user = query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, roles, active, revision
            FROM users WHERE id = ?
            "#
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(UserRepositoryError::from)?;

        Ok(user)
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn insert_user(&self, user: &NewUser) -> Result<UserRow, UserRepositoryError> {
        let user_id = Uuid::new_v4().to_string();

        query(
            r#"
            INSERT INTO users (id, username, password_hash, roles, active, revision)
            VALUES (?, ?, ?, ?, ?, 0)
            "#
        )
        .bind(&user_id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(Json(&user.roles))
        .bind(user.active)
        .execute(&self.pool)
        .await
        .map_err(UserRepositoryError::from)?;

        self.fetch_user(&user_id)
            .await?
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<UserRow>, UserRepositoryError> {
        let users = query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, roles, active, revision
            FROM users
            ORDER BY seq
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(UserRepositoryError::from)?;

        Ok(users)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, UserRepositoryError> {
        self.fetch_user(&user_id.to_string()).await
    }

    async fn update_by_id(
        &self,
        user_id: Uuid,
        expected_revision: i64,
        patch: &UserPatch,
    ) -> Result<UserRow, UserRepositoryError> {
        let id = user_id.to_string();

        // Compare-and-increment: the row only changes when the caller saw the
        // latest revision.
        let result = query(
            r#"
            UPDATE users
            SET username = COALESCE(?, username),
                password_hash = COALESCE(?, password_hash),
                roles = COALESCE(?, roles),
                active = COALESCE(?, active),
                revision = revision + 1
            WHERE id = ? AND revision = ?
            "#
        )
        .bind(patch.username.as_deref())
        .bind(patch.password_hash.as_deref())
        .bind(patch.roles.clone().map(Json))
        .bind(patch.active)
        .bind(&id)
        .bind(expected_revision)
        .execute(&self.pool)
        .await
        .map_err(UserRepositoryError::from)?;

        if result.rows_affected() == 0 {
            let current = query_scalar::<_, i64>(r#"SELECT revision FROM users WHERE id = ?"#)
                .bind(&id)
                .fetch_optional(&self.pool)
                .await
                .map_err(UserRepositoryError::from)?;

            return Err(match current {
                Some(_) => UserRepositoryError::RevisionConflict,
                None => UserRepositoryError::NotFound,
            });
        }

        self.fetch_user(&id)
            .await?
            .ok_or(UserRepositoryError::NotFound)
    }

    async fn delete_by_id(&self, user_id: Uuid) -> Result<UserRow, UserRepositoryError> {
        let id = user_id.to_string();
        let mut tx = self.pool.begin().await.map_err(UserRepositoryError::from)?;

        let user = query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, roles, active, revision
            FROM users WHERE id = ?
            FOR UPDATE
            "#
        )
        .bind(&id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(UserRepositoryError::from)?
        .ok_or(UserRepositoryError::NotFound)?;

        query(
            r#"
            DELETE FROM users WHERE id = ?
            "#
        )
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(UserRepositoryError::from)?;

        tx.commit().await.map_err(UserRepositoryError::from)?;

        Ok(user)
    }
}

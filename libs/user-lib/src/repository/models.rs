pub use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub roles: Json<Vec<String>>,
    pub active: bool,
    pub revision: i64,
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored user as seen by callers. The credential hash never leaves the
/// repository layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub revision: i64,
}

/// Document handed to the store on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub active: bool,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub roles: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password_hash.is_none()
            && self.roles.is_none()
            && self.active.is_none()
    }
}

/// Changes requested by a client on update. The password, when present, is
/// hashed by the service before it reaches the store.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<secrecy::SecretString>,
    pub roles: Option<Vec<String>>,
    pub active: Option<bool>,
}

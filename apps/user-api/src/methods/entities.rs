use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use user_lib::entities::{User, UserChanges};
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn secret_not_empty(secret: &SecretString) -> Result<(), ValidationError> {
    if secret.expose_secret().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("password is required".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "username is required and at most 255 characters"))]
    pub username: String,
    #[schema(value_type = String, format = Password)]
    #[validate(custom(function = "secret_not_empty"))]
    pub password: SecretString,
    #[serde(default)]
    pub roles: Vec<String>,
    pub active: bool,
}

/// Accepts `_id` / `__v` as aliases for `id` / `revision`, the field names
/// document-store clients send.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
    #[serde(alias = "__v")]
    #[validate(range(min = 0, message = "revision cannot be negative"))]
    pub revision: i64,
    #[validate(length(min = 1, max = 255, message = "username cannot be empty or exceed 255 characters"))]
    pub username: Option<String>,
    #[schema(value_type = Option<String>, format = Password)]
    #[validate(custom(function = "secret_not_empty"))]
    pub password: Option<SecretString>,
    pub roles: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        UserChanges {
            username: req.username,
            password: req.password,
            roles: req.roles,
            active: req.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserQuery {
    /// Return only the user with this id (UUID)
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub revision: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
            revision: user.revision,
        }
    }
}

/// `GET /users` answers with a single user when filtered by id, otherwise
/// with the full collection.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UsersResponse {
    One(UserResponse),
    Many(Vec<UserResponse>),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

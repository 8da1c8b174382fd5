use std::sync::Arc;
use user_lib::repository::traits::UserRepositoryTrait;
use user_lib::user_service::UserService;

use crate::error::is_prod_like;

/// Service over whichever store the process was configured with.
pub type SharedUserService = UserService<dyn UserRepositoryTrait>;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<SharedUserService>,
    pub env: String,
}

impl AppState {
    pub fn new(user_repo: Arc<dyn UserRepositoryTrait>, env: impl Into<String>) -> Self {
        Self {
            user_service: Arc::new(UserService::with_repo(user_repo)),
            env: env.into(),
        }
    }

    pub fn is_prod_like(&self) -> bool {
        is_prod_like(&self.env)
    }
}

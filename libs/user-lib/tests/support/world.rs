use cucumber::World;
use std::sync::Arc;
use uuid::Uuid;

use user_lib::entities::User;
use user_lib::errors_service::UserServiceError;
use user_lib::repository::InMemoryUserRepository;
use user_lib::user_service::UserService;

#[derive(Debug, Default, World)]
pub struct TestWorld {
    // State
    pub repo: InMemoryUserRepository,
    pub current_user: Option<User>,
    pub listed_users: Vec<User>,

    // Results
    pub user_result: Option<Result<User, UserServiceError>>,
    pub delete_result: Option<Result<User, UserServiceError>>,
    pub error: Option<UserServiceError>,
}

impl TestWorld {
    /// Service over the scenario's store. Clones of the repository share rows.
    pub fn service(&self) -> UserService<InMemoryUserRepository> {
        UserService::with_repo(Arc::new(self.repo.clone()))
    }

    pub async fn find_user(&self, username: &str) -> User {
        self.service()
            .get_users()
            .await
            .expect("listing users should succeed")
            .into_iter()
            .find(|u| u.username == username)
            .unwrap_or_else(|| panic!("user {username} should exist"))
    }

    pub async fn user_id(&self, username: &str) -> Uuid {
        self.find_user(username).await.id
    }
}

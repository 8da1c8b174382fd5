use cucumber::then;

use user_lib::errors_service::UserServiceError;

use crate::support::world::TestWorld;

#[then("the user should be created successfully")]
pub async fn user_created_successfully(world: &mut TestWorld) {
    assert!(world.user_result.as_ref().unwrap().is_ok(), "User creation should succeed");
}

#[then(expr = "the user should have revision {int}")]
pub async fn current_user_revision(world: &mut TestWorld, revision: i64) {
    let user = world.current_user.as_ref().expect("User should exist");
    assert_eq!(user.revision, revision);
}

#[then(expr = "the list should contain {string}")]
pub async fn list_contains(world: &mut TestWorld, username: String) {
    assert!(world.listed_users.iter().any(|u| u.username == username));
}

#[then(expr = "the list should not contain {string}")]
pub async fn list_does_not_contain(world: &mut TestWorld, username: String) {
    assert!(!world.listed_users.iter().any(|u| u.username == username));
}

#[then(expr = "the list should have {int} users")]
pub async fn list_length(world: &mut TestWorld, count: usize) {
    assert_eq!(world.listed_users.len(), count);
}

#[then(expr = "the deletion should return {string}")]
pub async fn deletion_returns(world: &mut TestWorld, username: String) {
    let result = world.delete_result.as_ref().expect("Result should exist");
    let deleted = result.as_ref().expect("Deletion should succeed");
    assert_eq!(deleted.username, username);
}

#[then(expr = "user {string} should be active")]
pub async fn user_is_active(world: &mut TestWorld, username: String) {
    assert!(world.find_user(&username).await.active);
}

#[then(expr = "user {string} should be inactive")]
pub async fn user_is_inactive(world: &mut TestWorld, username: String) {
    assert!(!world.find_user(&username).await.active);
}

#[then(expr = "user {string} should have revision {int}")]
pub async fn user_revision(world: &mut TestWorld, username: String, revision: i64) {
    assert_eq!(world.find_user(&username).await.revision, revision);
}

#[then("I should receive a revision conflict error")]
pub async fn revision_conflict_error(world: &mut TestWorld) {
    assert!(matches!(world.error, Some(UserServiceError::RevisionConflict)));
}

#[then("I should receive a username already exists error")]
pub async fn username_already_exists_error(world: &mut TestWorld) {
    assert!(matches!(world.error, Some(UserServiceError::UsernameAlreadyExists)));
}

#[then("I should receive a validation error")]
pub async fn validation_error(world: &mut TestWorld) {
    assert!(matches!(world.error, Some(UserServiceError::Validation(_))));
}

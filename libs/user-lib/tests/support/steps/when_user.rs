use cucumber::when;
use secrecy::SecretString;

use user_lib::entities::UserChanges;

use crate::support::world::TestWorld;

#[when(expr = "I create an inactive user {string} with password {string} and role {string}")]
pub async fn create_inactive_user(
    world: &mut TestWorld,
    username: String,
    password: String,
    role: String,
) {
    let result = world
        .service()
        .create_user(&username, &SecretString::new(password), &[role], false)
        .await;
    world.current_user = result.as_ref().ok().cloned();
    world.user_result = Some(result);
}

#[when(expr = "I try to create a user {string} with password {string}")]
pub async fn try_create_user(world: &mut TestWorld, username: String, password: String) {
    let result = world
        .service()
        .create_user(&username, &SecretString::new(password), &[], true)
        .await;
    if let Err(e) = result {
        world.error = Some(e);
    }
}

#[when("I list all users")]
pub async fn list_users(world: &mut TestWorld) {
    world.listed_users = world
        .service()
        .get_users()
        .await
        .expect("listing users should succeed");
}

#[when(expr = "I delete the user {string}")]
pub async fn delete_user(world: &mut TestWorld, username: String) {
    let user_id = world.user_id(&username).await;
    world.delete_result = Some(world.service().delete_user(user_id).await);
}

#[when(expr = "I set {string} active to {word} at revision {int}")]
pub async fn set_active(world: &mut TestWorld, username: String, active: String, revision: i64) {
    let active: bool = active.parse().expect("active must be true or false");
    let user_id = world.user_id(&username).await;

    let changes = UserChanges {
        active: Some(active),
        ..Default::default()
    };
    match world.service().update_user(user_id, revision, changes).await {
        Ok(user) => world.current_user = Some(user),
        Err(e) => world.error = Some(e),
    }
}

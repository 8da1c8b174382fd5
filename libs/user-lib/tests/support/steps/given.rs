use cucumber::given;
use secrecy::SecretString;

use crate::support::world::TestWorld;

async fn seed_user(world: &mut TestWorld, username: &str, active: bool) {
    let user = world
        .service()
        .create_user(
            username,
            &SecretString::new("!Wd12345".to_string()),
            &["Employee".to_string()],
            active,
        )
        .await
        .expect("seeding a user should succeed");
    world.current_user = Some(user);
}

#[given("a clean user store")]
pub async fn clean_store(world: &mut TestWorld) {
    *world = TestWorld::default();
}

#[given(expr = "an active user {string} exists")]
pub async fn active_user_exists(world: &mut TestWorld, username: String) {
    seed_user(world, &username, true).await;
}

#[given(expr = "an inactive user {string} exists")]
pub async fn inactive_user_exists(world: &mut TestWorld, username: String) {
    seed_user(world, &username, false).await;
}

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::IntoResponse,
    Router,
};
use http_body_util::BodyExt;
use mockall::mock;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use user_api::methods::entities::UserResponse;
use user_api::{routes, AppState};
use user_lib::entities::{NewUser, UserPatch};
use user_lib::repository::errors::UserRepositoryError;
use user_lib::repository::models::{Json, UserRow};
use user_lib::repository::traits::UserRepositoryTrait;
use user_lib::repository::InMemoryUserRepository;

// ==================== MOCKS ====================

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepositoryTrait for UserRepo {
        async fn insert_user(&self, user: &NewUser) -> Result<UserRow, UserRepositoryError>;
        async fn find_all(&self) -> Result<Vec<UserRow>, UserRepositoryError>;
        async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, UserRepositoryError>;
        async fn update_by_id(&self, user_id: Uuid, expected_revision: i64, patch: &UserPatch) -> Result<UserRow, UserRepositoryError>;
        async fn delete_by_id(&self, user_id: Uuid) -> Result<UserRow, UserRepositoryError>;
    }
}

// ==================== TEST HELPERS ====================

fn memory_app() -> Router {
    routes(AppState::new(Arc::new(InMemoryUserRepository::new()), "test"))
}

fn mock_app(user_repo: MockUserRepo, env: &str) -> Router {
    routes(AppState::new(Arc::new(user_repo), env))
}

fn row(id: Uuid, username: &str, active: bool, revision: i64) -> UserRow {
    UserRow {
        id: id.to_string(),
        username: username.to_string(),
        password_hash: "$argon2id$v=19$stub".to_string(),
        roles: Json(vec!["Employee".to_string()]),
        active,
        revision,
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn create(app: &Router, username: &str, active: bool) -> UserResponse {
    let (status, _) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({
            "username": username,
            "password": "!Wd12345",
            "roles": ["Employee"],
            "active": active
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, users) = send(app, Method::GET, "/users", None).await;
    let users: Vec<UserResponse> = serde_json::from_value(users).unwrap();
    users.into_iter().find(|u| u.username == username).unwrap()
}

// ==================== CREATE USER HANDLER TESTS ====================

#[tokio::test]
async fn test_create_user_returns_201_and_message() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({
            "username": "Will",
            "password": "!Wd12345",
            "roles": ["Employee"],
            "active": false
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].as_str().unwrap().contains("New user Will created"));
}

#[tokio::test]
async fn test_create_user_duplicate_username_is_409() {
    let app = memory_app();
    create(&app, "Will", false).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "Will", "password": "x", "roles": [], "active": true})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_create_user_missing_password_is_400() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "Will", "roles": [], "active": true})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_create_user_empty_fields_are_400() {
    let app = memory_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "", "password": "", "roles": [], "active": true})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("username"));
    assert!(message.contains("password"));
}

#[tokio::test]
async fn test_create_user_blank_role_is_400() {
    let app = memory_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "Will", "password": "pw", "roles": ["  "], "active": true})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_store_unavailable_is_503() {
    let mut user_repo = MockUserRepo::new();
    user_repo
        .expect_insert_user()
        .times(1)
        .returning(|_| Err(UserRepositoryError::Unavailable(sqlx::Error::PoolTimedOut)));

    let app = mock_app(user_repo, "prod01");
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "Will", "password": "pw", "roles": [], "active": true})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "store unavailable");
}

// ==================== GET USERS HANDLER TESTS ====================

#[tokio::test]
async fn test_get_users_never_exposes_password() {
    let app = memory_app();
    create(&app, "Will", false).await;

    let (status, body) = send(&app, Method::GET, "/users", None).await;

    assert_eq!(status, StatusCode::OK);
    let text = body.to_string();
    assert!(!text.contains("password"));
    assert!(!text.contains("!Wd12345"));
    assert!(!text.contains("argon2"));
}

#[tokio::test]
async fn test_get_users_empty_store_is_empty_list() {
    let app = memory_app();

    let (status, body) = send(&app, Method::GET, "/users", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_users_filtered_by_id_returns_single_user() {
    let app = memory_app();
    let hank = create(&app, "Hank", true).await;
    create(&app, "Will", false).await;

    let (status, body) = send(&app, Method::GET, &format!("/users?id={}", hank.id), None).await;

    assert_eq!(status, StatusCode::OK);
    let user: UserResponse = serde_json::from_value(body).unwrap();
    assert_eq!(user, hank);
}

#[tokio::test]
async fn test_get_users_filtered_by_unknown_id_is_404() {
    let app = memory_app();

    let (status, _) = send(&app, Method::GET, &format!("/users?id={}", Uuid::new_v4()), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_users_filtered_by_invalid_id_is_400() {
    let app = memory_app();

    let (status, body) = send(&app, Method::GET, "/users?id=not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid uuid");
}

#[tokio::test]
async fn test_get_user_by_id_path() {
    let app = memory_app();
    let will = create(&app, "Will", false).await;

    let (status, body) = send(&app, Method::GET, &format!("/users/{}", will.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "Will");

    let (status, _) = send(&app, Method::GET, &format!("/users/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_users_internal_error_hidden_in_prod() {
    let mut user_repo = MockUserRepo::new();
    user_repo.expect_find_all().times(1).returning(|| {
        let mut bad = row(Uuid::new_v4(), "Will", true, 0);
        bad.id = "corrupt".to_string();
        Ok(vec![bad])
    });

    let app = mock_app(user_repo, "prod01");
    let (status, body) = send(&app, Method::GET, "/users", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");
}

// ==================== UPDATE USER HANDLER TESTS ====================

#[tokio::test]
async fn test_update_user_returns_message_and_bumps_revision() {
    let app = memory_app();
    let hank = create(&app, "Hank", true).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/users",
        Some(json!({
            "id": hank.id,
            "username": "Hank",
            "roles": ["Employee"],
            "active": false,
            "revision": 0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Hank updated"));

    let (_, body) = send(&app, Method::GET, &format!("/users/{}", hank.id), None).await;
    assert_eq!(body["active"], false);
    assert_eq!(body["revision"], 1);
}

#[tokio::test]
async fn test_update_user_accepts_document_store_field_names() {
    let app = memory_app();
    let hank = create(&app, "Hank", true).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users",
        Some(json!({"_id": hank.id, "__v": 0, "active": false})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_user_stale_revision_is_409_and_keeps_document() {
    let app = memory_app();
    let hank = create(&app, "Hank", true).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users",
        Some(json!({"id": hank.id, "revision": 0, "active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/users",
        Some(json!({"id": hank.id, "revision": 0, "username": "Henry"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (_, body) = send(&app, Method::GET, &format!("/users/{}", hank.id), None).await;
    assert_eq!(body["username"], "Hank");
    assert_eq!(body["revision"], 1);
}

#[tokio::test]
async fn test_update_user_unknown_id_is_404() {
    let app = memory_app();

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users",
        Some(json!({"id": Uuid::new_v4(), "revision": 0, "active": false})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_missing_revision_is_400() {
    let app = memory_app();
    let hank = create(&app, "Hank", true).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users",
        Some(json!({"id": hank.id, "active": false})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_rename_onto_taken_username_is_409() {
    let app = memory_app();
    create(&app, "Will", true).await;
    let bill = create(&app, "Bill", true).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users",
        Some(json!({"id": bill.id, "revision": 0, "username": "Will"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

// ==================== DELETE USER HANDLER TESTS ====================

#[tokio::test]
async fn test_delete_user_body_contains_deleted() {
    let app = memory_app();
    let bill = create(&app, "Bill", false).await;

    let (status, body) = send(&app, Method::DELETE, "/users", Some(json!({"_id": bill.id}))).await;

    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("deleted"));
    assert!(text.contains("Bill"));
    assert!(text.contains(&bill.id.to_string()));
}

#[tokio::test]
async fn test_delete_user_unknown_id_is_404() {
    let app = memory_app();

    let (status, _) = send(&app, Method::DELETE, "/users", Some(json!({"id": Uuid::new_v4()}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_missing_id_is_400() {
    let app = memory_app();

    let (status, _) = send(&app, Method::DELETE, "/users", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ==================== HEALTH ====================

#[tokio::test]
async fn test_health_check() {
    let app = memory_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

// ==================== API ERROR MAPPING TESTS ====================

#[tokio::test]
async fn test_api_error_statuses() {
    use user_api::error::ApiError;

    let cases = [
        (ApiError::BadRequest("invalid input".to_string()), StatusCode::BAD_REQUEST),
        (ApiError::NotFound("user not found".to_string()), StatusCode::NOT_FOUND),
        (ApiError::Conflict("username already exists".to_string()), StatusCode::CONFLICT),
        (ApiError::Unavailable("store unavailable".to_string()), StatusCode::SERVICE_UNAVAILABLE),
        (ApiError::Internal("database error".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        (ApiError::invalid_uuid(), StatusCode::BAD_REQUEST),
        (ApiError::user_not_found(), StatusCode::NOT_FOUND),
    ];

    for (error, expected) in cases {
        assert_eq!(error.into_response().status(), expected);
    }
}

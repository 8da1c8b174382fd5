use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use crate::error::{ApiError, ErrorResponse, handle_service_error};
use crate::methods::entities::{CreateUserRequest, MessageResponse};
use crate::state::AppState;
use crate::methods::routes::USERS_PATH;

#[utoipa::path(
    post,
    path = USERS_PATH,
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = MessageResponse),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn create_user(
    axum::extract::State(state): axum::extract::State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state.user_service
        .create_user(&payload.username, &payload.password, &payload.roles, payload.active)
        .await
        .map_err(|e| handle_service_error(e, &state.env, "create_user"))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("New user {} created", user.username))),
    ))
}

use axum::extract::rejection::JsonRejection;
use axum::Json;
use validator::Validate;
use crate::error::{ApiError, ErrorResponse, handle_service_error};
use crate::methods::entities::{MessageResponse, UpdateUserRequest};
use crate::state::AppState;
use crate::methods::routes::USERS_PATH;

#[utoipa::path(
    patch,
    path = USERS_PATH,
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = MessageResponse),
        (status = 400, description = "Missing or malformed field", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Stale revision or username already exists", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn update_user(
    axum::extract::State(state): axum::extract::State<AppState>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user_id = payload.id;
    let revision = payload.revision;

    let user = state.user_service
        .update_user(user_id, revision, payload.into())
        .await
        .map_err(|e| handle_service_error(e, &state.env, "update_user"))?;

    Ok(Json(MessageResponse::new(format!("{} updated", user.username))))
}

use axum::extract::rejection::JsonRejection;
use axum::Json;
use crate::error::{ApiError, ErrorResponse, handle_service_error};
use crate::methods::entities::DeleteUserRequest;
use crate::state::AppState;
use crate::methods::routes::USERS_PATH;

#[utoipa::path(
    delete,
    path = USERS_PATH,
    tag = "users",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "User deleted; body is \"Username <name> with ID <id> deleted\"", body = String),
        (status = 400, description = "Missing or malformed id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    axum::extract::State(state): axum::extract::State<AppState>,
    payload: Result<Json<DeleteUserRequest>, JsonRejection>,
) -> Result<Json<String>, ApiError> {
    let Json(payload) = payload?;

    let user = state.user_service
        .delete_user(payload.id)
        .await
        .map_err(|e| handle_service_error(e, &state.env, "delete_user"))?;

    Ok(Json(format!("Username {} with ID {} deleted", user.username, user.id)))
}

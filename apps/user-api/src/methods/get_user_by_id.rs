use axum::Json;
use uuid::Uuid;
use crate::error::{ApiError, ErrorResponse, handle_service_error};
use crate::methods::entities::UserResponse;
use crate::state::AppState;
use crate::methods::routes::USERS_BY_ID_PATH;

#[utoipa::path(
    get,
    path = USERS_BY_ID_PATH,
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid UUID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn get_user_by_id(
    axum::extract::Path(id): axum::extract::Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let parsed_id = Uuid::parse_str(&id).map_err(|_| ApiError::invalid_uuid())?;

    match state.user_service.get_user(parsed_id).await {
        Ok(Some(user)) => Ok(Json(UserResponse::from(user))),
        Ok(None) => Err(ApiError::user_not_found()),
        Err(e) => Err(handle_service_error(e, &state.env, "get_user")),
    }
}

use axum::{extract::Query, Json};
use uuid::Uuid;
use crate::error::{ApiError, ErrorResponse, handle_service_error};
use crate::methods::entities::{UserQuery, UserResponse, UsersResponse};
use crate::state::AppState;
use crate::methods::routes::USERS_PATH;

#[utoipa::path(
    get,
    path = USERS_PATH,
    tag = "users",
    params(UserQuery),
    responses(
        (status = 200, description = "All users, or the single user matching `id`", body = UsersResponse),
        (status = 400, description = "Invalid UUID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn get_users(
    axum::extract::State(state): axum::extract::State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UsersResponse>, ApiError> {
    if let Some(id) = query.id {
        let parsed_id = Uuid::parse_str(&id).map_err(|_| ApiError::invalid_uuid())?;
        let user = state.user_service
            .get_user(parsed_id)
            .await
            .map_err(|e| handle_service_error(e, &state.env, "get_user"))?
            .ok_or_else(ApiError::user_not_found)?;
        return Ok(Json(UsersResponse::One(UserResponse::from(user))));
    }

    let users = state.user_service
        .get_users()
        .await
        .map_err(|e| handle_service_error(e, &state.env, "get_users"))?;

    Ok(Json(UsersResponse::Many(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

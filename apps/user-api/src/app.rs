use axum::{
    http::{header, HeaderName, Method, StatusCode},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::MiddlewareConfig;
use crate::error::ErrorResponse;
use crate::methods::create_user::{__path_create_user, create_user};
use crate::methods::delete_user::{__path_delete_user, delete_user};
use crate::methods::entities::{
    CreateUserRequest, DeleteUserRequest, MessageResponse, UpdateUserRequest, UserResponse,
    UsersResponse,
};
use crate::methods::get_user_by_id::{__path_get_user_by_id, get_user_by_id};
use crate::methods::get_users::{__path_get_users, get_users};
use crate::methods::health_check::{__path_health_check, health_check};
use crate::methods::routes::{
    OPENAPI_JSON_PATH, SERVICE_DOCS_PATH, SERVICE_HEALTH_PATH, USERS_BY_ID_PATH, USERS_PATH,
};
use crate::methods::update_user::{__path_update_user, update_user};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_user, get_users, get_user_by_id, update_user, delete_user, health_check
    ),
    components(schemas(
        CreateUserRequest, UpdateUserRequest, DeleteUserRequest,
        UserResponse, UsersResponse, MessageResponse, ErrorResponse
    )),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "service", description = "Service endpoints")
    )
)]
pub struct ApiDoc;

/// Routes with state applied, without the middleware stack.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            USERS_PATH,
            get(get_users)
                .post(create_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route(USERS_BY_ID_PATH, get(get_user_by_id))
        .route(SERVICE_HEALTH_PATH, get(health_check))
        .merge(SwaggerUi::new(SERVICE_DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .with_state(state)
}

/// Wraps `app` in the production middleware stack.
///
/// Order: Request → Rate Limit → Timeout → CORS → Body Limit → Request ID → Trace → Handler
pub fn with_middleware(mut app: Router, config: &MiddlewareConfig) -> Result<Router, String> {
    // 1. Trace layer (innermost)
    app = app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::DEBUG))
            .on_response(DefaultOnResponse::new().level(tracing::Level::DEBUG)),
    );

    // 2. Request ID layers
    let x_request_id = HeaderName::from_static("x-request-id");
    app = app
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid));

    // 3. Body limit layer
    app = app.layer(RequestBodyLimitLayer::new(config.max_body_size));

    // 4. CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION, x_request_id];
    let cors_layer = if config.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };
    app = app.layer(cors_layer.allow_methods(methods).allow_headers(headers));

    // 5. Timeout layer (408 Request Timeout)
    app = app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ));

    // 6. Rate limiting layer (outermost)
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(config.replenish_interval_ms())
            .burst_size(config.rate_limit_burst)
            .finish()
            .ok_or_else(|| "failed to build rate limiter config".to_string())?,
    );
    app = app.layer(GovernorLayer::new(governor_conf));

    Ok(app)
}

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use user_lib::repository::traits::UserRepositoryTrait;
use user_lib::repository::{InMemoryUserRepository, UserRepository};
use user_lib::util::{connect_with_retry, run_migrations};

use user_api::config::{MiddlewareConfig, StoreBackend, StoreConfig};
use user_api::constants::{ENV, LOCAL_ENV, SERVICE, USER_API_PORT};
use user_api::shutdown::{drain_deadline, shutdown_requested, shutdown_signal};
use user_api::{routes, with_middleware, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing subscriber
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let env = std::env::var(ENV)
        .map_err(|_| format!("{} environment variable must be set", ENV))?;

    let registry = tracing_subscriber::registry().with(filter);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    if env == LOCAL_ENV {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .pretty();
        registry.with(json_layer).with(pretty_layer).init();
    } else {
        registry.with(json_layer).init();
    }

    tracing::info!(service = SERVICE, env = %env, "tracing initialized");

    let middleware_config = MiddlewareConfig::from_env();
    tracing::info!(
        rate_limit_per_minute = middleware_config.rate_limit_per_minute,
        rate_limit_burst = middleware_config.rate_limit_burst,
        request_timeout_secs = middleware_config.request_timeout.as_secs(),
        max_body_size = middleware_config.max_body_size,
        cors_origins = ?middleware_config.cors_allowed_origins,
        "middleware configuration loaded"
    );

    // The store handle lives for the whole process and is closed after the
    // server has drained.
    let store_config = StoreConfig::from_env()?;
    tracing::info!(store = store_config.name(), "store configuration loaded");

    let (user_repo, pool) = match store_config.backend {
        StoreBackend::MySql { database_url, connect_retries } => {
            let pool = connect_with_retry(&database_url, connect_retries).await?;
            run_migrations(&pool).await?;
            tracing::info!("database migrations applied");
            (Arc::new(UserRepository::new(pool.clone())) as Arc<dyn UserRepositoryTrait>, Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory user store, data is lost on restart");
            (Arc::new(InMemoryUserRepository::new()) as Arc<dyn UserRepositoryTrait>, None)
        }
    };

    let app_state = AppState::new(user_repo, env.clone());
    let app = with_middleware(routes(app_state), &middleware_config)?;

    // Read port from env (default to 3333)
    let port: u16 = std::env::var(USER_API_PORT)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3333);

    let addr = format!("0.0.0.0:{}", port);
    let public_url = format!("http://127.0.0.1:{}", port);

    let listener = TcpListener::bind(&addr).await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(
        "user-api is ready to accept requests at: {}",
        public_url
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    // Serve with graceful shutdown, bounded by the drain timeout
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()))
    .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| format!("Server error: {}", e))?;
        }
        _ = drain_deadline(shutdown_rx, middleware_config.shutdown_timeout) => {
            tracing::warn!("drain timeout elapsed, closing remaining connections");
        }
    }

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("database pool closed");
    }

    tracing::info!("user-api stopped");
    Ok(())
}

pub const SERVICE: &str = "user-api";
pub const ENV: &str = "ENV";

pub const LOCAL_ENV: &str = "local";

pub const USER_API_PORT: &str = "USER_API_PORT";

// Store configuration
pub const USER_STORE: &str = "USER_STORE";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_CONNECT_RETRIES: &str = "DATABASE_CONNECT_RETRIES";

// Middleware configuration
pub const RATE_LIMIT_PER_MINUTE: &str = "RATE_LIMIT_PER_MINUTE";
pub const RATE_LIMIT_BURST: &str = "RATE_LIMIT_BURST";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
pub const MAX_BODY_SIZE_BYTES: &str = "MAX_BODY_SIZE_BYTES";
pub const SHUTDOWN_TIMEOUT_SECS: &str = "SHUTDOWN_TIMEOUT_SECS";

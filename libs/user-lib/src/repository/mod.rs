pub mod user_repository;
pub mod memory_repository;
pub mod models;
pub mod errors;
pub mod traits;

pub use user_repository::UserRepository;
pub use memory_repository::InMemoryUserRepository;
pub use errors::UserRepositoryError;

pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use argon2::MEMORY_COST_KIB;
pub use argon2::PARALLELISM;
pub use argon2::TIME_COST;
pub use errors::PasswordError;

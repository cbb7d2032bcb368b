//! Persistence layer modules.

pub mod counter_repo;
pub mod db;
pub mod schema;
pub mod worker_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;

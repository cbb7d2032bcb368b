//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Persistence failure when interacting with `SQLite`.
    Db(String),
    /// Form number could not be allocated or durably committed.
    Allocation(String),
    /// Registration payload failed validation.
    Validation(String),
    /// Operator has reached the configured registration quota.
    LimitReached(String),
    /// Requested entity does not exist.
    NotFound(String),
    /// Document composition or serialization failure.
    Render(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::Allocation(msg) => write!(f, "allocation: {msg}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::LimitReached(msg) => write!(f, "limit reached: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Render(msg) => write!(f, "render: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#![forbid(unsafe_code)]

//! Worker registration service: sequential form numbers, PDF application
//! forms and acknowledgement receipts.

pub mod allocator;
pub mod api;
pub mod assets;
pub mod config;
pub mod document;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod qr;
pub mod registry;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};

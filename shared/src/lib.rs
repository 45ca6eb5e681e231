//! Shared types for the Mesa restaurant service
//!
//! Data models and the unified error system used by `mesa-server` and its
//! HTTP clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};

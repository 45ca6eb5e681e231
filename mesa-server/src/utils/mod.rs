//! Utilities - shared helpers for the service
//!
//! - [`AppError`] / [`ApiResponse`] - unified error types (from `shared::error`)
//! - [`Clock`] - injectable time source
//! - [`with_deadline`] - bounded wait for business operations
//! - logging and validation helpers

pub mod clock;
pub mod deadline;
pub mod extract;
pub mod logger;
pub mod validation;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use deadline::with_deadline;
pub use extract::AppJson;
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

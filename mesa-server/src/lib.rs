//! Mesa Server - restaurant ordering and reservation service
//!
//! # Module layout
//!
//! ```text
//! mesa-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── auth/          # JWT verification, role middleware
//! ├── services/      # orders, tables, reservations, menu, ...
//! ├── api/           # HTTP routes and handlers
//! ├── cache/         # TTL cache for availability lookups
//! ├── db/            # SQLite pool, migrations, repositories
//! └── utils/         # clock, deadlines, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Load `.env` and start logging
///
/// Logging settings are read before the full [`Config`] so that config
/// warnings are already visible.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(Box::new(e));
    }

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_json = std::env::var("LOG_JSON").ok().and_then(|v| v.parse().ok());
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  _________ _
  / /|_/ / _ \/ ___/ __ `/
 / /  / /  __(__  ) /_/ /
/_/  /_/\___/____/\__,_/
    "#
    );
}

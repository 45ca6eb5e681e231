//! Logging Infrastructure
//!
//! `tracing-subscriber` with an env filter, optional JSON output and an
//! optional daily rolling file under `LOG_DIR`.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional level, JSON format and file output
///
/// `RUST_LOG` wins over `log_level` when set. Calling this twice is harmless;
/// the second subscriber is ignored.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mesa_server={level},tower_http={level}")));
    let json = json.unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "mesa-server");
            let builder = builder.with_ansi(false).with_writer(file_appender);
            let _ = if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };
            return;
        }
    }

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::JwtConfig;

/// Reservation slot policy
///
/// `advisory` lets concurrent creations for the same `(date, time)` both
/// succeed; `exclusive` serializes them per slot and rejects a second booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservationSlotPolicy {
    #[default]
    Advisory,
    Exclusive,
}

/// What deleting a table does to non-terminal orders that reference it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableDeletePolicy {
    /// Refuse with `TableInUse`
    #[default]
    Reject,
    /// Detach the orders (`table_id = NULL`) in the same transaction
    Cascade,
    /// Delete and leave the dangling reference
    AllowOrphan,
}

/// Order status transition rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderTransitionPolicy {
    /// Any status may follow any other
    #[default]
    Permissive,
    /// received → preparing → ready → delivered, cancel from received/preparing
    Strict,
}

/// Unknown policy name in the environment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct PolicyParseError {
    kind: &'static str,
    value: String,
}

macro_rules! policy_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PolicyParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(PolicyParseError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

policy_names!(ReservationSlotPolicy, "reservation slot policy", {
    Advisory => "advisory",
    Exclusive => "exclusive",
});

policy_names!(TableDeletePolicy, "table delete policy", {
    Reject => "reject",
    Cascade => "cascade",
    AllowOrphan => "allow_orphan",
});

policy_names!(OrderTransitionPolicy, "order transition policy", {
    Permissive => "permissive",
    Strict => "strict",
});

/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory (database, logs) |
/// | DATABASE_URL | sqlite:{WORK_DIR}/mesa.db | SQLite URL |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | default log level |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | daily rolling log files |
/// | REQUEST_TIMEOUT_MS | 10000 | business operation deadline |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | graceful shutdown wait |
/// | AVAILABILITY_CACHE_TTL_MS | 5000 | availability cache TTL |
/// | RESERVATION_CACHE_TTL_MS | 30000 | reservations-by-date cache TTL |
/// | CACHE_SWEEP_INTERVAL_MS | 60000 | cache sweep period |
/// | RESERVATION_SLOT_POLICY | advisory | advisory / exclusive |
/// | TABLE_DELETE_POLICY | reject | reject / cascade / allow_orphan |
/// | ORDER_TRANSITION_POLICY | permissive | permissive / strict |
/// | SEED_SAMPLE_DATA | false | seed sample menu and tables on an empty db |
/// | DB_CONNECT_ATTEMPTS | 5 | database connect attempts |
/// | DB_CONNECT_BASE_DELAY_MS | 500 | first retry delay, doubled each attempt |
///
/// JWT settings come from `JWT_SECRET`, `JWT_ISSUER`, `JWT_AUDIENCE` and
/// `JWT_EXPIRATION_MINUTES` (see [`JwtConfig`]).
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 TABLE_DELETE_POLICY=cascade cargo run -p mesa-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_url: String,
    pub http_port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub request_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
    pub availability_cache_ttl_ms: u64,
    pub reservation_cache_ttl_ms: u64,
    pub cache_sweep_interval_ms: u64,
    pub reservation_slot_policy: ReservationSlotPolicy,
    pub table_delete_policy: TableDeletePolicy,
    pub order_transition_policy: OrderTransitionPolicy,
    pub seed_sample_data: bool,
    pub db_connect_attempts: u32,
    pub db_connect_base_delay_ms: u64,
    pub jwt: JwtConfig,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = key, value = %value, "Ignoring unparsable value, using default");
            default
        }),
        None => default,
    }
}

fn env_policy<T: FromStr<Err = PolicyParseError> + Default>(key: &str) -> T {
    match std::env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|e: PolicyParseError| {
            tracing::warn!(variable = key, error = %e, "Falling back to default policy");
            T::default()
        }),
        Err(_) => T::default(),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| format!("sqlite:{}/mesa.db", work_dir.trim_end_matches('/')));

        Self {
            database_url,
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 10_000),
            shutdown_timeout_ms: env_or("SHUTDOWN_TIMEOUT_MS", 10_000),
            availability_cache_ttl_ms: env_or("AVAILABILITY_CACHE_TTL_MS", 5_000),
            reservation_cache_ttl_ms: env_or("RESERVATION_CACHE_TTL_MS", 30_000),
            cache_sweep_interval_ms: env_or("CACHE_SWEEP_INTERVAL_MS", 60_000),
            reservation_slot_policy: env_policy("RESERVATION_SLOT_POLICY"),
            table_delete_policy: env_policy("TABLE_DELETE_POLICY"),
            order_transition_policy: env_policy("ORDER_TRANSITION_POLICY"),
            seed_sample_data: env_or("SEED_SAMPLE_DATA", false),
            db_connect_attempts: env_or("DB_CONNECT_ATTEMPTS", 5),
            db_connect_base_delay_ms: env_or("DB_CONNECT_BASE_DELAY_MS", 500),
            jwt: JwtConfig::default(),
            work_dir,
        }
    }

    /// Configuration for tests: in-memory database, fixed JWT secret,
    /// defaults for everything else regardless of the environment
    pub fn for_tests() -> Self {
        Self {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_json: false,
            log_dir: None,
            request_timeout_ms: 10_000,
            shutdown_timeout_ms: 1_000,
            availability_cache_ttl_ms: 5_000,
            reservation_cache_ttl_ms: 30_000,
            cache_sweep_interval_ms: 60_000,
            reservation_slot_policy: ReservationSlotPolicy::default(),
            table_delete_policy: TableDeletePolicy::default(),
            order_transition_policy: OrderTransitionPolicy::default(),
            seed_sample_data: false,
            db_connect_attempts: 1,
            db_connect_base_delay_ms: 10,
            jwt: JwtConfig::for_tests(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// At least 1ms; a zero interval would never tick
    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.cache_sweep_interval_ms.max(1))
    }

    /// Make sure the working directory exists
    pub fn ensure_work_dir(&self) -> std::io::Result<PathBuf> {
        let dir = PathBuf::from(&self.work_dir);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

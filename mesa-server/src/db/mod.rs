//! Database Module
//!
//! SQLite connection pool, bootstrap retries and embedded migrations.

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// 数据库服务，持有 SQLite 连接池
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// 打开 `database_url` (指数退避重试)，然后执行迁移
    ///
    /// 第 `n` 次失败后等待 `base_delay * 2^(n-1)` 再重试。只有启动阶段
    /// 会重试，业务操作从不重试。
    pub async fn connect(
        database_url: &str,
        attempts: u32,
        base_delay: Duration,
    ) -> Result<Self, AppError> {
        let attempts = attempts.max(1);
        let mut delay = base_delay;
        let mut attempt = 1;

        loop {
            match Self::open(database_url).await {
                Ok(pool) => {
                    let db = Self { pool };
                    db.migrate().await?;
                    return Ok(db);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(attempts, error = %e, "Database connection failed");
                    return Err(e);
                }
            }
        }
    }

    /// 已应用表结构的私有内存数据库
    ///
    /// 只用一个永不回收的连接：每个 SQLite `:memory:` 连接都是独立的数据库。
    pub async fn in_memory() -> Result<Self, AppError> {
        let db = Self {
            pool: Self::memory_pool().await?,
        };
        db.migrate().await?;
        Ok(db)
    }

    async fn memory_pool() -> Result<SqlitePool, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Ok(pool)
    }

    async fn open(database_url: &str) -> Result<SqlitePool, AppError> {
        if database_url.contains(":memory:") {
            return Self::memory_pool().await;
        }

        // WAL, foreign keys, normal sync, wait on write contention
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");
        Ok(pool)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// `SELECT 1` round trip
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::database(e.to_string()))
    }
}

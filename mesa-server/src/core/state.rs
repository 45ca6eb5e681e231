//! Server State
//!
//! 持有所有请求共享的服务句柄。克隆开销很小：连接池、缓存和
//! JWT 服务都是引用计数的。
//!
//! | 字段 | 说明 |
//! |------|------|
//! | config | 不可变配置 |
//! | db | SQLite 连接池 |
//! | clock | 时间戳和缓存年龄的时间源 |
//! | jwt_service | Bearer 令牌校验 |
//! | availability_cache | `date\|time` → 时段是否空闲 |
//! | reservation_cache | `date` → 当天的预订 |
//! | menu ... dashboard | 业务服务 |

use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtService;
use crate::cache::TtlCache;
use crate::core::{BackgroundTasks, Config, Result};
use crate::db::DbService;
use crate::services::{
    AvailabilityChecker, ContactService, DashboardService, MenuService, OrderService,
    ReservationService, TableRegistry, seed,
};
use crate::utils::{SharedClock, SystemClock};
use shared::models::Reservation;

#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub clock: SharedClock,
    pub jwt_service: Arc<JwtService>,
    pub availability_cache: TtlCache<bool>,
    pub reservation_cache: TtlCache<Vec<Reservation>>,
    pub menu: MenuService,
    pub orders: OrderService,
    pub tables: TableRegistry,
    pub reservations: ReservationService,
    pub availability: AvailabilityChecker,
    pub contacts: ContactService,
    pub dashboard: DashboardService,
}

impl ServerState {
    /// 基于已打开的数据库组装各个服务
    pub fn from_parts(config: Config, db: DbService, clock: SharedClock) -> Self {
        let pool = db.pool.clone();
        let availability_cache = TtlCache::new(
            "availability",
            Duration::from_millis(config.availability_cache_ttl_ms),
            clock.clone(),
        );
        let reservation_cache = TtlCache::new(
            "reservations_by_date",
            Duration::from_millis(config.reservation_cache_ttl_ms),
            clock.clone(),
        );

        Self {
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            menu: MenuService::new(pool.clone(), clock.clone()),
            orders: OrderService::new(pool.clone(), clock.clone(), config.order_transition_policy),
            tables: TableRegistry::new(pool.clone(), clock.clone(), config.table_delete_policy),
            reservations: ReservationService::new(
                pool.clone(),
                clock.clone(),
                config.reservation_slot_policy,
                availability_cache.clone(),
                reservation_cache.clone(),
            ),
            availability: AvailabilityChecker::new(pool.clone(), availability_cache.clone()),
            contacts: ContactService::new(pool.clone(), clock.clone()),
            dashboard: DashboardService::new(pool, clock.clone()),
            availability_cache,
            reservation_cache,
            config,
            db,
            clock,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序：
    /// 1. 工作目录
    /// 2. 数据库 (带重试的连接 + 迁移)
    /// 3. 服务
    /// 4. 示例数据 (启用时)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir()?;

        let db = DbService::connect(
            &config.database_url,
            config.db_connect_attempts,
            Duration::from_millis(config.db_connect_base_delay_ms),
        )
        .await?;

        let state = Self::from_parts(config.clone(), db, Arc::new(SystemClock));

        if config.seed_sample_data {
            seed::seed_sample_data(&state.db.pool, state.clock.now_millis()).await;
        }

        tracing::info!(
            environment = %config.environment,
            slot_policy = %config.reservation_slot_policy,
            table_delete_policy = %config.table_delete_policy,
            order_transition_policy = %config.order_transition_policy,
            "Server state initialized"
        );
        Ok(state)
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 开始服务之前调用。返回的管理器在
    /// `shutdown` 时停止所有任务。
    ///
    /// 启动的任务：
    /// - 缓存清扫 (两个缓存，每 `CACHE_SWEEP_INTERVAL_MS` 一次)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let availability = self.availability_cache.clone();
        let reservations = self.reservation_cache.clone();
        tasks.spawn_periodic("cache_sweep", self.config.cache_sweep_interval(), move || {
            let availability = availability.clone();
            let reservations = reservations.clone();
            async move {
                let removed = availability.sweep() + reservations.sweep();
                if removed > 0 {
                    tracing::debug!(removed, "Cache sweep finished");
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}

//! 后台任务管理
//!
//! 统一管理后台任务的注册、启动和关闭。任务被包装以捕获 panic，
//! 并通过同一个 [`CancellationToken`] 一起关闭。
//!
//! 目前只有定时任务（缓存清扫），见 [`BackgroundTasks::spawn_periodic`]。

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 定时任务的最小周期 (`interval_at` 不接受 0)
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// 已注册的后台任务
struct RegisteredTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// 后台任务管理器
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// tasks.spawn_periodic("cache_sweep", Duration::from_secs(60), move || {
///     let caches = caches.clone();
///     async move { caches.sweep(); }
/// });
/// tasks.shutdown(Duration::from_secs(10)).await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    /// 全局取消令牌
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// 任务监听的关闭令牌
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 注册并启动任务
    ///
    /// panic 或意外退出都会记录日志，不会静默丢失任务。
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.clone();
        let wrapped_future = async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(()) => {
                    if !token.is_cancelled() {
                        tracing::warn!(task = %name, "Background task completed unexpectedly");
                    }
                }
                Err(panic_info) => {
                    let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(task = %name, panic = %panic_msg, "Background task panicked");
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, "Registered background task");
        self.tasks.push(RegisteredTask { name, handle });
    }

    /// 注册定时任务：每隔 `period` 执行一次 `tick`，直到关闭
    ///
    /// 第一次执行在注册后一个完整周期。周期至少 1ms。
    pub fn spawn_periodic<F, Fut>(&mut self, name: &'static str, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = if period < MIN_PERIOD {
            tracing::warn!(task = %name, period_ms = period.as_millis() as u64, "Period too short, using 1ms");
            MIN_PERIOD
        } else {
            period
        };

        let token = self.shutdown.clone();
        self.spawn(name, async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => tick().await,
                }
            }
        });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn log_summary(&self) {
        let names: Vec<_> = self.tasks.iter().map(|t| t.name).collect();
        tracing::info!(tasks = ?names, "Background tasks registered: {}", self.tasks.len());
    }

    /// 运行期间已经停止的任务数量
    pub fn check_health(&self) -> usize {
        let failed: Vec<_> = self
            .tasks
            .iter()
            .filter(|t| t.handle.is_finished())
            .collect();
        for task in &failed {
            tracing::error!(task = %task.name, "Background task unexpectedly finished");
        }
        failed.len()
    }

    /// 取消所有任务并等待退出，每个任务最多等待 `timeout`
    pub async fn shutdown(self, timeout: Duration) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());

        self.shutdown.cancel();

        for task in self.tasks {
            match tokio::time::timeout(timeout, task.handle).await {
                Ok(Ok(())) => tracing::debug!(task = %task.name, "Task completed"),
                Ok(Err(e)) if e.is_cancelled() => tracing::debug!(task = %task.name, "Task cancelled"),
                Ok(Err(e)) => tracing::error!(task = %task.name, error = ?e, "Task panicked"),
                Err(_) => tracing::warn!(task = %task.name, "Task did not stop before shutdown timeout"),
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

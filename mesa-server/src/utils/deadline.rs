//! Request deadline
//!
//! 处理器通过 [`with_deadline`] 执行业务操作。操作在独立任务中运行；
//! 超过截止时间后调用方不再等待并得到 `TimeoutError`，但该任务不会被
//! 取消，之后仍可能提交事务。

use std::future::Future;
use std::time::Duration;

use super::{AppError, AppResult};

/// Run `operation` on its own task and wait at most `deadline` for it
pub async fn with_deadline<F, T>(deadline: Duration, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(operation);

    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => {
            tracing::error!(error = %join_err, "Business operation task failed");
            Err(AppError::internal("Operation failed unexpectedly"))
        }
        Err(_) => {
            tracing::warn!(
                deadline_ms = deadline.as_millis() as u64,
                "Operation exceeded request deadline; it keeps running in the background"
            );
            Err(AppError::timeout(format!(
                "Operation did not complete within {} ms",
                deadline.as_millis()
            )))
        }
    }
}

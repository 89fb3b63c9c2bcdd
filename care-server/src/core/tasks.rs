//! 后台任务
//!
//! 所有长期运行的 future 都挂在同一个 [`JoinSet`] 上，共享一个取消令牌。
//! panic 会被捕获并记录，不会带走整个进程。

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// 关闭时等待任务退出的上限
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// 任务退出方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// future 正常返回
    Returned,
    /// future panic，附带 panic 文本
    Panicked(String),
}

pub struct BackgroundTasks {
    set: JoinSet<(&'static str, Exit)>,
    shutdown: CancellationToken,
    grace: Duration,
}

impl BackgroundTasks {
    /// 绑定到外部令牌；令牌触发即视为进入关闭流程
    pub fn with_token(shutdown: CancellationToken) -> Self {
        Self {
            set: JoinSet::new(),
            shutdown,
            grace: SHUTDOWN_GRACE,
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.set.spawn(async move {
            let exit = match AssertUnwindSafe(future).catch_unwind().await {
                Ok(()) => Exit::Returned,
                Err(payload) => Exit::Panicked(panic_text(payload.as_ref())),
            };
            (name, exit)
        });
        tracing::debug!(task = name, "background task started");
    }

    /// 仍在 JoinSet 中的任务数
    pub fn running(&self) -> usize {
        self.set.len()
    }

    /// 收集已经结束的任务；服务运行期间返回非空说明有任务提前退出
    pub fn reap_finished(&mut self) -> Vec<(&'static str, Exit)> {
        let mut finished = Vec::new();
        while let Some(joined) = self.set.try_join_next() {
            match joined {
                Ok((name, exit)) => {
                    log_exit(&self.shutdown, name, &exit);
                    finished.push((name, exit));
                }
                Err(e) => tracing::error!(error = %e, "background task join failed"),
            }
        }
        finished
    }

    /// 触发取消并等待全部任务退出，超过宽限期的直接 abort
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        let pending = self.set.len();
        tracing::info!(pending, "stopping background tasks");

        let (set, token) = (&mut self.set, &self.shutdown);
        let drained = tokio::time::timeout(self.grace, async {
            while let Some(joined) = set.join_next().await {
                if let Ok((name, exit)) = joined {
                    log_exit(token, name, &exit);
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                remaining = self.set.len(),
                "background tasks did not stop in time, aborting"
            );
            self.set.abort_all();
        } else {
            tracing::info!("background tasks stopped");
        }
    }
}

fn log_exit(shutdown: &CancellationToken, name: &'static str, exit: &Exit) {
    match exit {
        Exit::Panicked(msg) => tracing::error!(task = name, panic = %msg, "background task panicked"),
        Exit::Returned if !shutdown.is_cancelled() => {
            tracing::warn!(task = name, "background task returned before shutdown")
        }
        Exit::Returned => tracing::debug!(task = name, "background task finished"),
    }
}

fn panic_text(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn shutdown_reaches_every_task() {
        let mut tasks = BackgroundTasks::with_token(CancellationToken::new());
        let token = tasks.shutdown_token();
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();

        tasks.spawn("waiter", async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(tasks.running(), 1);
        assert!(tasks.reap_finished().is_empty());

        tasks.shutdown().await;
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panic_is_reported_not_propagated() {
        let mut tasks = BackgroundTasks::with_token(CancellationToken::new());
        tasks.spawn("boom", async {
            panic!("scanner exploded");
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let finished = tasks.reap_finished();
        assert_eq!(
            finished,
            vec![("boom", Exit::Panicked("scanner exploded".to_string()))]
        );
        assert_eq!(tasks.running(), 0);
        tasks.shutdown().await;
    }

    #[tokio::test]
    async fn stuck_task_is_aborted_after_grace() {
        let mut tasks = BackgroundTasks::with_token(CancellationToken::new());
        tasks.grace = Duration::from_millis(20);
        tasks.spawn("deaf", std::future::pending());

        tokio::time::timeout(Duration::from_secs(1), tasks.shutdown())
            .await
            .expect("shutdown must not hang");
    }
}

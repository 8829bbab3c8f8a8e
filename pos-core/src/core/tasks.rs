//! 后台任务 (快照 worker)
//!
//! 任务在 shutdown 令牌取消后应自行退出；每个任务的结束方式记录为
//! [`TaskOutcome`]，关闭时返回给调用方。

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 任务结束方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Returned after shutdown was requested
    Stopped,
    /// Returned on its own while the core was still running
    Exited,
    /// Panicked; the payload message is kept
    Panicked(String),
}

/// 后台任务集合
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// tasks.spawn("snapshot_worker", worker.run(tasks.shutdown_token()));
/// let report = tasks.shutdown().await;
/// ```
#[derive(Default)]
pub struct BackgroundTasks {
    shutdown: CancellationToken,
    running: Vec<(&'static str, JoinHandle<TaskOutcome>)>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Start `future`; a panic inside it is captured as [`TaskOutcome::Panicked`]
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(()) if shutdown.is_cancelled() => TaskOutcome::Stopped,
                Ok(()) => {
                    tracing::warn!(task = name, "Background task exited before shutdown");
                    TaskOutcome::Exited
                }
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic payload".to_string());
                    tracing::error!(task = name, panic = %message, "Background task panicked");
                    TaskOutcome::Panicked(message)
                }
            }
        });
        tracing::debug!(task = name, "Background task started");
        self.running.push((name, handle));
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Names of tasks that already ended (panicked or exited early)
    pub fn finished(&self) -> Vec<&'static str> {
        self.running
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Cancel every task and wait for it; returns how each one ended
    pub async fn shutdown(self) -> Vec<(&'static str, TaskOutcome)> {
        self.shutdown.cancel();

        let mut report = Vec::with_capacity(self.running.len());
        for (name, handle) in self.running {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                // wrapper 已捕获 panic，这里只剩 runtime 取消
                Err(e) => TaskOutcome::Panicked(e.to_string()),
            };
            report.push((name, outcome));
        }
        let clean = report
            .iter()
            .filter(|(_, outcome)| *outcome == TaskOutcome::Stopped)
            .count();
        tracing::info!(total = report.len(), clean, "Background tasks stopped");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_task_reports_stopped() {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        tasks.spawn("waiter", async move { token.cancelled().await });
        assert_eq!(tasks.len(), 1);
        assert!(tasks.finished().is_empty());

        let report = tasks.shutdown().await;
        assert_eq!(report, vec![("waiter", TaskOutcome::Stopped)]);
    }

    #[tokio::test]
    async fn test_early_exit_and_panic_reported() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("quitter", async {});
        tasks.spawn("boom", async { panic!("snapshot disk gone") });

        // 两个任务都会立即结束
        while tasks.finished().len() < 2 {
            tokio::task::yield_now().await;
        }
        let report = tasks.shutdown().await;
        assert_eq!(
            report,
            vec![
                ("quitter", TaskOutcome::Exited),
                ("boom", TaskOutcome::Panicked("snapshot disk gone".into())),
            ]
        );
    }
}

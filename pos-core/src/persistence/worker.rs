//! Snapshot Worker - 定时快照
//!
//! 每隔固定间隔把 Store 写入 redb；收到 shutdown 信号后写最后一次快照再退出。
//!
//! Note: redb operations are synchronous; the read lock is released before
//! the write to disk starts.

use super::{SnapshotStore, StorageResult};
use crate::core::store::SharedStore;
use shared::util::now_millis;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct SnapshotWorker {
    store: SharedStore,
    snapshots: SnapshotStore,
    interval: Duration,
}

impl SnapshotWorker {
    pub fn new(store: SharedStore, snapshots: SnapshotStore, interval: Duration) -> Self {
        Self {
            store,
            snapshots,
            interval,
        }
    }

    /// Write one snapshot now
    pub fn save_now(&self) -> StorageResult<()> {
        let state = self.store.read().to_persisted(now_millis());
        self.snapshots.save(&state)?;
        tracing::debug!(
            tables = state.tables.len(),
            orders = state.orders.len(),
            reservations = state.reservations.len(),
            transactions = state.transactions.len(),
            "Snapshot written"
        );
        Ok(())
    }

    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(interval_secs = self.interval.as_secs(), "SnapshotWorker started");

        let mut ticker = tokio::time::interval(self.interval);
        // 第一次 tick 立即返回，跳过
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    match self.save_now() {
                        Ok(()) => tracing::info!("Final snapshot written"),
                        Err(e) => tracing::error!(error = %e, "Final snapshot failed"),
                    }
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.save_now() {
                        tracing::error!(error = %e, "Periodic snapshot failed");
                    }
                }
            }
        }

        tracing::info!("SnapshotWorker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Store;
    use parking_lot::RwLock;
    use shared::models::DiningTableCreate;
    use std::sync::Arc;

    fn shared_store() -> SharedStore {
        let mut store = Store::new();
        store
            .tables
            .insert(DiningTableCreate {
                id: Some("T1".into()),
                name: "Window".into(),
                capacity: 2,
                zone_id: None,
            })
            .unwrap();
        Arc::new(RwLock::new(store))
    }

    #[test]
    fn test_save_now_writes_store() {
        let snapshots = SnapshotStore::open_in_memory().unwrap();
        let worker = SnapshotWorker::new(shared_store(), snapshots.clone(), Duration::from_secs(60));

        worker.save_now().unwrap();
        let loaded = snapshots.load().unwrap();
        assert_eq!(loaded.tables.len(), 1);
        assert!(loaded.saved_at.is_some());
    }

    #[tokio::test]
    async fn test_final_snapshot_on_shutdown() {
        let snapshots = SnapshotStore::open_in_memory().unwrap();
        let worker = SnapshotWorker::new(shared_store(), snapshots.clone(), Duration::from_secs(3600));
        let token = CancellationToken::new();

        let handle = tokio::spawn(worker.run(token.clone()));
        token.cancel();
        handle.await.unwrap();

        assert_eq!(snapshots.load().unwrap().tables.len(), 1);
    }
}

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    error::{DashboardError, Result},
    state::{Action, DashboardState, Store},
};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

enum QueueItem {
    Dispatch {
        action: Action,
        applied: Option<oneshot::Sender<Arc<DashboardState>>>,
    },
    DispatchWith {
        derive: Derive,
        applied: oneshot::Sender<Arc<DashboardState>>,
    },
    Read(oneshot::Sender<Arc<DashboardState>>),
}

type Derive = Box<dyn FnOnce(&DashboardState) -> Action + Send>;

#[derive(Clone)]
pub struct DispatchHandle {
    tx: mpsc::Sender<QueueItem>,
    snapshots: watch::Receiver<Arc<DashboardState>>,
}

impl DispatchHandle {
    /// Enqueue an action without waiting for it to be reduced.
    pub async fn dispatch(&self, action: impl Into<Action>) -> Result<()> {
        self.tx
            .send(QueueItem::Dispatch {
                action: action.into(),
                applied: None,
            })
            .await
            .map_err(|_| DashboardError::QueueClosed)
    }

    /// Enqueue an action and wait for the snapshot it produced.
    pub async fn apply(&self, action: impl Into<Action>) -> Result<Arc<DashboardState>> {
        let (applied_tx, applied_rx) = oneshot::channel();
        self.tx
            .send(QueueItem::Dispatch {
                action: action.into(),
                applied: Some(applied_tx),
            })
            .await
            .map_err(|_| DashboardError::QueueClosed)?;
        applied_rx.await.map_err(|_| DashboardError::QueueClosed)
    }

    /// Build the action from the current snapshot and reduce it in the same
    /// queue turn, so nothing can land between the read and the write.
    pub async fn apply_with<F>(&self, derive: F) -> Result<Arc<DashboardState>>
    where
        F: FnOnce(&DashboardState) -> Action + Send + 'static,
    {
        let (applied_tx, applied_rx) = oneshot::channel();
        self.tx
            .send(QueueItem::DispatchWith {
                derive: Box::new(derive),
                applied: applied_tx,
            })
            .await
            .map_err(|_| DashboardError::QueueClosed)?;
        applied_rx.await.map_err(|_| DashboardError::QueueClosed)
    }

    /// Snapshot after every action queued before this call has been reduced.
    pub async fn current(&self) -> Result<Arc<DashboardState>> {
        let (read_tx, read_rx) = oneshot::channel();
        self.tx
            .send(QueueItem::Read(read_tx))
            .await
            .map_err(|_| DashboardError::QueueClosed)?;
        read_rx.await.map_err(|_| DashboardError::QueueClosed)
    }

    /// Latest published snapshot, without waiting on the queue.
    pub fn latest(&self) -> Arc<DashboardState> {
        Arc::clone(&self.snapshots.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.snapshots.clone()
    }
}

/// Moves `store` into a reducer task. The task ends, handing the store back,
/// once every `DispatchHandle` is dropped.
pub fn spawn_store(store: Store, capacity: usize) -> (DispatchHandle, JoinHandle<Store>) {
    let (tx, mut rx) = mpsc::channel(capacity.max(1));
    let (snapshots_tx, snapshots) = watch::channel(store.snapshot());

    let task = tokio::spawn(async move {
        let mut store = store;
        let mut reduced: u64 = 0;
        while let Some(item) = rx.recv().await {
            match item {
                QueueItem::Dispatch { action, applied } => {
                    let snapshot = store.dispatch(action);
                    reduced += 1;
                    snapshots_tx.send_replace(Arc::clone(&snapshot));
                    if let Some(applied) = applied {
                        let _ = applied.send(snapshot);
                    }
                }
                QueueItem::DispatchWith { derive, applied } => {
                    let action = derive(&store.snapshot());
                    let snapshot = store.dispatch(action);
                    reduced += 1;
                    snapshots_tx.send_replace(Arc::clone(&snapshot));
                    let _ = applied.send(snapshot);
                }
                QueueItem::Read(reply) => {
                    let _ = reply.send(store.snapshot());
                }
            }
        }
        debug!(reduced, "dispatch queue drained");
        store
    });

    (DispatchHandle { tx, snapshots }, task)
}

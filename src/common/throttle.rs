//! Paced FIFO delivery queues.
//!
//! Both outbound directions (commands toward C-Gate, publications
//! toward the broker) are paced so that bursts of activity do not
//! flood either peer.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

/// Handle to a paced delivery queue.
///
/// Items are delivered in push order, never closer together than the
/// configured interval. The first item pushed to an idle queue goes
/// out immediately.
#[derive(Debug)]
pub struct ThrottledQueue<T> {
    items_tx: mpsc::UnboundedSender<T>,
}

// Derived Clone would demand T: Clone; the handle only clones the sender.
impl<T> Clone for ThrottledQueue<T> {
    fn clone(&self) -> Self {
        Self {
            items_tx: self.items_tx.clone(),
        }
    }
}

impl<T: Send + 'static> ThrottledQueue<T> {
    /// Spawn the delivery worker and return a handle to feed it.
    ///
    /// The worker calls `deliver` for each item, then sleeps for the
    /// interval before taking the next one.
    pub fn spawn<F, Fut>(interval: Duration, mut deliver: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (items_tx, mut items_rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(item) = items_rx.recv().await {
                deliver(item).await;
                tokio::time::sleep(interval).await;
            }
            debug!("Throttled queue closed");
        });

        Self { items_tx }
    }

    /// Queue an item for delivery. Never blocks.
    pub fn push(&self, item: T) {
        if self.items_tx.send(item).is_err() {
            debug!("Throttled queue worker gone, dropping item");
        }
    }
}

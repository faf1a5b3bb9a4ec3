//! Shutdown coordination for the service.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Wraps a broadcast channel that long-running tasks subscribe to; cloning
/// shares the same underlying channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Wait until the shutdown signal is triggered.
    pub async fn notified(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.recv().await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_wakes_existing_subscriber() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("subscriber should be woken")
            .expect("signal should be received");
    }

    #[tokio::test]
    async fn notified_completes_after_trigger_from_clone() {
        let shutdown = Shutdown::new();
        let trigger_handle = shutdown.clone();

        let waiter = tokio::spawn(async move { shutdown.notified().await });
        tokio::task::yield_now().await;
        trigger_handle.trigger();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should complete")
            .expect("waiter task should not panic");
    }
}

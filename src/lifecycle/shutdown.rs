//! Shutdown coordination.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// One-way "stop serving" latch shared by the signal watcher and the server.
///
/// Once triggered it stays triggered, so a waiter created after
/// [`Shutdown::trigger`] still resolves.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Future that completes once the latch is triggered.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // Err only if every `Shutdown` is gone, which also means stop.
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

//! `Drop`-based connection bookkeeping, grounded in the teacher's
//! `proxy::connection::guards` — decrements the active-connection counter
//! and notifies the shutdown drain task when the last connection closes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

pub struct ConnectionGuard {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
    connections_active: Option<opentelemetry::metrics::UpDownCounter<i64>>,
}

impl ConnectionGuard {
    pub fn new(
        counter: Arc<AtomicUsize>,
        notifier: watch::Sender<()>,
        connections_active: Option<opentelemetry::metrics::UpDownCounter<i64>>,
    ) -> Self {
        ConnectionGuard { counter, notifier, connections_active }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let remaining = self.counter.fetch_sub(1, Ordering::Relaxed);
        if let Some(ref c) = self.connections_active {
            c.add(-1, &[]);
        }
        if remaining == 1 {
            let _ = self.notifier.send(());
        }
    }
}

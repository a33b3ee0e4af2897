//! Background synchronization workers.
//!
//! Two independent periodic tasks drive the [`MessageStore`] against the
//! transport: the inbound worker polls the remote inbox on a fixed backoff,
//! the outbound worker drains the hand-off slot. Both observe a shared
//! cancellation signal at their loop heads and race it against their waits
//! with `select!`, so shutdown latency is bounded by one backoff interval
//! (inbound) or one hand-off wait (outbound).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::stats::SharedSyncStats;
use crate::store::MessageStore;
use crate::transport::Transport;

pub struct SyncWorkers {
    cancel_tx: watch::Sender<bool>,
    inbound: JoinHandle<()>,
    outbound: JoinHandle<()>,
    stats: SharedSyncStats,
}

impl SyncWorkers {
    /// Start both workers. `user` is the identity whose inbox is polled.
    pub fn spawn(
        store: Arc<MessageStore>,
        transport: Arc<dyn Transport>,
        user: String,
        backoff: Duration,
    ) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let stats = SharedSyncStats::new();

        let inbound = tokio::spawn(inbound_loop(
            store.clone(),
            transport.clone(),
            user,
            backoff,
            cancel_rx.clone(),
            stats.clone(),
        ));
        let outbound = tokio::spawn(outbound_loop(store, transport, cancel_rx, stats.clone()));

        Self {
            cancel_tx,
            inbound,
            outbound,
            stats,
        }
    }

    pub fn stats(&self) -> SharedSyncStats {
        self.stats.clone()
    }

    /// Signal cancellation and wait for both workers to exit.
    pub async fn shutdown(self) {
        let _ = self.cancel_tx.send(true);
        let _ = self.inbound.await;
        let _ = self.outbound.await;
    }
}

/// Poll the remote inbox once per backoff interval. A failed poll is skipped
/// silently: no retry within the cycle, nothing surfaced to the user.
async fn inbound_loop(
    store: Arc<MessageStore>,
    transport: Arc<dyn Transport>,
    user: String,
    backoff: Duration,
    mut cancel_rx: watch::Receiver<bool>,
    stats: SharedSyncStats,
) {
    loop {
        if *cancel_rx.borrow() {
            break;
        }

        match transport.receive_messages(&user).await {
            Ok(messages) => {
                debug!(count = messages.len(), "inbox poll complete");
                store.replace_inbox(messages);
                stats.record_poll(true);
            }
            Err(err) => {
                debug!(%err, "inbox poll failed, skipping cycle");
                stats.record_poll(false);
            }
        }

        tokio::select! {
            changed = cancel_rx.changed() => {
                // A closed channel means the owning handle is gone without a
                // shutdown call; stop rather than spin against it.
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
            }
            _ = tokio::time::sleep(backoff) => {}
        }
    }
    debug!("inbound worker stopped");
}

/// Drain the outgoing hand-off slot. Not tied to the backoff interval: the
/// wait on `take()` blocks until the interactive surface offers a message.
/// A failed delivery drops the message permanently: no retry, no re-queue;
/// the enqueue already succeeded from the surface's point of view.
async fn outbound_loop(
    store: Arc<MessageStore>,
    transport: Arc<dyn Transport>,
    mut cancel_rx: watch::Receiver<bool>,
    stats: SharedSyncStats,
) {
    loop {
        if *cancel_rx.borrow() {
            break;
        }

        let message = tokio::select! {
            changed = cancel_rx.changed() => {
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
                continue;
            }
            message = store.take() => message,
        };

        match transport.send_message(&message).await {
            Ok(()) => {
                store.append_sent(message);
                stats.record_delivery(true);
            }
            Err(err) => {
                warn!(uid = message.uid, %err, "delivery failed, message dropped");
                stats.record_delivery(false);
            }
        }
    }
    debug!("outbound worker stopped");
}

//! Snapshot publication for controller state.

use tokio::sync::watch;

/// Publishes full state snapshots to any number of subscribers.
#[derive(Debug)]
pub struct StatePublisher<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> StatePublisher<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the published snapshot and wake subscribers.
    pub fn publish(&self, state: S) {
        self.tx.send_replace(state);
    }

    /// The latest published snapshot.
    pub fn current(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> Subscription<S> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Handle on a stream of snapshots. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<S> {
    rx: watch::Receiver<S>,
}

impl<S: Clone> Subscription<S> {
    /// The latest snapshot, marking it as seen.
    pub fn current(&mut self) -> S {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for a snapshot newer than the last one seen.
    ///
    /// Returns `None` once the publisher is gone. Intermediate snapshots may
    /// be skipped when several are published before the caller wakes up.
    pub async fn changed(&mut self) -> Option<S> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until a snapshot satisfies `predicate`, checking the current one first.
    pub async fn wait_for(&mut self, mut predicate: impl FnMut(&S) -> bool) -> Option<S> {
        let state = self.rx.wait_for(|s| predicate(s)).await.ok()?;
        Some(state.clone())
    }

    pub fn unsubscribe(self) {}
}

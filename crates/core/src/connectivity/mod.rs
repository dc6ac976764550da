//! Network reachability signal.
//!
//! [`Connectivity`] holds the current "online" level and lets any number of
//! listeners observe changes. [`ProbeMonitor`] keeps it up to date by
//! periodically connecting to a well-known address.

mod monitor;

pub use monitor::{probe, ProbeMonitor};

use tokio::sync::watch;
use tracing::info;

/// Shared online/offline level.
///
/// Cloning yields another handle on the same signal.
#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: watch::Sender<bool>,
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Observe the level. The receiver starts with the current value marked seen.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Update the level. Listeners are only notified when it actually changes.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "Connectivity changed");
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

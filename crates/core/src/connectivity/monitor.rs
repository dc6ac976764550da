use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Connectivity;
use crate::config::ConnectivityConfig;

/// Background task that probes reachability and feeds a [`Connectivity`].
pub struct ProbeMonitor {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl ProbeMonitor {
    /// Start probing `config.probe_addr` every `config.interval_secs`.
    ///
    /// The first probe runs immediately.
    pub fn spawn(config: &ConnectivityConfig, connectivity: Connectivity) -> Self {
        let addr = config.probe_addr.clone();
        let interval = Duration::from_secs(config.interval_secs);
        let timeout = Duration::from_secs(config.probe_timeout_secs);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        info!(addr = %addr, interval_secs = config.interval_secs, "Starting connectivity probe");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let online = probe(&addr, timeout).await;
                        debug!(addr = %addr, online, "Connectivity probe");
                        connectivity.set_online(online);
                    }
                }
            }

            debug!("Connectivity probe stopped");
        });

        Self {
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// Stop probing and wait for the task to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for ProbeMonitor {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.handle.abort();
        }
    }
}

/// Whether a TCP connection to `addr` can be opened within `timeout`.
pub async fn probe(addr: &str, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

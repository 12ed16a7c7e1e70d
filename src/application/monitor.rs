//! Connectivity monitor.
//!
//! Probes reachability once on start and then on a fixed interval, publishes
//! the latest result on a `watch` channel, and on every offline -> online
//! transition broadcasts `Reconnected` and invalidates all active queries.

use crate::domain::model::{ConnectivityState, Reconnected, Transition};
use crate::domain::traits::{Clock, Probe, QueryClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default poll interval
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

pub struct ConnectivityMonitor {
    probe: Arc<dyn Probe>,
    queries: Arc<dyn QueryClient>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    online_tx: watch::Sender<bool>,
    reconnected_tx: broadcast::Sender<Reconnected>,
}

impl ConnectivityMonitor {
    /// New monitor, assumed online until the first probe says otherwise.
    pub fn new(
        probe: Arc<dyn Probe>,
        queries: Arc<dyn QueryClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (online_tx, _) = watch::channel(true);
        let (reconnected_tx, _) = broadcast::channel(16);
        Self {
            probe,
            queries,
            clock,
            poll_interval: POLL_INTERVAL,
            online_tx,
            reconnected_tx,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn is_online(&self) -> bool {
        *self.online_tx.borrow()
    }

    pub fn state(&self) -> ConnectivityState {
        ConnectivityState::new(self.is_online())
    }

    /// Latest probe result; readers always see the most recent value and are
    /// notified only when it changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }

    pub fn subscribe_reconnected(&self) -> broadcast::Receiver<Reconnected> {
        self.reconnected_tx.subscribe()
    }

    /// Probe without touching the published state.
    pub async fn check_now(&self) -> bool {
        self.probe.check().await
    }

    /// Probe once, publish the result and react to the transition.
    pub async fn tick(&self) -> Transition {
        let online = self.probe.check().await;

        // Subscribers are only woken when the value actually flips
        let mut was_online = online;
        self.online_tx.send_if_modified(|current| {
            was_online = *current;
            *current = online;
            was_online != online
        });
        let transition = Transition::between(was_online, online);

        match transition {
            Transition::Reconnected => {
                info!("connectivity restored, invalidating active queries");
                let _ = self.reconnected_tx.send(Reconnected {
                    at: self.clock.now(),
                });
                self.queries.invalidate_queries().await;
            }
            Transition::Disconnected => warn!("connectivity lost, switching to offline mode"),
            Transition::StillOnline | Transition::StillOffline => {
                debug!(online, "connectivity unchanged")
            }
        }

        transition
    }

    /// Start the polling loop. The first probe runs immediately.
    pub fn spawn(self: Arc<Self>) -> MonitorHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        info!(
            "Starting connectivity monitor (interval: {:?})",
            self.poll_interval
        );

        let monitor = Arc::clone(&self);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(monitor.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = &mut shutdown_rx => break,
                }
                // An in-flight probe is abandoned on shutdown
                tokio::select! {
                    _ = monitor.tick() => {}
                    _ = &mut shutdown_rx => break,
                }
            }
            info!("Connectivity monitor stopped");
        });

        MonitorHandle {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Owns the polling task. Dropping it stops the loop.
pub struct MonitorHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Connectivity monitor task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

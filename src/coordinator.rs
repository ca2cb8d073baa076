// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic state polling and snapshot fan-out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::device::Controller;
use crate::protocol::Transport;
use crate::state::DeviceSnapshot;

/// Drives [`Controller::refresh`] on a fixed interval and publishes each
/// good snapshot to subscribers.
///
/// Refresh failures are transient by design on a wireless link: they are
/// logged for observability, the last good snapshot is retained for
/// subscribers, and the next cycle simply tries again. Nothing a device can
/// do to the link escapes the polling task.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use dreamview_lib::{BleTransport, Controller, PollingCoordinator};
///
/// # async fn example() -> dreamview_lib::Result<()> {
/// let transport = BleTransport::discover("A4:C1:38:12:34:56").await?;
/// let controller = Arc::new(Controller::new("A4:C1:38:12:34:56", transport));
///
/// let coordinator = PollingCoordinator::new(Arc::clone(&controller))
///     .with_interval(Duration::from_secs(15));
/// let mut snapshots = coordinator.subscribe();
/// coordinator.spawn();
///
/// while snapshots.changed().await.is_ok() {
///     if let Some(snapshot) = snapshots.borrow().clone() {
///         println!("power: {}", snapshot.power_state());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PollingCoordinator<T: Transport> {
    controller: Arc<Controller<T>>,
    interval: Duration,
    snapshot_tx: watch::Sender<Option<DeviceSnapshot>>,
    shutdown: Arc<Notify>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<T: Transport> PollingCoordinator<T> {
    /// Default polling period.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Creates a coordinator around a shared controller.
    #[must_use]
    pub fn new(controller: Arc<Controller<T>>) -> Self {
        let (snapshot_tx, _) = watch::channel(controller.snapshot());
        Self {
            controller,
            interval: Self::DEFAULT_INTERVAL,
            snapshot_tx,
            shutdown: Arc::new(Notify::new()),
            task: tokio::sync::Mutex::new(None),
        }
    }

    /// Sets the polling period.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the polling period.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the shared controller.
    #[must_use]
    pub fn controller(&self) -> &Arc<Controller<T>> {
        &self.controller
    }

    /// Subscribes to published snapshots.
    ///
    /// The receiver holds `None` until the first successful refresh, then
    /// always the last good snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<DeviceSnapshot>> {
        self.snapshot_tx.subscribe()
    }
}

impl<T> PollingCoordinator<T>
where
    T: Transport + Send + Sync + 'static,
    T::Session: Send,
{
    /// Starts the polling task.
    ///
    /// The first cycle runs immediately; on an uninitialized controller it
    /// performs the initialization read. Spawning while a task is already
    /// running is a no-op.
    pub fn spawn(&self) {
        // A held lock means a concurrent spawn or shutdown owns the slot;
        // either way there is nothing to start.
        let Ok(mut slot) = self.task.try_lock() else {
            return;
        };
        if slot.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        let controller = Arc::clone(&self.controller);
        let snapshot_tx = self.snapshot_tx.clone();
        let shutdown = Arc::clone(&self.shutdown);
        let period = self.interval;

        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = shutdown.notified() => break,
                    _ = ticker.tick() => {
                        match controller.refresh().await {
                            Ok(()) => {
                                let _ = snapshot_tx.send(controller.snapshot());
                            }
                            Err(err) => {
                                // Transient by policy: keep the last good
                                // snapshot and let the next cycle retry.
                                tracing::warn!(
                                    address = controller.address(),
                                    error = %err,
                                    "refresh cycle failed"
                                );
                            }
                        }
                    }
                }
            }
            tracing::debug!(address = controller.address(), "polling stopped");
        }));
    }

    /// Signals the polling task to stop and waits for it to finish.
    pub async fn shutdown(&self) {
        self.shutdown.notify_one();
        let task = self.task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkError;
    use crate::protocol::{DisconnectNotifier, LinkConfig, TransportSession};

    struct UnreachableTransport;

    struct NeverSession;

    impl TransportSession for NeverSession {
        async fn write(&mut self, _bytes: &[u8]) -> Result<(), LinkError> {
            unreachable!()
        }

        async fn read(&mut self) -> Result<Vec<u8>, LinkError> {
            unreachable!()
        }

        async fn close(&mut self) {}
    }

    impl Transport for UnreachableTransport {
        type Session = NeverSession;

        async fn connect(
            &self,
            _on_disconnect: DisconnectNotifier,
        ) -> Result<Self::Session, LinkError> {
            Err(LinkError::Transport("unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn subscriber_starts_empty() {
        let controller = Arc::new(Controller::new("AA:BB:CC:DD:EE:FF", UnreachableTransport));
        let coordinator = PollingCoordinator::new(controller);
        assert!(coordinator.subscribe().borrow().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycles_do_not_publish() {
        let controller = Arc::new(
            Controller::new("AA:BB:CC:DD:EE:FF", UnreachableTransport)
                .with_link_config(LinkConfig::new().with_connect_attempts(1)),
        );
        let coordinator =
            PollingCoordinator::new(controller).with_interval(Duration::from_secs(5));
        let mut snapshots = coordinator.subscribe();

        coordinator.spawn();
        tokio::time::sleep(Duration::from_secs(16)).await;
        coordinator.shutdown().await;

        // Several failed cycles later the receiver still has no value and
        // no change notification was ever published.
        assert!(!snapshots.has_changed().unwrap());
        assert!(snapshots.borrow().is_none());
    }
}

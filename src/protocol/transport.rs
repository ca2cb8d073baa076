// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport abstraction over the BLE stack.
//!
//! The core of the library never talks to a Bluetooth API directly; it goes
//! through [`Transport`] (connection establishment) and [`TransportSession`]
//! (characteristic I/O on one live connection). The `ble` feature provides
//! the [`btleplug`]-backed implementation; tests drive the controller with a
//! scripted fake.
//!
//! [`btleplug`]: https://docs.rs/btleplug

use tokio::sync::watch;

use crate::error::LinkError;

/// Sender half of the one-shot disconnect signal.
///
/// A transport receives a notifier for each session it opens and fires it
/// when the peripheral drops the link. Firing is idempotent: only the first
/// call has an effect, and it is safe from any task or callback context.
#[derive(Debug, Clone)]
pub struct DisconnectNotifier {
    tx: watch::Sender<bool>,
}

impl DisconnectNotifier {
    /// Signals that the link dropped. At most one signal is delivered.
    pub fn notify(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver half of the disconnect signal, owned by the session wrapper.
#[derive(Debug)]
pub(crate) struct DisconnectListener {
    rx: watch::Receiver<bool>,
}

impl DisconnectListener {
    /// Resolves once the transport signals a disconnect.
    ///
    /// If the notifier is dropped without firing, the transport can no
    /// longer observe disconnects for this session; the future then stays
    /// pending and the in-flight operation (or its deadline) decides the
    /// outcome.
    pub(crate) async fn wait(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Creates a linked notifier/listener pair for one session.
#[must_use]
pub(crate) fn disconnect_channel() -> (DisconnectNotifier, DisconnectListener) {
    let (tx, rx) = watch::channel(false);
    (DisconnectNotifier { tx }, DisconnectListener { rx })
}

/// Connection factory for one physical device.
///
/// Implementations resolve the peripheral once and hand out sessions on
/// demand; the [`Link`](crate::protocol::Link) layer owns retry and backoff,
/// so `connect` should represent a single attempt.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// The session type produced by a successful connect.
    type Session: TransportSession;

    /// Makes one attempt to open a live session.
    ///
    /// The transport must fire `on_disconnect` (at most once) if it observes
    /// the link dropping while the session is alive.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` when the attempt fails; the caller decides
    /// whether to retry.
    fn connect(
        &self,
        on_disconnect: DisconnectNotifier,
    ) -> impl std::future::Future<Output = Result<Self::Session, LinkError>> + Send;
}

/// One live connection to the device.
///
/// A session is scoped to a single logical operation and never held across
/// polling intervals. Implementations must release the underlying link when
/// the session is dropped; [`close`](Self::close) additionally allows
/// graceful asynchronous teardown on the normal path.
#[allow(async_fn_in_trait)]
pub trait TransportSession {
    /// Writes raw bytes to the control characteristic (without response).
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the write fails.
    fn write(
        &mut self,
        bytes: &[u8],
    ) -> impl std::future::Future<Output = Result<(), LinkError>> + Send;

    /// Reads the next notification from the control characteristic.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the link fails before a value arrives.
    fn read(&mut self) -> impl std::future::Future<Output = Result<Vec<u8>, LinkError>> + Send;

    /// Releases the connection.
    fn close(&mut self) -> impl std::future::Future<Output = ()> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn notify_resolves_waiters() {
        let (notifier, mut listener) = disconnect_channel();
        notifier.notify();
        listener.wait().await;
        // A second wait on an already-fired signal resolves immediately.
        listener.wait().await;
    }

    #[tokio::test]
    async fn notify_is_idempotent() {
        let (notifier, mut listener) = disconnect_channel();
        notifier.notify();
        notifier.notify();
        listener.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_notifier_never_resolves() {
        let (notifier, mut listener) = disconnect_channel();
        drop(notifier);

        let waited = tokio::time::timeout(Duration::from_secs(1), listener.wait()).await;
        assert!(waited.is_err(), "wait must stay pending, not spuriously fire");
    }
}

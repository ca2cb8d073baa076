// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `btleplug`-backed transport implementation.

use std::pin::Pin;
use std::time::Duration;

use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter,
    ValueNotification, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::LinkError;
use crate::protocol::transport::{DisconnectNotifier, Transport, TransportSession};

/// UUID of the write/notify control characteristic on the H6199.
pub const CONTROL_CHARACTERISTIC: Uuid = uuid::uuid!("00010203-0405-0607-0809-0a0b0c0d2b11");

/// How long `discover` scans before inspecting the peripheral list.
const SCAN_WINDOW: Duration = Duration::from_secs(5);

/// BLE transport bound to one peripheral.
///
/// Each [`connect`](Transport::connect) call opens a GATT session, resolves
/// the control characteristic, subscribes to its notifications and spawns a
/// watcher that forwards the adapter's disconnect event into the session's
/// disconnect signal.
///
/// # Examples
///
/// ```no_run
/// use dreamview_lib::protocol::BleTransport;
///
/// # async fn example() -> dreamview_lib::Result<()> {
/// let transport = BleTransport::discover("A4:C1:38:12:34:56").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BleTransport {
    adapter: Adapter,
    peripheral: Peripheral,
}

impl BleTransport {
    /// Creates a transport from an already-resolved peripheral.
    #[must_use]
    pub fn new(adapter: Adapter, peripheral: Peripheral) -> Self {
        Self {
            adapter,
            peripheral,
        }
    }

    /// Scans the first available adapter for a peripheral with the given
    /// Bluetooth address (case-insensitive `AA:BB:CC:DD:EE:FF`).
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if no adapter is available, the scan fails, or
    /// no peripheral with that address shows up within the scan window.
    pub async fn discover(address: &str) -> Result<Self, LinkError> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LinkError::Transport("no Bluetooth adapter found".to_string()))?;

        tracing::debug!(address, "scanning for peripheral");
        adapter.start_scan(ScanFilter::default()).await?;
        tokio::time::sleep(SCAN_WINDOW).await;
        adapter.stop_scan().await?;

        for peripheral in adapter.peripherals().await? {
            if peripheral
                .address()
                .to_string()
                .eq_ignore_ascii_case(address)
            {
                tracing::debug!(address, "peripheral found");
                return Ok(Self::new(adapter, peripheral));
            }
        }

        Err(LinkError::Transport(format!(
            "no peripheral with address {address} found"
        )))
    }

    /// Returns the peripheral's Bluetooth address.
    #[must_use]
    pub fn address(&self) -> String {
        self.peripheral.address().to_string()
    }
}

impl Transport for BleTransport {
    type Session = BleSession;

    async fn connect(
        &self,
        on_disconnect: DisconnectNotifier,
    ) -> Result<Self::Session, LinkError> {
        self.peripheral.connect().await?;
        self.peripheral.discover_services().await?;

        let characteristic = self
            .peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == CONTROL_CHARACTERISTIC)
            .ok_or_else(|| {
                LinkError::Transport(format!(
                    "control characteristic {CONTROL_CHARACTERISTIC} not found"
                ))
            })?;

        self.peripheral.subscribe(&characteristic).await?;
        let notifications = self.peripheral.notifications().await?;

        let mut events = self.adapter.events().await?;
        let id = self.peripheral.id();
        let watcher = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if matches!(event, CentralEvent::DeviceDisconnected(ref gone) if *gone == id) {
                    on_disconnect.notify();
                    break;
                }
            }
        });

        Ok(BleSession {
            peripheral: self.peripheral.clone(),
            characteristic,
            notifications,
            watcher,
            closed: false,
        })
    }
}

/// One live GATT session to the peripheral.
pub struct BleSession {
    peripheral: Peripheral,
    characteristic: Characteristic,
    notifications: Pin<Box<dyn Stream<Item = ValueNotification> + Send>>,
    watcher: JoinHandle<()>,
    closed: bool,
}

impl TransportSession for BleSession {
    async fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.peripheral
            .write(&self.characteristic, bytes, WriteType::WithoutResponse)
            .await
            .map_err(Into::into)
    }

    async fn read(&mut self) -> Result<Vec<u8>, LinkError> {
        loop {
            match self.notifications.next().await {
                Some(notification) if notification.uuid == self.characteristic.uuid => {
                    return Ok(notification.value);
                }
                // Notification for some other characteristic; keep waiting.
                Some(_) => {}
                None => return Err(LinkError::Disconnected),
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.watcher.abort();

        let _ = self.peripheral.unsubscribe(&self.characteristic).await;
        if let Err(err) = self.peripheral.disconnect().await {
            tracing::debug!(error = %err, "disconnect on close failed");
        }
    }
}

impl Drop for BleSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.watcher.abort();

        // A session dropped mid-operation (e.g. a cancelled refresh) still
        // has to release the GATT connection; disconnecting is async, so
        // hand it to the runtime when one is available.
        let peripheral = self.peripheral.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = peripheral.disconnect().await;
            });
        }
    }
}

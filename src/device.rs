// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level controller for one DreamView light.
//!
//! The controller orchestrates the link, the codec and the cached snapshot:
//! it serializes every link operation through a single gate, keeps an
//! immutable [`DeviceSnapshot`] that is replaced wholesale on each update,
//! and applies optimistic predictions after successful command batches.

use std::time::Duration;

use crate::command::{Command, PowerOnBuilder};
use crate::error::{DeviceError, Error, LinkError, Result};
use crate::protocol::{Frame, Link, LinkConfig, Session, Transport, TransportSession};
use crate::response::{
    BrightnessResponse, ColorModeResponse, FirmwareVersionResponse, HardwareVersionResponse,
    MacAddressResponse, PowerStateResponse,
};
use crate::state::{DeviceIdentity, DeviceSnapshot};
use crate::types::{Brightness, ColorMode};

/// A DreamView light controlled over one Bluetooth link.
///
/// The controller is constructed once and passed to every consumer; it owns
/// the only cached snapshot for its device. All operations that touch the
/// link funnel through one fair async gate, so at most one physical-link
/// operation is in flight at a time and callers queue in submission order.
///
/// # Lifecycle
///
/// A controller starts uninitialized. [`init`](Controller::init) connects,
/// reads identity and status, and installs the first snapshot; afterwards
/// [`refresh`](Controller::refresh) re-reads the status fields on demand
/// (typically driven by a [`PollingCoordinator`](crate::PollingCoordinator))
/// and the write operations apply their predicted snapshots. A `refresh`
/// before `init` transparently performs the initialization instead.
///
/// # Examples
///
/// ```no_run
/// use dreamview_lib::{BleTransport, Controller};
/// use dreamview_lib::types::{Brightness, Effect};
///
/// # async fn example() -> dreamview_lib::Result<()> {
/// let address = "A4:C1:38:12:34:56";
/// let transport = BleTransport::discover(address).await?;
/// let controller = Controller::new(address, transport);
///
/// controller.init().await?;
///
/// let builder = controller
///     .power_on_builder()
///     .with_brightness(Brightness::new(200))
///     .with_effect(Effect::Film);
/// controller.power_on(&builder).await?;
///
/// let snapshot = controller.snapshot().expect("initialized");
/// assert!(snapshot.power_state());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Controller<T: Transport> {
    address: String,
    link: Link<T>,
    refresh_timeout: Duration,
    /// Exclusive gate over the physical link. `tokio::sync::Mutex` is fair,
    /// so queued operations run in submission order.
    gate: tokio::sync::Mutex<()>,
    snapshot: parking_lot::RwLock<Option<DeviceSnapshot>>,
}

impl<T: Transport> Controller<T> {
    /// Default deadline for one refresh cycle.
    pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(3);

    /// Creates a controller for the device at the given address.
    pub fn new(address: impl Into<String>, transport: T) -> Self {
        Self {
            address: address.into(),
            link: Link::new(transport),
            refresh_timeout: Self::DEFAULT_REFRESH_TIMEOUT,
            gate: tokio::sync::Mutex::new(()),
            snapshot: parking_lot::RwLock::new(None),
        }
    }

    /// Replaces the link retry configuration.
    #[must_use]
    pub fn with_link_config(mut self, config: LinkConfig) -> Self {
        self.link = self.link.with_config(config);
        self
    }

    /// Replaces the refresh deadline.
    #[must_use]
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Returns the device address this controller targets.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns true once [`init`](Controller::init) has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Returns a clone of the cached snapshot.
    ///
    /// Always available after `init` and never blocks on the link gate;
    /// concurrent updates swap in a whole new value, so the returned
    /// snapshot is never torn.
    #[must_use]
    pub fn snapshot(&self) -> Option<DeviceSnapshot> {
        self.snapshot.read().clone()
    }

    /// Creates a power-on builder seeded with the current snapshot.
    #[must_use]
    pub fn power_on_builder(&self) -> PowerOnBuilder {
        PowerOnBuilder::new(self.snapshot())
    }

    /// Connects and reads identity plus full status, installing the first
    /// snapshot.
    ///
    /// Calling `init` on an already-initialized controller is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InitFailed`] wrapping the underlying connect,
    /// link or decode error. The caller must not retry automatically; the
    /// polling layer treats this as a hard failure for the cycle.
    pub async fn init(&self) -> Result<()> {
        let _gate = self.gate.lock().await;
        if self.snapshot.read().is_some() {
            return Ok(());
        }

        match self.read_initial().await {
            Ok(snapshot) => {
                tracing::debug!(address = %self.address, ?snapshot, "device initialized");
                *self.snapshot.write() = Some(snapshot);
                Ok(())
            }
            Err(err) => Err(DeviceError::InitFailed(Box::new(err)).into()),
        }
    }

    /// Re-reads power, mode and brightness and replaces those snapshot
    /// fields, leaving identity and color untouched.
    ///
    /// On an uninitialized controller this transparently performs
    /// [`init`](Controller::init) instead: one-time self-healing, not a
    /// general retry policy.
    ///
    /// The whole cycle runs under the configured deadline; an externally
    /// signaled disconnect cancels it immediately rather than waiting the
    /// deadline out, and whichever fires first determines the failure
    /// reason.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::RefreshFailed`] on timeout, disconnect or
    /// decode failure. The previous snapshot is retained unchanged.
    pub async fn refresh(&self) -> Result<()> {
        if !self.is_initialized() {
            return self.init().await;
        }

        let _gate = self.gate.lock().await;
        let outcome = tokio::time::timeout(self.refresh_timeout, self.read_status_cycle()).await;

        let (power_state, mode, brightness) = match outcome {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(DeviceError::RefreshFailed(Box::new(err)).into()),
            Err(_elapsed) => {
                let millis = u64::try_from(self.refresh_timeout.as_millis()).unwrap_or(u64::MAX);
                return Err(DeviceError::RefreshFailed(Box::new(
                    LinkError::Timeout(millis).into(),
                ))
                .into());
            }
        };

        let mut guard = self.snapshot.write();
        if let Some(current) = guard.take() {
            let updated = current.with_status(power_state, mode, brightness);
            tracing::debug!(address = %self.address, ?updated, "snapshot refreshed");
            *guard = Some(updated);
        }
        Ok(())
    }

    /// Writes a command batch to the device in order.
    ///
    /// The batch is encoded up front, so a malformed command is rejected
    /// before any I/O. On success the cached snapshot is *not* updated;
    /// prediction is the caller's (builder's) responsibility, keeping the
    /// transport decoupled from prediction logic.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::NotInitialized`] before `init`,
    /// [`DeviceError::PartialWrite`] if a write fails after a prior one
    /// succeeded, or the link error if the link could not be used at all.
    pub async fn send_commands(&self, commands: &[Command]) -> Result<()> {
        if !self.is_initialized() {
            return Err(DeviceError::NotInitialized.into());
        }

        let frames = commands
            .iter()
            .map(Command::encode)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let _gate = self.gate.lock().await;
        tracing::debug!(address = %self.address, count = frames.len(), "sending command batch");

        let mut session = self.link.connect().await?;
        let result = write_frames(&mut session, &frames).await;
        session.close().await;
        result
    }

    /// Turns the light on with the builder's options.
    ///
    /// On success the cached snapshot is replaced with the builder's
    /// predicted snapshot; no confirming read is performed.
    ///
    /// # Errors
    ///
    /// Returns the [`send_commands`](Controller::send_commands) error
    /// unchanged; the snapshot is not touched on failure.
    pub async fn power_on(&self, builder: &PowerOnBuilder) -> Result<()> {
        self.send_commands(&builder.build()).await?;

        if let Some(predicted) = builder.predicted_snapshot() {
            *self.snapshot.write() = Some(predicted);
        }
        Ok(())
    }

    /// Turns the light off.
    ///
    /// On success only `power_state` flips in the cached snapshot; color,
    /// brightness and identity keep their last values.
    ///
    /// # Errors
    ///
    /// Returns the [`send_commands`](Controller::send_commands) error
    /// unchanged; the snapshot is not touched on failure.
    pub async fn power_off(&self) -> Result<()> {
        self.send_commands(&[Command::PowerOff]).await?;

        let mut guard = self.snapshot.write();
        if let Some(current) = guard.take() {
            *guard = Some(current.with_power_state(false));
        }
        Ok(())
    }

    /// Connects and reads identity plus status for the first snapshot.
    async fn read_initial(&self) -> Result<DeviceSnapshot> {
        let mut session = self.link.connect().await?;
        let result = read_identity_and_status(&mut session).await;
        session.close().await;

        let (identity, power_state, mode, brightness) = result?;
        Ok(DeviceSnapshot::new(
            self.address.clone(),
            identity,
            power_state,
            mode,
            brightness,
        ))
    }

    /// One full connect-read-close status cycle.
    async fn read_status_cycle(&self) -> Result<(bool, ColorMode, Brightness)> {
        let mut session = self.link.connect().await?;
        let result = read_status(&mut session).await;
        session.close().await;
        result
    }
}

/// Sends one query and returns the raw reply.
async fn query<S: TransportSession>(
    session: &mut Session<S>,
    command: Command,
) -> Result<Vec<u8>> {
    let frame = command.encode()?;
    session.send_frame(&frame).await?;
    Ok(session.read_frame().await?)
}

/// Reads the refreshable status triple.
async fn read_status<S: TransportSession>(
    session: &mut Session<S>,
) -> Result<(bool, ColorMode, Brightness)> {
    let power = PowerStateResponse::decode(&query(session, Command::GetPowerState).await?)?;
    let mode = ColorModeResponse::decode(&query(session, Command::GetColorMode).await?)?;
    let brightness = BrightnessResponse::decode(&query(session, Command::GetBrightness).await?)?;
    Ok((power.is_on(), mode.mode(), brightness.level()))
}

/// Reads identity strings followed by the status triple.
async fn read_identity_and_status<S: TransportSession>(
    session: &mut Session<S>,
) -> Result<(DeviceIdentity, bool, ColorMode, Brightness)> {
    let mac = MacAddressResponse::decode(&query(session, Command::GetMacAddress).await?)?;
    let firmware =
        FirmwareVersionResponse::decode(&query(session, Command::GetFirmwareVersion).await?)?;
    let hardware =
        HardwareVersionResponse::decode(&query(session, Command::GetHardwareVersion).await?)?;
    let (power_state, mode, brightness) = read_status(session).await?;

    Ok((
        DeviceIdentity::new(mac.mac(), firmware.version(), hardware.version()),
        power_state,
        mode,
        brightness,
    ))
}

/// Writes frames in order, mapping a mid-batch failure to `PartialWrite`.
async fn write_frames<S: TransportSession>(
    session: &mut Session<S>,
    frames: &[Frame],
) -> Result<()> {
    let total = frames.len();
    for (index, frame) in frames.iter().enumerate() {
        if let Err(err) = session.send_frame(frame).await {
            if index > 0 {
                return Err(DeviceError::PartialWrite {
                    written: index,
                    total,
                    source: Box::new(Error::Link(err)),
                }
                .into());
            }
            return Err(err.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkError;
    use crate::protocol::DisconnectNotifier;

    /// Transport whose connect always fails; enough for gate-free tests.
    struct UnreachableTransport;

    struct NeverSession;

    impl TransportSession for NeverSession {
        async fn write(&mut self, _bytes: &[u8]) -> std::result::Result<(), LinkError> {
            unreachable!()
        }

        async fn read(&mut self) -> std::result::Result<Vec<u8>, LinkError> {
            unreachable!()
        }

        async fn close(&mut self) {}
    }

    impl Transport for UnreachableTransport {
        type Session = NeverSession;

        async fn connect(
            &self,
            _on_disconnect: DisconnectNotifier,
        ) -> std::result::Result<Self::Session, LinkError> {
            Err(LinkError::Transport("unreachable".to_string()))
        }
    }

    fn controller() -> Controller<UnreachableTransport> {
        Controller::new("A4:C1:38:12:34:56", UnreachableTransport)
            .with_link_config(LinkConfig::new().with_connect_attempts(1))
    }

    #[test]
    fn starts_uninitialized() {
        let controller = controller();
        assert!(!controller.is_initialized());
        assert!(controller.snapshot().is_none());
    }

    #[tokio::test]
    async fn send_commands_requires_init() {
        let controller = controller();
        let err = controller.send_commands(&[Command::PowerOn]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn init_failure_is_wrapped() {
        let controller = controller();
        let err = controller.init().await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::InitFailed(_))));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn refresh_self_heals_to_init() {
        let controller = controller();
        // Uninitialized refresh routes through init and fails the same way.
        let err = controller.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::InitFailed(_))));
    }
}

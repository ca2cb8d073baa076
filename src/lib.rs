// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `DreamView` Lib - A Rust library to control Govee DreamView T1 (H6199)
//! lights over Bluetooth LE.
//!
//! This library speaks the light's proprietary 20-byte frame protocol and
//! maintains a locally cached, periodically refreshed view of device state
//! that is speculatively updated after writes.
//!
//! # Supported Features
//!
//! - **Power control**: Turn the light on/off with optional brightness,
//!   effect and color in one batch
//! - **Effects**: Music-reactive mode, screen-sync film and game modes,
//!   static colors
//! - **State polling**: Periodic refresh with snapshot fan-out to
//!   subscribers, resilient to drops and timeouts
//! - **Identity queries**: MAC address, firmware and hardware versions
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use dreamview_lib::{BleTransport, Controller, PollingCoordinator};
//! use dreamview_lib::types::{Brightness, Effect, RgbColor};
//!
//! #[tokio::main]
//! async fn main() -> dreamview_lib::Result<()> {
//!     let address = "A4:C1:38:12:34:56";
//!
//!     // Resolve the peripheral and initialize the controller
//!     let transport = BleTransport::discover(address).await?;
//!     let controller = Arc::new(Controller::new(address, transport));
//!     controller.init().await?;
//!
//!     // Turn on: full brightness, static purple
//!     let builder = controller
//!         .power_on_builder()
//!         .with_brightness(Brightness::new(255))
//!         .with_color(RgbColor::new(160, 32, 240));
//!     controller.power_on(&builder).await?;
//!
//!     // Poll state in the background and watch for changes
//!     let coordinator = PollingCoordinator::new(Arc::clone(&controller));
//!     let mut snapshots = coordinator.subscribe();
//!     coordinator.spawn();
//!
//!     snapshots.changed().await.ok();
//!     if let Some(snapshot) = snapshots.borrow().clone() {
//!         println!("mode: {}", snapshot.mode());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Transport
//!
//! The default `ble` feature provides [`BleTransport`] on top of
//! [`btleplug`]. The controller is generic over the
//! [`Transport`](protocol::Transport) trait, so tests (and other backends)
//! can drive it without Bluetooth hardware.
//!
//! [`btleplug`]: https://docs.rs/btleplug

pub mod command;
mod coordinator;
mod device;
pub mod error;
pub mod protocol;
pub mod response;
pub mod state;
pub mod types;

pub use command::{Command, PowerOnBuilder};
pub use coordinator::PollingCoordinator;
pub use device::Controller;
pub use error::{DecodeError, DeviceError, Error, FrameError, LinkError, Result};
#[cfg(feature = "ble")]
pub use protocol::BleTransport;
pub use protocol::{Frame, Link, LinkConfig, Session};
pub use response::{
    BrightnessResponse, ColorModeResponse, FirmwareVersionResponse, HardwareVersionResponse,
    MacAddressResponse, PowerStateResponse,
};
pub use state::{DeviceIdentity, DeviceSnapshot};
pub use types::{Brightness, ColorMode, Effect, MusicVariant, RgbColor};

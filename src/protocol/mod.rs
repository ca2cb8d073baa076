// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocol and link plumbing for DreamView lights.
//!
//! This module provides the frame codec, the transport abstraction over the
//! BLE stack, and the link manager that owns connection retry and scoped
//! sessions.
//!
//! # Layers
//!
//! - [`Frame`]: the fixed 20-byte checksummed unit written to the control
//!   characteristic
//! - [`Transport`] / [`TransportSession`]: a single connect attempt and the
//!   raw characteristic I/O it yields
//! - [`Link`] / [`Session`]: retry with backoff on top of the transport,
//!   and I/O that races the disconnect signal
//! - [`BleTransport`]: the [`btleplug`]-backed transport (feature `ble`)
//!
//! [`btleplug`]: https://docs.rs/btleplug

#[cfg(feature = "ble")]
mod ble;
mod frame;
mod link;
mod transport;

#[cfg(feature = "ble")]
pub use ble::BleTransport;
pub use frame::{COMMAND_MARKER, FRAME_LEN, Frame, MAX_PAYLOAD_LEN, QUERY_MARKER, REPLY_MARKER};
pub use link::{Link, LinkConfig, Session};
pub use transport::{DisconnectNotifier, Transport, TransportSession};

pub(crate) use frame::xor_checksum;

/// Opcodes understood by the H6199 control characteristic.
///
/// A command frame carries the opcode at byte 1; a query is the same opcode
/// with an empty payload, answered by a notification echoing it.
pub mod opcode {
    /// Power on/off, and the power-state query.
    pub const POWER: u8 = 0x01;
    /// Brightness level, and the brightness query.
    pub const BRIGHTNESS: u8 = 0x04;
    /// Color/mode writes, and the color-mode query.
    pub const COLOR: u8 = 0x05;
    /// Firmware version query.
    pub const FIRMWARE_VERSION: u8 = 0x06;
    /// Hardware version query.
    pub const HARDWARE_VERSION: u8 = 0x07;
    /// MAC address query.
    pub const MAC_ADDRESS: u8 = 0x14;
}

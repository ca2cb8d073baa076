// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary frame codec for the H6199 control characteristic.
//!
//! Every write to the device is a fixed 20-byte frame:
//!
//! ```text
//! [0x33, opcode, payload (0..=17 bytes), zero padding, checksum]
//! ```
//!
//! The checksum is the XOR of the 19 preceding bytes. Replies arrive as
//! notifications with the same layout but a `0xAA` marker; reply validation
//! lives in [`crate::response`].

use crate::error::FrameError;

/// Total length of every frame, in both directions.
pub const FRAME_LEN: usize = 20;

/// Maximum command payload: frame minus marker, opcode and checksum.
pub const MAX_PAYLOAD_LEN: usize = FRAME_LEN - 3;

/// Marker byte opening every state-changing host-to-device frame.
pub const COMMAND_MARKER: u8 = 0x33;

/// Marker byte opening query frames and every device-to-host reply.
///
/// Queries share the reply marker: a zero-padded command payload would
/// otherwise be indistinguishable from an empty query payload (power-off
/// and the power-state query carry the same opcode).
pub const QUERY_MARKER: u8 = 0xAA;

/// Marker byte opening every device-to-host reply.
pub const REPLY_MARKER: u8 = QUERY_MARKER;

/// XOR of all bytes, as the firmware computes its trailing checksum.
#[must_use]
pub(crate) fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// A validated, ready-to-send 20-byte frame.
///
/// Construction checks the payload budget, so a `Frame` value is always
/// well-formed; encoding the same opcode and payload twice yields identical
/// bytes.
///
/// # Examples
///
/// ```
/// use dreamview_lib::protocol::Frame;
///
/// let frame = Frame::command(0x01, &[0x01]).unwrap();
/// let bytes = frame.as_bytes();
/// assert_eq!(bytes.len(), 20);
/// assert_eq!(bytes[0], 0x33);
/// assert_eq!(bytes[1], 0x01);
/// assert_eq!(bytes[19], 0x33 ^ 0x01 ^ 0x01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Builds a command frame for the given opcode and payload.
    ///
    /// The payload is zero-padded to fill the frame; the trailing checksum
    /// is computed over the 19 bytes before it.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PayloadTooLarge`] when the payload exceeds
    /// [`MAX_PAYLOAD_LEN`] bytes. This is a protocol-contract violation and
    /// is reported before any I/O takes place.
    pub fn command(opcode: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge {
                max: MAX_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        Ok(Self::build(COMMAND_MARKER, opcode, payload))
    }

    /// Builds a query frame for the given opcode.
    ///
    /// Queries carry no payload and use the [`QUERY_MARKER`]; the device
    /// answers with a notification echoing the opcode.
    #[must_use]
    pub fn query(opcode: u8) -> Self {
        Self::build(QUERY_MARKER, opcode, &[])
    }

    fn build(marker: u8, opcode: u8, payload: &[u8]) -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = marker;
        bytes[1] = opcode;
        bytes[2..2 + payload.len()].copy_from_slice(payload);
        bytes[FRAME_LEN - 1] = xor_checksum(&bytes[..FRAME_LEN - 1]);
        Self(bytes)
    }

    /// Returns the opcode carried by this frame.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        self.0[1]
    }

    /// Returns the raw frame bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layout() {
        let frame = Frame::command(0x01, &[0x01]).unwrap();
        let bytes = frame.as_bytes();

        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[0], 0x33);
        assert_eq!(bytes[1], 0x01);
        assert_eq!(bytes[2], 0x01);
        assert!(bytes[3..19].iter().all(|&b| b == 0));
        assert_eq!(bytes[19], xor_checksum(&bytes[..19]));
    }

    #[test]
    fn payload_boundary() {
        // 17 bytes fit; 18 do not.
        assert!(Frame::command(0x05, &[0xFF; 17]).is_ok());
        let err = Frame::command(0x05, &[0xFF; 18]).unwrap_err();
        assert_eq!(err, FrameError::PayloadTooLarge { max: 17, actual: 18 });
    }

    #[test]
    fn empty_payload() {
        let frame = Frame::command(0x14, &[]).unwrap();
        assert_eq!(frame.opcode(), 0x14);
        // marker ^ opcode ^ zero padding
        assert_eq!(frame.as_bytes()[19], 0x33 ^ 0x14);
    }

    #[test]
    fn query_layout() {
        let frame = Frame::query(0x01);
        let bytes = frame.as_bytes();

        assert_eq!(bytes[0], QUERY_MARKER);
        assert_eq!(bytes[1], 0x01);
        assert!(bytes[2..19].iter().all(|&b| b == 0));
        assert_eq!(bytes[19], 0xAA ^ 0x01);
    }

    #[test]
    fn power_off_and_power_query_differ() {
        let off = Frame::command(0x01, &[0x00]).unwrap();
        let query = Frame::query(0x01);
        assert_ne!(off.as_bytes(), query.as_bytes());
    }

    #[test]
    fn encoding_is_idempotent() {
        let a = Frame::command(0x04, &[0x7F]).unwrap();
        let b = Frame::command(0x04, &[0x7F]).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn checksum_is_xor_of_all_bytes() {
        assert_eq!(xor_checksum(&[]), 0);
        assert_eq!(xor_checksum(&[0xAA]), 0xAA);
        assert_eq!(xor_checksum(&[0x33, 0x05, 0x02]), 0x33 ^ 0x05 ^ 0x02);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity reply parsing: MAC address and version strings.

use crate::error::DecodeError;
use crate::protocol::opcode;
use crate::response::reply_payload;

/// Reply to [`Command::GetMacAddress`](crate::command::Command::GetMacAddress).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddressResponse {
    mac: String,
}

impl MacAddressResponse {
    /// Decodes a raw reply notification.
    ///
    /// The first six payload bytes are the address, rendered as uppercase
    /// colon-separated hex.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the envelope is malformed.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let payload = reply_payload(opcode::MAC_ADDRESS, raw)?;
        let mac = payload[..6]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(":");
        Ok(Self { mac })
    }

    /// Returns the formatted MAC address.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }
}

/// Reply to
/// [`Command::GetFirmwareVersion`](crate::command::Command::GetFirmwareVersion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersionResponse {
    version: String,
}

impl FirmwareVersionResponse {
    /// Decodes a raw reply notification.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the envelope is malformed or the version
    /// string is empty or not ASCII.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let payload = reply_payload(opcode::FIRMWARE_VERSION, raw)?;
        Ok(Self {
            version: decode_version(payload, "firmware version")?,
        })
    }

    /// Returns the firmware version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Reply to
/// [`Command::GetHardwareVersion`](crate::command::Command::GetHardwareVersion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareVersionResponse {
    version: String,
}

impl HardwareVersionResponse {
    /// Decodes a raw reply notification.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the envelope is malformed or the version
    /// string is empty or not ASCII.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let payload = reply_payload(opcode::HARDWARE_VERSION, raw)?;
        Ok(Self {
            version: decode_version(payload, "hardware version")?,
        })
    }

    /// Returns the hardware version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Decodes a NUL-padded ASCII version string from a reply payload.
fn decode_version(payload: &[u8], field: &str) -> Result<String, DecodeError> {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    let bytes = &payload[..end];

    if bytes.is_empty() {
        return Err(DecodeError::InvalidValue {
            field: field.to_string(),
            message: "empty version string".to_string(),
        });
    }
    if !bytes.is_ascii() {
        return Err(DecodeError::InvalidValue {
            field: field.to_string(),
            message: "version string is not ASCII".to_string(),
        });
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::test_support::reply;

    #[test]
    fn decode_mac() {
        let raw = reply(0x14, &[0xA4, 0xC1, 0x38, 0x12, 0x34, 0x56]);
        let response = MacAddressResponse::decode(&raw).unwrap();
        assert_eq!(response.mac(), "A4:C1:38:12:34:56");
    }

    #[test]
    fn decode_firmware_version() {
        let raw = reply(0x06, b"1.00.21");
        let response = FirmwareVersionResponse::decode(&raw).unwrap();
        assert_eq!(response.version(), "1.00.21");
    }

    #[test]
    fn decode_hardware_version() {
        let raw = reply(0x07, b"1.0.0");
        let response = HardwareVersionResponse::decode(&raw).unwrap();
        assert_eq!(response.version(), "1.0.0");
    }

    #[test]
    fn rejects_empty_version() {
        let raw = reply(0x06, &[]);
        let err = FirmwareVersionResponse::decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_non_ascii_version() {
        let raw = reply(0x07, &[0xC3, 0x28, 0x00]);
        assert!(HardwareVersionResponse::decode(&raw).is_err());
    }
}

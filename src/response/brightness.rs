// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness reply parsing.

use crate::error::DecodeError;
use crate::protocol::opcode;
use crate::response::reply_payload;
use crate::types::Brightness;

/// Reply to [`Command::GetBrightness`](crate::command::Command::GetBrightness).
///
/// The level is on the device's raw scale and is passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessResponse {
    level: Brightness,
}

impl BrightnessResponse {
    /// Decodes a raw reply notification.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the envelope is malformed.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let payload = reply_payload(opcode::BRIGHTNESS, raw)?;
        Ok(Self {
            level: Brightness::new(payload[0]),
        })
    }

    /// Returns the reported brightness level.
    #[must_use]
    pub const fn level(&self) -> Brightness {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::test_support::reply;

    #[test]
    fn decode_level() {
        let raw = reply(0x04, &[0xFE]);
        let response = BrightnessResponse::decode(&raw).unwrap();
        assert_eq!(response.level(), Brightness::new(0xFE));
    }

    #[test]
    fn rejects_wrong_opcode() {
        let raw = reply(0x01, &[0x10]);
        assert!(BrightnessResponse::decode(&raw).is_err());
    }
}

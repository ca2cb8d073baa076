// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state reply parsing.

use crate::error::DecodeError;
use crate::protocol::opcode;
use crate::response::reply_payload;

/// Reply to [`Command::GetPowerState`](crate::command::Command::GetPowerState).
///
/// The payload carries `0x01` for on and `0x00` for off; any other value is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerStateResponse {
    on: bool,
}

impl PowerStateResponse {
    /// Decodes a raw reply notification.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the envelope is malformed or the state byte
    /// is neither `0x00` nor `0x01`.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let payload = reply_payload(opcode::POWER, raw)?;
        match payload[0] {
            0x00 => Ok(Self { on: false }),
            0x01 => Ok(Self { on: true }),
            other => Err(DecodeError::InvalidValue {
                field: "power state".to_string(),
                message: format!("unexpected state byte {other:#04x}"),
            }),
        }
    }

    /// Returns whether the light reported itself on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }
}

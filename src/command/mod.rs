// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed commands for the H6199 control characteristic.
//!
//! A [`Command`] is pure data describing intent; it carries no connection
//! state. Commands encode to 20-byte [`Frame`]s and are consumed once by a
//! link session.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `PowerOn` / `PowerOff` | Switch the light on or off |
//! | `SetBrightness` | Brightness on the raw device scale |
//! | `SetStaticColor` | One color across the whole strip |
//! | `SetVideoMode` | Screen-sync mode, film or game profile |
//! | `SetMusicMode` | Music-reactive mode |
//! | `Get*` | Status and identity queries (empty payload) |

mod builder;

pub use builder::PowerOnBuilder;

use crate::error::FrameError;
use crate::protocol::{Frame, opcode};
use crate::types::{Brightness, MusicVariant, RgbColor, TAG_MUSIC, TAG_SEGMENT, TAG_VIDEO};

/// Segment mask covering all fifteen strip segments, appended to static
/// color writes.
const ALL_SEGMENTS: [u8; 2] = [0xFF, 0x7F];

/// A command or query understood by the device.
///
/// # Examples
///
/// ```
/// use dreamview_lib::command::Command;
/// use dreamview_lib::types::Brightness;
///
/// let cmd = Command::SetBrightness(Brightness::new(0x64));
/// assert_eq!(cmd.opcode(), 0x04);
/// assert_eq!(cmd.payload(), vec![0x64]);
/// assert!(!cmd.is_query());
///
/// let query = Command::GetPowerState;
/// assert!(query.is_query());
/// assert!(query.payload().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn the light on.
    PowerOn,
    /// Turn the light off.
    PowerOff,
    /// Set brightness on the raw device scale.
    SetBrightness(Brightness),
    /// Set a single static color across all segments.
    SetStaticColor(RgbColor),
    /// Enter screen-sync video mode.
    SetVideoMode {
        /// Use the low-latency game profile instead of the film profile.
        game_mode: bool,
    },
    /// Enter music-reactive mode.
    SetMusicMode(MusicVariant),
    /// Query the power state.
    GetPowerState,
    /// Query the active color mode.
    GetColorMode,
    /// Query the brightness level.
    GetBrightness,
    /// Query the MAC address.
    GetMacAddress,
    /// Query the firmware version.
    GetFirmwareVersion,
    /// Query the hardware version.
    GetHardwareVersion,
}

impl Command {
    /// Returns the opcode this command is sent under.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::PowerOn | Self::PowerOff | Self::GetPowerState => opcode::POWER,
            Self::SetBrightness(_) | Self::GetBrightness => opcode::BRIGHTNESS,
            Self::SetStaticColor(_)
            | Self::SetVideoMode { .. }
            | Self::SetMusicMode(_)
            | Self::GetColorMode => opcode::COLOR,
            Self::GetMacAddress => opcode::MAC_ADDRESS,
            Self::GetFirmwareVersion => opcode::FIRMWARE_VERSION,
            Self::GetHardwareVersion => opcode::HARDWARE_VERSION,
        }
    }

    /// Returns the frame payload for this command.
    ///
    /// Queries carry an empty payload.
    #[must_use]
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::PowerOn => vec![0x01],
            Self::PowerOff => vec![0x00],
            Self::SetBrightness(level) => vec![level.value()],
            Self::SetStaticColor(color) => {
                let (r, g, b) = color.channels();
                vec![
                    TAG_SEGMENT,
                    r,
                    g,
                    b,
                    0x00,
                    0x00,
                    ALL_SEGMENTS[0],
                    ALL_SEGMENTS[1],
                ]
            }
            Self::SetVideoMode { game_mode } => vec![TAG_VIDEO, 0x01, u8::from(*game_mode), 0x64],
            Self::SetMusicMode(variant) => vec![TAG_MUSIC, variant.value()],
            Self::GetPowerState
            | Self::GetColorMode
            | Self::GetBrightness
            | Self::GetMacAddress
            | Self::GetFirmwareVersion
            | Self::GetHardwareVersion => Vec::new(),
        }
    }

    /// Returns true for queries, which expect a notification in reply.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(
            self,
            Self::GetPowerState
                | Self::GetColorMode
                | Self::GetBrightness
                | Self::GetMacAddress
                | Self::GetFirmwareVersion
                | Self::GetHardwareVersion
        )
    }

    /// Encodes this command into a ready-to-send frame.
    ///
    /// Queries encode under the query marker, everything else under the
    /// command marker.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PayloadTooLarge`] if the payload exceeds the
    /// frame budget; command payloads defined here always fit, so this only
    /// fires on a protocol-contract regression.
    pub fn encode(&self) -> Result<Frame, FrameError> {
        if self.is_query() {
            return Ok(Frame::query(self.opcode()));
        }
        Frame::command(self.opcode(), &self.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_payloads() {
        assert_eq!(Command::PowerOn.opcode(), 0x01);
        assert_eq!(Command::PowerOn.payload(), vec![0x01]);
        assert_eq!(Command::PowerOff.payload(), vec![0x00]);
    }

    #[test]
    fn static_color_payload_is_segment_addressed() {
        let cmd = Command::SetStaticColor(RgbColor::new(10, 20, 30));
        assert_eq!(cmd.opcode(), 0x05);
        assert_eq!(
            cmd.payload(),
            vec![0x0B, 10, 20, 30, 0x00, 0x00, 0xFF, 0x7F]
        );
    }

    #[test]
    fn video_mode_payload_carries_game_flag() {
        let film = Command::SetVideoMode { game_mode: false };
        assert_eq!(film.payload(), vec![0x00, 0x01, 0x00, 0x64]);

        let game = Command::SetVideoMode { game_mode: true };
        assert_eq!(game.payload(), vec![0x00, 0x01, 0x01, 0x64]);
    }

    #[test]
    fn music_mode_payload() {
        let cmd = Command::SetMusicMode(MusicVariant::ENERGIC);
        assert_eq!(cmd.payload(), vec![0x0C, 0x03]);
    }

    #[test]
    fn queries_have_empty_payloads() {
        for query in [
            Command::GetPowerState,
            Command::GetColorMode,
            Command::GetBrightness,
            Command::GetMacAddress,
            Command::GetFirmwareVersion,
            Command::GetHardwareVersion,
        ] {
            assert!(query.is_query());
            assert!(query.payload().is_empty(), "{query:?}");
        }
    }

    #[test]
    fn encode_produces_checksummed_frame() {
        let frame = Command::PowerOn.encode().unwrap();
        let bytes = frame.as_bytes();
        assert_eq!(bytes[0], 0x33);
        assert_eq!(bytes[1], 0x01);
        assert_eq!(bytes[2], 0x01);
        assert_eq!(bytes[19], 0x33 ^ 0x01 ^ 0x01);
    }

    #[test]
    fn queries_encode_under_the_query_marker() {
        let frame = Command::GetPowerState.encode().unwrap();
        assert_eq!(frame.as_bytes()[0], crate::protocol::QUERY_MARKER);

        // Same opcode, different marker: power-off stays distinguishable.
        let off = Command::PowerOff.encode().unwrap();
        assert_ne!(frame.as_bytes(), off.as_bytes());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color-mode reply parsing.

use crate::error::DecodeError;
use crate::protocol::opcode;
use crate::response::reply_payload;
use crate::types::{
    ColorMode, MusicVariant, TAG_MUSIC, TAG_SCENE, TAG_SEGMENT, TAG_STATIC, TAG_VIDEO,
};

/// Reply to [`Command::GetColorMode`](crate::command::Command::GetColorMode).
///
/// The first payload byte is the mode tag. Video mode mirrors the set
/// payload and carries the game flag at payload byte 2; music mode carries
/// its sub-mode variant at payload byte 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorModeResponse {
    mode: ColorMode,
}

impl ColorModeResponse {
    /// Decodes a raw reply notification.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the envelope is malformed, the mode tag is
    /// unknown, or the video game flag is out of schema.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let payload = reply_payload(opcode::COLOR, raw)?;

        let mode = match payload[0] {
            TAG_VIDEO => {
                let game_mode = match payload[2] {
                    0x00 => false,
                    0x01 => true,
                    other => {
                        return Err(DecodeError::InvalidValue {
                            field: "game mode flag".to_string(),
                            message: format!("unexpected flag byte {other:#04x}"),
                        });
                    }
                };
                ColorMode::Video { game_mode }
            }
            TAG_STATIC => ColorMode::Static,
            TAG_SCENE => ColorMode::Scene,
            TAG_SEGMENT => ColorMode::Segment,
            TAG_MUSIC => ColorMode::Music {
                variant: MusicVariant::new(payload[1]),
            },
            other => {
                return Err(DecodeError::InvalidValue {
                    field: "color mode".to_string(),
                    message: format!("unknown mode tag {other:#04x}"),
                });
            }
        };

        Ok(Self { mode })
    }

    /// Returns the reported color mode.
    #[must_use]
    pub const fn mode(&self) -> ColorMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::test_support::reply;

    #[test]
    fn decode_static() {
        let raw = reply(0x05, &[0x02]);
        assert_eq!(
            ColorModeResponse::decode(&raw).unwrap().mode(),
            ColorMode::Static
        );
    }

    #[test]
    fn decode_video_film_and_game() {
        let film = reply(0x05, &[0x00, 0x01, 0x00, 0x64]);
        assert_eq!(
            ColorModeResponse::decode(&film).unwrap().mode(),
            ColorMode::Video { game_mode: false }
        );

        let game = reply(0x05, &[0x00, 0x01, 0x01, 0x64]);
        assert_eq!(
            ColorModeResponse::decode(&game).unwrap().mode(),
            ColorMode::Video { game_mode: true }
        );
    }

    #[test]
    fn decode_music_carries_variant() {
        let raw = reply(0x05, &[0x0C, 0x03]);
        assert_eq!(
            ColorModeResponse::decode(&raw).unwrap().mode(),
            ColorMode::Music {
                variant: MusicVariant::ENERGIC
            }
        );
    }

    #[test]
    fn decode_segment_and_scene() {
        let segment = reply(0x05, &[0x0B]);
        assert_eq!(
            ColorModeResponse::decode(&segment).unwrap().mode(),
            ColorMode::Segment
        );

        let scene = reply(0x05, &[0x04]);
        assert_eq!(
            ColorModeResponse::decode(&scene).unwrap().mode(),
            ColorMode::Scene
        );
    }

    #[test]
    fn rejects_unknown_mode_tag() {
        let raw = reply(0x05, &[0x7E]);
        let err = ColorModeResponse::decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_bad_game_flag() {
        let raw = reply(0x05, &[0x00, 0x01, 0x05, 0x64]);
        assert!(ColorModeResponse::decode(&raw).is_err());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device color modes.
//!
//! The H6199 is always in exactly one color mode. The firmware identifies
//! the active mode with a single tag byte inside the color opcode payload;
//! the tags are fixed by the protocol and shared between the set commands
//! and the mode-query reply.

use std::fmt;

/// Mode tag for video (screen-sync) mode.
pub(crate) const TAG_VIDEO: u8 = 0x00;
/// Mode tag for static (manual) color mode.
pub(crate) const TAG_STATIC: u8 = 0x02;
/// Mode tag for built-in scene animations.
pub(crate) const TAG_SCENE: u8 = 0x04;
/// Mode tag for per-segment colors.
pub(crate) const TAG_SEGMENT: u8 = 0x0B;
/// Mode tag for music-reactive mode.
pub(crate) const TAG_MUSIC: u8 = 0x0C;

/// Music-reactive sub-mode, as a raw firmware byte.
///
/// Only the "energic" variant is produced by this library; other variants
/// reported by the device are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MusicVariant(u8);

impl MusicVariant {
    /// The "energic" music effect.
    pub const ENERGIC: Self = Self(0x03);

    /// Creates a music variant from a raw firmware byte.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw firmware byte.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

/// The active color mode of the light.
///
/// Exactly one mode is active at any time; mode-affecting commands replace
/// the whole mode (last write wins on the physical device).
///
/// # Examples
///
/// ```
/// use dreamview_lib::types::ColorMode;
///
/// let mode = ColorMode::Video { game_mode: true };
/// assert!(matches!(mode, ColorMode::Video { game_mode: true }));
/// assert_eq!(mode.to_string(), "video (game)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorMode {
    /// A single static color across the whole strip.
    Static,
    /// Screen-sync mode driven by the camera, optionally tuned for games.
    Video {
        /// True when the low-latency game profile is active.
        game_mode: bool,
    },
    /// Music-reactive mode.
    Music {
        /// The active music sub-mode.
        variant: MusicVariant,
    },
    /// Individually addressed segment colors.
    Segment,
    /// A built-in scene animation.
    Scene,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Video { game_mode: true } => write!(f, "video (game)"),
            Self::Video { game_mode: false } => write!(f, "video (film)"),
            Self::Music { variant } => write!(f, "music ({:#04x})", variant.value()),
            Self::Segment => write!(f, "segment"),
            Self::Scene => write!(f, "scene"),
        }
    }
}

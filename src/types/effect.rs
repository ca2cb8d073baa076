// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing effect selection for power-on requests.

use std::fmt;

/// Effect requested when turning the light on.
///
/// `Off` (and an absent effect) both mean "plain static color"; the
/// [`PowerOnBuilder`](crate::command::PowerOnBuilder) falls back to the
/// last-known color in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// No effect: static color mode.
    Off,
    /// Music-reactive mode.
    Music,
    /// Screen-sync tuned for film.
    Film,
    /// Screen-sync tuned for games.
    Game,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Music => "music",
            Self::Film => "film",
            Self::Game => "game",
        };
        write!(f, "{name}")
    }
}

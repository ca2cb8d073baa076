// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness level on the device's raw scale.

use std::fmt;

/// Brightness level as the device firmware reports and accepts it.
///
/// The H6199 uses a raw single-byte scale rather than a percentage; the
/// value is passed through unchanged in both directions. Brightness is only
/// meaningful while the light is powered on, but the last value is retained
/// across power-off.
///
/// # Examples
///
/// ```
/// use dreamview_lib::types::Brightness;
///
/// let level = Brightness::new(0xFE);
/// assert_eq!(level.value(), 0xFE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Brightness(u8);

impl Brightness {
    /// Creates a brightness level from a raw device value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw device value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_scale_passthrough() {
        assert_eq!(Brightness::new(0).value(), 0);
        assert_eq!(Brightness::new(255).value(), 255);
        assert_eq!(Brightness::from(0x64).value(), 0x64);
    }
}

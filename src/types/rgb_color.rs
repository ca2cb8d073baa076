// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with hex parsing.
//!
//! DreamView lights take colors as raw 8-bit RGB triples inside segment
//! color commands; no conversion to another color space is involved.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use dreamview_lib::types::RgbColor;
///
/// // Create from RGB values
/// let color = RgbColor::new(255, 128, 0);  // Orange
/// assert_eq!(color.red(), 255);
/// assert_eq!(color.green(), 128);
/// assert_eq!(color.blue(), 0);
///
/// // Parse from hex string
/// let red = RgbColor::from_hex("#FF0000").unwrap();
/// assert_eq!(red.red(), 255);
///
/// // Convert to hex
/// assert_eq!(red.to_hex(), "FF0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Zero-black, the placeholder color recorded at initialization.
    ///
    /// Static color cannot be queried back from the device firmware, so a
    /// fresh snapshot starts from black until a color write is observed.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts formats: `#RRGGBB`, `RRGGBB`
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidValue` if the hex string is invalid.
    pub fn from_hex(hex: &str) -> Result<Self, DecodeError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 {
            return Err(DecodeError::InvalidValue {
                field: "color".to_string(),
                message: format!("expected 6 hex digits, got {}", hex.len()),
            });
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| DecodeError::InvalidValue {
                field: "color".to_string(),
                message: e.to_string(),
            })
        };

        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as an `(r, g, b)` tuple.
    #[must_use]
    pub const fn channels(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// Returns the color as an uppercase hex string without a hash.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

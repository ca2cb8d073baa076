// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable cached view of the device state.

use crate::types::{Brightness, ColorMode, RgbColor};

/// Identity strings read once at initialization and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceIdentity {
    mac: String,
    firmware_version: String,
    hardware_version: String,
}

impl DeviceIdentity {
    /// Creates a device identity from its three components.
    #[must_use]
    pub fn new(
        mac: impl Into<String>,
        firmware_version: impl Into<String>,
        hardware_version: impl Into<String>,
    ) -> Self {
        Self {
            mac: mac.into(),
            firmware_version: firmware_version.into(),
            hardware_version: hardware_version.into(),
        }
    }

    /// Returns the MAC address reported by the device.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Returns the firmware version string.
    #[must_use]
    pub fn firmware_version(&self) -> &str {
        &self.firmware_version
    }

    /// Returns the hardware version string.
    #[must_use]
    pub fn hardware_version(&self) -> &str {
        &self.hardware_version
    }
}

/// Immutable snapshot of the light's state.
///
/// A snapshot is never mutated in place: every update constructs a new
/// value from the old one plus the fields that changed (the `with_*`
/// methods), so concurrent readers can never observe a partially updated
/// snapshot.
///
/// Brightness is only meaningful while the light is on, but the field
/// retains its last value across power-off. `color` reflects the last color
/// written, starting from zero-black at initialization; the firmware
/// cannot report its static color back.
///
/// # Examples
///
/// ```
/// use dreamview_lib::state::{DeviceIdentity, DeviceSnapshot};
/// use dreamview_lib::types::{Brightness, ColorMode};
///
/// let snapshot = DeviceSnapshot::new(
///     "A4:C1:38:12:34:56",
///     DeviceIdentity::new("A4:C1:38:12:34:56", "1.00.21", "1.0.0"),
///     true,
///     ColorMode::Static,
///     Brightness::new(128),
/// );
///
/// let off = snapshot.clone().with_power_state(false);
/// assert!(!off.power_state());
/// assert_eq!(off.brightness(), snapshot.brightness());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceSnapshot {
    address: String,
    identity: DeviceIdentity,
    power_state: bool,
    mode: ColorMode,
    color: Option<RgbColor>,
    brightness: Brightness,
}

impl DeviceSnapshot {
    /// Creates the initial snapshot from the values read at init.
    ///
    /// The color field starts at zero-black: static color is write-only on
    /// this firmware and is only known after the first color command.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        identity: DeviceIdentity,
        power_state: bool,
        mode: ColorMode,
        brightness: Brightness,
    ) -> Self {
        Self {
            address: address.into(),
            identity,
            power_state,
            mode,
            color: Some(RgbColor::BLACK),
            brightness,
        }
    }

    /// Returns the stable hardware address this controller targets.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the device identity read at init.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns whether the light is on.
    #[must_use]
    pub fn power_state(&self) -> bool {
        self.power_state
    }

    /// Returns the active color mode.
    #[must_use]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Returns the last known color, if any.
    #[must_use]
    pub fn color(&self) -> Option<RgbColor> {
        self.color
    }

    /// Returns the brightness on the raw device scale.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Returns a new snapshot with the power state replaced.
    #[must_use]
    pub fn with_power_state(mut self, power_state: bool) -> Self {
        self.power_state = power_state;
        self
    }

    /// Returns a new snapshot with the color mode replaced.
    #[must_use]
    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a new snapshot with the color replaced.
    #[must_use]
    pub fn with_color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns a new snapshot with the brightness replaced.
    #[must_use]
    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = brightness;
        self
    }

    /// Returns a new snapshot with the refreshable status fields replaced.
    ///
    /// Identity and color are untouched: neither can be re-read from the
    /// device, so a refresh only replaces what it actually observed.
    #[must_use]
    pub fn with_status(self, power_state: bool, mode: ColorMode, brightness: Brightness) -> Self {
        Self {
            power_state,
            mode,
            brightness,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DeviceSnapshot {
        DeviceSnapshot::new(
            "A4:C1:38:12:34:56",
            DeviceIdentity::new("A4:C1:38:12:34:56", "1.00.21", "1.0.0"),
            true,
            ColorMode::Static,
            Brightness::new(50),
        )
    }

    #[test]
    fn initial_color_is_black() {
        assert_eq!(snapshot().color(), Some(RgbColor::BLACK));
    }

    #[test]
    fn with_power_state_preserves_other_fields() {
        let before = snapshot().with_color(RgbColor::new(1, 2, 3));
        let after = before.clone().with_power_state(false);

        assert!(!after.power_state());
        assert_eq!(after.color(), Some(RgbColor::new(1, 2, 3)));
        assert_eq!(after.brightness(), before.brightness());
        assert_eq!(after.identity(), before.identity());
    }

    #[test]
    fn with_status_keeps_identity_and_color() {
        let before = snapshot().with_color(RgbColor::new(9, 9, 9));
        let after = before.clone().with_status(
            false,
            ColorMode::Video { game_mode: true },
            Brightness::new(10),
        );

        assert!(!after.power_state());
        assert_eq!(after.mode(), ColorMode::Video { game_mode: true });
        assert_eq!(after.brightness(), Brightness::new(10));
        assert_eq!(after.color(), Some(RgbColor::new(9, 9, 9)));
        assert_eq!(after.address(), before.address());
    }

    #[test]
    fn updates_construct_new_values() {
        let before = snapshot();
        let after = before.clone().with_brightness(Brightness::new(200));

        assert_eq!(before.brightness(), Brightness::new(50));
        assert_eq!(after.brightness(), Brightness::new(200));
    }
}

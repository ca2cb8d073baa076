// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for composite power-on requests.

use crate::command::Command;
use crate::state::DeviceSnapshot;
use crate::types::{Brightness, ColorMode, Effect, MusicVariant, RgbColor};

/// Color used when switching to static mode with no color ever observed.
pub const FALLBACK_COLOR: RgbColor = RgbColor::new(248, 51, 255);

/// Assembles an ordered command list for a "turn on with options" request
/// and computes the snapshot the device will be in once the list applies,
/// without touching the network.
///
/// Command order matters: mode-affecting commands are last-write-wins on
/// the physical device, so the list is always `PowerOn`, then brightness,
/// then the effect branch, then a trailing static color when one was given
/// alongside an active effect.
///
/// An absent effect and [`Effect::Off`] both mean static color mode. In
/// that branch an explicit color and the effect fallback are merged into
/// exactly one static-color command, using the explicit color when given,
/// else the last-known color, else [`FALLBACK_COLOR`].
///
/// # Examples
///
/// ```
/// use dreamview_lib::command::{Command, PowerOnBuilder};
/// use dreamview_lib::types::Effect;
///
/// let builder = PowerOnBuilder::new(None).with_effect(Effect::Game);
/// let commands = builder.build();
///
/// assert_eq!(commands[0], Command::PowerOn);
/// assert_eq!(
///     *commands.last().unwrap(),
///     Command::SetVideoMode { game_mode: true }
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PowerOnBuilder {
    prior: Option<DeviceSnapshot>,
    brightness: Option<Brightness>,
    effect: Option<Effect>,
    color: Option<RgbColor>,
}

impl PowerOnBuilder {
    /// Creates a builder seeded with the current snapshot, if one exists.
    ///
    /// Without a prior snapshot the builder still produces a command list,
    /// but [`predicted_snapshot`](Self::predicted_snapshot) returns `None`:
    /// identity fields cannot be fabricated, so the cached state is left
    /// for the next refresh to reconcile.
    #[must_use]
    pub fn new(prior: Option<DeviceSnapshot>) -> Self {
        Self {
            prior,
            brightness: None,
            effect: None,
            color: None,
        }
    }

    /// Requests a brightness level.
    #[must_use]
    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Requests an effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Requests a static color.
    #[must_use]
    pub fn with_color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Assembles the ordered command list for this request.
    #[must_use]
    pub fn build(&self) -> Vec<Command> {
        let mut commands = vec![Command::PowerOn];

        if let Some(brightness) = self.brightness {
            commands.push(Command::SetBrightness(brightness));
        }

        let mut color_sent = false;
        match self.effect {
            Some(Effect::Music) => {
                commands.push(Command::SetMusicMode(MusicVariant::ENERGIC));
            }
            Some(Effect::Film) => {
                commands.push(Command::SetVideoMode { game_mode: false });
            }
            Some(Effect::Game) => {
                commands.push(Command::SetVideoMode { game_mode: true });
            }
            Some(Effect::Off) | None => {
                commands.push(Command::SetStaticColor(self.static_color()));
                color_sent = true;
            }
        }

        if !color_sent && let Some(color) = self.color {
            commands.push(Command::SetStaticColor(color));
        }

        commands
    }

    /// Computes the snapshot the device will hold after the command list
    /// applies in order.
    ///
    /// Returns `None` when no prior snapshot was available.
    #[must_use]
    pub fn predicted_snapshot(&self) -> Option<DeviceSnapshot> {
        let prior = self.prior.clone()?;
        Some(self.build().iter().fold(prior, apply_command))
    }

    /// Resolves the color for the static branch: explicit, else last
    /// known, else the fixed fallback.
    fn static_color(&self) -> RgbColor {
        self.color
            .or_else(|| self.prior.as_ref().and_then(DeviceSnapshot::color))
            .unwrap_or(FALLBACK_COLOR)
    }
}

/// Folds one command into a predicted snapshot.
fn apply_command(snapshot: DeviceSnapshot, command: &Command) -> DeviceSnapshot {
    match command {
        Command::PowerOn => snapshot.with_power_state(true),
        Command::PowerOff => snapshot.with_power_state(false),
        Command::SetBrightness(level) => snapshot.with_brightness(*level),
        Command::SetStaticColor(color) => snapshot.with_mode(ColorMode::Static).with_color(*color),
        Command::SetVideoMode { game_mode } => snapshot.with_mode(ColorMode::Video {
            game_mode: *game_mode,
        }),
        Command::SetMusicMode(variant) => {
            snapshot.with_mode(ColorMode::Music { variant: *variant })
        }
        Command::GetPowerState
        | Command::GetColorMode
        | Command::GetBrightness
        | Command::GetMacAddress
        | Command::GetFirmwareVersion
        | Command::GetHardwareVersion => snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DeviceIdentity;

    fn prior() -> DeviceSnapshot {
        DeviceSnapshot::new(
            "A4:C1:38:12:34:56",
            DeviceIdentity::new("A4:C1:38:12:34:56", "1.00.21", "1.0.0"),
            false,
            ColorMode::Static,
            Brightness::new(40),
        )
    }

    #[test]
    fn bare_build_powers_on_with_fallback_color() {
        let commands = PowerOnBuilder::new(None).build();
        assert_eq!(
            commands,
            vec![Command::PowerOn, Command::SetStaticColor(FALLBACK_COLOR)]
        );
    }

    #[test]
    fn game_effect_ends_in_video_game_command() {
        let builder = PowerOnBuilder::new(Some(prior())).with_effect(Effect::Game);
        let commands = builder.build();

        assert_eq!(
            *commands.last().unwrap(),
            Command::SetVideoMode { game_mode: true }
        );

        let predicted = builder.predicted_snapshot().unwrap();
        assert!(predicted.power_state());
        assert_eq!(predicted.mode(), ColorMode::Video { game_mode: true });
    }

    #[test]
    fn effect_off_uses_last_known_color() {
        let prior = prior().with_color(RgbColor::new(10, 20, 30));
        let builder = PowerOnBuilder::new(Some(prior)).with_effect(Effect::Off);

        let commands = builder.build();
        assert_eq!(
            *commands.last().unwrap(),
            Command::SetStaticColor(RgbColor::new(10, 20, 30))
        );
    }

    #[test]
    fn effect_off_with_explicit_color_sends_one_static_command() {
        let builder = PowerOnBuilder::new(Some(prior()))
            .with_effect(Effect::Off)
            .with_color(RgbColor::new(1, 2, 3));

        let commands = builder.build();
        let static_writes = commands
            .iter()
            .filter(|c| matches!(c, Command::SetStaticColor(_)))
            .count();

        assert_eq!(static_writes, 1);
        assert_eq!(
            *commands.last().unwrap(),
            Command::SetStaticColor(RgbColor::new(1, 2, 3))
        );
    }

    #[test]
    fn effect_with_color_appends_trailing_static_command() {
        let builder = PowerOnBuilder::new(Some(prior()))
            .with_effect(Effect::Music)
            .with_color(RgbColor::new(5, 6, 7));

        let commands = builder.build();
        assert_eq!(
            commands,
            vec![
                Command::PowerOn,
                Command::SetMusicMode(MusicVariant::ENERGIC),
                Command::SetStaticColor(RgbColor::new(5, 6, 7)),
            ]
        );

        // Last write wins: the prediction lands on static color.
        let predicted = builder.predicted_snapshot().unwrap();
        assert_eq!(predicted.mode(), ColorMode::Static);
        assert_eq!(predicted.color(), Some(RgbColor::new(5, 6, 7)));
    }

    #[test]
    fn brightness_ordering_and_prediction() {
        let builder = PowerOnBuilder::new(Some(prior())).with_brightness(Brightness::new(200));
        let commands = builder.build();

        assert_eq!(commands[0], Command::PowerOn);
        assert_eq!(commands[1], Command::SetBrightness(Brightness::new(200)));

        let predicted = builder.predicted_snapshot().unwrap();
        assert_eq!(predicted.brightness(), Brightness::new(200));
    }

    #[test]
    fn no_prior_snapshot_predicts_nothing() {
        let builder = PowerOnBuilder::new(None).with_color(RgbColor::new(1, 1, 1));
        assert!(builder.predicted_snapshot().is_none());
    }

    #[test]
    fn fallback_color_without_prior_state() {
        let builder = PowerOnBuilder::new(None).with_effect(Effect::Off);
        let commands = builder.build();
        assert_eq!(
            *commands.last().unwrap(),
            Command::SetStaticColor(RgbColor::new(248, 51, 255))
        );
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types shared across the library.

mod brightness;
mod color_mode;
mod effect;
mod rgb_color;

pub use brightness::Brightness;
pub use color_mode::{ColorMode, MusicVariant};
pub use effect::Effect;
pub use rgb_color::RgbColor;

pub(crate) use color_mode::{TAG_MUSIC, TAG_SCENE, TAG_SEGMENT, TAG_STATIC, TAG_VIDEO};

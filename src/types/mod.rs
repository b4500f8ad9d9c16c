// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the poller, the converters and the hub client.
//!
//! # Types
//!
//! - [`Checkpoint`] - Marker of the last change the poller has seen
//! - [`RgbwColor`] - The hub's native `r,g,b,w` color encoding
//! - [`HsvColor`] - Hue (0-360), saturation (0-100) and value (0-100)
//! - [`TemperatureUnit`] - Unit the hub reports temperatures in
//! - [`SecuritySystemState`] - Local alarm panel state

mod checkpoint;
mod color;
mod security;
mod temperature;

pub use checkpoint::Checkpoint;
pub use color::{HsvColor, RgbwColor};
pub use security::SecuritySystemState;
pub use temperature::{TemperatureUnit, fahrenheit_to_celsius};

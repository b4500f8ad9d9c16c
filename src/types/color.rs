// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color types for RGBW dimmers.
//!
//! The hub reports colors as a comma separated `r,g,b,w` string with 8-bit
//! channels. Local lightbulb representations expose hue, saturation and
//! brightness instead, so every color change goes through [`RgbwColor::to_hsv`].

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Color in the hub's native encoding: red, green, blue and white channels.
///
/// # Examples
///
/// ```
/// use fibaro_sync::types::RgbwColor;
///
/// let color: RgbwColor = "255,0,0,0".parse().unwrap();
/// assert_eq!(color.red(), 255);
/// assert_eq!(color.white(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbwColor {
    red: u8,
    green: u8,
    blue: u8,
    white: u8,
}

impl RgbwColor {
    /// Creates a new RGBW color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8, white: u8) -> Self {
        Self {
            red,
            green,
            blue,
            white,
        }
    }

    /// Parses the hub's `r,g,b,w` string.
    ///
    /// The white channel may be omitted, in which case it is zero. Channels
    /// may carry surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` if the string does not contain
    /// three or four channels in the 0-255 range.
    pub fn parse_hub(s: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidColor(s.to_string());
        let channels = s
            .split(',')
            .map(|c| c.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match channels.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b, 0)),
            [r, g, b, w] => Ok(Self::new(*r, *g, *b, *w)),
            _ => Err(invalid()),
        }
    }

    /// Returns the red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the white channel.
    #[must_use]
    pub const fn white(&self) -> u8 {
        self.white
    }

    /// Converts to hue/saturation/value.
    ///
    /// Hue and saturation come from the RGB channels only. The value is the
    /// strongest of all four channels so that a white-only light still
    /// reports as lit.
    ///
    /// # Examples
    ///
    /// ```
    /// use fibaro_sync::types::RgbwColor;
    ///
    /// let hsv = RgbwColor::new(0, 255, 0, 0).to_hsv();
    /// assert_eq!(hsv.hue().round(), 120.0);
    /// assert_eq!(hsv.saturation().round(), 100.0);
    /// assert_eq!(hsv.value().round(), 100.0);
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn to_hsv(&self) -> HsvColor {
        let r = f64::from(self.red) / 255.0;
        let g = f64::from(self.green) / 255.0;
        let b = f64::from(self.blue) / 255.0;
        let w = f64::from(self.white) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        let value = max.max(w);

        let hue = if delta < f64::EPSILON {
            0.0
        } else if (max - r).abs() < f64::EPSILON {
            let h = 60.0 * (((g - b) / delta) % 6.0);
            if h < 0.0 { h + 360.0 } else { h }
        } else if (max - g).abs() < f64::EPSILON {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        HsvColor::new(hue, saturation * 100.0, value * 100.0)
    }
}

impl fmt::Display for RgbwColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.red, self.green, self.blue, self.white)
    }
}

impl FromStr for RgbwColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hub(s)
    }
}

/// Hue/saturation/value color as floating point components.
///
/// Hue is in degrees (0-360), saturation and value are percentages
/// (0-100). Components are kept unrounded; writers round them when they
/// store the result on a characteristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvColor {
    hue: f64,
    saturation: f64,
    value: f64,
}

impl HsvColor {
    /// Creates a new HSV color.
    #[must_use]
    pub const fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> f64 {
        self.hue
    }

    /// Returns the saturation percentage.
    #[must_use]
    pub const fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Returns the value (brightness) percentage.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns `true` if the light is lit.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.value != 0.0
    }
}

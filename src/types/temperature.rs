// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature unit handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Unit the hub reports temperatures in.
///
/// Local temperature sensors always store Celsius, so readings from a hub
/// configured for Fahrenheit are converted on the way in.
///
/// # Examples
///
/// ```
/// use fibaro_sync::types::TemperatureUnit;
///
/// assert_eq!(TemperatureUnit::Fahrenheit.to_celsius(212.0), 100.0);
/// assert_eq!(TemperatureUnit::Celsius.to_celsius(21.5), 21.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    #[default]
    #[serde(rename = "C", alias = "c", alias = "Celsius")]
    Celsius,
    /// Degrees Fahrenheit.
    #[serde(rename = "F", alias = "f", alias = "Fahrenheit")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Returns the unit letter.
    #[must_use]
    pub const fn letter(&self) -> char {
        match self {
            Self::Celsius => 'C',
            Self::Fahrenheit => 'F',
        }
    }

    /// Converts a reading in this unit to Celsius.
    #[must_use]
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Fahrenheit => fahrenheit_to_celsius(value),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for TemperatureUnit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" | "CELSIUS" => Ok(Self::Celsius),
            "F" | "FAHRENHEIT" => Ok(Self::Fahrenheit),
            _ => Err(ValueError::UnknownUnit(s.to_string())),
        }
    }
}

/// Converts degrees Fahrenheit to degrees Celsius.
#[must_use]
pub fn fahrenheit_to_celsius(value: f64) -> f64 {
    (value - 32.0) * 5.0 / 9.0
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poller configuration.
//!
//! Loading the configuration is the application's job. [`PollerConfig`]
//! can be built in code with its `with_*` methods or deserialized from the
//! platform's JSON configuration, whose keys and loosely typed values
//! (numbers as strings, comma separated lists, `"enabled"` flags) it
//! accepts as-is.

use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::types::TemperatureUnit;

/// Settings consumed by the [`Poller`](crate::poller::Poller).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use fibaro_sync::config::PollerConfig;
/// use fibaro_sync::types::TemperatureUnit;
///
/// let config = PollerConfig::from_json(r#"{
///     "pollerperiod": "3",
///     "switchglobalvariables": "Garden,Porch",
///     "securitysystem": "enabled",
///     "FibaroTemperatureUnit": "F",
///     "logsLevel": "1"
/// }"#).unwrap();
///
/// assert_eq!(config.poll_interval, Duration::from_secs(3));
/// assert_eq!(config.switch_global_variables, ["Garden", "Porch"]);
/// assert!(config.dimmer_global_variables.is_empty());
/// assert!(config.security_system);
/// assert_eq!(config.temperature_unit, TemperatureUnit::Fahrenheit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Idle delay between the end of one cycle and the start of the next.
    /// Zero disables polling.
    #[serde(rename = "pollerperiod", deserialize_with = "seconds")]
    pub poll_interval: Duration,

    /// Global variables mirrored as switches.
    #[serde(rename = "switchglobalvariables", deserialize_with = "name_list")]
    pub switch_global_variables: Vec<String>,

    /// Global variables mirrored as dimmers.
    #[serde(rename = "dimmerglobalvariables", deserialize_with = "name_list")]
    pub dimmer_global_variables: Vec<String>,

    /// Whether the alarm panel state is polled.
    #[serde(rename = "securitysystem", deserialize_with = "enabled_flag")]
    pub security_system: bool,

    /// Unit the hub reports temperatures in.
    #[serde(rename = "FibaroTemperatureUnit")]
    pub temperature_unit: TemperatureUnit,

    /// Verbosity of per-update logging; 0 silences it.
    #[serde(rename = "logsLevel", deserialize_with = "log_level")]
    pub log_level: u8,
}

impl PollerConfig {
    /// Default idle delay between cycles.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            switch_global_variables: Vec::new(),
            dimmer_global_variables: Vec::new(),
            security_system: false,
            temperature_unit: TemperatureUnit::Celsius,
            log_level: 1,
        }
    }

    /// Parses the platform's JSON configuration.
    ///
    /// Unknown keys are ignored; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or a value has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the idle delay between cycles.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the switch global variables from a comma separated list.
    #[must_use]
    pub fn with_switch_global_variables(mut self, names: &str) -> Self {
        self.switch_global_variables = parse_name_list(names);
        self
    }

    /// Sets the dimmer global variables from a comma separated list.
    #[must_use]
    pub fn with_dimmer_global_variables(mut self, names: &str) -> Self {
        self.dimmer_global_variables = parse_name_list(names);
        self
    }

    /// Enables or disables the alarm panel poller.
    #[must_use]
    pub fn with_security_system(mut self, enabled: bool) -> Self {
        self.security_system = enabled;
        self
    }

    /// Sets the hub's temperature unit.
    #[must_use]
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Sets the logging verbosity.
    #[must_use]
    pub fn with_log_level(mut self, level: u8) -> Self {
        self.log_level = level;
        self
    }

    /// Returns `true` unless the poll interval is zero.
    #[must_use]
    pub fn polling_enabled(&self) -> bool {
        !self.poll_interval.is_zero()
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a comma separated list of names.
///
/// Names are trimmed and empty entries dropped, so `""` yields no names.
#[must_use]
pub fn parse_name_list(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Null => None,
        other => return Err(de::Error::custom(format!("invalid poller period {other}"))),
    };
    Ok(secs.map_or(PollerConfig::DEFAULT_POLL_INTERVAL, Duration::from_secs))
}

fn name_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(parse_name_list(&s)),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(de::Error::custom(format!("invalid name list {other}"))),
    }
}

fn enabled_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) => Ok(s.trim().eq_ignore_ascii_case("enabled")),
        Value::Null => Ok(false),
        other => Err(de::Error::custom(format!("invalid feature flag {other}"))),
    }
}

fn log_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n
            .as_u64()
            .map_or(0, |level| u8::try_from(level).unwrap_or(u8::MAX))),
        Value::String(s) => Ok(s.trim().parse::<u8>().unwrap_or(0)),
        Value::Null => Ok(0),
        other => Err(de::Error::custom(format!("invalid log level {other}"))),
    }
}

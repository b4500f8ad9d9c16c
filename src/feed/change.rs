// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change feed records as returned by the hub.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::subscription::Property;
use crate::types::Checkpoint;

/// One entry of the hub's change feed.
///
/// The hub only sends the fields that changed, so every payload field is
/// optional. Raw values stay as JSON because the hub mixes numbers,
/// booleans and numeric strings for the same property across devices.
///
/// # Examples
///
/// ```
/// use fibaro_sync::feed::ChangeRecord;
///
/// let change: ChangeRecord = serde_json::from_str(r#"{"id": 7, "value": 75}"#).unwrap();
/// assert_eq!(change.id, 7);
/// assert!(change.value.is_some());
/// assert!(change.color.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Hub device id.
    pub id: i64,

    /// Primary value. A present `null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    /// Secondary value (second channel of double switches and the like).
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value2: Option<Value>,

    /// Legacy name for `value` used by activity switches.
    #[serde(
        default,
        rename = "ui.startStopActivitySwitch.value",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub activity_switch: Option<Value>,

    /// RGBW color as `r,g,b,w`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Thermostat operating mode name.
    #[serde(
        default,
        rename = "thermostatMode",
        skip_serializing_if = "Option::is_none"
    )]
    pub thermostat_mode: Option<String>,

    /// Heating setpoint.
    #[serde(
        default,
        rename = "heatingThermostatSetpoint",
        skip_serializing_if = "Option::is_none"
    )]
    pub heating_thermostat_setpoint: Option<Value>,
}

impl ChangeRecord {
    /// Creates an empty change for a device.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Sets the primary value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the secondary value.
    #[must_use]
    pub fn with_value2(mut self, value: impl Into<Value>) -> Self {
        self.value2 = Some(value.into());
        self
    }

    /// Sets the activity switch value.
    #[must_use]
    pub fn with_activity_switch(mut self, value: impl Into<Value>) -> Self {
        self.activity_switch = Some(value.into());
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the thermostat mode.
    #[must_use]
    pub fn with_thermostat_mode(mut self, mode: impl Into<String>) -> Self {
        self.thermostat_mode = Some(mode.into());
        self
    }

    /// Sets the heating setpoint.
    #[must_use]
    pub fn with_heating_setpoint(mut self, value: impl Into<Value>) -> Self {
        self.heating_thermostat_setpoint = Some(value.into());
        self
    }

    /// Returns the raw value a subscription on `property` reads.
    ///
    /// `value2` subscriptions read `value2`; every other property reads
    /// `value`.
    #[must_use]
    pub fn tracked_value(&self, property: &Property) -> Option<&Value> {
        match property {
            Property::Value2 => self.value2.as_ref(),
            _ => self.value.as_ref(),
        }
    }

    /// Mutable counterpart of [`tracked_value`](Self::tracked_value).
    pub fn tracked_value_mut(&mut self, property: &Property) -> Option<&mut Value> {
        match property {
            Property::Value2 => self.value2.as_mut(),
            _ => self.value.as_mut(),
        }
    }
}

/// Body of a `refreshStates` response.
///
/// Entries of `changes` that cannot be decoded are dropped individually so
/// one malformed record does not discard the rest of the feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawRefreshResponse")]
pub struct RefreshResponse {
    /// Marker to pass on the next request, if the hub sent one.
    pub last: Option<Checkpoint>,
    /// Decoded changes in feed order.
    pub changes: Vec<ChangeRecord>,
    /// Number of entries that could not be decoded.
    pub skipped: usize,
}

impl RefreshResponse {
    /// Creates a response from decoded parts.
    #[must_use]
    pub fn new(last: Option<Checkpoint>, changes: Vec<ChangeRecord>) -> Self {
        Self {
            last,
            changes,
            skipped: 0,
        }
    }
}

#[derive(Deserialize)]
struct RawRefreshResponse {
    #[serde(default)]
    last: Option<Checkpoint>,
    #[serde(default)]
    changes: Option<Vec<Value>>,
}

impl From<RawRefreshResponse> for RefreshResponse {
    fn from(raw: RawRefreshResponse) -> Self {
        let entries = raw.changes.unwrap_or_default();
        let total = entries.len();
        let changes: Vec<ChangeRecord> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ChangeRecord>(entry) {
                Ok(change) => Some(change),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping undecodable change record");
                    None
                }
            })
            .collect();

        Self {
            last: raw.last,
            skipped: total - changes.len(),
            changes,
        }
    }
}

/// Body of a `globalVariables/<name>` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GlobalVariable {
    /// Variable name, when the hub echoes it.
    #[serde(default)]
    pub name: Option<String>,
    /// Current value as text.
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl GlobalVariable {
    /// Creates a global variable value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }
}

// Only called when the key is present, so `null` still counts as a value.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// Some firmware versions return numeric variables unquoted.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar global variable value, got {other}"
        ))),
    }
}

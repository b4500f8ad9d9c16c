// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in converters for the kinds the hub reports directly.

use serde_json::Value;

use crate::accessory::{Characteristic, CharacteristicKind};
use crate::error::ValueError;
use crate::feed::ChangeRecord;
use crate::subscription::Property;

use super::ConverterRegistry;

/// Hub dimmers top out at 99.
const HUB_DIMMER_MAX: f64 = 99.0;

pub(super) fn register_defaults(registry: &mut ConverterRegistry) {
    use CharacteristicKind as K;

    for kind in [K::On, K::OutletInUse, K::MotionDetected] {
        registry.register(kind, set_bool);
    }
    for kind in [K::ContactSensorState, K::LeakDetected, K::SmokeDetected, K::StatusLowBattery] {
        registry.register(kind, set_flag);
    }
    for kind in [K::Brightness, K::CurrentPosition, K::TargetPosition] {
        registry.register(kind, set_percentage);
    }
    for kind in [
        K::CurrentTemperature,
        K::CurrentRelativeHumidity,
        K::CurrentAmbientLightLevel,
        K::Hue,
        K::Saturation,
    ] {
        registry.register(kind, set_float);
    }
    registry.register(K::BatteryLevel, set_battery);
    registry.register(K::TargetTemperature, set_setpoint);
    registry.register(K::CurrentHeatingCoolingState, set_current_heating_cooling_state);
    registry.register(K::TargetHeatingCoolingState, set_heating_cooling_state);
}

/// Reads a raw hub value as a number.
///
/// Accepts JSON numbers, numeric strings and booleans (as 0/1).
///
/// # Errors
///
/// Returns `ValueError::NotANumber` for anything else.
pub fn value_as_f64(value: &Value) -> Result<f64, ValueError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| ValueError::NotANumber(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValueError::NotANumber(value.to_string())),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err(ValueError::NotANumber(value.to_string())),
    }
}

/// Reads a raw hub value as a boolean.
///
/// Accepts JSON booleans, numbers (non-zero is `true`) and the strings
/// `"true"`, `"false"` or any number.
///
/// # Errors
///
/// Returns `ValueError::NotABoolean` for anything else.
pub fn value_as_bool(value: &Value) -> Result<bool, ValueError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "turnon" => Ok(true),
            "false" | "off" | "turnoff" | "" => Ok(false),
            _ => value_as_f64(value)
                .map(|n| n != 0.0)
                .map_err(|_| ValueError::NotABoolean(value.to_string())),
        },
        Value::Number(_) => value_as_f64(value)
            .map(|n| n != 0.0)
            .map_err(|_| ValueError::NotABoolean(value.to_string())),
        _ => Err(ValueError::NotABoolean(value.to_string())),
    }
}

fn tracked<'a>(change: &'a ChangeRecord, property: &Property) -> Result<&'a Value, ValueError> {
    change
        .tracked_value(property)
        .ok_or(ValueError::MissingField(match property {
            Property::Value2 => "value2",
            _ => "value",
        }))
}

fn set_bool(c: &Characteristic, change: &ChangeRecord, property: &Property) -> Result<(), ValueError> {
    c.update_value(value_as_bool(tracked(change, property)?)?);
    Ok(())
}

fn set_flag(c: &Characteristic, change: &ChangeRecord, property: &Property) -> Result<(), ValueError> {
    let flag = value_as_bool(tracked(change, property)?)?;
    c.update_value(i64::from(flag));
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn set_percentage(
    c: &Characteristic,
    change: &ChangeRecord,
    property: &Property,
) -> Result<(), ValueError> {
    let raw = value_as_f64(tracked(change, property)?)?;
    let percent = if raw >= HUB_DIMMER_MAX { 100.0 } else { raw.max(0.0) };
    c.update_value(percent.round() as i64);
    Ok(())
}

fn set_float(c: &Characteristic, change: &ChangeRecord, property: &Property) -> Result<(), ValueError> {
    c.update_value(value_as_f64(tracked(change, property)?)?);
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn set_battery(c: &Characteristic, change: &ChangeRecord, property: &Property) -> Result<(), ValueError> {
    let raw = value_as_f64(tracked(change, property)?)?;
    c.update_value(raw.clamp(0.0, 100.0).round() as i64);
    Ok(())
}

fn set_setpoint(c: &Characteristic, change: &ChangeRecord, property: &Property) -> Result<(), ValueError> {
    let raw = match &change.heating_thermostat_setpoint {
        Some(setpoint) => setpoint,
        None => tracked(change, property)?,
    };
    c.update_value(value_as_f64(raw)?);
    Ok(())
}

fn set_heating_cooling_state(
    c: &Characteristic,
    change: &ChangeRecord,
    property: &Property,
) -> Result<(), ValueError> {
    c.update_value(heating_cooling_code(change, property)?);
    Ok(())
}

/// Current state only takes off/heat/cool.
fn set_current_heating_cooling_state(
    c: &Characteristic,
    change: &ChangeRecord,
    property: &Property,
) -> Result<(), ValueError> {
    let code = heating_cooling_code(change, property)?;
    // Hub thermostats are heating devices, so `Auto` is reported as heating.
    c.update_value(if code == MODE_AUTO { MODE_HEAT } else { code });
    Ok(())
}

fn heating_cooling_code(change: &ChangeRecord, property: &Property) -> Result<i64, ValueError> {
    match &change.thermostat_mode {
        Some(mode) => mode_code(mode),
        None => match tracked(change, property)? {
            Value::String(mode) => mode_code(mode),
            other => mode_code(&other.to_string()),
        },
    }
}

const MODE_HEAT: i64 = 1;
const MODE_AUTO: i64 = 3;

fn mode_code(mode: &str) -> Result<i64, ValueError> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "off" | "0" => Ok(0),
        "heat" | "1" => Ok(MODE_HEAT),
        "cool" | "2" => Ok(2),
        "auto" | "3" => Ok(MODE_AUTO),
        _ => Err(ValueError::UnknownMode(mode.to_string())),
    }
}

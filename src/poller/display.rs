// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human readable rendering of characteristic values for update logs.

use crate::accessory::{CharacteristicKind, CharacteristicValue};

/// Renders `value` the way update log lines show it.
///
/// Temperatures are stored in Celsius whatever unit the hub uses, so they
/// always render with a `C` suffix.
#[must_use]
pub fn describe_value(kind: CharacteristicKind, value: &CharacteristicValue) -> String {
    use CharacteristicKind as K;

    match (kind, value.as_f64()) {
        (K::CurrentTemperature, Some(v)) => format!("{v:.1} C"),
        (
            K::CurrentRelativeHumidity | K::Brightness | K::CurrentPosition | K::TargetPosition,
            Some(v),
        ) => format!("{v:.0} %"),
        (K::CurrentAmbientLightLevel, Some(v)) => format!("{v:.0} lux"),
        (K::On, _) => match value {
            CharacteristicValue::Bool(true) => "On".to_string(),
            CharacteristicValue::Bool(false) => "Off".to_string(),
            CharacteristicValue::Text(s) if s == "turnOn" => "On".to_string(),
            CharacteristicValue::Text(s) if s == "turnOff" => "Off".to_string(),
            other => other.to_string(),
        },
        (K::MotionDetected, _) => match value.as_bool() {
            Some(true) => "Motion detected".to_string(),
            Some(false) => "No motion".to_string(),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_has_one_decimal() {
        assert_eq!(
            describe_value(CharacteristicKind::CurrentTemperature, &23.888.into()),
            "23.9 C"
        );
    }

    #[test]
    fn percentages_are_integers() {
        assert_eq!(
            describe_value(CharacteristicKind::Brightness, &CharacteristicValue::Int(42)),
            "42 %"
        );
        assert_eq!(
            describe_value(CharacteristicKind::CurrentRelativeHumidity, &55.4.into()),
            "55 %"
        );
    }

    #[test]
    fn illuminance_in_lux() {
        assert_eq!(
            describe_value(CharacteristicKind::CurrentAmbientLightLevel, &120.6.into()),
            "121 lux"
        );
    }

    #[test]
    fn on_off_text() {
        assert_eq!(describe_value(CharacteristicKind::On, &true.into()), "On");
        assert_eq!(describe_value(CharacteristicKind::On, &false.into()), "Off");
        assert_eq!(describe_value(CharacteristicKind::On, &"turnOff".into()), "Off");
    }

    #[test]
    fn motion_text() {
        assert_eq!(
            describe_value(CharacteristicKind::MotionDetected, &true.into()),
            "Motion detected"
        );
        assert_eq!(
            describe_value(CharacteristicKind::MotionDetected, &false.into()),
            "No motion"
        );
    }

    #[test]
    fn other_kinds_show_raw_value() {
        assert_eq!(
            describe_value(CharacteristicKind::ContactSensorState, &CharacteristicValue::Int(1)),
            "1"
        );
    }
}

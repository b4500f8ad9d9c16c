// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change classification.

use super::ChangeRecord;

/// Which dispatcher handles a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// `value` / `value2` change.
    Value,
    /// RGBW color change.
    Color,
    /// Thermostat mode change.
    Mode,
    /// Heating setpoint change.
    Setpoint,
}

/// Decides which dispatcher handles `change`.
///
/// Fields are checked in a fixed priority order and only the first match
/// counts:
///
/// 1. `value` or `value2`
/// 2. the activity-switch alias, which is copied into `value`
/// 3. `color`
/// 4. `thermostatMode`
/// 5. `heatingThermostatSetpoint`
///
/// Returns `None` for records carrying none of these; such records are
/// ignored by the poller.
///
/// # Examples
///
/// ```
/// use fibaro_sync::feed::{ChangeKind, ChangeRecord, classify};
///
/// let mut change = ChangeRecord::new(3).with_activity_switch(true);
/// assert_eq!(classify(&mut change), Some(ChangeKind::Value));
/// assert_eq!(change.value, Some(serde_json::json!(true)));
/// ```
pub fn classify(change: &mut ChangeRecord) -> Option<ChangeKind> {
    if change.value.is_some() || change.value2.is_some() {
        return Some(ChangeKind::Value);
    }
    if let Some(alias) = &change.activity_switch {
        change.value = Some(alias.clone());
        return Some(ChangeKind::Value);
    }
    if change.color.is_some() {
        return Some(ChangeKind::Color);
    }
    if change.thermostat_mode.is_some() {
        return Some(ChangeKind::Mode);
    }
    if change.heating_thermostat_setpoint.is_some() {
        return Some(ChangeKind::Setpoint);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_wins_over_alias() {
        let mut change = ChangeRecord::new(1).with_value(5).with_activity_switch(true);
        assert_eq!(classify(&mut change), Some(ChangeKind::Value));
        assert_eq!(change.value, Some(json!(5)));
    }

    #[test]
    fn value2_alone_is_value() {
        let mut change = ChangeRecord::new(1).with_value2(true);
        assert_eq!(classify(&mut change), Some(ChangeKind::Value));
        assert_eq!(change.value, None);
    }

    #[test]
    fn alias_is_copied_into_value() {
        let mut change = ChangeRecord::new(1).with_activity_switch(false);
        assert_eq!(classify(&mut change), Some(ChangeKind::Value));
        assert_eq!(change.value, Some(json!(false)));
    }

    #[test]
    fn null_value_is_still_a_value_change() {
        let mut change: ChangeRecord =
            serde_json::from_value(json!({"id": 3, "value": null, "color": "255,0,0,0"})).unwrap();
        assert_eq!(classify(&mut change), Some(ChangeKind::Value));

        let mut change: ChangeRecord = serde_json::from_value(json!({"id": 3, "value": null})).unwrap();
        assert_eq!(classify(&mut change), Some(ChangeKind::Value));
    }

    #[test]
    fn value_beats_color() {
        let mut change = ChangeRecord::new(1).with_value(0).with_color("1,2,3,4");
        assert_eq!(classify(&mut change), Some(ChangeKind::Value));
    }

    #[test]
    fn color_beats_mode_and_setpoint() {
        let mut change = ChangeRecord::new(1)
            .with_color("1,2,3,4")
            .with_thermostat_mode("Heat")
            .with_heating_setpoint(20);
        assert_eq!(classify(&mut change), Some(ChangeKind::Color));
    }

    #[test]
    fn mode_beats_setpoint() {
        let mut change = ChangeRecord::new(1)
            .with_thermostat_mode("Heat")
            .with_heating_setpoint(20);
        assert_eq!(classify(&mut change), Some(ChangeKind::Mode));
    }

    #[test]
    fn setpoint_alone() {
        let mut change = ChangeRecord::new(1).with_heating_setpoint(20);
        assert_eq!(classify(&mut change), Some(ChangeKind::Setpoint));
    }

    #[test]
    fn unknown_shape_is_dropped() {
        let mut change = ChangeRecord::new(1);
        assert_eq!(classify(&mut change), None);
    }
}

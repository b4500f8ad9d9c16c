// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of feed changes onto subscriptions.

use std::borrow::Cow;

use serde_json::Value;

use crate::accessory::{CharacteristicKind, CharacteristicValue, ServiceCategory};
use crate::config::PollerConfig;
use crate::converter::{ConverterRegistry, value_as_f64};
use crate::feed::{ChangeKind, ChangeRecord, classify};
use crate::subscription::{Property, Subscription, SubscriptionRegistry};
use crate::types::{HsvColor, TemperatureUnit};

use super::Tally;
use super::display::describe_value;

/// Applies feed changes to the subscriptions of a registry.
pub(crate) struct Dispatcher<'a> {
    registry: &'a SubscriptionRegistry,
    converters: &'a ConverterRegistry,
    config: &'a PollerConfig,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(
        registry: &'a SubscriptionRegistry,
        converters: &'a ConverterRegistry,
        config: &'a PollerConfig,
    ) -> Self {
        Self {
            registry,
            converters,
            config,
        }
    }

    /// Classifies `change` and hands it to the matching dispatcher.
    ///
    /// Returns `None` when the change carries no field the poller knows.
    pub(crate) fn dispatch(&self, mut change: ChangeRecord) -> Option<Tally> {
        let Some(kind) = classify(&mut change) else {
            tracing::trace!(device = change.id, "Ignoring change without known fields");
            return None;
        };

        Some(match kind {
            ChangeKind::Value => self.dispatch_value(&change),
            ChangeKind::Color => self.dispatch_color(&change),
            ChangeKind::Mode => {
                let shown = change.thermostat_mode.clone().unwrap_or_default();
                self.dispatch_whole(&change, &Property::Mode, &shown)
            }
            ChangeKind::Setpoint => {
                let shown = change
                    .heating_thermostat_setpoint
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                self.dispatch_whole(&change, &Property::TargetTemperature, &shown)
            }
        })
    }

    fn dispatch_value(&self, change: &ChangeRecord) -> Tally {
        let mut tally = Tally::default();

        for sub in self.registry {
            if sub.service().category() == ServiceCategory::BatteryService
                || sub.kind() == CharacteristicKind::Name
            {
                continue;
            }
            let tracks_change = match sub.property() {
                Property::Value => change.value.is_some(),
                Property::Value2 => change.value2.is_some(),
                _ => false,
            };
            if sub.remote_id() != change.id || !tracks_change {
                continue;
            }

            let change = self.in_celsius(sub, change);
            if self.convert(sub, &change, &mut tally) && self.config.log_level >= 1 {
                tracing::info!(
                    "{} [{}]: {}",
                    sub.service().name(),
                    sub.remote_id(),
                    describe_value(sub.kind(), &sub.characteristic().value())
                );
            }
        }

        tally
    }

    fn dispatch_color(&self, change: &ChangeRecord) -> Tally {
        let mut tally = Tally::default();
        let Some(color) = change.color.as_deref() else {
            return tally;
        };
        let mut hsv: Option<HsvColor> = None;

        for sub in self.registry {
            if sub.remote_id() != change.id || sub.property() != &Property::Color {
                continue;
            }

            let hsv = match hsv {
                Some(hsv) => hsv,
                None => match self.converters.to_hsv(color) {
                    Ok(converted) => *hsv.insert(converted),
                    Err(e) => {
                        tracing::warn!(device = change.id, error = %e, "Ignoring color change");
                        tally.errors += 1;
                        return tally;
                    }
                },
            };

            if let Some(value) = color_component(sub.kind(), &hsv) {
                sub.characteristic().update_value(value);
                tally.updates += 1;
            }
        }

        tally
    }

    // Mode and setpoint changes go to the converter whole, without unit
    // conversion.
    fn dispatch_whole(&self, change: &ChangeRecord, property: &Property, shown: &str) -> Tally {
        let mut tally = Tally::default();

        for sub in self.registry {
            if sub.remote_id() != change.id || sub.property() != property {
                continue;
            }
            tracing::info!(
                "Updating value for device: {}  parameter: {}, value: {}",
                sub.remote_id(),
                sub.kind(),
                shown
            );
            self.convert(sub, change, &mut tally);
        }

        tally
    }

    /// Runs the subscription's converter. Returns `true` on success.
    fn convert(&self, sub: &Subscription, change: &ChangeRecord, tally: &mut Tally) -> bool {
        let converter = match self.converters.converter(sub.kind()) {
            Ok(converter) => converter,
            Err(e) => {
                tracing::warn!(device = sub.remote_id(), error = %e, "Skipping change");
                tally.errors += 1;
                return false;
            }
        };

        match converter(sub.characteristic(), change, sub.property()) {
            Ok(()) => {
                tally.updates += 1;
                true
            }
            Err(e) => {
                tracing::warn!(
                    device = sub.remote_id(),
                    characteristic = %sub.kind(),
                    error = %e,
                    "Failed to convert hub value"
                );
                tally.errors += 1;
                false
            }
        }
    }

    /// Converts the tracked value of a temperature reading to Celsius when
    /// the hub reports Fahrenheit.
    fn in_celsius<'c>(&self, sub: &Subscription, change: &'c ChangeRecord) -> Cow<'c, ChangeRecord> {
        if self.config.temperature_unit != TemperatureUnit::Fahrenheit
            || sub.kind() != CharacteristicKind::CurrentTemperature
        {
            return Cow::Borrowed(change);
        }

        let mut converted = change.clone();
        if let Some(raw) = converted.tracked_value_mut(sub.property()) {
            // Unparseable readings are left for the converter to reject.
            if let Ok(fahrenheit) = value_as_f64(raw) {
                *raw = Value::from(TemperatureUnit::Fahrenheit.to_celsius(fahrenheit));
            }
        }
        Cow::Owned(converted)
    }
}

/// Picks the HSV component a color subscription receives.
#[allow(clippy::cast_possible_truncation)]
fn color_component(kind: CharacteristicKind, hsv: &HsvColor) -> Option<CharacteristicValue> {
    match kind {
        CharacteristicKind::On => Some(CharacteristicValue::Bool(hsv.is_on())),
        CharacteristicKind::Hue => Some(CharacteristicValue::Int(hsv.hue().round() as i64)),
        CharacteristicKind::Saturation => {
            Some(CharacteristicValue::Int(hsv.saturation().round() as i64))
        }
        CharacteristicKind::Brightness => {
            Some(CharacteristicValue::Int(hsv.value().round() as i64))
        }
        _ => None,
    }
}

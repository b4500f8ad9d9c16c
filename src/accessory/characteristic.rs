// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristics: the individual values a local service exposes.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Capability kind of a characteristic.
///
/// The kind is fixed when the characteristic is created and is what the
/// [`ConverterRegistry`](crate::converter::ConverterRegistry) keys its
/// converters on. Color dispatch also uses it to decide which HSV component
/// a characteristic receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacteristicKind {
    /// Power state of a switch, outlet or light.
    On,
    /// Light brightness (0-100).
    Brightness,
    /// Light hue (0-360).
    Hue,
    /// Light saturation (0-100).
    Saturation,
    /// Measured temperature in Celsius.
    CurrentTemperature,
    /// Thermostat setpoint in Celsius.
    TargetTemperature,
    /// Measured relative humidity (0-100).
    CurrentRelativeHumidity,
    /// Measured illuminance in lux.
    CurrentAmbientLightLevel,
    /// Current blind/shutter position (0-100).
    CurrentPosition,
    /// Requested blind/shutter position (0-100).
    TargetPosition,
    /// Motion sensor state.
    MotionDetected,
    /// Door/window contact state (0 closed, 1 open).
    ContactSensorState,
    /// Flood sensor state.
    LeakDetected,
    /// Smoke sensor state.
    SmokeDetected,
    /// Whether an outlet is drawing power.
    OutletInUse,
    /// Current thermostat operating mode.
    CurrentHeatingCoolingState,
    /// Requested thermostat operating mode.
    TargetHeatingCoolingState,
    /// Current state of the alarm panel.
    SecuritySystemCurrentState,
    /// Requested state of the alarm panel.
    SecuritySystemTargetState,
    /// Battery charge (0-100).
    BatteryLevel,
    /// Low battery flag.
    StatusLowBattery,
    /// Display label of the service.
    Name,
}

impl CharacteristicKind {
    /// Returns the human readable name of this kind.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Brightness => "Brightness",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::CurrentTemperature => "Current Temperature",
            Self::TargetTemperature => "Target Temperature",
            Self::CurrentRelativeHumidity => "Current Relative Humidity",
            Self::CurrentAmbientLightLevel => "Current Ambient Light Level",
            Self::CurrentPosition => "Current Position",
            Self::TargetPosition => "Target Position",
            Self::MotionDetected => "Motion Detected",
            Self::ContactSensorState => "Contact Sensor State",
            Self::LeakDetected => "Leak Detected",
            Self::SmokeDetected => "Smoke Detected",
            Self::OutletInUse => "Outlet In Use",
            Self::CurrentHeatingCoolingState => "Current Heating Cooling State",
            Self::TargetHeatingCoolingState => "Target Heating Cooling State",
            Self::SecuritySystemCurrentState => "Security System Current State",
            Self::SecuritySystemTargetState => "Security System Target State",
            Self::BatteryLevel => "Battery Level",
            Self::StatusLowBattery => "Status Low Battery",
            Self::Name => "Name",
        }
    }

    /// Returns the value a freshly created characteristic of this kind holds.
    #[must_use]
    pub fn initial_value(&self) -> CharacteristicValue {
        match self {
            Self::On | Self::MotionDetected | Self::OutletInUse => CharacteristicValue::Bool(false),
            Self::CurrentTemperature
            | Self::TargetTemperature
            | Self::CurrentRelativeHumidity
            | Self::CurrentAmbientLightLevel
            | Self::Hue
            | Self::Saturation => CharacteristicValue::Float(0.0),
            Self::SecuritySystemCurrentState | Self::SecuritySystemTargetState => {
                CharacteristicValue::Int(3)
            }
            Self::Name => CharacteristicValue::Text(String::new()),
            _ => CharacteristicValue::Int(0),
        }
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Value held by a characteristic.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicValue {
    /// Boolean state.
    Bool(bool),
    /// Integer quantity or enumerated code.
    Int(i64),
    /// Fractional quantity.
    Float(f64),
    /// Free text.
    Text(String),
}

impl CharacteristicValue {
    /// Returns the value as a float, if it is numeric or boolean.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// Returns the value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Type alias for update listeners.
type UpdateListener = Arc<dyn Fn(CharacteristicKind, &CharacteristicValue) + Send + Sync>;

/// A single value on a local service.
///
/// Characteristics are shared as `Arc<Characteristic>` between the
/// application that owns the local representation and the poller that
/// writes hub state into it. Interior mutability uses `parking_lot`
/// locks so updates never block on async work.
///
/// # Examples
///
/// ```
/// use fibaro_sync::accessory::{Characteristic, CharacteristicKind, CharacteristicValue};
///
/// let on = Characteristic::new(CharacteristicKind::On);
/// on.update_value(true);
/// assert_eq!(on.value(), CharacteristicValue::Bool(true));
/// assert_eq!(on.update_count(), 1);
/// ```
pub struct Characteristic {
    kind: CharacteristicKind,
    value: RwLock<CharacteristicValue>,
    updates: AtomicU64,
    listeners: RwLock<Vec<UpdateListener>>,
}

impl Characteristic {
    /// Creates a characteristic holding the kind's initial value.
    #[must_use]
    pub fn new(kind: CharacteristicKind) -> Self {
        Self::with_value(kind, kind.initial_value())
    }

    /// Creates a characteristic holding the given value.
    #[must_use]
    pub fn with_value(kind: CharacteristicKind, value: impl Into<CharacteristicValue>) -> Self {
        Self {
            kind,
            value: RwLock::new(value.into()),
            updates: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Returns the capability kind.
    #[must_use]
    pub fn kind(&self) -> CharacteristicKind {
        self.kind
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn value(&self) -> CharacteristicValue {
        self.value.read().clone()
    }

    /// Stores a new value and notifies listeners.
    pub fn update_value(&self, value: impl Into<CharacteristicValue>) {
        let value = value.into();
        *self.value.write() = value.clone();
        self.updates.fetch_add(1, Ordering::Relaxed);

        // Clone the listener list so callbacks may register further listeners.
        let listeners: Vec<UpdateListener> = self.listeners.read().clone();
        for listener in listeners {
            listener(self.kind, &value);
        }
    }

    /// Returns how many times [`update_value`](Self::update_value) was called.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// Registers a listener called after every update.
    pub fn on_update<F>(&self, listener: F)
    where
        F: Fn(CharacteristicKind, &CharacteristicValue) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }
}

impl fmt::Debug for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Characteristic")
            .field("kind", &self.kind)
            .field("value", &*self.value.read())
            .field("updates", &self.update_count())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

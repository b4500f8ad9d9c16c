// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Services: named groups of characteristics mirroring one hub device.

use std::fmt;
use std::sync::Arc;

use super::{Characteristic, CharacteristicKind};

/// Category of a local service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    /// Binary switch.
    Switch,
    /// Dimmable or colored light.
    Lightbulb,
    /// Wall plug.
    Outlet,
    /// Temperature sensor.
    TemperatureSensor,
    /// Humidity sensor.
    HumiditySensor,
    /// Light sensor.
    LightSensor,
    /// Motion sensor.
    MotionSensor,
    /// Door or window contact.
    ContactSensor,
    /// Flood sensor.
    LeakSensor,
    /// Smoke sensor.
    SmokeSensor,
    /// Blinds, shutters or gates.
    WindowCovering,
    /// Heating/cooling thermostat.
    Thermostat,
    /// Alarm panel.
    SecuritySystem,
    /// Battery status of a battery powered device.
    BatteryService,
}

impl ServiceCategory {
    /// Returns the category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Switch => "Switch",
            Self::Lightbulb => "Lightbulb",
            Self::Outlet => "Outlet",
            Self::TemperatureSensor => "TemperatureSensor",
            Self::HumiditySensor => "HumiditySensor",
            Self::LightSensor => "LightSensor",
            Self::MotionSensor => "MotionSensor",
            Self::ContactSensor => "ContactSensor",
            Self::LeakSensor => "LeakSensor",
            Self::SmokeSensor => "SmokeSensor",
            Self::WindowCovering => "WindowCovering",
            Self::Thermostat => "Thermostat",
            Self::SecuritySystem => "SecuritySystem",
            Self::BatteryService => "BatteryService",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local representation of one hub device (or one facet of it).
///
/// # Examples
///
/// ```
/// use fibaro_sync::accessory::{CharacteristicKind, Service, ServiceCategory};
///
/// let lamp = Service::new("Desk lamp", ServiceCategory::Lightbulb)
///     .with_characteristic(CharacteristicKind::On)
///     .with_characteristic(CharacteristicKind::Brightness);
///
/// assert!(lamp.characteristic(CharacteristicKind::Brightness).is_some());
/// assert!(lamp.characteristic(CharacteristicKind::Hue).is_none());
/// ```
#[derive(Debug)]
pub struct Service {
    name: String,
    category: ServiceCategory,
    characteristics: Vec<Arc<Characteristic>>,
}

impl Service {
    /// Creates a service with no characteristics.
    #[must_use]
    pub fn new(name: impl Into<String>, category: ServiceCategory) -> Self {
        Self {
            name: name.into(),
            category,
            characteristics: Vec::new(),
        }
    }

    /// Adds a characteristic of the given kind with its initial value.
    ///
    /// Adding a kind twice keeps the first characteristic.
    #[must_use]
    pub fn with_characteristic(self, kind: CharacteristicKind) -> Self {
        self.with_shared_characteristic(Arc::new(Characteristic::new(kind)))
    }

    /// Adds an existing characteristic handle.
    #[must_use]
    pub fn with_shared_characteristic(mut self, characteristic: Arc<Characteristic>) -> Self {
        if self.characteristic(characteristic.kind()).is_none() {
            self.characteristics.push(characteristic);
        }
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    /// Returns the characteristic of the given kind.
    #[must_use]
    pub fn characteristic(&self, kind: CharacteristicKind) -> Option<Arc<Characteristic>> {
        self.characteristics
            .iter()
            .find(|c| c.kind() == kind)
            .cloned()
    }

    /// Returns all characteristics in insertion order.
    #[must_use]
    pub fn characteristics(&self) -> &[Arc<Characteristic>] {
        &self.characteristics
    }
}

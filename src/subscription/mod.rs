// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bindings between hub device properties and local characteristics.
//!
//! # Overview
//!
//! - [`Property`] - Which hub property a binding tracks
//! - [`Subscription`] - One binding: hub device id + property → characteristic
//! - [`SubscriptionRegistry`] - The full set of bindings and named services
//!
//! The registry is built once while the application sets up its local
//! representations and is then shared read-only with the poller:
//!
//! ```
//! use std::sync::Arc;
//! use fibaro_sync::accessory::{CharacteristicKind, Service, ServiceCategory};
//! use fibaro_sync::subscription::{Property, Subscription, SubscriptionRegistry};
//!
//! let sensor = Arc::new(
//!     Service::new("Living room", ServiceCategory::TemperatureSensor)
//!         .with_characteristic(CharacteristicKind::CurrentTemperature),
//! );
//!
//! let mut registry = SubscriptionRegistry::new();
//! registry.subscribe(
//!     Subscription::new(7, Property::Value, &sensor, CharacteristicKind::CurrentTemperature)
//!         .unwrap(),
//! );
//! let registry = Arc::new(registry);
//! assert_eq!(registry.len(), 1);
//! ```

mod registry;

pub use registry::SubscriptionRegistry;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::accessory::{Characteristic, CharacteristicKind, Service};
use crate::error::LookupError;

/// Hub property tracked by a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    /// The device's primary `value`.
    Value,
    /// The device's secondary `value2`.
    Value2,
    /// Thermostat operating mode.
    Mode,
    /// Thermostat heating setpoint.
    TargetTemperature,
    /// RGBW color.
    Color,
    /// Any other hub property; never matched by the dispatchers.
    Other(String),
}

impl Property {
    /// Returns the hub's name for this property.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value => "value",
            Self::Value2 => "value2",
            Self::Mode => "mode",
            Self::TargetTemperature => "targettemperature",
            Self::Color => "color",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for Property {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "value" => Self::Value,
            "value2" => Self::Value2,
            "mode" => Self::Mode,
            "targettemperature" => Self::TargetTemperature,
            "color" => Self::Color,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for Property {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(property) => property,
            Err(never) => match never {},
        }
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A binding from a hub device property to a local characteristic.
///
/// The capability kind used to pick a converter is the characteristic's
/// own [`CharacteristicKind`], fixed when the characteristic was created.
#[derive(Debug, Clone)]
pub struct Subscription {
    remote_id: i64,
    property: Property,
    service: Arc<Service>,
    characteristic: Arc<Characteristic>,
}

impl Subscription {
    /// Binds `property` of hub device `remote_id` to the `kind`
    /// characteristic of `service`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::CharacteristicNotFound` if the service has no
    /// characteristic of that kind.
    pub fn new(
        remote_id: i64,
        property: impl Into<Property>,
        service: &Arc<Service>,
        kind: CharacteristicKind,
    ) -> Result<Self, LookupError> {
        let characteristic =
            service
                .characteristic(kind)
                .ok_or_else(|| LookupError::CharacteristicNotFound {
                    service: service.name().to_string(),
                    kind,
                })?;
        Ok(Self {
            remote_id,
            property: property.into(),
            service: Arc::clone(service),
            characteristic,
        })
    }

    /// Returns the hub device id.
    #[must_use]
    pub fn remote_id(&self) -> i64 {
        self.remote_id
    }

    /// Returns the tracked property.
    #[must_use]
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Returns the owning service.
    #[must_use]
    pub fn service(&self) -> &Arc<Service> {
        &self.service
    }

    /// Returns the characteristic written on updates.
    #[must_use]
    pub fn characteristic(&self) -> &Arc<Characteristic> {
        &self.characteristic
    }

    /// Returns the capability kind.
    #[must_use]
    pub fn kind(&self) -> CharacteristicKind {
        self.characteristic.kind()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of raw hub values into local characteristics.
//!
//! The [`ConverterRegistry`] is a dispatch table from
//! [`CharacteristicKind`] to a [`Converter`] function, populated once at
//! startup. It also owns the color transform used by color dispatch and
//! the mapping from hub alarm state names to [`SecuritySystemState`].
//!
//! # Examples
//!
//! ```
//! use fibaro_sync::accessory::{Characteristic, CharacteristicKind, CharacteristicValue};
//! use fibaro_sync::converter::ConverterRegistry;
//! use fibaro_sync::feed::ChangeRecord;
//! use fibaro_sync::subscription::Property;
//!
//! let converters = ConverterRegistry::with_defaults();
//! let brightness = Characteristic::new(CharacteristicKind::Brightness);
//!
//! let convert = converters.converter(CharacteristicKind::Brightness).unwrap();
//! convert(&brightness, &ChangeRecord::new(4).with_value("99"), &Property::Value).unwrap();
//! assert_eq!(brightness.value(), CharacteristicValue::Int(100));
//! ```

mod builtin;

pub use builtin::{value_as_bool, value_as_f64};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::accessory::{Characteristic, CharacteristicKind};
use crate::error::{MappingError, ValueError};
use crate::feed::ChangeRecord;
use crate::subscription::Property;
use crate::types::{HsvColor, RgbwColor, SecuritySystemState};

/// Writes a change into a characteristic.
///
/// Receives the characteristic to update, the whole change record and the
/// property the subscription tracks (so `value2` bindings read `value2`).
pub type Converter =
    Arc<dyn Fn(&Characteristic, &ChangeRecord, &Property) -> Result<(), ValueError> + Send + Sync>;

/// Turns the hub's color string into HSV.
pub type ColorTransform = Arc<dyn Fn(&str) -> Result<HsvColor, ValueError> + Send + Sync>;

/// Dispatch table of converters, keyed by capability kind.
pub struct ConverterRegistry {
    converters: HashMap<CharacteristicKind, Converter>,
    color_transform: ColorTransform,
    security_states: HashMap<String, SecuritySystemState>,
}

impl ConverterRegistry {
    /// Creates a registry with no converters.
    ///
    /// The color transform and the security state table are always present;
    /// they default to the hub's `r,g,b,w` encoding and state names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            color_transform: Arc::new(|s| RgbwColor::parse_hub(s).map(|c| c.to_hsv())),
            security_states: SecuritySystemState::ALL
                .into_iter()
                .map(|state| (state.hub_name().to_string(), state))
                .collect(),
        }
    }

    /// Creates a registry with the built-in converter for every kind the
    /// hub reports directly.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtin::register_defaults(&mut registry);
        registry
    }

    /// Registers (or replaces) the converter for `kind`.
    pub fn register<F>(&mut self, kind: CharacteristicKind, converter: F)
    where
        F: Fn(&Characteristic, &ChangeRecord, &Property) -> Result<(), ValueError>
            + Send
            + Sync
            + 'static,
    {
        self.converters.insert(kind, Arc::new(converter));
    }

    /// Replaces the color transform.
    #[must_use]
    pub fn with_color_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> Result<HsvColor, ValueError> + Send + Sync + 'static,
    {
        self.color_transform = Arc::new(transform);
        self
    }

    /// Maps an additional hub alarm state name.
    #[must_use]
    pub fn with_security_state(mut self, name: impl Into<String>, state: SecuritySystemState) -> Self {
        self.security_states.insert(name.into(), state);
        self
    }

    /// Returns the converter registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::NoConverter` if none is registered.
    pub fn converter(&self, kind: CharacteristicKind) -> Result<&Converter, MappingError> {
        self.converters
            .get(&kind)
            .ok_or(MappingError::NoConverter(kind))
    }

    /// Returns `true` if a converter is registered for `kind`.
    #[must_use]
    pub fn supports(&self, kind: CharacteristicKind) -> bool {
        self.converters.contains_key(&kind)
    }

    /// Converts a hub color string to HSV.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` if the string cannot be parsed.
    pub fn to_hsv(&self, color: &str) -> Result<HsvColor, ValueError> {
        (self.color_transform)(color)
    }

    /// Maps a hub alarm state name to the local state.
    #[must_use]
    pub fn security_state(&self, name: &str) -> Option<SecuritySystemState> {
        self.security_states.get(name).copied()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.converters.keys().map(CharacteristicKind::display_name).collect();
        kinds.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("converters", &kinds)
            .field("security_states", &self.security_states.len())
            .finish_non_exhaustive()
    }
}

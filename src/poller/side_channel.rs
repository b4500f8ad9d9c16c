// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pollers for state the change feed does not carry: global variables
//! mirrored as switches or dimmers, and the alarm panel.

use serde_json::Value;

use crate::accessory::{CharacteristicKind, CharacteristicValue, ServiceCategory};
use crate::client::RemoteStateClient;
use crate::converter::ConverterRegistry;
use crate::error::TransportError;
use crate::feed::ChangeRecord;
use crate::subscription::{Property, SubscriptionRegistry};

use super::Tally;

/// Name of the global variable holding the alarm panel state.
pub const SECURITY_SYSTEM_VARIABLE: &str = "SecuritySystem";

/// Name of the local service representing the alarm panel.
pub const SECURITY_SYSTEM_SERVICE: &str = "FibaroSecuritySystem";

/// Kind of local service a group of global variables is mirrored onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VariableGroup {
    Switch,
    Dimmer,
}

impl VariableGroup {
    fn category(self) -> ServiceCategory {
        match self {
            Self::Switch => ServiceCategory::Switch,
            Self::Dimmer => ServiceCategory::Lightbulb,
        }
    }

    fn kinds(self) -> &'static [CharacteristicKind] {
        match self {
            Self::Switch => &[CharacteristicKind::On],
            Self::Dimmer => &[CharacteristicKind::On, CharacteristicKind::Brightness],
        }
    }
}

/// Fetches each named global variable and writes it into the service of
/// the same name.
///
/// Names without a matching local service are skipped.
///
/// # Errors
///
/// The first transport error aborts the rest of the group.
pub(crate) async fn poll_global_variables<C: RemoteStateClient>(
    client: &C,
    registry: &SubscriptionRegistry,
    converters: &ConverterRegistry,
    names: &[String],
    group: VariableGroup,
) -> Result<Tally, TransportError> {
    let mut tally = Tally::default();

    for name in names {
        let variable = client.get_global_variable(name).await?;

        let service = match registry.require_service(name, group.category()) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!(variable = %name, error = %e, "Skipping global variable");
                tally.errors += 1;
                continue;
            }
        };

        let change = ChangeRecord::new(0).with_value(Value::String(variable.value));
        for &kind in group.kinds() {
            let Some(characteristic) = service.characteristic(kind) else {
                continue;
            };
            let result = converters
                .converter(kind)
                .map_err(crate::Error::from)
                .and_then(|convert| {
                    convert(&characteristic, &change, &Property::Value).map_err(crate::Error::from)
                });
            match result {
                Ok(()) => tally.updates += 1,
                Err(e) => {
                    tracing::warn!(variable = %name, characteristic = %kind, error = %e, "Failed to apply global variable");
                    tally.errors += 1;
                }
            }
        }
    }

    Ok(tally)
}

/// Mirrors the hub's alarm panel state onto the local security service.
///
/// Nothing is written when the service is absent, the state name is
/// unknown, or the state is unchanged.
///
/// # Errors
///
/// Returns the transport error if the state variable cannot be fetched.
pub(crate) async fn poll_security_system<C: RemoteStateClient>(
    client: &C,
    registry: &SubscriptionRegistry,
    converters: &ConverterRegistry,
) -> Result<Tally, TransportError> {
    let mut tally = Tally::default();
    let variable = client.get_global_variable(SECURITY_SYSTEM_VARIABLE).await?;

    let Some(service) =
        registry.find_service(SECURITY_SYSTEM_SERVICE, ServiceCategory::SecuritySystem)
    else {
        tracing::debug!("No security system service registered");
        return Ok(tally);
    };
    let Some(state) = converters.security_state(variable.value.trim()) else {
        tracing::debug!(state = %variable.value, "Unknown security system state");
        return Ok(tally);
    };
    let Some(current) = service.characteristic(CharacteristicKind::SecuritySystemCurrentState)
    else {
        return Ok(tally);
    };

    let value = CharacteristicValue::Int(i64::from(state.code()));
    if current.value() != value {
        tracing::info!(state = state.hub_name(), "Security system state changed");
        current.update_value(value);
        tally.updates += 1;
    }

    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::accessory::Service;
    use crate::feed::{GlobalVariable, RefreshResponse};
    use crate::types::Checkpoint;

    #[derive(Default)]
    struct Variables {
        values: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl Variables {
        fn with(mut self, name: &str, value: &str) -> Self {
            self.values.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl RemoteStateClient for Variables {
        async fn refresh_states(&self, _: Checkpoint) -> Result<RefreshResponse, TransportError> {
            Ok(RefreshResponse::new(None, Vec::new()))
        }

        async fn get_global_variable(&self, name: &str) -> Result<GlobalVariable, TransportError> {
            self.requested.lock().push(name.to_string());
            self.values
                .get(name)
                .map(|v| GlobalVariable::new(v.clone()))
                .ok_or(TransportError::Status(404))
        }
    }

    fn registry_with(services: Vec<Service>) -> SubscriptionRegistry {
        let mut registry = SubscriptionRegistry::new();
        for service in services {
            registry.add_service(Arc::new(service));
        }
        registry
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn switch_group_updates_on() {
        let client = Variables::default().with("Garden", "true");
        let registry = registry_with(vec![
            Service::new("Garden", ServiceCategory::Switch).with_characteristic(CharacteristicKind::On),
        ]);
        let converters = ConverterRegistry::with_defaults();

        let tally = poll_global_variables(
            &client,
            &registry,
            &converters,
            &names(&["Garden"]),
            VariableGroup::Switch,
        )
        .await
        .unwrap();

        assert_eq!(tally.updates, 1);
        let on = registry
            .find_service("Garden", ServiceCategory::Switch)
            .unwrap()
            .characteristic(CharacteristicKind::On)
            .unwrap();
        assert_eq!(on.value(), CharacteristicValue::Bool(true));
    }

    #[tokio::test]
    async fn dimmer_group_updates_on_and_brightness() {
        let client = Variables::default().with("Hall", "99");
        let registry = registry_with(vec![
            Service::new("Hall", ServiceCategory::Lightbulb)
                .with_characteristic(CharacteristicKind::On)
                .with_characteristic(CharacteristicKind::Brightness),
        ]);
        let converters = ConverterRegistry::with_defaults();

        let tally = poll_global_variables(
            &client,
            &registry,
            &converters,
            &names(&["Hall"]),
            VariableGroup::Dimmer,
        )
        .await
        .unwrap();

        assert_eq!(tally.updates, 2);
        let service = registry.find_service("Hall", ServiceCategory::Lightbulb).unwrap();
        assert_eq!(
            service.characteristic(CharacteristicKind::On).unwrap().value(),
            CharacteristicValue::Bool(true)
        );
        assert_eq!(
            service.characteristic(CharacteristicKind::Brightness).unwrap().value(),
            CharacteristicValue::Int(100)
        );
    }

    #[tokio::test]
    async fn missing_service_is_skipped() {
        let client = Variables::default().with("Ghost", "true").with("Porch", "false");
        let registry = registry_with(vec![
            Service::new("Porch", ServiceCategory::Switch).with_characteristic(CharacteristicKind::On),
            // Right name, wrong category.
            Service::new("Ghost", ServiceCategory::Lightbulb).with_characteristic(CharacteristicKind::On),
        ]);
        let converters = ConverterRegistry::with_defaults();

        let tally = poll_global_variables(
            &client,
            &registry,
            &converters,
            &names(&["Ghost", "Porch"]),
            VariableGroup::Switch,
        )
        .await
        .unwrap();

        assert_eq!(tally.errors, 1);
        assert_eq!(tally.updates, 1);
        assert_eq!(*client.requested.lock(), ["Ghost", "Porch"]);
    }

    #[tokio::test]
    async fn transport_error_aborts_group() {
        let client = Variables::default().with("Porch", "true");
        let registry = registry_with(vec![
            Service::new("Porch", ServiceCategory::Switch).with_characteristic(CharacteristicKind::On),
        ]);
        let converters = ConverterRegistry::with_defaults();

        let err = poll_global_variables(
            &client,
            &registry,
            &converters,
            &names(&["Missing", "Porch"]),
            VariableGroup::Switch,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(*client.requested.lock(), ["Missing"]);
    }

    fn security_registry() -> SubscriptionRegistry {
        registry_with(vec![
            Service::new(SECURITY_SYSTEM_SERVICE, ServiceCategory::SecuritySystem)
                .with_characteristic(CharacteristicKind::SecuritySystemCurrentState)
                .with_characteristic(CharacteristicKind::SecuritySystemTargetState),
        ])
    }

    fn current_state(registry: &SubscriptionRegistry) -> Arc<crate::accessory::Characteristic> {
        registry
            .find_service(SECURITY_SYSTEM_SERVICE, ServiceCategory::SecuritySystem)
            .unwrap()
            .characteristic(CharacteristicKind::SecuritySystemCurrentState)
            .unwrap()
    }

    #[tokio::test]
    async fn security_state_change_is_written_once() {
        let client = Variables::default().with(SECURITY_SYSTEM_VARIABLE, "AwayArmed");
        let registry = security_registry();
        let converters = ConverterRegistry::with_defaults();

        let tally = poll_security_system(&client, &registry, &converters).await.unwrap();
        assert_eq!(tally.updates, 1);
        assert_eq!(current_state(&registry).value(), CharacteristicValue::Int(1));

        let tally = poll_security_system(&client, &registry, &converters).await.unwrap();
        assert_eq!(tally.updates, 0);
        assert_eq!(current_state(&registry).update_count(), 1);
    }

    #[tokio::test]
    async fn unchanged_security_state_is_not_written() {
        let client = Variables::default().with(SECURITY_SYSTEM_VARIABLE, "Disarmed");
        let registry = security_registry();
        let converters = ConverterRegistry::with_defaults();

        let tally = poll_security_system(&client, &registry, &converters).await.unwrap();
        assert_eq!(tally.updates, 0);
        assert_eq!(current_state(&registry).update_count(), 0);
    }

    #[tokio::test]
    async fn unknown_security_state_is_ignored() {
        let client = Variables::default().with(SECURITY_SYSTEM_VARIABLE, "Exploded");
        let registry = security_registry();
        let converters = ConverterRegistry::with_defaults();

        let tally = poll_security_system(&client, &registry, &converters).await.unwrap();
        assert_eq!(tally.updates, 0);
        assert_eq!(current_state(&registry).update_count(), 0);
    }

    #[tokio::test]
    async fn missing_security_service_is_silent() {
        let client = Variables::default().with(SECURITY_SYSTEM_VARIABLE, "AwayArmed");
        let registry = SubscriptionRegistry::new();
        let converters = ConverterRegistry::with_defaults();

        let tally = poll_security_system(&client, &registry, &converters).await.unwrap();
        assert_eq!(tally.updates, 0);
        assert_eq!(tally.errors, 0);
    }
}

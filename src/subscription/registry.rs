// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of subscriptions and named services.

use std::sync::Arc;

use crate::accessory::{Service, ServiceCategory};
use crate::error::LookupError;

use super::Subscription;

/// All subscriptions plus the services they belong to.
///
/// Services that have no feed subscription (global-variable switches and
/// dimmers, the alarm panel) are added with
/// [`add_service`](Self::add_service) so the side-channel pollers can find
/// them by name.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: Vec<Subscription>,
    services: Vec<Arc<Service>>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscription and registers its service.
    pub fn subscribe(&mut self, subscription: Subscription) {
        self.add_service(Arc::clone(subscription.service()));
        self.subscriptions.push(subscription);
    }

    /// Registers a service for lookup by name.
    ///
    /// Registering the same service twice is a no-op.
    pub fn add_service(&mut self, service: Arc<Service>) {
        if !self.services.iter().any(|s| Arc::ptr_eq(s, &service)) {
            self.services.push(service);
        }
    }

    /// Returns all subscriptions in registration order.
    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Iterates over subscriptions.
    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter()
    }

    /// Returns the number of subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if there are no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Finds the first service with the given name and category.
    #[must_use]
    pub fn find_service(&self, name: &str, category: ServiceCategory) -> Option<Arc<Service>> {
        self.services
            .iter()
            .find(|s| s.name() == name && s.category() == category)
            .cloned()
    }

    /// Like [`find_service`](Self::find_service) but reports a miss.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::ServiceNotFound` if no such service exists.
    pub fn require_service(
        &self,
        name: &str,
        category: ServiceCategory,
    ) -> Result<Arc<Service>, LookupError> {
        self.find_service(name, category)
            .ok_or_else(|| LookupError::ServiceNotFound {
                name: name.to_string(),
                category,
            })
    }
}

impl<'a> IntoIterator for &'a SubscriptionRegistry {
    type Item = &'a Subscription;
    type IntoIter = std::slice::Iter<'a, Subscription>;

    fn into_iter(self) -> Self::IntoIter {
        self.subscriptions.iter()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use fibaro_sync::{
    CharacteristicKind, ChangeRecord, Checkpoint, GlobalVariable, RefreshResponse,
    RemoteStateClient, Service, ServiceCategory, Subscription, SubscriptionRegistry,
    TransportError,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

enum Scripted {
    Feed(RefreshResponse),
    Status(u16),
}

/// In-memory hub answering from a script.
///
/// Feed requests consume scripted answers in order; once the script runs
/// out the hub answers with an empty feed. Global variables answer from a
/// fixed table and unknown names yield a 404.
#[derive(Default)]
pub struct MockHub {
    script: Mutex<VecDeque<Scripted>>,
    variables: Mutex<HashMap<String, Result<String, u16>>>,
    feed_requests: Mutex<Vec<Checkpoint>>,
    variable_requests: Mutex<Vec<String>>,
    gate: Option<Notify>,
}

impl MockHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every feed request wait for [`release`](Self::release).
    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn push_feed(&self, last: Option<u64>, changes: Vec<ChangeRecord>) -> &Self {
        self.script
            .lock()
            .push_back(Scripted::Feed(RefreshResponse::new(last.map(Checkpoint::new), changes)));
        self
    }

    pub fn push_response(&self, response: RefreshResponse) -> &Self {
        self.script.lock().push_back(Scripted::Feed(response));
        self
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.script.lock().push_back(Scripted::Status(status));
        self
    }

    pub fn set_variable(&self, name: &str, value: &str) -> &Self {
        self.variables
            .lock()
            .insert(name.to_string(), Ok(value.to_string()));
        self
    }

    pub fn fail_variable(&self, name: &str, status: u16) -> &Self {
        self.variables.lock().insert(name.to_string(), Err(status));
        self
    }

    pub fn feed_requests(&self) -> Vec<Checkpoint> {
        self.feed_requests.lock().clone()
    }

    pub fn feed_request_count(&self) -> usize {
        self.feed_requests.lock().len()
    }

    pub fn variable_requests(&self) -> Vec<String> {
        self.variable_requests.lock().clone()
    }
}

impl RemoteStateClient for MockHub {
    async fn refresh_states(&self, since: Checkpoint) -> Result<RefreshResponse, TransportError> {
        self.feed_requests.lock().push(since);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(Scripted::Feed(response)) => Ok(response),
            Some(Scripted::Status(status)) => Err(TransportError::Status(status)),
            None => Ok(RefreshResponse::new(None, Vec::new())),
        }
    }

    async fn get_global_variable(&self, name: &str) -> Result<GlobalVariable, TransportError> {
        self.variable_requests.lock().push(name.to_string());

        let entry = self.variables.lock().get(name).cloned();
        match entry {
            Some(Ok(value)) => Ok(GlobalVariable::new(value)),
            Some(Err(status)) => Err(TransportError::Status(status)),
            None => Err(TransportError::Status(404)),
        }
    }
}

/// Creates a shared service holding the given characteristics.
pub fn service(name: &str, category: ServiceCategory, kinds: &[CharacteristicKind]) -> Arc<Service> {
    let service = kinds
        .iter()
        .fold(Service::new(name, category), |service, &kind| {
            service.with_characteristic(kind)
        });
    Arc::new(service)
}

/// Binds `property` of hub device `id` to every characteristic of `service`.
pub fn bind_all(
    registry: &mut SubscriptionRegistry,
    id: i64,
    property: &str,
    service: &Arc<Service>,
) {
    for characteristic in service.characteristics() {
        registry.subscribe(
            Subscription::new(id, property, service, characteristic.kind())
                .expect("characteristic exists on service"),
        );
    }
}

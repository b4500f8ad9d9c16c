// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `fibaro_sync` - Keeps local smart-home representations in sync with a
//! Fibaro Home Center hub.
//!
//! The hub exposes an incremental change feed: every request carries the
//! checkpoint returned by the previous one and yields only what changed
//! since. This library polls that feed, routes each change onto the local
//! characteristics bound to the hub device, and mirrors the state the feed
//! does not carry (global variables and the alarm panel).
//!
//! # Building Blocks
//!
//! - **Accessories**: [`Service`]s grouping shared, observable
//!   [`Characteristic`]s
//! - **Subscriptions**: bindings from a hub device property to a
//!   characteristic, collected in a [`SubscriptionRegistry`]
//! - **Converters**: per-kind functions turning raw hub values into
//!   characteristic values, collected in a [`ConverterRegistry`]
//! - **Poller**: the scheduler driving a [`RemoteStateClient`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use fibaro_sync::{
//!     CharacteristicKind, ConverterRegistry, HttpHubConfig, Poller, PollerConfig, Service,
//!     ServiceCategory, Subscription, SubscriptionRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> fibaro_sync::Result<()> {
//!     let lamp = Arc::new(
//!         Service::new("Kitchen lamp", ServiceCategory::Lightbulb)
//!             .with_characteristic(CharacteristicKind::On)
//!             .with_characteristic(CharacteristicKind::Brightness),
//!     );
//!     lamp.characteristic(CharacteristicKind::On)
//!         .unwrap()
//!         .on_update(|_, value| println!("Kitchen lamp on: {value}"));
//!
//!     let mut registry = SubscriptionRegistry::new();
//!     registry.subscribe(Subscription::new(42, "value", &lamp, CharacteristicKind::Brightness)?);
//!     registry.subscribe(Subscription::new(42, "value", &lamp, CharacteristicKind::On)?);
//!
//!     let client = HttpHubConfig::new("192.168.1.10")
//!         .with_credentials("admin", "admin")
//!         .into_client()?;
//!     let config = PollerConfig::from_json(r#"{"pollerperiod": "2"}"#)
//!         .unwrap_or_default();
//!
//!     let poller = Poller::new(
//!         client,
//!         Arc::new(registry),
//!         Arc::new(ConverterRegistry::with_defaults()),
//!         config,
//!     );
//!     poller.start();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     poller.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod accessory;
pub mod client;
pub mod config;
pub mod converter;
pub mod error;
pub mod feed;
pub mod poller;
pub mod subscription;
pub mod types;

pub use accessory::{
    Characteristic, CharacteristicKind, CharacteristicValue, Service, ServiceCategory,
};
#[cfg(feature = "http")]
pub use client::{HttpHubClient, HttpHubConfig};
pub use client::RemoteStateClient;
pub use config::PollerConfig;
pub use converter::{Converter, ConverterRegistry};
pub use error::{Error, LookupError, MappingError, Result, TransportError, ValueError};
pub use feed::{ChangeKind, ChangeRecord, GlobalVariable, RefreshResponse};
pub use poller::{CycleReport, Poller};
pub use subscription::{Property, Subscription, SubscriptionRegistry};
pub use types::{Checkpoint, HsvColor, RgbwColor, SecuritySystemState, TemperatureUnit};

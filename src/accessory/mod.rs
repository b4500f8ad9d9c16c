// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local representations of hub devices.
//!
//! A [`Service`] groups the [`Characteristic`]s of one device facet (a light,
//! a sensor, an alarm panel). Each characteristic carries a fixed
//! [`CharacteristicKind`] that decides how hub values are converted into it.
//!
//! Building services is the job of the surrounding application; the poller
//! only writes values into characteristics it was given.

mod characteristic;
mod service;

pub use characteristic::{Characteristic, CharacteristicKind, CharacteristicValue};
pub use service::{Service, ServiceCategory};

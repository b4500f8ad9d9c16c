// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub change feed: wire records and their classification.
//!
//! - [`RefreshResponse`] - One page of the change feed plus its checkpoint
//! - [`ChangeRecord`] - A sparse set of changed fields for one device
//! - [`GlobalVariable`] - Value of a named hub variable
//! - [`classify`] - Picks the dispatcher for a change

mod change;
mod classify;

pub use change::{ChangeRecord, GlobalVariable, RefreshResponse};
pub use classify::{ChangeKind, classify};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change feed checkpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker of the last change processed from the hub's change feed.
///
/// The hub stamps every refresh response with a `last` marker; passing it
/// back on the next request yields only the changes that happened since.
/// [`Checkpoint::BEGINNING`] asks the hub for a full resync.
///
/// # Examples
///
/// ```
/// use fibaro_sync::types::Checkpoint;
///
/// let cp = Checkpoint::new(1700);
/// assert!(cp > Checkpoint::BEGINNING);
/// assert!(Checkpoint::BEGINNING.is_beginning());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Checkpoint(u64);

impl Checkpoint {
    /// Sentinel requesting every change the hub knows about.
    pub const BEGINNING: Self = Self(0);

    /// Creates a checkpoint from the hub's raw marker.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw marker value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns `true` for the full-resync sentinel.
    #[must_use]
    pub const fn is_beginning(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Checkpoint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Security system state.

use std::fmt;

/// Current state of the local alarm panel.
///
/// Discriminants follow the numeric codes used by local security system
/// representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SecuritySystemState {
    /// Armed while occupants are home.
    StayArm = 0,
    /// Armed while the house is empty.
    AwayArm = 1,
    /// Armed for the night.
    NightArm = 2,
    /// Disarmed.
    Disarmed = 3,
    /// The alarm is going off.
    AlarmTriggered = 4,
}

impl SecuritySystemState {
    /// All states, in code order.
    pub const ALL: [Self; 5] = [
        Self::StayArm,
        Self::AwayArm,
        Self::NightArm,
        Self::Disarmed,
        Self::AlarmTriggered,
    ];

    /// Returns the numeric code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Returns the state for a numeric code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Returns the name the hub uses for this state in its
    /// `SecuritySystem` global variable.
    #[must_use]
    pub const fn hub_name(&self) -> &'static str {
        match self {
            Self::StayArm => "StayArmed",
            Self::AwayArm => "AwayArmed",
            Self::NightArm => "NightArmed",
            Self::Disarmed => "Disarmed",
            Self::AlarmTriggered => "AlarmTriggered",
        }
    }
}

impl fmt::Display for SecuritySystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hub_name())
    }
}

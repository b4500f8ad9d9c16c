// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `fibaro_sync` library.
//!
//! Errors are split by concern: talking to the hub ([`TransportError`]),
//! selecting a converter ([`MappingError`]), finding a named local
//! representation ([`LookupError`]) and interpreting raw hub values
//! ([`ValueError`]). None of them is fatal to the poll loop; they are
//! caught and logged at the cycle boundary.

use thiserror::Error;

use crate::accessory::{CharacteristicKind, ServiceCategory};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Communication with the hub failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No converter is registered for a characteristic kind.
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// A named local representation could not be found.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// A raw hub value could not be interpreted.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

impl Error {
    /// Returns `true` if this error is a transport error carrying the
    /// hub's "bad request" status.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_bad_request())
    }
}

/// Errors raised by a [`RemoteStateClient`](crate::client::RemoteStateClient).
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The hub answered with a non-success status code.
    #[error("hub responded with status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("failed to decode hub response: {0}")]
    Decode(String),

    /// Connection to the hub failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl TransportError {
    /// Status code the hub returns when an incremental query is rejected.
    pub const BAD_REQUEST: u16 = 400;

    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            #[cfg(feature = "http")]
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the hub rejected the request as malformed.
    ///
    /// The poller answers this by resetting its checkpoint and performing a
    /// full resync on the next cycle.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        self.status() == Some(Self::BAD_REQUEST)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Errors raised while selecting a converter for a subscription.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// No converter is registered for the characteristic kind.
    #[error("no converter registered for {0}")]
    NoConverter(CharacteristicKind),
}

/// Errors raised while looking up a named local representation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No service with that name and category is registered.
    #[error("no {category} service named {name:?}")]
    ServiceNotFound {
        /// The name that was looked up.
        name: String,
        /// The expected service category.
        category: ServiceCategory,
    },

    /// The service exists but lacks the expected characteristic.
    #[error("service {service:?} has no {kind} characteristic")]
    CharacteristicNotFound {
        /// The service name.
        service: String,
        /// The missing characteristic kind.
        kind: CharacteristicKind,
    },
}

/// Errors raised while interpreting raw hub values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// The change record does not carry the field the converter reads.
    #[error("missing field {0}")]
    MissingField(&'static str),

    /// A value could not be read as a number.
    #[error("{0} is not a number")]
    NotANumber(String),

    /// A value could not be read as a boolean.
    #[error("{0} is not a boolean")]
    NotABoolean(String),

    /// A color string is not in the hub's `r,g,b,w` format.
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// A temperature unit is not recognized.
    #[error("unknown temperature unit {0:?}")]
    UnknownUnit(String),

    /// A thermostat mode name is not recognized.
    #[error("unknown thermostat mode {0:?}")]
    UnknownMode(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the hub's state.
//!
//! The poller only needs two operations from the hub, captured by
//! [`RemoteStateClient`]. [`HttpHubClient`] implements them against the
//! hub's REST API; tests and alternative transports provide their own.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpHubClient, HttpHubConfig};

use std::future::Future;
use std::sync::Arc;

use crate::error::TransportError;
use crate::feed::{GlobalVariable, RefreshResponse};
use crate::types::Checkpoint;

/// Source of hub state consumed by the poller.
///
/// Futures must be `Send` because the poll loop runs as a spawned tokio
/// task.
pub trait RemoteStateClient: Send + Sync {
    /// Fetches every change since `since`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network or decoding failure. A
    /// `TransportError::Status(400)` makes the poller resync from
    /// [`Checkpoint::BEGINNING`].
    fn refresh_states(
        &self,
        since: Checkpoint,
    ) -> impl Future<Output = Result<RefreshResponse, TransportError>> + Send;

    /// Fetches the value of a named global variable.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network or decoding failure.
    fn get_global_variable(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<GlobalVariable, TransportError>> + Send;
}

impl<T: RemoteStateClient> RemoteStateClient for Arc<T> {
    fn refresh_states(
        &self,
        since: Checkpoint,
    ) -> impl Future<Output = Result<RefreshResponse, TransportError>> + Send {
        (**self).refresh_states(since)
    }

    fn get_global_variable(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<GlobalVariable, TransportError>> + Send {
        (**self).get_global_variable(name)
    }
}

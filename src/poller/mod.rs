// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The poll/dispatch engine.
//!
//! # Overview
//!
//! A [`Poller`] repeatedly asks the hub for everything that changed since
//! its [`Checkpoint`], routes each change onto the subscriptions bound to
//! that device, then refreshes the state the change feed does not carry
//! (global variables mirrored as switches or dimmers, and the alarm panel).
//!
//! One cycle runs at a time. A cycle requested while another is in flight
//! is dropped, not queued. After each cycle the loop waits a fixed
//! [`poll_interval`](crate::config::PollerConfig::poll_interval) before the
//! next one, whether the cycle succeeded or not.
//!
//! No error stops the loop. Errors are logged and counted in the
//! [`CycleReport`]; a hub "bad request" answer additionally resets the
//! checkpoint so the next cycle performs a full resync.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use fibaro_sync::client::HttpHubConfig;
//! use fibaro_sync::config::PollerConfig;
//! use fibaro_sync::converter::ConverterRegistry;
//! use fibaro_sync::poller::Poller;
//! use fibaro_sync::subscription::SubscriptionRegistry;
//!
//! #[tokio::main]
//! async fn main() -> fibaro_sync::Result<()> {
//!     let client = HttpHubConfig::new("192.168.1.10")
//!         .with_credentials("admin", "admin")
//!         .into_client()?;
//!
//!     let registry = Arc::new(SubscriptionRegistry::new());
//!     let poller = Poller::new(
//!         client,
//!         registry,
//!         Arc::new(ConverterRegistry::with_defaults()),
//!         PollerConfig::default(),
//!     );
//!
//!     poller.start();
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     poller.shutdown().await;
//!     Ok(())
//! }
//! ```

mod dispatch;
mod display;
mod side_channel;

pub use display::describe_value;
pub use side_channel::{SECURITY_SYSTEM_SERVICE, SECURITY_SYSTEM_VARIABLE};

use std::ops::AddAssign;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::RemoteStateClient;
use crate::config::PollerConfig;
use crate::converter::ConverterRegistry;
use crate::error::TransportError;
use crate::subscription::SubscriptionRegistry;
use crate::types::Checkpoint;

use dispatch::Dispatcher;
use side_channel::{VariableGroup, poll_global_variables, poll_security_system};

/// Counts accumulated while applying changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) updates: usize,
    pub(crate) errors: usize,
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.updates += rhs.updates;
        self.errors += rhs.errors;
    }
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct CycleReport {
    /// Checkpoint the cycle's feed request was made with.
    pub since: Checkpoint,
    /// Checkpoint held once the cycle finished.
    pub checkpoint: Checkpoint,
    /// Number of change records received.
    pub changes: usize,
    /// Number of characteristic writes performed.
    pub updates: usize,
    /// Number of change records carrying no known field, plus records the
    /// feed decoder had to drop.
    pub ignored: usize,
    /// Number of errors logged during the cycle.
    pub errors: usize,
    /// Whether the change feed request itself failed.
    pub fetch_failed: bool,
    /// Whether the checkpoint was reset after a bad request.
    pub resynced: bool,
}

impl CycleReport {
    fn new(since: Checkpoint) -> Self {
        Self {
            since,
            checkpoint: since,
            changes: 0,
            updates: 0,
            ignored: 0,
            errors: 0,
            fetch_failed: false,
            resynced: false,
        }
    }

    fn record(&mut self, tally: Tally) {
        self.updates += tally.updates;
        self.errors += tally.errors;
    }
}

/// Polls a hub and keeps local characteristics in sync with it.
///
/// The poller owns its checkpoint and run state. The registry and converter
/// table are shared read-only. Dropping the poller cancels its loop.
pub struct Poller<C> {
    shared: Arc<Shared<C>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Shared<C> {
    client: C,
    registry: Arc<SubscriptionRegistry>,
    converters: Arc<ConverterRegistry>,
    config: PollerConfig,
    checkpoint: AtomicU64,
    running: AtomicBool,
    cancel: CancellationToken,
}

// Clears the single-flight flag however the cycle ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<C: RemoteStateClient> Poller<C> {
    /// Creates a poller starting from [`Checkpoint::BEGINNING`].
    #[must_use]
    pub fn new(
        client: C,
        registry: Arc<SubscriptionRegistry>,
        converters: Arc<ConverterRegistry>,
        config: PollerConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                registry,
                converters,
                config,
                checkpoint: AtomicU64::new(Checkpoint::BEGINNING.value()),
                running: AtomicBool::new(false),
                cancel: CancellationToken::new(),
            }),
            task: Mutex::new(None),
        }
    }

    /// Runs one poll cycle.
    ///
    /// Returns `None` without doing anything if a cycle is already in
    /// flight.
    pub async fn poll(&self) -> Option<CycleReport> {
        self.shared.poll().await
    }

    /// Spawns the poll loop on the current tokio runtime.
    ///
    /// The first cycle starts immediately. Returns `false` when polling is
    /// disabled (zero interval), the poller was cancelled, or a loop is
    /// already active.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) -> bool
    where
        C: 'static,
    {
        if !self.shared.config.polling_enabled() {
            tracing::debug!("Polling disabled, not starting poller");
            return false;
        }
        if self.shared.cancel.is_cancelled() {
            return false;
        }

        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let shared = Arc::clone(&self.shared);
        *task = Some(tokio::spawn(async move { shared.run_loop().await }));
        tracing::debug!(
            interval = ?self.shared.config.poll_interval,
            "Poller started"
        );
        true
    }

    /// Stops scheduling further cycles.
    ///
    /// A cycle in flight runs to completion. Cancellation is permanent.
    pub fn cancel(&self) {
        self.shared.cancel.cancel();
    }

    /// Cancels the poller and waits for its loop task to finish.
    pub async fn shutdown(&self) {
        self.cancel();
        let handle = self.task.lock().take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "Poller task ended abnormally");
        }
    }

    /// Returns the checkpoint the next feed request will use.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        self.shared.checkpoint()
    }

    /// Returns `true` while a cycle is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PollerConfig {
        &self.shared.config
    }
}

impl<C> Drop for Poller<C> {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl<C> std::fmt::Debug for Poller<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("checkpoint", &self.shared.checkpoint.load(Ordering::Acquire))
            .field("running", &self.shared.running.load(Ordering::Acquire))
            .field("cancelled", &self.shared.cancel.is_cancelled())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl<C: RemoteStateClient> Shared<C> {
    fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.checkpoint.load(Ordering::Acquire))
    }

    async fn poll(&self) -> Option<CycleReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Poll already in progress, skipping");
            return None;
        }
        let _guard = RunningGuard(&self.running);

        Some(self.run_cycle().await)
    }

    async fn run_loop(&self) {
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            self.poll().await;
            if self.cancel.is_cancelled() {
                break;
            }

            tracing::debug!("Restarting poller");
            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
        tracing::debug!("Poller stopped");
    }

    async fn run_cycle(&self) -> CycleReport {
        let since = self.checkpoint();
        let mut report = CycleReport::new(since);

        match self.client.refresh_states(since).await {
            Ok(response) => {
                if let Some(last) = response.last {
                    self.checkpoint.fetch_max(last.value(), Ordering::AcqRel);
                }
                report.changes = response.changes.len();
                report.ignored = response.skipped;

                let dispatcher = Dispatcher::new(&self.registry, &self.converters, &self.config);
                for change in response.changes {
                    match dispatcher.dispatch(change) {
                        Some(tally) => report.record(tally),
                        None => report.ignored += 1,
                    }
                }

                self.poll_side_channels(&mut report).await;
            }
            Err(e) => {
                tracing::warn!(since = %since, error = %e, "Failed to fetch hub changes");
                report.fetch_failed = true;
                report.errors += 1;
                self.handle_transport_error(&e, &mut report);
            }
        }

        report.checkpoint = self.checkpoint();
        tracing::trace!(
            since = %report.since,
            checkpoint = %report.checkpoint,
            changes = report.changes,
            updates = report.updates,
            errors = report.errors,
            "Poll cycle finished"
        );
        report
    }

    async fn poll_side_channels(&self, report: &mut CycleReport) {
        let groups = [
            (VariableGroup::Switch, &self.config.switch_global_variables),
            (VariableGroup::Dimmer, &self.config.dimmer_global_variables),
        ];
        for (group, names) in groups {
            if names.is_empty() {
                continue;
            }
            let result = poll_global_variables(
                &self.client,
                &self.registry,
                &self.converters,
                names,
                group,
            )
            .await;
            match result {
                Ok(tally) => report.record(tally),
                Err(e) => {
                    tracing::warn!(group = ?group, error = %e, "Failed to poll global variables");
                    report.errors += 1;
                    self.handle_transport_error(&e, report);
                }
            }
        }

        if self.config.security_system {
            match poll_security_system(&self.client, &self.registry, &self.converters).await {
                Ok(tally) => report.record(tally),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to poll security system");
                    report.errors += 1;
                    self.handle_transport_error(&e, report);
                }
            }
        }
    }

    fn handle_transport_error(&self, error: &TransportError, report: &mut CycleReport) {
        if error.is_bad_request() {
            tracing::info!("Hub rejected the checkpoint, resyncing from the beginning");
            self.checkpoint
                .store(Checkpoint::BEGINNING.value(), Ordering::Release);
            report.resynced = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::feed::{GlobalVariable, RefreshResponse};

    struct Failing(u16);

    impl RemoteStateClient for Failing {
        async fn refresh_states(&self, _: Checkpoint) -> Result<RefreshResponse, TransportError> {
            Err(TransportError::Status(self.0))
        }

        async fn get_global_variable(&self, _: &str) -> Result<GlobalVariable, TransportError> {
            Err(TransportError::Status(self.0))
        }
    }

    struct Feed(u64);

    impl RemoteStateClient for Feed {
        async fn refresh_states(&self, _: Checkpoint) -> Result<RefreshResponse, TransportError> {
            Ok(RefreshResponse::new(Some(Checkpoint::new(self.0)), Vec::new()))
        }

        async fn get_global_variable(&self, _: &str) -> Result<GlobalVariable, TransportError> {
            Ok(GlobalVariable::new("0"))
        }
    }

    fn poller<C: RemoteStateClient>(client: C) -> Poller<C> {
        Poller::new(
            client,
            Arc::new(SubscriptionRegistry::new()),
            Arc::new(ConverterRegistry::with_defaults()),
            PollerConfig::new(),
        )
    }

    #[test]
    fn tally_adds() {
        let mut tally = Tally { updates: 1, errors: 0 };
        tally += Tally { updates: 2, errors: 1 };
        assert_eq!(tally, Tally { updates: 3, errors: 1 });
    }

    #[tokio::test]
    async fn checkpoint_advances() {
        let poller = poller(Feed(1700));
        let report = poller.poll().await.unwrap();
        assert_eq!(report.since, Checkpoint::BEGINNING);
        assert_eq!(report.checkpoint, Checkpoint::new(1700));
        assert_eq!(poller.checkpoint(), Checkpoint::new(1700));
        assert!(!poller.is_running());
    }

    #[tokio::test]
    async fn bad_request_resyncs() {
        let poller = poller(Failing(400));
        poller.shared.checkpoint.store(50, Ordering::Release);

        let report = poller.poll().await.unwrap();
        assert!(report.fetch_failed);
        assert!(report.resynced);
        assert_eq!(poller.checkpoint(), Checkpoint::BEGINNING);
    }

    #[tokio::test]
    async fn other_errors_keep_checkpoint() {
        let poller = poller(Failing(500));
        poller.shared.checkpoint.store(50, Ordering::Release);

        let report = poller.poll().await.unwrap();
        assert!(report.fetch_failed);
        assert!(!report.resynced);
        assert_eq!(poller.checkpoint(), Checkpoint::new(50));
    }

    #[tokio::test]
    async fn start_refused_when_disabled() {
        let poller = Poller::new(
            Feed(1),
            Arc::new(SubscriptionRegistry::new()),
            Arc::new(ConverterRegistry::with_defaults()),
            PollerConfig::new().with_poll_interval(std::time::Duration::ZERO),
        );
        assert!(!poller.start());
    }

    #[tokio::test]
    async fn start_refused_after_cancel() {
        let poller = poller(Feed(1));
        poller.cancel();
        assert!(poller.is_cancelled());
        assert!(!poller.start());
    }
}

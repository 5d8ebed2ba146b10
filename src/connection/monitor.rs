// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared connection state, updated from both the caller and the engine.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tokio::sync::watch;

use crate::engine::{EndpointInfo, EngineErrorCode};
use crate::error::Result;

use super::{ConnectionEvent, ConnectionState, UserCallbacks, transition};

/// Owns the connection state and dispatches engine events.
///
/// Every change is applied under a lock, wakes threads blocked in
/// [`wait_for_deregistration`](Self::wait_for_deregistration) and is
/// published on a watch channel for async observers. User hooks are called
/// after the lock is released.
pub struct ConnectionMonitor {
    state: Mutex<ConnectionState>,
    changed: Condvar,
    publisher: watch::Sender<ConnectionState>,
    callbacks: UserCallbacks,
    debug: bool,
}

impl ConnectionMonitor {
    /// Creates a monitor in [`ConnectionState::Uninitialized`].
    #[must_use]
    pub fn new(callbacks: UserCallbacks, debug: bool) -> Self {
        let (publisher, _) = watch::channel(ConnectionState::Uninitialized);
        Self {
            state: Mutex::new(ConnectionState::Uninitialized),
            changed: Condvar::new(),
            publisher,
            callbacks,
            debug,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Returns the user hooks.
    #[must_use]
    pub fn callbacks(&self) -> &UserCallbacks {
        &self.callbacks
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.publisher.subscribe()
    }

    /// Applies an event, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`](crate::Error::InvalidTransition)
    /// and leaves the state unchanged if the event is not allowed.
    pub fn apply(&self, event: ConnectionEvent) -> Result<ConnectionState> {
        let mut state = self.state.lock();
        let next = transition(*state, event)?;
        let previous = std::mem::replace(&mut *state, next);
        drop(state);

        self.changed.notify_all();
        self.publisher.send_replace(next);
        tracing::debug!(from = %previous, to = %next, %event, "Connection state changed");
        Ok(next)
    }

    /// Handles the engine's registered event.
    pub fn registered(&self, endpoint: Option<EndpointInfo>) {
        if let Err(e) = self.apply(ConnectionEvent::Registered) {
            debug_log!(self.debug, warn, error = %e, "Ignoring registration event");
        }
        match endpoint {
            Some(info) => debug_log!(
                self.debug,
                info,
                endpoint = %info.endpoint_name,
                device_id = %info.internal_endpoint_name,
                "Client registered"
            ),
            None => debug_log!(self.debug, info, "Client registered"),
        }
        self.callbacks.dispatch_registered();
    }

    /// Handles the engine's unregistered event.
    pub fn deregistered(&self) {
        if let Err(e) = self.apply(ConnectionEvent::Deregistered) {
            debug_log!(self.debug, warn, error = %e, "Ignoring deregistration event");
        }
        debug_log!(self.debug, info, "Client deregistered");
        self.callbacks.dispatch_deregistered();
    }

    /// Handles the engine's error event.
    ///
    /// The state is left untouched; reacting to the code is up to the
    /// application's hook.
    pub fn error(&self, code: i32, description: Option<String>) {
        debug_log!(
            self.debug,
            error,
            code,
            error = EngineErrorCode::describe(code),
            description = description.as_deref().unwrap_or_default(),
            "Device management engine error"
        );
        self.callbacks.dispatch_error(code);
    }

    /// Blocks until the client is no longer registered or `timeout`
    /// elapses, whichever comes first.
    ///
    /// Returns true if the client left the registered state in time.
    pub fn wait_for_deregistration(&self, timeout: Duration) -> bool {
        let mut state = self.state.lock();
        let _ = self
            .changed
            .wait_while_for(&mut state, |s| s.is_registered(), timeout);
        !state.is_registered()
    }
}

impl std::fmt::Debug for ConnectionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionMonitor")
            .field("state", &self.state())
            .field("callbacks", &self.callbacks)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    fn registered_monitor(callbacks: UserCallbacks) -> Arc<ConnectionMonitor> {
        let monitor = Arc::new(ConnectionMonitor::new(callbacks, true));
        monitor.apply(ConnectionEvent::Start).unwrap();
        monitor.apply(ConnectionEvent::Connect).unwrap();
        monitor.registered(None);
        assert_eq!(monitor.state(), ConnectionState::Registered);
        monitor
    }

    #[test]
    fn invalid_event_keeps_state() {
        let monitor = ConnectionMonitor::new(UserCallbacks::new(), false);
        assert!(monitor.apply(ConnectionEvent::Connect).is_err());
        assert_eq!(monitor.state(), ConnectionState::Uninitialized);
    }

    #[test]
    fn wait_returns_immediately_when_not_registered() {
        let monitor = ConnectionMonitor::new(UserCallbacks::new(), false);
        let started = Instant::now();
        assert!(monitor.wait_for_deregistration(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn wait_times_out_while_registered() {
        let monitor = registered_monitor(UserCallbacks::new());
        let started = Instant::now();
        assert!(!monitor.wait_for_deregistration(Duration::from_millis(50)));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn wait_wakes_on_deregistration() {
        let monitor = registered_monitor(UserCallbacks::new());
        let engine_side = monitor.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            engine_side.deregistered();
        });

        let started = Instant::now();
        assert!(monitor.wait_for_deregistration(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }

    #[test]
    fn late_event_after_stop_still_reaches_hook() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut callbacks = UserCallbacks::new();
        let c = count.clone();
        callbacks.set_deregistered(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let monitor = registered_monitor(callbacks);
        monitor.apply(ConnectionEvent::Stop).unwrap();

        monitor.deregistered();

        assert_eq!(monitor.state(), ConnectionState::Stopped);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_leaves_state_alone() {
        let monitor = registered_monitor(UserCallbacks::new());
        monitor.error(6, Some("socket closed".to_string()));
        assert_eq!(monitor.state(), ConnectionState::Registered);
    }

    #[test]
    fn watch_sees_changes() {
        let monitor = ConnectionMonitor::new(UserCallbacks::new(), false);
        let receiver = monitor.subscribe();
        monitor.apply(ConnectionEvent::Start).unwrap();
        assert_eq!(*receiver.borrow(), ConnectionState::Started);
    }
}

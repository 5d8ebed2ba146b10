// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection states and the transitions allowed between them.

use std::fmt;

use crate::error::Error;

/// Connection state of the client.
///
/// ```text
/// Uninitialized -> Started -> Connecting -> Registered <-> Deregistered
///                                                 \            /
///   (any state but Stopped) ---------------------> Stopped <--
/// ```
///
/// `Stopped` is terminal. Engine registration events are also accepted
/// straight from `Started`, since the engine may register without `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// Created, not yet started.
    #[default]
    Uninitialized,
    /// Started: the object tree has been handed to the engine.
    Started,
    /// Setup accepted by the engine, registration pending.
    Connecting,
    /// Registered with the server.
    Registered,
    /// Deregistered from the server.
    Deregistered,
    /// Stopped; no further transitions.
    Stopped,
}

impl ConnectionState {
    /// Returns true once `start` has succeeded, including after `stop`.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    /// Returns true while registered with the server.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }

    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Started => "started",
            Self::Connecting => "connecting",
            Self::Registered => "registered",
            Self::Deregistered => "deregistered",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events driving the connection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionEvent {
    /// `start` was called.
    Start,
    /// `connect` was called.
    Connect,
    /// The engine rejected setup.
    ConnectFailed,
    /// The engine reported registration.
    Registered,
    /// The engine reported deregistration.
    Deregistered,
    /// `stop` was called.
    Stop,
}

impl ConnectionEvent {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Connect => "connect",
            Self::ConnectFailed => "fail connecting",
            Self::Registered => "register",
            Self::Deregistered => "deregister",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the state reached from `current` through `event`.
///
/// # Errors
///
/// Returns [`Error::InvalidTransition`] when `event` is not allowed in
/// `current`, e.g. connecting before starting or anything after stopping.
pub fn transition(current: ConnectionState, event: ConnectionEvent) -> Result<ConnectionState, Error> {
    use ConnectionEvent as E;
    use ConnectionState as S;

    let next = match (current, event) {
        (S::Uninitialized, E::Start) => S::Started,
        (S::Started | S::Deregistered, E::Connect) => S::Connecting,
        (S::Connecting, E::ConnectFailed) => S::Started,
        (S::Started | S::Connecting | S::Registered | S::Deregistered, E::Registered) => {
            S::Registered
        }
        (S::Started | S::Connecting | S::Registered | S::Deregistered, E::Deregistered) => {
            S::Deregistered
        }
        (s, E::Stop) if s != S::Stopped => S::Stopped,
        _ => {
            return Err(Error::InvalidTransition {
                from: current,
                event,
            });
        }
    };
    Ok(next)
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The client facade and its configuration.

mod builder;
mod config;
mod device_client;

pub use builder::DeviceClientBuilder;
pub use config::{ClientConfig, DEFAULT_STOP_TIMEOUT_MS};
pub use device_client::DeviceClient;

use std::fmt;

/// How [`DeviceClient::stop`] ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopOutcome {
    /// The engine reported deregistration within the timeout.
    Deregistered,
    /// The timeout elapsed first; the client stopped anyway.
    TimedOut,
    /// The client was not registered, so there was nothing to wait for.
    NotRegistered,
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deregistered => "deregistered",
            Self::TimedOut => "timed out",
            Self::NotRegistered => "not registered",
        })
    }
}

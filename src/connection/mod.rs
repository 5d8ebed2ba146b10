// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection state machine.
//!
//! - [`ConnectionState`] / [`ConnectionEvent`] and the [`transition`] table
//! - [`ConnectionMonitor`] holding the live state, shared with the engine's
//!   callbacks
//! - [`UserCallbacks`] with the application's optional hooks

mod callbacks;
mod monitor;
mod state;

pub use callbacks::UserCallbacks;
pub use monitor::ConnectionMonitor;
pub use state::{ConnectionEvent, ConnectionState, transition};

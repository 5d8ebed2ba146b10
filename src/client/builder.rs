// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for [`DeviceClient`].

use std::sync::Arc;
use std::time::Duration;

use crate::connection::UserCallbacks;
use crate::engine::DmEngine;
use crate::error::Result;
use crate::store::ConfigStore;

use super::{ClientConfig, DeviceClient};

/// Builder for a [`DeviceClient`].
///
/// Created by [`DeviceClient::builder`]. Hooks are optional; the
/// configuration defaults to [`ClientConfig::default`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use lwdm_lib::DeviceClient;
/// use lwdm_lib::memory::{MemoryConfigStore, MemoryEngine};
///
/// let client = DeviceClient::builder(
///     Arc::new(MemoryEngine::new()),
///     Arc::new(MemoryConfigStore::new()),
/// )
/// .debug(true)
/// .stop_timeout(Duration::from_millis(500))
/// .on_registered(|| println!("registered"))
/// .on_error(|code| eprintln!("engine error {code}"))
/// .build()
/// .unwrap();
///
/// assert!(!client.is_connected());
/// ```
pub struct DeviceClientBuilder<E: DmEngine, S: ConfigStore> {
    engine: Arc<E>,
    store: Arc<S>,
    config: ClientConfig,
    callbacks: UserCallbacks,
}

impl<E: DmEngine, S: ConfigStore> DeviceClientBuilder<E, S> {
    pub(crate) fn new(engine: Arc<E>, store: Arc<S>) -> Self {
        Self {
            engine,
            store,
            config: ClientConfig::default(),
            callbacks: UserCallbacks::new(),
        }
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables or disables diagnostic events.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Sets how long `stop` waits for deregistration.
    #[must_use]
    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_stop_timeout(timeout);
        self
    }

    /// Sets the hook called after registration.
    #[must_use]
    pub fn on_registered<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.set_registered(callback);
        self
    }

    /// Sets the hook called after deregistration.
    #[must_use]
    pub fn on_deregistered<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.set_deregistered(callback);
        self
    }

    /// Sets the hook receiving raw engine error codes.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.callbacks.set_error(callback);
        self
    }

    /// Sets the firmware-update progress hook, installed on the engine at
    /// start.
    #[cfg(feature = "update")]
    #[must_use]
    pub fn on_update_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(u32, u32) + Send + Sync + 'static,
    {
        self.callbacks.set_update_progress(callback);
        self
    }

    /// Builds the client.
    ///
    /// The Device object handle is requested from the engine here, once. A
    /// missing handle does not fail the build; Device object operations
    /// then fail with [`Error::ObjectUnavailable`](crate::Error::ObjectUnavailable).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// is invalid.
    pub fn build(self) -> Result<DeviceClient<E, S>> {
        self.config.validate()?;
        DeviceClient::from_parts(self.engine, self.store, self.config, self.callbacks)
    }
}

impl<E: DmEngine, S: ConfigStore> std::fmt::Debug for DeviceClientBuilder<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceClientBuilder")
            .field("config", &self.config)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

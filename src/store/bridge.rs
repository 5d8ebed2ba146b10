// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::resource::ResourceKind;

use super::{ConfigStore, StoreStatus};

/// Routes the static Device object resources (device type, serial number,
/// hardware and software version) to the configuration store.
///
/// Writes are always delete-then-write: the key is briefly absent, but a
/// stale or conflicting entry can never survive a write.
pub struct ConfigBridge<S: ConfigStore> {
    store: Arc<S>,
    debug: bool,
}

impl<S: ConfigStore> ConfigBridge<S> {
    /// Creates a bridge over the given store.
    #[must_use]
    pub fn new(store: Arc<S>, debug: bool) -> Self {
        Self { store, debug }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Replaces the stored value of a static resource.
    ///
    /// The existing entry is deleted first, whatever the outcome of that
    /// delete; only the write's status decides success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotStatic`] for resources outside the static subset,
    /// or [`Error::ConfigStore`] with the write's status if it is not
    /// [`StoreStatus::Success`].
    pub fn set(&self, resource: ResourceKind, value: &str) -> Result<()> {
        let key = static_key(resource)?;

        let deleted = self.store.delete(key);
        tracing::trace!(key, status = %deleted, "Cleared config store entry");

        let status = self.store.set(key, value.as_bytes());
        if status.is_success() {
            return Ok(());
        }

        debug_log!(self.debug, warn, key, status = %status, "Error setting config store entry");
        Err(Error::ConfigStore { key, status })
    }

    /// Reads the stored value of a static resource.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotStatic`] for resources outside the static subset,
    /// [`Error::InvalidStoredValue`] when the entry is not UTF-8, or
    /// [`Error::ConfigStore`] for any other store failure.
    pub fn get(&self, resource: ResourceKind) -> Result<Option<String>> {
        let key = static_key(resource)?;
        match self.store.get(key) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| Error::InvalidStoredValue { key }),
            Err(StoreStatus::KeyDoesntExist) => Ok(None),
            Err(status) => Err(Error::ConfigStore { key, status }),
        }
    }
}

fn static_key(resource: ResourceKind) -> Result<&'static str> {
    if resource.is_static() {
        Ok(resource.store_key())
    } else {
        Err(Error::NotStatic(resource))
    }
}

impl<S: ConfigStore> std::fmt::Debug for ConfigBridge<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBridge")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

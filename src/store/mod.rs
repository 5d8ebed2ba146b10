// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistent configuration store seam and the bridge writing the static
//! Device object resources into it.
//!
//! The store's durability is its own business; this crate only needs
//! [`ConfigStore`]'s get/set/delete and the [`StoreStatus`] they return.

mod bridge;

pub use bridge::ConfigBridge;

use std::fmt;

/// Status code returned by the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreStatus {
    /// The operation succeeded.
    Success,
    /// Generic failure.
    Error,
    /// The key is not in the store.
    KeyDoesntExist,
    /// The store rejected the value.
    ValidationFail,
    /// The store ran out of memory.
    MemoryError,
}

impl StoreStatus {
    /// Returns true for [`StoreStatus::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns a human-readable description.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "generic error",
            Self::KeyDoesntExist => "key does not exist",
            Self::ValidationFail => "validation failure",
            Self::MemoryError => "memory error",
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persistent key/value configuration store.
pub trait ConfigStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns the store's status when the value cannot be read
    /// (typically [`StoreStatus::KeyDoesntExist`]).
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreStatus>;

    /// Writes `value` under `key`.
    fn set(&self, key: &str, value: &[u8]) -> StoreStatus;

    /// Removes `key`.
    fn delete(&self, key: &str) -> StoreStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_success_is_success() {
        assert!(StoreStatus::Success.is_success());
        for status in [
            StoreStatus::Error,
            StoreStatus::KeyDoesntExist,
            StoreStatus::ValidationFail,
            StoreStatus::MemoryError,
        ] {
            assert!(!status.is_success());
        }
    }

    #[test]
    fn status_display() {
        assert_eq!(StoreStatus::KeyDoesntExist.to_string(), "key does not exist");
        assert_eq!(StoreStatus::MemoryError.to_string(), "memory error");
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::store::{ConfigStore, StoreStatus};

/// One journaled store call, with the key it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `get(key)`
    Get(String),
    /// `set(key, _)`
    Set(String),
    /// `delete(key)`
    Delete(String),
}

#[derive(Default)]
struct StoreState {
    entries: HashMap<String, Vec<u8>>,
    calls: Vec<StoreCall>,
    write_failure: Option<StoreStatus>,
}

/// An in-memory configuration store with a call journal.
#[derive(Default)]
pub struct MemoryConfigStore {
    state: Mutex<StoreState>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the journal of calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().calls.clone()
    }

    /// Clears the journal.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Makes every future write fail with `status`.
    pub fn fail_writes_with(&self, status: StoreStatus) {
        self.state.lock().write_failure = Some(status);
    }

    /// Lets writes succeed again.
    pub fn accept_writes(&self) {
        self.state.lock().write_failure = None;
    }

    /// Returns the stored value of `key` as text, without journaling.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .entries
            .get(key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreStatus> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::Get(key.to_string()));
        state
            .entries
            .get(key)
            .cloned()
            .ok_or(StoreStatus::KeyDoesntExist)
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreStatus {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::Set(key.to_string()));
        if let Some(status) = state.write_failure {
            return status;
        }
        state.entries.insert(key.to_string(), value.to_vec());
        StoreStatus::Success
    }

    fn delete(&self, key: &str) -> StoreStatus {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::Delete(key.to_string()));
        match state.entries.remove(key) {
            Some(_) => StoreStatus::Success,
            None => StoreStatus::KeyDoesntExist,
        }
    }
}

impl std::fmt::Debug for MemoryConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryConfigStore")
            .field("entries", &state.entries.len())
            .field("calls", &state.calls.len())
            .field("write_failure", &state.write_failure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_missing_key() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.delete("DeviceType"), StoreStatus::KeyDoesntExist);
    }

    #[test]
    fn failed_write_keeps_store_unchanged() {
        let store = MemoryConfigStore::new();
        store.fail_writes_with(StoreStatus::MemoryError);
        assert_eq!(store.set("SerialNumber", b"SN"), StoreStatus::MemoryError);
        assert_eq!(store.value("SerialNumber"), None);

        store.accept_writes();
        assert_eq!(store.set("SerialNumber", b"SN"), StoreStatus::Success);
        assert_eq!(store.get("SerialNumber").unwrap(), b"SN".to_vec());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::registry::MAX_POWER_SOURCE_SLOTS;

/// Default ceiling for the deregistration wait in `stop`, in milliseconds.
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 5000;

/// Configuration for a [`DeviceClient`](super::DeviceClient).
///
/// # Examples
///
/// ```
/// use lwdm_lib::client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_debug(true)
///     .with_stop_timeout_ms(2000);
/// assert_eq!(config.stop_timeout().as_millis(), 2000);
///
/// let config = ClientConfig::from_json(r#"{ "power_source_slots": 4 }"#).unwrap();
/// assert_eq!(config.power_source_slots, 4);
/// assert_eq!(config.stop_timeout_ms, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Emits diagnostic `tracing` events for failed operations and
    /// connection events.
    pub debug: bool,
    /// How long `stop` waits for deregistration before giving up.
    pub stop_timeout_ms: u64,
    /// Number of power-source slots, at most
    /// [`MAX_POWER_SOURCE_SLOTS`].
    pub power_source_slots: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debug: false,
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
            power_source_slots: MAX_POWER_SOURCE_SLOTS,
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input, or
    /// [`ConfigError::InvalidField`] if the result fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Enables or disables diagnostic events.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the deregistration wait ceiling in milliseconds.
    #[must_use]
    pub fn with_stop_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.stop_timeout_ms = timeout_ms;
        self
    }

    /// Sets the deregistration wait ceiling.
    #[must_use]
    pub fn with_stop_timeout(self, timeout: Duration) -> Self {
        self.with_stop_timeout_ms(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    }

    /// Sets the number of power-source slots.
    #[must_use]
    pub fn with_power_source_slots(mut self, slots: usize) -> Self {
        self.power_source_slots = slots;
        self
    }

    /// Returns the deregistration wait ceiling.
    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    /// Checks field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] if `power_source_slots` is zero
    /// or above [`MAX_POWER_SOURCE_SLOTS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.power_source_slots == 0 || self.power_source_slots > MAX_POWER_SOURCE_SLOTS {
            return Err(ConfigError::InvalidField {
                field: "power_source_slots",
                message: format!(
                    "must be between 1 and {MAX_POWER_SOURCE_SLOTS}, got {}",
                    self.power_source_slots
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(!config.debug);
        assert_eq!(config.stop_timeout(), Duration::from_secs(5));
        assert_eq!(config.power_source_slots, MAX_POWER_SOURCE_SLOTS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_round_trip_keeps_fields() {
        let config = ClientConfig::default()
            .with_debug(true)
            .with_stop_timeout(Duration::from_millis(250))
            .with_power_source_slots(3);
        let parsed = ClientConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn json_rejects_bad_slot_count() {
        let err = ClientConfig::from_json(r#"{ "power_source_slots": 9 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "power_source_slots",
                ..
            }
        ));
    }

    #[test]
    fn json_rejects_malformed_input() {
        assert!(matches!(
            ClientConfig::from_json("{ debug: yes"),
            Err(ConfigError::Json(_))
        ));
    }
}

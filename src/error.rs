// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `lwdm` library.
//!
//! Every operation of the facade reports failure through [`Error`]. None of
//! them panic and none of them retry: retry policy belongs to the caller.

use thiserror::Error;

use crate::connection::{ConnectionEvent, ConnectionState};
use crate::resource::ResourceKind;
use crate::store::StoreStatus;
use crate::types::PowerSource;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine could not supply the Device object handle.
    #[error("the Device object is not available")]
    ObjectUnavailable,

    /// The Device object rejected a create call.
    #[error("failed to create {}", describe(*resource, *instance))]
    CreateFailed {
        /// The resource that could not be created.
        resource: ResourceKind,
        /// Instance ID for multi-instance resources.
        instance: Option<u16>,
    },

    /// The Device object rejected a delete call.
    #[error("failed to delete {}", describe(*resource, *instance))]
    DeleteFailed {
        /// The resource that could not be deleted.
        resource: ResourceKind,
        /// Instance ID for multi-instance resources.
        instance: Option<u16>,
    },

    /// The Device object rejected a set call.
    #[error("failed to set {}", describe(*resource, *instance))]
    SetFailed {
        /// The resource whose value could not be set.
        resource: ResourceKind,
        /// Instance ID for multi-instance resources.
        instance: Option<u16>,
    },

    /// Every power-source slot is occupied.
    #[error("power-source registry is full ({capacity} slots)")]
    RegistryFull {
        /// Number of usable slots.
        capacity: usize,
    },

    /// The power source has not been added.
    #[error("power source {0} is not registered")]
    NotFound(PowerSource),

    /// The power source already occupies a slot.
    #[error("power source {power_source} is already registered as instance {instance}")]
    AlreadyRegistered {
        /// The duplicate power source.
        power_source: PowerSource,
        /// The instance ID it already holds.
        instance: u16,
    },

    /// The persistent configuration store reported a failure.
    #[error("config store rejected {key}: {status}")]
    ConfigStore {
        /// The store key that was written.
        key: &'static str,
        /// The status returned by the store.
        status: StoreStatus,
    },

    /// The resource is not one of the static resources kept in the
    /// configuration store.
    #[error("{0} is not a static resource")]
    NotStatic(ResourceKind),

    /// A stored value is not valid UTF-8.
    #[error("config store entry {key} is not valid UTF-8")]
    InvalidStoredValue {
        /// The store key that was read.
        key: &'static str,
    },

    /// The connection state machine does not allow this operation now.
    #[error("cannot {event} while {from}")]
    InvalidTransition {
        /// State the client was in.
        from: ConnectionState,
        /// The rejected event.
        event: ConnectionEvent,
    },

    /// The engine refused to set up the connection.
    #[error("engine setup failed")]
    SetupFailed,

    /// A value did not satisfy its constraints.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Client configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

fn describe(resource: ResourceKind, instance: Option<u16>) -> String {
    match instance {
        Some(instance) => format!("{resource} instance {instance}"),
        None => resource.to_string(),
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A numeric code does not name any known variant.
    #[error("unknown {kind} code {code}")]
    UnknownCode {
        /// What the code was meant to identify.
        kind: &'static str,
        /// The unrecognized code.
        code: i64,
    },

    /// A name does not match any known variant.
    #[error("unknown {kind} name {name:?}")]
    UnknownName {
        /// What the name was meant to identify.
        kind: &'static str,
        /// The unrecognized name.
        name: String,
    },

    /// A UTC offset string could not be parsed.
    #[error("invalid UTC offset: {0}")]
    InvalidUtcOffset(String),
}

/// Errors raised while loading a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field held an unusable value.
    #[error("invalid {field}: {message}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidUtcOffset("UTC+99".to_string()).into();
        assert!(matches!(err, Error::Value(ValueError::InvalidUtcOffset(_))));
    }

    #[test]
    fn resource_errors_name_the_instance() {
        let single = Error::SetFailed {
            resource: ResourceKind::BatteryLevel,
            instance: None,
        };
        assert_eq!(single.to_string(), "failed to set BatteryLevel");

        let multi = Error::CreateFailed {
            resource: ResourceKind::PowerSourceVoltage,
            instance: Some(2),
        };
        assert_eq!(
            multi.to_string(),
            "failed to create PowerSourceVoltage instance 2"
        );
    }

    #[test]
    fn config_store_error_display() {
        let err = Error::ConfigStore {
            key: "mbed.SerialNumber",
            status: StoreStatus::ValidationFail,
        };
        assert_eq!(
            err.to_string(),
            "config store rejected mbed.SerialNumber: validation failure"
        );
    }

    #[test]
    fn transition_error_display() {
        let err = Error::InvalidTransition {
            from: ConnectionState::Uninitialized,
            event: ConnectionEvent::Connect,
        };
        assert_eq!(err.to_string(), "cannot connect while uninitialized");
    }
}

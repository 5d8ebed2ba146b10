// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static catalog of the Device object resources.
//!
//! Each [`ResourceKind`] carries a fixed name, used both as the log label and,
//! for the static resources, as the configuration-store key. Its cardinality
//! and representation are documented here; the caller picks the matching
//! operation on [`ResourceEngine`](super::ResourceEngine).

use std::fmt;

/// Number of instances a resource may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one instance per device.
    Single,
    /// Zero or more independently created instances.
    Multi,
}

/// How a resource value is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// UTF-8 string.
    String,
    /// 64-bit signed integer.
    Integer,
    /// No payload, invocable action.
    Executable,
}

/// Resources of the LWM2M Device object (object ID 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Manufacturer (0).
    Manufacturer,
    /// Device Type (17).
    DeviceType,
    /// Model Number (1).
    ModelNumber,
    /// Serial Number (2).
    SerialNumber,
    /// Hardware Version (18).
    HardwareVersion,
    /// Firmware Version (3).
    FirmwareVersion,
    /// Software Version (19).
    SoftwareVersion,
    /// Reboot (4).
    Reboot,
    /// Factory Reset (5).
    FactoryReset,
    /// Available Power Sources (6).
    AvailablePowerSources,
    /// Power Source Voltage (7).
    PowerSourceVoltage,
    /// Power Source Current (8).
    PowerSourceCurrent,
    /// Battery Level (9).
    BatteryLevel,
    /// Battery Status (20).
    BatteryStatus,
    /// Memory Free (10).
    MemoryFree,
    /// Memory Total (21).
    MemoryTotal,
    /// Error Code (11).
    ErrorCode,
    /// Reset Error Code (12).
    ResetErrorCode,
    /// Current Time (13).
    CurrentTime,
    /// UTC Offset (14).
    UtcOffset,
    /// Timezone (15).
    Timezone,
    /// Supported Binding and Modes (16).
    SupportedBindingMode,
}

impl ResourceKind {
    /// Every resource in catalog order.
    pub const ALL: [Self; 22] = [
        Self::Manufacturer,
        Self::DeviceType,
        Self::ModelNumber,
        Self::SerialNumber,
        Self::HardwareVersion,
        Self::FirmwareVersion,
        Self::SoftwareVersion,
        Self::Reboot,
        Self::FactoryReset,
        Self::AvailablePowerSources,
        Self::PowerSourceVoltage,
        Self::PowerSourceCurrent,
        Self::BatteryLevel,
        Self::BatteryStatus,
        Self::MemoryFree,
        Self::MemoryTotal,
        Self::ErrorCode,
        Self::ResetErrorCode,
        Self::CurrentTime,
        Self::UtcOffset,
        Self::Timezone,
        Self::SupportedBindingMode,
    ];

    /// Returns the resource name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Manufacturer => "Manufacturer",
            Self::DeviceType => "DeviceType",
            Self::ModelNumber => "ModelNumber",
            Self::SerialNumber => "SerialNumber",
            Self::HardwareVersion => "HardwareVersion",
            Self::FirmwareVersion => "FirmwareVersion",
            Self::SoftwareVersion => "SoftwareVersion",
            Self::Reboot => "Reboot",
            Self::FactoryReset => "FactoryReset",
            Self::AvailablePowerSources => "AvailablePowerSources",
            Self::PowerSourceVoltage => "PowerSourceVoltage",
            Self::PowerSourceCurrent => "PowerSourceCurrent",
            Self::BatteryLevel => "BatteryLevel",
            Self::BatteryStatus => "BatteryStatus",
            Self::MemoryFree => "MemoryFree",
            Self::MemoryTotal => "MemoryTotalKB",
            Self::ErrorCode => "ErrorCode",
            Self::ResetErrorCode => "ResetErrorCode",
            Self::CurrentTime => "CurrentTime",
            Self::UtcOffset => "UTCOffset",
            Self::Timezone => "Timezone",
            Self::SupportedBindingMode => "SupportedBindingMode",
        }
    }

    /// Returns the key under which the resource is persisted in the
    /// configuration store.
    #[must_use]
    pub const fn store_key(&self) -> &'static str {
        match self {
            Self::Manufacturer => "mbed.Manufacturer",
            Self::DeviceType => "mbed.DeviceType",
            Self::ModelNumber => "mbed.ModelNumber",
            Self::SerialNumber => "mbed.SerialNumber",
            Self::HardwareVersion => "mbed.HardwareVersion",
            Self::FirmwareVersion => "mbed.FirmwareVersion",
            Self::SoftwareVersion => "mbed.SoftwareVersion",
            Self::Reboot => "mbed.Reboot",
            Self::FactoryReset => "mbed.FactoryReset",
            Self::AvailablePowerSources => "mbed.AvailablePowerSources",
            Self::PowerSourceVoltage => "mbed.PowerSourceVoltage",
            Self::PowerSourceCurrent => "mbed.PowerSourceCurrent",
            Self::BatteryLevel => "mbed.BatteryLevel",
            Self::BatteryStatus => "mbed.BatteryStatus",
            Self::MemoryFree => "mbed.MemoryFree",
            Self::MemoryTotal => "mbed.MemoryTotalKB",
            Self::ErrorCode => "mbed.ErrorCode",
            Self::ResetErrorCode => "mbed.ResetErrorCode",
            Self::CurrentTime => "mbed.CurrentTime",
            Self::UtcOffset => "mbed.UTCOffset",
            Self::Timezone => "mbed.Timezone",
            Self::SupportedBindingMode => "mbed.SupportedBindingMode",
        }
    }

    /// Returns the LWM2M resource ID within the Device object.
    #[must_use]
    pub const fn resource_id(&self) -> u16 {
        match self {
            Self::Manufacturer => 0,
            Self::ModelNumber => 1,
            Self::SerialNumber => 2,
            Self::FirmwareVersion => 3,
            Self::Reboot => 4,
            Self::FactoryReset => 5,
            Self::AvailablePowerSources => 6,
            Self::PowerSourceVoltage => 7,
            Self::PowerSourceCurrent => 8,
            Self::BatteryLevel => 9,
            Self::MemoryFree => 10,
            Self::ErrorCode => 11,
            Self::ResetErrorCode => 12,
            Self::CurrentTime => 13,
            Self::UtcOffset => 14,
            Self::Timezone => 15,
            Self::SupportedBindingMode => 16,
            Self::DeviceType => 17,
            Self::HardwareVersion => 18,
            Self::SoftwareVersion => 19,
            Self::BatteryStatus => 20,
            Self::MemoryTotal => 21,
        }
    }

    /// Returns the resource's cardinality.
    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        match self {
            Self::AvailablePowerSources
            | Self::PowerSourceVoltage
            | Self::PowerSourceCurrent
            | Self::ErrorCode => Cardinality::Multi,
            _ => Cardinality::Single,
        }
    }

    /// Returns how the resource value is represented.
    #[must_use]
    pub const fn representation(&self) -> Representation {
        match self {
            Self::Manufacturer
            | Self::DeviceType
            | Self::ModelNumber
            | Self::SerialNumber
            | Self::HardwareVersion
            | Self::FirmwareVersion
            | Self::SoftwareVersion
            | Self::UtcOffset
            | Self::Timezone
            | Self::SupportedBindingMode => Representation::String,
            Self::Reboot | Self::FactoryReset | Self::ResetErrorCode => Representation::Executable,
            Self::AvailablePowerSources
            | Self::PowerSourceVoltage
            | Self::PowerSourceCurrent
            | Self::BatteryLevel
            | Self::BatteryStatus
            | Self::MemoryFree
            | Self::MemoryTotal
            | Self::ErrorCode
            | Self::CurrentTime => Representation::Integer,
        }
    }

    /// Returns true for the resources kept in the configuration store
    /// rather than the live object tree.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(
            self,
            Self::DeviceType | Self::SerialNumber | Self::HardwareVersion | Self::SoftwareVersion
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_and_ids_are_unique() {
        let names: HashSet<_> = ResourceKind::ALL.iter().map(ResourceKind::name).collect();
        let ids: HashSet<_> = ResourceKind::ALL
            .iter()
            .map(ResourceKind::resource_id)
            .collect();
        assert_eq!(names.len(), ResourceKind::ALL.len());
        assert_eq!(ids.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn resource_ids_cover_device_object() {
        let mut ids: Vec<u16> = ResourceKind::ALL
            .iter()
            .map(ResourceKind::resource_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..=21).collect::<Vec<u16>>());
    }

    #[test]
    fn multi_instance_resources() {
        let multi: Vec<_> = ResourceKind::ALL
            .into_iter()
            .filter(|kind| kind.cardinality() == Cardinality::Multi)
            .collect();
        assert_eq!(
            multi,
            vec![
                ResourceKind::AvailablePowerSources,
                ResourceKind::PowerSourceVoltage,
                ResourceKind::PowerSourceCurrent,
                ResourceKind::ErrorCode,
            ]
        );
    }

    #[test]
    fn multi_instance_resources_are_integers() {
        for kind in ResourceKind::ALL {
            if kind.cardinality() == Cardinality::Multi {
                assert_eq!(kind.representation(), Representation::Integer);
            }
        }
    }

    #[test]
    fn static_resources_are_strings() {
        let statics: Vec<_> = ResourceKind::ALL
            .into_iter()
            .filter(ResourceKind::is_static)
            .collect();
        assert_eq!(statics.len(), 4);
        assert!(
            statics
                .iter()
                .all(|kind| kind.representation() == Representation::String)
        );
    }

    #[test]
    fn store_keys_carry_the_namespace() {
        for kind in ResourceKind::ALL {
            assert_eq!(
                kind.store_key().strip_prefix("mbed."),
                Some(kind.name()),
                "{kind}"
            );
        }
        assert_eq!(ResourceKind::SerialNumber.store_key(), "mbed.SerialNumber");
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(ResourceKind::MemoryTotal.to_string(), "MemoryTotalKB");
        assert_eq!(ResourceKind::UtcOffset.to_string(), "UTCOffset");
    }
}

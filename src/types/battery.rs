// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Battery level and status values.

use std::fmt;

use crate::error::ValueError;

/// Battery charge as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use lwdm_lib::types::BatteryLevel;
///
/// let level = BatteryLevel::new(80).unwrap();
/// assert_eq!(level.value(), 80);
///
/// assert!(BatteryLevel::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// Empty battery.
    pub const EMPTY: Self = Self(0);

    /// Fully charged battery.
    pub const FULL: Self = Self(100);

    /// Creates a new battery level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `percent` exceeds 100.
    pub fn new(percent: u8) -> Result<Self, ValueError> {
        if percent > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(percent),
            });
        }
        Ok(Self(percent))
    }

    /// Creates a battery level, clamping to 100.
    #[must_use]
    pub fn clamped(percent: u8) -> Self {
        Self(percent.min(100))
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BatteryLevel {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Battery status as defined by the LWM2M Device object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryStatus {
    /// Battery is operating normally.
    Normal,
    /// Battery is charging.
    Charging,
    /// Charging has completed.
    ChargingComplete,
    /// Battery has a fault.
    Fault,
    /// Battery is low.
    LowBattery,
    /// No battery is installed.
    NotPresent,
    /// Status is unknown.
    Unknown,
}

impl BatteryStatus {
    /// Returns the LWM2M code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Charging => 1,
            Self::ChargingComplete => 2,
            Self::Fault => 3,
            Self::LowBattery => 4,
            Self::NotPresent => 5,
            Self::Unknown => 6,
        }
    }

    /// Looks up a status by its LWM2M code.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownCode` for codes above 6.
    pub fn from_code(code: i64) -> Result<Self, ValueError> {
        Ok(match code {
            0 => Self::Normal,
            1 => Self::Charging,
            2 => Self::ChargingComplete,
            3 => Self::Fault,
            4 => Self::LowBattery,
            5 => Self::NotPresent,
            6 => Self::Unknown,
            _ => {
                return Err(ValueError::UnknownCode {
                    kind: "battery status",
                    code,
                });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_level_bounds() {
        assert_eq!(BatteryLevel::new(0).unwrap(), BatteryLevel::EMPTY);
        assert_eq!(BatteryLevel::new(100).unwrap(), BatteryLevel::FULL);
        assert_eq!(
            BatteryLevel::new(120),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: 120
            })
        );
    }

    #[test]
    fn battery_level_clamped() {
        assert_eq!(BatteryLevel::clamped(250).value(), 100);
        assert_eq!(BatteryLevel::clamped(42).value(), 42);
    }

    #[test]
    fn battery_level_display() {
        assert_eq!(BatteryLevel::clamped(80).to_string(), "80%");
    }

    #[test]
    fn battery_status_codes() {
        assert_eq!(BatteryStatus::Normal.code(), 0);
        assert_eq!(BatteryStatus::Unknown.code(), 6);
        assert_eq!(
            BatteryStatus::from_code(4).unwrap(),
            BatteryStatus::LowBattery
        );
        assert!(BatteryStatus::from_code(7).is_err());
    }
}

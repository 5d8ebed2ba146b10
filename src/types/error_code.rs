// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device error codes reported through the Error Code resource.

use crate::error::ValueError;

/// Error code values defined by the LWM2M Device object.
///
/// Only a single error code is reported at a time (instance 0 of the
/// multi-instance Error Code resource).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceErrorCode {
    /// No error.
    #[default]
    None,
    /// Low battery power.
    LowBattery,
    /// External power supply off.
    NoExternalPower,
    /// GPS module failure.
    GpsFailure,
    /// Low received signal strength.
    LowReceivedSignal,
    /// Out of memory.
    OutOfMemory,
    /// SMS failure.
    SmsFailure,
    /// IP connectivity failure.
    IpConnectivityFailure,
    /// Peripheral malfunction.
    PeripheralFailure,
}

impl DeviceErrorCode {
    /// Returns the LWM2M code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::LowBattery => 1,
            Self::NoExternalPower => 2,
            Self::GpsFailure => 3,
            Self::LowReceivedSignal => 4,
            Self::OutOfMemory => 5,
            Self::SmsFailure => 6,
            Self::IpConnectivityFailure => 7,
            Self::PeripheralFailure => 8,
        }
    }

    /// Looks up an error code by value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownCode` for codes above 8.
    pub fn from_code(code: i64) -> Result<Self, ValueError> {
        Ok(match code {
            0 => Self::None,
            1 => Self::LowBattery,
            2 => Self::NoExternalPower,
            3 => Self::GpsFailure,
            4 => Self::LowReceivedSignal,
            5 => Self::OutOfMemory,
            6 => Self::SmsFailure,
            7 => Self::IpConnectivityFailure,
            8 => Self::PeripheralFailure,
            _ => {
                return Err(ValueError::UnknownCode {
                    kind: "device error",
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
    fn codes_are_contiguous() {
        for code in 0..=8 {
            assert_eq!(DeviceErrorCode::from_code(code).unwrap().code(), code);
        }
        assert!(DeviceErrorCode::from_code(9).is_err());
    }

    #[test]
    fn default_is_none() {
        assert_eq!(DeviceErrorCode::default(), DeviceErrorCode::None);
    }
}

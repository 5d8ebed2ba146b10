// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power source kinds of the LWM2M Device object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A logical supply type registered against the Available Power Sources,
/// Power Source Voltage and Power Source Current resources.
///
/// The numeric codes are the ones defined by the OMA LWM2M Device object
/// (code 3 is not used).
///
/// # Examples
///
/// ```
/// use lwdm_lib::types::PowerSource;
///
/// assert_eq!(PowerSource::Usb.code(), 5);
/// assert_eq!(PowerSource::from_code(7).unwrap(), PowerSource::Solar);
/// assert!(PowerSource::from_code(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSource {
    /// DC power.
    Dc,
    /// Internal battery.
    InternalBattery,
    /// External battery.
    ExternalBattery,
    /// Power over Ethernet.
    #[serde(rename = "poe")]
    PoE,
    /// USB.
    Usb,
    /// AC mains.
    Mains,
    /// Solar.
    Solar,
}

impl PowerSource {
    /// All power sources, in code order.
    pub const ALL: [Self; 7] = [
        Self::Dc,
        Self::InternalBattery,
        Self::ExternalBattery,
        Self::PoE,
        Self::Usb,
        Self::Mains,
        Self::Solar,
    ];

    /// Returns the LWM2M code written to the Available Power Sources resource.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Dc => 0,
            Self::InternalBattery => 1,
            Self::ExternalBattery => 2,
            Self::PoE => 4,
            Self::Usb => 5,
            Self::Mains => 6,
            Self::Solar => 7,
        }
    }

    /// Looks up a power source by its LWM2M code.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownCode` for codes outside the table.
    pub fn from_code(code: i64) -> Result<Self, ValueError> {
        Self::ALL
            .into_iter()
            .find(|source| source.code() == code)
            .ok_or(ValueError::UnknownCode {
                kind: "power source",
                code,
            })
    }

    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dc => "DC",
            Self::InternalBattery => "INTERNAL_BATTERY",
            Self::ExternalBattery => "EXTERNAL_BATTERY",
            Self::PoE => "POE",
            Self::Usb => "USB",
            Self::Mains => "MAINS",
            Self::Solar => "SOLAR",
        }
    }
}

impl fmt::Display for PowerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerSource {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == upper)
            .ok_or_else(|| ValueError::UnknownName {
                kind: "power source",
                name: s.to_string(),
            })
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UTC offset in the `UTC+X` form written to the UTC Offset resource.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use crate::error::ValueError;

/// A UTC offset, formatted the way the Device object expects it
/// (`UTC+X`, `UTC-X:30`, `UTC+0`).
///
/// # Examples
///
/// ```
/// use chrono::FixedOffset;
/// use lwdm_lib::types::UtcOffset;
///
/// let offset = UtcOffset::from(FixedOffset::east_opt(2 * 3600).unwrap());
/// assert_eq!(offset.to_string(), "UTC+2");
///
/// let parsed: UtcOffset = "UTC-5:30".parse().unwrap();
/// assert_eq!(parsed.seconds(), -(5 * 3600 + 30 * 60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset(FixedOffset);

impl UtcOffset {
    /// Zero offset.
    #[must_use]
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    /// Creates an offset from seconds east of UTC.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the offset is a day or more.
    pub fn from_seconds(seconds: i32) -> Result<Self, ValueError> {
        FixedOffset::east_opt(seconds)
            .map(Self)
            .ok_or(ValueError::OutOfRange {
                min: -86_399,
                max: 86_399,
                actual: i64::from(seconds),
            })
    }

    /// Returns the offset in seconds east of UTC.
    #[must_use]
    pub fn seconds(&self) -> i32 {
        self.0.local_minus_utc()
    }

    /// Returns the underlying chrono offset.
    #[must_use]
    pub fn as_fixed_offset(&self) -> FixedOffset {
        self.0
    }
}

impl From<FixedOffset> for UtcOffset {
    fn from(offset: FixedOffset) -> Self {
        Self(offset)
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.seconds();
        let sign = if seconds < 0 { '-' } else { '+' };
        let abs = seconds.unsigned_abs();
        let hours = abs / 3600;
        let minutes = (abs % 3600) / 60;
        if minutes == 0 {
            write!(f, "UTC{sign}{hours}")
        } else {
            write!(f, "UTC{sign}{hours}:{minutes:02}")
        }
    }
}

impl FromStr for UtcOffset {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidUtcOffset(s.to_string());

        let rest = s.trim().strip_prefix("UTC").ok_or_else(invalid)?;
        if rest.is_empty() {
            return Ok(Self::utc());
        }

        let (sign, body) = match rest.as_bytes()[0] {
            b'+' => (1, &rest[1..]),
            b'-' => (-1, &rest[1..]),
            _ => return Err(invalid()),
        };

        let (hours, minutes) = match body.split_once(':') {
            Some((h, m)) => (h, m),
            None => (body, "0"),
        };
        let hours = parse_digits(hours).ok_or_else(invalid)?;
        let minutes = parse_digits(minutes).ok_or_else(invalid)?;
        if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        Self::from_seconds(sign * (hours * 3600 + minutes * 60)).map_err(|_| invalid())
    }
}

/// Parses a non-empty run of ASCII digits, with no sign.
fn parse_digits(text: &str) -> Option<i32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

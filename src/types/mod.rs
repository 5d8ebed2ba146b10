// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types written to the LWM2M Device object.
//!
//! Each type maps onto the numeric or string encoding the Device object
//! defines for its resource, and constrained types check their range at
//! construction time.
//!
//! # Types
//!
//! - [`PowerSource`] - Supply kinds for Available Power Sources
//! - [`BatteryLevel`] - Battery charge (0-100%)
//! - [`BatteryStatus`] - Battery status codes (0-6)
//! - [`DeviceErrorCode`] - Error Code values (0-8)
//! - [`UtcOffset`] - `UTC+X` offsets

mod battery;
mod error_code;
mod power_source;
mod utc_offset;

pub use battery::{BatteryLevel, BatteryStatus};
pub use error_code::DeviceErrorCode;
pub use power_source::PowerSource;
pub use utc_offset::UtcOffset;

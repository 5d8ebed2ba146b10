// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `lwdm` Lib - A Rust facade for the LWM2M Device object.
//!
//! This library manages the Device object (object 3) that a constrained
//! endpoint exposes to its device-management server, on top of an opaque
//! device-management engine and a persistent configuration store.
//!
//! # Supported Features
//!
//! - **Resource lifecycle**: create, upsert and delete typed resources
//!   (string, integer, multi-instance integer, executable)
//! - **Power sources**: a fixed-size slot table mapping power-source kinds
//!   to instance IDs, with transactional add and delete
//! - **Static resources**: device type, serial number, hardware and software
//!   version written to the configuration store
//! - **Connection lifecycle**: start, connect, registration events and a
//!   stop that waits for deregistration up to a timeout
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use lwdm_lib::DeviceClient;
//! use lwdm_lib::memory::{MemoryConfigStore, MemoryEngine};
//! use lwdm_lib::types::{BatteryStatus, PowerSource};
//!
//! # fn main() -> lwdm_lib::Result<()> {
//! let engine = Arc::new(MemoryEngine::new());
//! let client = DeviceClient::builder(engine.clone(), Arc::new(MemoryConfigStore::new()))
//!     .on_registered(|| println!("registered"))
//!     .stop_timeout(Duration::from_millis(100))
//!     .build()?;
//!
//! // Before start, setters create their resources.
//! client.set_static_serial_number("SN-0001")?;
//! client.set_firmware_version("1.2.0")?;
//! client.add_power_source(PowerSource::Usb)?;
//! client.set_power_source_voltage(PowerSource::Usb, 5000)?;
//! client.set_battery_status(BatteryStatus::Normal)?;
//!
//! client.start()?;
//! client.connect(())?;
//!
//! // The engine reports registration from its own context.
//! engine.simulate_registered();
//! assert!(client.is_connected());
//!
//! client.stop()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Engines and stores
//!
//! Real deployments implement [`engine::DmEngine`], [`object::DeviceObject`]
//! and [`store::ConfigStore`] over their platform. The [`memory`] module
//! provides in-process implementations for host builds and tests.

/// Emits a `tracing` event only when the client's debug flag is set.
macro_rules! debug_log {
    ($enabled:expr, $level:ident, $($arg:tt)+) => {
        if $enabled {
            tracing::$level!($($arg)+);
        }
    };
}

pub mod client;
pub mod connection;
pub mod engine;
pub mod error;
pub mod memory;
pub mod object;
pub mod registry;
pub mod resource;
pub mod store;
pub mod types;

pub use client::{ClientConfig, DeviceClient, DeviceClientBuilder, StopOutcome};
pub use connection::{ConnectionEvent, ConnectionState, UserCallbacks};
pub use engine::{DmEngine, EndpointInfo, EngineErrorCode};
pub use error::{ConfigError, Error, Result, ValueError};
pub use object::{DeviceObject, Lwm2mObject};
pub use registry::{MAX_POWER_SOURCE_SLOTS, PowerSourceRegistry};
pub use resource::{Cardinality, Representation, ResourceEngine, ResourceKind, ResourceValue, Upsert};
pub use store::{ConfigBridge, ConfigStore, StoreStatus};
pub use types::{BatteryLevel, BatteryStatus, DeviceErrorCode, PowerSource, UtcOffset};

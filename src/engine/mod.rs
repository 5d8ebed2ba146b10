// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device-management engine seam.
//!
//! The engine runs the LWM2M registration handshake, the secure transport
//! and the CoAP encoding. This crate drives it through [`DmEngine`] and
//! receives its lifecycle events through the three handlers installed at
//! start: registered, unregistered and error.

mod error_code;

pub use error_code::{EngineErrorCode, UNKNOWN_ERROR};

use std::sync::Arc;

use crate::object::{DeviceObject, Lwm2mObject};

/// Handler for the registered and unregistered events.
pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// Handler for the error event, receiving the engine's raw error code.
pub type ErrorHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Handler for firmware-update progress (bytes received, total bytes).
#[cfg(feature = "update")]
pub type UpdateProgressHandler = Arc<dyn Fn(u32, u32) + Send + Sync>;

/// Identity of the registered endpoint, as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointInfo {
    /// Endpoint name presented to the server.
    pub endpoint_name: String,
    /// Internal endpoint name, the device ID assigned by the server.
    pub internal_endpoint_name: String,
}

/// A device-management protocol engine.
///
/// Handlers are invoked from the engine's own execution context, which may
/// run concurrently with the caller's thread.
pub trait DmEngine: Send + Sync + 'static {
    /// The engine's Device object implementation.
    type Object: DeviceObject + 'static;

    /// Network handle passed to [`setup`](Self::setup).
    type Transport;

    /// Returns the Device object singleton, if the engine can supply it.
    fn device_object(&self) -> Option<Arc<Self::Object>>;

    /// Registers additional objects alongside the Device object.
    fn add_objects(&self, objects: &[Arc<dyn Lwm2mObject>]);

    /// Installs the handler for completed registration.
    fn on_registered(&self, handler: EventHandler);

    /// Installs the handler for completed deregistration.
    fn on_unregistered(&self, handler: EventHandler);

    /// Installs the handler for engine errors.
    fn on_error(&self, handler: ErrorHandler);

    /// Installs a firmware-update progress handler.
    #[cfg(feature = "update")]
    fn set_update_progress_handler(&self, handler: UpdateProgressHandler) {
        let _ = handler;
    }

    /// Starts connecting and registering over `transport`.
    ///
    /// Returns whether the engine accepted the setup.
    fn setup(&self, transport: Self::Transport) -> bool;

    /// Starts deregistration; completion is signalled by the unregistered
    /// handler.
    fn close(&self);

    /// Keeps the transport link alive.
    fn keep_alive(&self);

    /// Returns the registered endpoint identity, if known.
    fn endpoint_info(&self) -> Option<EndpointInfo>;

    /// Returns a description of the last error, if the engine keeps one.
    fn error_description(&self) -> Option<String> {
        None
    }
}

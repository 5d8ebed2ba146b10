// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

#[cfg(feature = "update")]
use crate::engine::UpdateProgressHandler;
use crate::engine::{DmEngine, EndpointInfo, ErrorHandler, EventHandler};
use crate::object::Lwm2mObject;

use super::MemoryDeviceObject;

/// What [`MemoryEngine`] does when the client closes the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseBehavior {
    /// Never report deregistration.
    #[default]
    Silent,
    /// Report deregistration from within `close`.
    Deregister,
    /// Report deregistration from another thread after a delay.
    DeregisterAfter(Duration),
}

/// One journaled engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `add_objects` with the names of the objects handed over.
    AddObjects(Vec<String>),
    /// `setup`
    Setup,
    /// `close`
    Close,
    /// `keep_alive`
    KeepAlive,
}

#[derive(Default)]
struct Handlers {
    registered: Option<EventHandler>,
    unregistered: Option<EventHandler>,
    error: Option<ErrorHandler>,
    #[cfg(feature = "update")]
    update_progress: Option<UpdateProgressHandler>,
}

struct EngineState {
    calls: Vec<EngineCall>,
    accept_setup: bool,
    close_behavior: CloseBehavior,
    endpoint: Option<EndpointInfo>,
    last_error: Option<String>,
}

/// An in-process device-management engine.
///
/// Nothing goes on the wire: registration, deregistration and errors are
/// triggered by the `simulate_*` methods, which invoke the installed
/// handlers exactly like a real engine's processing context would.
pub struct MemoryEngine {
    object: Option<Arc<MemoryDeviceObject>>,
    handlers: Arc<Mutex<Handlers>>,
    state: Mutex<EngineState>,
}

impl MemoryEngine {
    /// Creates an engine with a fresh Device object.
    #[must_use]
    pub fn new() -> Self {
        Self::with_object(Some(Arc::new(MemoryDeviceObject::new())))
    }

    /// Creates an engine that cannot supply a Device object.
    #[must_use]
    pub fn without_device_object() -> Self {
        Self::with_object(None)
    }

    fn with_object(object: Option<Arc<MemoryDeviceObject>>) -> Self {
        Self {
            object,
            handlers: Arc::new(Mutex::new(Handlers::default())),
            state: Mutex::new(EngineState {
                calls: Vec::new(),
                accept_setup: true,
                close_behavior: CloseBehavior::default(),
                endpoint: Some(EndpointInfo {
                    endpoint_name: "lwdm-memory".to_string(),
                    internal_endpoint_name: "memory-0".to_string(),
                }),
                last_error: None,
            }),
        }
    }

    /// Returns the Device object, for inspecting its journal.
    #[must_use]
    pub fn object(&self) -> Option<&Arc<MemoryDeviceObject>> {
        self.object.as_ref()
    }

    /// Makes `setup` report rejection (or acceptance again).
    pub fn set_accept_setup(&self, accept: bool) {
        self.state.lock().accept_setup = accept;
    }

    /// Chooses how `close` reports deregistration.
    pub fn set_close_behavior(&self, behavior: CloseBehavior) {
        self.state.lock().close_behavior = behavior;
    }

    /// Replaces the endpoint identity reported after registration.
    pub fn set_endpoint(&self, endpoint: Option<EndpointInfo>) {
        self.state.lock().endpoint = endpoint;
    }

    /// Returns the journal of engine calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().calls.clone()
    }

    /// Returns true once all three lifecycle handlers are installed.
    #[must_use]
    pub fn handlers_installed(&self) -> bool {
        let handlers = self.handlers.lock();
        handlers.registered.is_some() && handlers.unregistered.is_some() && handlers.error.is_some()
    }

    /// Returns true if an update progress handler is installed.
    #[cfg(feature = "update")]
    #[must_use]
    pub fn update_handler_installed(&self) -> bool {
        self.handlers.lock().update_progress.is_some()
    }

    /// Fires the registered handler.
    pub fn simulate_registered(&self) {
        let handler = self.handlers.lock().registered.clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Fires the unregistered handler.
    pub fn simulate_deregistered(&self) {
        fire_unregistered(&self.handlers);
    }

    /// Records `description` and fires the error handler with `code`.
    pub fn simulate_error(&self, code: i32, description: Option<&str>) {
        self.state.lock().last_error = description.map(str::to_string);
        let handler = self.handlers.lock().error.clone();
        if let Some(handler) = handler {
            handler(code);
        }
    }

    /// Fires the update progress handler.
    #[cfg(feature = "update")]
    pub fn simulate_update_progress(&self, received: u32, total: u32) {
        let handler = self.handlers.lock().update_progress.clone();
        if let Some(handler) = handler {
            handler(received, total);
        }
    }

    fn record(&self, call: EngineCall) {
        self.state.lock().calls.push(call);
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn fire_unregistered(handlers: &Mutex<Handlers>) {
    let handler = handlers.lock().unregistered.clone();
    if let Some(handler) = handler {
        handler();
    }
}

impl DmEngine for MemoryEngine {
    type Object = MemoryDeviceObject;
    type Transport = ();

    fn device_object(&self) -> Option<Arc<MemoryDeviceObject>> {
        self.object.clone()
    }

    fn add_objects(&self, objects: &[Arc<dyn Lwm2mObject>]) {
        let names = objects.iter().map(|o| o.name().to_string()).collect();
        self.record(EngineCall::AddObjects(names));
    }

    fn on_registered(&self, handler: EventHandler) {
        self.handlers.lock().registered = Some(handler);
    }

    fn on_unregistered(&self, handler: EventHandler) {
        self.handlers.lock().unregistered = Some(handler);
    }

    fn on_error(&self, handler: ErrorHandler) {
        self.handlers.lock().error = Some(handler);
    }

    #[cfg(feature = "update")]
    fn set_update_progress_handler(&self, handler: UpdateProgressHandler) {
        self.handlers.lock().update_progress = Some(handler);
    }

    fn setup(&self, (): ()) -> bool {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Setup);
        state.accept_setup
    }

    fn close(&self) {
        let behavior = {
            let mut state = self.state.lock();
            state.calls.push(EngineCall::Close);
            state.close_behavior
        };
        match behavior {
            CloseBehavior::Silent => {}
            CloseBehavior::Deregister => fire_unregistered(&self.handlers),
            CloseBehavior::DeregisterAfter(delay) => {
                let handlers = Arc::clone(&self.handlers);
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    fire_unregistered(&handlers);
                });
            }
        }
    }

    fn keep_alive(&self) {
        self.record(EngineCall::KeepAlive);
    }

    fn endpoint_info(&self) -> Option<EndpointInfo> {
        self.state.lock().endpoint.clone()
    }

    fn error_description(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }
}

impl std::fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("object", &self.object)
            .field("handlers_installed", &self.handlers_installed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn close_can_deregister_synchronously() {
        let engine = MemoryEngine::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        engine.on_unregistered(Arc::new(move || {
            f.fetch_add(1, Ordering::SeqCst);
        }));

        engine.close();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        engine.set_close_behavior(CloseBehavior::Deregister);
        engine.close();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(engine.calls(), vec![EngineCall::Close, EngineCall::Close]);
    }

    #[test]
    fn setup_result_is_configurable() {
        let engine = MemoryEngine::new();
        assert!(engine.setup(()));
        engine.set_accept_setup(false);
        assert!(!engine.setup(()));
    }

    #[test]
    fn without_device_object() {
        assert!(MemoryEngine::without_device_object().device_object().is_none());
        assert!(MemoryEngine::new().device_object().is_some());
    }
}

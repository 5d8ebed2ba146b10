// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device-management client facade.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::connection::{ConnectionEvent, ConnectionMonitor, ConnectionState, UserCallbacks};
use crate::engine::DmEngine;
use crate::error::{Error, Result};
use crate::object::Lwm2mObject;
use crate::registry::PowerSourceRegistry;
use crate::resource::{ResourceEngine, ResourceKind, Upsert};
use crate::store::{ConfigBridge, ConfigStore};
use crate::types::{BatteryLevel, BatteryStatus, DeviceErrorCode, PowerSource, UtcOffset};

use super::{ClientConfig, DeviceClientBuilder, StopOutcome};

/// The three multi-instance resources describing one power source, in
/// creation order.
const POWER_SOURCE_RESOURCES: [ResourceKind; 3] = [
    ResourceKind::AvailablePowerSources,
    ResourceKind::PowerSourceVoltage,
    ResourceKind::PowerSourceCurrent,
];

/// Facade over a device-management engine's Device object.
///
/// Setters called before [`start`](Self::start) create their resource when
/// it does not exist yet; after start they only update it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use lwdm_lib::{DeviceClient, StopOutcome};
/// use lwdm_lib::memory::{MemoryConfigStore, MemoryEngine};
/// use lwdm_lib::types::{BatteryLevel, PowerSource};
///
/// # fn main() -> lwdm_lib::Result<()> {
/// let engine = Arc::new(MemoryEngine::new());
/// let client = DeviceClient::builder(engine.clone(), Arc::new(MemoryConfigStore::new()))
///     .stop_timeout(Duration::from_millis(50))
///     .build()?;
///
/// let instance = client.add_power_source(PowerSource::InternalBattery)?;
/// assert_eq!(instance, 0);
/// client.set_battery_level(BatteryLevel::new(80)?)?;
///
/// client.start()?;
/// client.connect(())?;
/// engine.simulate_registered();
/// assert!(client.is_connected());
///
/// assert_eq!(client.stop()?, StopOutcome::TimedOut);
/// assert!(client.power_sources().is_empty());
/// # Ok(())
/// # }
/// ```
pub struct DeviceClient<E: DmEngine, S: ConfigStore> {
    engine: Arc<E>,
    resources: ResourceEngine<E::Object>,
    bridge: ConfigBridge<S>,
    registry: Mutex<PowerSourceRegistry>,
    monitor: Arc<ConnectionMonitor>,
    pending_objects: Mutex<Vec<Arc<dyn Lwm2mObject>>>,
    config: ClientConfig,
}

impl<E: DmEngine, S: ConfigStore> DeviceClient<E, S> {
    /// Starts building a client over `engine` and `store`.
    #[must_use]
    pub fn builder(engine: Arc<E>, store: Arc<S>) -> DeviceClientBuilder<E, S> {
        DeviceClientBuilder::new(engine, store)
    }

    pub(crate) fn from_parts(
        engine: Arc<E>,
        store: Arc<S>,
        config: ClientConfig,
        callbacks: UserCallbacks,
    ) -> Result<Self> {
        let debug = config.debug;
        let registry = PowerSourceRegistry::with_capacity(config.power_source_slots)?;
        let object = engine.device_object();
        if object.is_none() {
            debug_log!(debug, warn, "Engine supplied no Device object");
        }

        Ok(Self {
            resources: ResourceEngine::new(object, debug),
            bridge: ConfigBridge::new(store, debug),
            registry: Mutex::new(registry),
            monitor: Arc::new(ConnectionMonitor::new(callbacks, debug)),
            pending_objects: Mutex::new(Vec::new()),
            engine,
            config,
        })
    }

    // ========== Accessors ==========

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the engine.
    #[must_use]
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Returns the resource operations on the Device object.
    #[must_use]
    pub fn resources(&self) -> &ResourceEngine<E::Object> {
        &self.resources
    }

    /// Returns the bridge to the configuration store.
    #[must_use]
    pub fn config_store(&self) -> &ConfigBridge<S> {
        &self.bridge
    }

    /// Returns the registered power sources as (instance ID, power source)
    /// pairs.
    #[must_use]
    pub fn power_sources(&self) -> Vec<(u16, PowerSource)> {
        self.registry.lock().occupied()
    }

    // ========== Lifecycle ==========

    /// Queues an additional LWM2M object, handed to the engine by
    /// [`start`](Self::start).
    ///
    /// Objects added after start are not handed over and are dropped.
    pub fn add_object(&self, object: Arc<dyn Lwm2mObject>) {
        if self.state().is_started() {
            debug_log!(
                self.config.debug,
                warn,
                object = object.name(),
                "Client already started, object not added"
            );
            return;
        }
        debug_log!(
            self.config.debug,
            info,
            object = object.name(),
            object_id = object.object_id(),
            "Adding object to the client's list"
        );
        self.pending_objects.lock().push(object);
    }

    /// Hands the queued objects to the engine and installs the lifecycle
    /// handlers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the client is
    /// uninitialized.
    pub fn start(&self) -> Result<()> {
        self.monitor.apply(ConnectionEvent::Start)?;

        let objects = std::mem::take(&mut *self.pending_objects.lock());
        self.engine.add_objects(&objects);
        self.install_handlers();
        Ok(())
    }

    fn install_handlers(&self) {
        let monitor = Arc::clone(&self.monitor);
        let engine = Arc::downgrade(&self.engine);
        self.engine.on_registered(Arc::new(move || {
            let endpoint = engine.upgrade().and_then(|engine| engine.endpoint_info());
            monitor.registered(endpoint);
        }));

        let monitor = Arc::clone(&self.monitor);
        self.engine
            .on_unregistered(Arc::new(move || monitor.deregistered()));

        let monitor = Arc::clone(&self.monitor);
        let engine = Arc::downgrade(&self.engine);
        self.engine.on_error(Arc::new(move |code| {
            let description = engine
                .upgrade()
                .and_then(|engine| engine.error_description());
            monitor.error(code, description);
        }));

        #[cfg(feature = "update")]
        if let Some(handler) = self.monitor.callbacks().update_progress() {
            self.engine.set_update_progress_handler(handler);
        }
    }

    /// Connects to the server over `transport`.
    ///
    /// Registration completes asynchronously; watch
    /// [`is_connected`](Self::is_connected) or
    /// [`wait_registered`](Self::wait_registered).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] before start or after stop, and
    /// [`Error::SetupFailed`] if the engine rejects the setup.
    pub fn connect(&self, transport: E::Transport) -> Result<()> {
        self.monitor.apply(ConnectionEvent::Connect)?;
        if self.engine.setup(transport) {
            return Ok(());
        }

        debug_log!(self.config.debug, warn, "Engine setup failed");
        if let Err(e) = self.monitor.apply(ConnectionEvent::ConnectFailed) {
            tracing::debug!(error = %e, "Connection state moved during setup");
        }
        Err(Error::SetupFailed)
    }

    /// Deregisters, then removes every power source.
    ///
    /// Blocks until the engine reports deregistration or the configured
    /// stop timeout elapses. Either way the power-source resources are
    /// deleted, the registry is emptied and the client ends up stopped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if the client is already stopped.
    pub fn stop(&self) -> Result<StopOutcome> {
        let state = self.state();
        if state == ConnectionState::Stopped {
            return Err(Error::InvalidTransition {
                from: state,
                event: ConnectionEvent::Stop,
            });
        }

        if state.is_started() {
            self.engine.close();
        }
        let outcome = if state.is_registered() {
            if self.monitor.wait_for_deregistration(self.config.stop_timeout()) {
                StopOutcome::Deregistered
            } else {
                debug_log!(
                    self.config.debug,
                    warn,
                    timeout_ms = self.config.stop_timeout_ms,
                    "Timed out waiting for deregistration"
                );
                StopOutcome::TimedOut
            }
        } else {
            StopOutcome::NotRegistered
        };

        self.remove_all_power_sources();
        self.monitor.apply(ConnectionEvent::Stop)?;
        Ok(outcome)
    }

    fn remove_all_power_sources(&self) {
        let mut registry = self.registry.lock();
        for (instance, source) in registry.occupied() {
            for resource in POWER_SOURCE_RESOURCES {
                if let Err(e) = self.resources.delete_instance(resource, instance) {
                    tracing::debug!(error = %e, %source, "Ignoring delete failure during stop");
                }
            }
        }
        registry.clear();
    }

    /// Keeps the transport link up.
    pub fn keep_alive(&self) {
        self.engine.keep_alive();
    }

    /// Returns true while registered with the server.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state().is_registered()
    }

    /// Returns the connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.monitor.state()
    }

    /// Subscribes to connection state changes.
    #[must_use]
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.monitor.subscribe()
    }

    /// Waits until the client is registered, for at most `timeout`.
    ///
    /// Returns false on timeout.
    pub async fn wait_registered(&self, timeout: Duration) -> bool {
        let mut receiver = self.monitor.subscribe();
        matches!(
            tokio::time::timeout(timeout, receiver.wait_for(ConnectionState::is_registered)).await,
            Ok(Ok(_))
        )
    }

    fn upsert(&self) -> Upsert {
        if self.state().is_started() {
            Upsert::SetOnly
        } else {
            Upsert::CreateMissing
        }
    }

    // ========== Static resources (config store) ==========

    /// Stores the Device Type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigStore`] if the store rejects the write.
    pub fn set_static_device_type(&self, device_type: &str) -> Result<()> {
        self.bridge.set(ResourceKind::DeviceType, device_type)
    }

    /// Stores the Serial Number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigStore`] if the store rejects the write.
    pub fn set_static_serial_number(&self, serial_number: &str) -> Result<()> {
        self.bridge.set(ResourceKind::SerialNumber, serial_number)
    }

    /// Stores the Hardware Version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigStore`] if the store rejects the write.
    pub fn set_static_hardware_version(&self, hardware_version: &str) -> Result<()> {
        self.bridge.set(ResourceKind::HardwareVersion, hardware_version)
    }

    /// Stores the Software Version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigStore`] if the store rejects the write.
    pub fn set_static_software_version(&self, software_version: &str) -> Result<()> {
        self.bridge.set(ResourceKind::SoftwareVersion, software_version)
    }

    // ========== Device object resources ==========

    /// Sets the Firmware Version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_firmware_version(&self, firmware_version: &str) -> Result<()> {
        self.resources
            .set_string(ResourceKind::FirmwareVersion, firmware_version, self.upsert())
    }

    /// Sets the UTC Offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_utc_offset(&self, offset: UtcOffset) -> Result<()> {
        self.set_utc_offset_str(&offset.to_string())
    }

    /// Sets the UTC Offset from an already formatted string, e.g. `UTC+5:45`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_utc_offset_str(&self, offset: &str) -> Result<()> {
        self.resources
            .set_string(ResourceKind::UtcOffset, offset, self.upsert())
    }

    /// Sets the IANA Timezone, e.g. `Europe/London`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_timezone(&self, timezone: &str) -> Result<()> {
        self.resources
            .set_string(ResourceKind::Timezone, timezone, self.upsert())
    }

    /// Sets the Battery Level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_battery_level(&self, level: BatteryLevel) -> Result<()> {
        self.resources.set_int(
            ResourceKind::BatteryLevel,
            i64::from(level.value()),
            self.upsert(),
        )
    }

    /// Sets the Battery Status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_battery_status(&self, status: BatteryStatus) -> Result<()> {
        self.resources
            .set_int(ResourceKind::BatteryStatus, status.code(), self.upsert())
    }

    /// Sets Memory Total, in kilobytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_memory_total(&self, kilobytes: i64) -> Result<()> {
        self.resources
            .set_int(ResourceKind::MemoryTotal, kilobytes, self.upsert())
    }

    /// Sets Memory Free, in kilobytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_memory_free(&self, kilobytes: i64) -> Result<()> {
        self.resources
            .set_int(ResourceKind::MemoryFree, kilobytes, self.upsert())
    }

    /// Sets the Error Code (instance 0).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`], [`Error::CreateFailed`] or
    /// [`Error::SetFailed`].
    pub fn set_error_code(&self, code: DeviceErrorCode) -> Result<()> {
        self.resources
            .set_instance(ResourceKind::ErrorCode, code.code(), 0, self.upsert())
    }

    // ========== Power sources ==========

    /// Registers a power source and creates its Available Power Sources,
    /// Power Source Voltage and Power Source Current instances.
    ///
    /// The instance ID is the lowest free slot. Either all three resources
    /// are created and the slot is taken, or the ones already created are
    /// deleted again and the slot stays free.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRegistered`], [`Error::RegistryFull`],
    /// [`Error::ObjectUnavailable`] or [`Error::CreateFailed`].
    pub fn add_power_source(&self, source: PowerSource) -> Result<u16> {
        let mut registry = self.registry.lock();
        if let Some(instance) = registry.find(source) {
            return Err(Error::AlreadyRegistered {
                power_source: source,
                instance,
            });
        }
        let instance = registry.free_slot().inspect_err(|_| {
            debug_log!(self.config.debug, warn, %source, "No free power source slot");
        })?;

        let initial = [source.code(), 0, 0];
        let mut created = Vec::with_capacity(POWER_SOURCE_RESOURCES.len());
        for (resource, value) in POWER_SOURCE_RESOURCES.into_iter().zip(initial) {
            if let Err(e) = self.resources.create_instance(resource, value, instance) {
                for done in created.into_iter().rev() {
                    if let Err(rollback) = self.resources.delete_instance(done, instance) {
                        debug_log!(
                            self.config.debug,
                            warn,
                            error = %rollback,
                            "Rolling back power source failed"
                        );
                    }
                }
                return Err(e);
            }
            created.push(resource);
        }

        registry.occupy(instance, source);
        debug_log!(self.config.debug, debug, %source, instance, "Power source added");
        Ok(instance)
    }

    /// Removes a power source and its three resource instances.
    ///
    /// Instances already absent are skipped. The slot is freed only once
    /// none of the three remain, so a delete that partly failed can be
    /// completed by calling this again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::ObjectUnavailable`] or the
    /// first [`Error::DeleteFailed`].
    pub fn delete_power_source(&self, source: PowerSource) -> Result<()> {
        let mut registry = self.registry.lock();
        let instance = registry.require(source)?;

        let mut first_error = None;
        for resource in POWER_SOURCE_RESOURCES {
            if !self.resources.is_instance_present(resource, instance)? {
                continue;
            }
            if let Err(e) = self.resources.delete_instance(resource, instance) {
                first_error.get_or_insert(e);
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }
        registry.release(instance);
        debug_log!(self.config.debug, debug, %source, instance, "Power source deleted");
        Ok(())
    }

    /// Sets the Power Source Voltage of a registered power source, in mV.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::ObjectUnavailable`],
    /// [`Error::CreateFailed`] or [`Error::SetFailed`].
    pub fn set_power_source_voltage(&self, source: PowerSource, millivolts: i64) -> Result<()> {
        self.set_power_source_value(ResourceKind::PowerSourceVoltage, source, millivolts)
    }

    /// Sets the Power Source Current of a registered power source, in mA.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::ObjectUnavailable`],
    /// [`Error::CreateFailed`] or [`Error::SetFailed`].
    pub fn set_power_source_current(&self, source: PowerSource, milliamps: i64) -> Result<()> {
        self.set_power_source_value(ResourceKind::PowerSourceCurrent, source, milliamps)
    }

    fn set_power_source_value(
        &self,
        resource: ResourceKind,
        source: PowerSource,
        value: i64,
    ) -> Result<()> {
        let registry = self.registry.lock();
        let instance = registry.require(source).inspect_err(|_| {
            debug_log!(self.config.debug, warn, %source, %resource, "Power source not registered");
        })?;
        self.resources
            .set_instance(resource, value, instance, self.upsert())
    }
}

impl<E: DmEngine, S: ConfigStore> std::fmt::Debug for DeviceClient<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceClient")
            .field("state", &self.state())
            .field("power_sources", &self.power_sources())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{EngineCall, MemoryConfigStore, MemoryEngine, ObjectOp, StaticObject};

    type TestClient = DeviceClient<MemoryEngine, MemoryConfigStore>;

    fn client() -> (Arc<MemoryEngine>, TestClient) {
        let engine = Arc::new(MemoryEngine::new());
        let client = DeviceClient::builder(engine.clone(), Arc::new(MemoryConfigStore::new()))
            .debug(true)
            .stop_timeout(Duration::from_millis(20))
            .build()
            .unwrap();
        (engine, client)
    }

    #[test]
    fn start_hands_over_objects_and_handlers() {
        let (engine, client) = client();
        client.add_object(Arc::new(StaticObject::new("Temperature", 3303)));
        client.add_object(Arc::new(StaticObject::new("Light Control", 3311)));

        client.start().unwrap();

        assert_eq!(
            engine.calls(),
            vec![EngineCall::AddObjects(vec![
                "Temperature".to_string(),
                "Light Control".to_string()
            ])]
        );
        assert!(engine.handlers_installed());
        assert_eq!(client.state(), ConnectionState::Started);
    }

    #[test]
    fn objects_added_after_start_are_dropped() {
        let (engine, client) = client();
        client.start().unwrap();
        client.add_object(Arc::new(StaticObject::new("Late", 1)));
        assert_eq!(engine.calls(), vec![EngineCall::AddObjects(Vec::new())]);
    }

    #[test]
    fn start_twice_is_rejected() {
        let (_, client) = client();
        client.start().unwrap();
        assert!(matches!(
            client.start(),
            Err(Error::InvalidTransition {
                from: ConnectionState::Started,
                event: ConnectionEvent::Start
            })
        ));
    }

    #[test]
    fn connect_requires_start() {
        let (engine, client) = client();
        assert!(matches!(
            client.connect(()),
            Err(Error::InvalidTransition { .. })
        ));
        assert!(!engine.calls().contains(&EngineCall::Setup));
    }

    #[test]
    fn rejected_setup_returns_to_started() {
        let (engine, client) = client();
        engine.set_accept_setup(false);
        client.start().unwrap();

        assert!(matches!(client.connect(()), Err(Error::SetupFailed)));
        assert_eq!(client.state(), ConnectionState::Started);

        engine.set_accept_setup(true);
        client.connect(()).unwrap();
        assert_eq!(client.state(), ConnectionState::Connecting);
    }

    #[test]
    fn setters_switch_to_set_only_after_start() {
        let (engine, client) = client();
        let object = engine.object().unwrap().clone();

        client.set_memory_free(128).unwrap();
        assert_eq!(object.count(ObjectOp::Create), 1);

        client.start().unwrap();
        object.clear_calls();
        client.set_memory_free(64).unwrap();
        assert_eq!(object.count(ObjectOp::Create), 0);
        assert_eq!(object.count(ObjectOp::Probe), 0);

        assert!(matches!(
            client.set_memory_total(1024),
            Err(Error::SetFailed {
                resource: ResourceKind::MemoryTotal,
                instance: None
            })
        ));
    }

    #[test]
    fn keep_alive_passes_through() {
        let (engine, client) = client();
        client.keep_alive();
        assert_eq!(engine.calls(), vec![EngineCall::KeepAlive]);
    }

    #[test]
    fn stop_twice_is_rejected() {
        let (_, client) = client();
        assert_eq!(client.stop().unwrap(), StopOutcome::NotRegistered);
        assert!(matches!(
            client.stop(),
            Err(Error::InvalidTransition {
                from: ConnectionState::Stopped,
                ..
            })
        ));
    }

    #[test]
    fn stop_before_start_does_not_close() {
        let (engine, client) = client();
        client.stop().unwrap();
        assert!(!engine.calls().contains(&EngineCall::Close));
    }

    #[test]
    fn missing_object_fails_setters() {
        let client = DeviceClient::builder(
            Arc::new(MemoryEngine::without_device_object()),
            Arc::new(MemoryConfigStore::new()),
        )
        .build()
        .unwrap();

        assert!(matches!(
            client.set_timezone("UTC"),
            Err(Error::ObjectUnavailable)
        ));
        assert!(matches!(
            client.add_power_source(PowerSource::Usb),
            Err(Error::ObjectUnavailable)
        ));
        assert!(client.power_sources().is_empty());
    }

    #[test]
    fn invalid_config_fails_build() {
        let result = DeviceClient::builder(
            Arc::new(MemoryEngine::new()),
            Arc::new(MemoryConfigStore::new()),
        )
        .config(ClientConfig::default().with_power_source_slots(0))
        .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }
}

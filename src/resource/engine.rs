// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Create, update and delete operations on the Device object's resources.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::object::DeviceObject;

use super::{ResourceKind, ResourceValue};

/// Whether a set operation may create a missing resource first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// Create the resource if it is absent, then set it.
    ///
    /// Used before the client has started: the object tree is still being
    /// assembled.
    CreateMissing,
    /// Only set; the resource is assumed to exist.
    SetOnly,
}

/// Resource lifecycle operations against an owned Device object handle.
///
/// The handle is obtained once from the engine. When the engine could not
/// supply it, every operation fails with [`Error::ObjectUnavailable`]
/// without touching anything else.
///
/// The caller picks the operation matching the resource's
/// [`Cardinality`](super::Cardinality) and
/// [`Representation`](super::Representation); a mismatched pairing is
/// rejected by the object itself and reported as a create or set failure.
pub struct ResourceEngine<O: DeviceObject> {
    object: Option<Arc<O>>,
    debug: bool,
}

impl<O: DeviceObject> ResourceEngine<O> {
    /// Creates an engine around the Device object handle, if any.
    #[must_use]
    pub fn new(object: Option<Arc<O>>, debug: bool) -> Self {
        Self { object, debug }
    }

    /// Returns the Device object handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`] if the engine supplied none.
    pub fn object(&self) -> Result<&O> {
        match self.object.as_deref() {
            Some(object) => Ok(object),
            None => {
                debug_log!(self.debug, warn, "Device object is not available");
                Err(Error::ObjectUnavailable)
            }
        }
    }

    // ========== Create ==========

    /// Creates a single-instance string resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateFailed`] if the object rejects the create.
    pub fn create_string(&self, resource: ResourceKind, value: &str) -> Result<()> {
        let accepted = self
            .object()?
            .create_resource(resource, ResourceValue::from(value));
        self.check_create(accepted, resource, None, "string")
    }

    /// Creates a single-instance integer resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateFailed`] if the object rejects the create.
    pub fn create_int(&self, resource: ResourceKind, value: i64) -> Result<()> {
        let accepted = self
            .object()?
            .create_resource(resource, ResourceValue::Integer(value));
        self.check_create(accepted, resource, None, "single-instance integer")
    }

    /// Creates one instance of a multi-instance integer resource.
    ///
    /// Whether `instance` is already bound is left to the object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateFailed`] if the object rejects the create.
    pub fn create_instance(&self, resource: ResourceKind, value: i64, instance: u16) -> Result<()> {
        let accepted = self
            .object()?
            .create_resource_instance(resource, value, instance);
        self.check_create(accepted, resource, Some(instance), "multi-instance integer")
    }

    /// Creates an executable resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateFailed`] if the object rejects the create.
    pub fn create_executable(&self, resource: ResourceKind) -> Result<()> {
        let accepted = self
            .object()?
            .create_resource(resource, ResourceValue::Executable);
        self.check_create(accepted, resource, None, "executable")
    }

    fn check_create(
        &self,
        accepted: bool,
        resource: ResourceKind,
        instance: Option<u16>,
        flavour: &'static str,
    ) -> Result<()> {
        if accepted {
            return Ok(());
        }
        debug_log!(
            self.debug,
            warn,
            resource = %resource,
            ?instance,
            flavour,
            "Error creating resource on the Device object"
        );
        Err(Error::CreateFailed { resource, instance })
    }

    // ========== Delete ==========

    /// Deletes a single-instance resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeleteFailed`] if the resource is absent or the
    /// object rejects the delete.
    pub fn delete(&self, resource: ResourceKind) -> Result<()> {
        let accepted = self.object()?.delete_resource(resource);
        self.check_delete(accepted, resource, None)
    }

    /// Deletes one instance of a multi-instance resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeleteFailed`] if the instance is absent or the
    /// object rejects the delete.
    pub fn delete_instance(&self, resource: ResourceKind, instance: u16) -> Result<()> {
        let accepted = self.object()?.delete_resource_instance(resource, instance);
        self.check_delete(accepted, resource, Some(instance))
    }

    fn check_delete(
        &self,
        accepted: bool,
        resource: ResourceKind,
        instance: Option<u16>,
    ) -> Result<()> {
        if accepted {
            return Ok(());
        }
        debug_log!(
            self.debug,
            warn,
            resource = %resource,
            ?instance,
            "Error deleting resource on the Device object"
        );
        Err(Error::DeleteFailed { resource, instance })
    }

    // ========== Set ==========

    /// Sets a single-instance string resource, creating it first when
    /// `mode` allows and it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateFailed`] if the implicit create is rejected,
    /// otherwise [`Error::SetFailed`] if the set is rejected.
    pub fn set_string(&self, resource: ResourceKind, value: &str, mode: Upsert) -> Result<()> {
        let object = self.object()?;
        if mode == Upsert::CreateMissing && !object.is_resource_present(resource) {
            self.create_string(resource, value)?;
        }
        let accepted = object.set_resource_value(resource, ResourceValue::from(value));
        self.check_set(accepted, resource, None)
    }

    /// Sets a single-instance integer resource, creating it first when
    /// `mode` allows and it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateFailed`] if the implicit create is rejected,
    /// otherwise [`Error::SetFailed`] if the set is rejected.
    pub fn set_int(&self, resource: ResourceKind, value: i64, mode: Upsert) -> Result<()> {
        let object = self.object()?;
        if mode == Upsert::CreateMissing && !object.is_resource_present(resource) {
            self.create_int(resource, value)?;
        }
        let accepted = object.set_resource_value(resource, ResourceValue::Integer(value));
        self.check_set(accepted, resource, None)
    }

    /// Sets one instance of a multi-instance integer resource, creating it
    /// first when `mode` allows and the instance is absent.
    ///
    /// Presence is probed with an explicit query, so any integer (including
    /// -1) is a legitimate value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateFailed`] if the implicit create is rejected,
    /// otherwise [`Error::SetFailed`] if the set is rejected.
    pub fn set_instance(
        &self,
        resource: ResourceKind,
        value: i64,
        instance: u16,
        mode: Upsert,
    ) -> Result<()> {
        let object = self.object()?;
        if mode == Upsert::CreateMissing && !object.is_resource_instance_present(resource, instance)
        {
            self.create_instance(resource, value, instance)?;
        }
        let accepted = object.set_resource_instance_value(resource, value, instance);
        self.check_set(accepted, resource, Some(instance))
    }

    fn check_set(&self, accepted: bool, resource: ResourceKind, instance: Option<u16>) -> Result<()> {
        if accepted {
            tracing::trace!(resource = %resource, ?instance, "Resource value set");
            return Ok(());
        }
        debug_log!(
            self.debug,
            warn,
            resource = %resource,
            ?instance,
            "Error setting resource on the Device object"
        );
        Err(Error::SetFailed { resource, instance })
    }

    // ========== Queries ==========

    /// Returns true if the resource exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`] without a Device object.
    pub fn is_present(&self, resource: ResourceKind) -> Result<bool> {
        Ok(self.object()?.is_resource_present(resource))
    }

    /// Returns true if the given instance exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`] without a Device object.
    pub fn is_instance_present(&self, resource: ResourceKind, instance: u16) -> Result<bool> {
        Ok(self
            .object()?
            .is_resource_instance_present(resource, instance))
    }

    /// Reads back a resource value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectUnavailable`] without a Device object.
    pub fn value(&self, resource: ResourceKind, instance: Option<u16>) -> Result<Option<ResourceValue>> {
        Ok(self.object()?.resource_value(resource, instance))
    }
}

impl<O: DeviceObject> std::fmt::Debug for ResourceEngine<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceEngine")
            .field("object_available", &self.object.is_some())
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDeviceObject, ObjectCall, ObjectOp};
    use crate::resource::{Cardinality, Representation};

    fn engine() -> (Arc<MemoryDeviceObject>, ResourceEngine<MemoryDeviceObject>) {
        let object = Arc::new(MemoryDeviceObject::new());
        (object.clone(), ResourceEngine::new(Some(object), true))
    }

    #[test]
    fn unavailable_object_fails_every_operation() {
        let engine: ResourceEngine<MemoryDeviceObject> = ResourceEngine::new(None, false);

        assert!(matches!(
            engine.create_string(ResourceKind::FirmwareVersion, "1.0"),
            Err(Error::ObjectUnavailable)
        ));
        assert!(matches!(
            engine.delete(ResourceKind::FirmwareVersion),
            Err(Error::ObjectUnavailable)
        ));
        assert!(matches!(
            engine.set_instance(ResourceKind::ErrorCode, 0, 0, Upsert::CreateMissing),
            Err(Error::ObjectUnavailable)
        ));
    }

    #[test]
    fn single_instance_create_then_delete_once() {
        let (_, engine) = engine();

        for kind in ResourceKind::ALL {
            let created = match kind.representation() {
                Representation::String => engine.create_string(kind, "x"),
                Representation::Integer => engine.create_int(kind, 1),
                Representation::Executable => engine.create_executable(kind),
            };
            if kind.cardinality() == Cardinality::Multi {
                assert!(created.is_err(), "{kind} must not be created as single");
                continue;
            }
            created.unwrap();
            engine.delete(kind).unwrap();
            assert!(matches!(
                engine.delete(kind),
                Err(Error::DeleteFailed { resource, instance: None }) if resource == kind
            ));
        }
    }

    #[test]
    fn create_rejects_duplicates() {
        let (_, engine) = engine();
        engine.create_int(ResourceKind::MemoryFree, 10).unwrap();
        assert!(matches!(
            engine.create_int(ResourceKind::MemoryFree, 20),
            Err(Error::CreateFailed { .. })
        ));
    }

    #[test]
    fn create_missing_creates_then_sets() {
        let (object, engine) = engine();

        engine
            .set_int(ResourceKind::BatteryLevel, 80, Upsert::CreateMissing)
            .unwrap();

        assert_eq!(
            object.calls(),
            vec![
                ObjectCall::new(ObjectOp::Probe, ResourceKind::BatteryLevel, None),
                ObjectCall::new(ObjectOp::Create, ResourceKind::BatteryLevel, None),
                ObjectCall::new(ObjectOp::Set, ResourceKind::BatteryLevel, None),
            ]
        );
        assert_eq!(
            engine.value(ResourceKind::BatteryLevel, None).unwrap(),
            Some(ResourceValue::Integer(80))
        );
    }

    #[test]
    fn create_missing_skips_create_when_present() {
        let (object, engine) = engine();
        engine.create_string(ResourceKind::Timezone, "UTC").unwrap();
        object.clear_calls();

        engine
            .set_string(ResourceKind::Timezone, "Europe/Paris", Upsert::CreateMissing)
            .unwrap();

        assert_eq!(object.count(ObjectOp::Create), 0);
        assert_eq!(object.count(ObjectOp::Set), 1);
    }

    #[test]
    fn set_only_never_creates() {
        let (object, engine) = engine();

        let result = engine.set_string(ResourceKind::Timezone, "UTC", Upsert::SetOnly);

        assert!(matches!(result, Err(Error::SetFailed { .. })));
        assert_eq!(
            object.calls(),
            vec![ObjectCall::new(ObjectOp::Set, ResourceKind::Timezone, None)]
        );
    }

    #[test]
    fn instance_upsert_accepts_minus_one() {
        let (_, engine) = engine();

        engine
            .set_instance(ResourceKind::PowerSourceCurrent, -1, 0, Upsert::CreateMissing)
            .unwrap();
        engine
            .set_instance(ResourceKind::PowerSourceCurrent, 5, 0, Upsert::CreateMissing)
            .unwrap();

        assert_eq!(
            engine
                .value(ResourceKind::PowerSourceCurrent, Some(0))
                .unwrap(),
            Some(ResourceValue::Integer(5))
        );
    }

    #[test]
    fn failed_implicit_create_skips_set() {
        let (object, engine) = engine();
        object.inject_failure(ObjectOp::Create, ResourceKind::MemoryTotal);

        let result = engine.set_int(ResourceKind::MemoryTotal, 512, Upsert::CreateMissing);

        assert!(matches!(result, Err(Error::CreateFailed { .. })));
        assert_eq!(object.count(ObjectOp::Set), 0);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::{BTreeMap, HashSet};

use parking_lot::Mutex;

use crate::object::{DeviceObject, Lwm2mObject};
use crate::resource::{Cardinality, Representation, ResourceKind, ResourceValue};

/// Kind of primitive recorded in a [`MemoryDeviceObject`] journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectOp {
    /// Presence query.
    Probe,
    /// Resource or instance creation.
    Create,
    /// Value update.
    Set,
    /// Resource or instance deletion.
    Delete,
    /// Value read-back.
    Read,
}

/// One journaled primitive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectCall {
    /// The primitive.
    pub op: ObjectOp,
    /// The resource it targeted.
    pub resource: ResourceKind,
    /// The instance, for multi-instance primitives.
    pub instance: Option<u16>,
}

impl ObjectCall {
    /// Creates a journal entry.
    #[must_use]
    pub const fn new(op: ObjectOp, resource: ResourceKind, instance: Option<u16>) -> Self {
        Self {
            op,
            resource,
            instance,
        }
    }
}

#[derive(Default)]
struct ObjectTable {
    single: BTreeMap<ResourceKind, ResourceValue>,
    multi: BTreeMap<(ResourceKind, u16), i64>,
    calls: Vec<ObjectCall>,
    failures: HashSet<(ObjectOp, ResourceKind)>,
}

impl ObjectTable {
    fn record(&mut self, op: ObjectOp, resource: ResourceKind, instance: Option<u16>) -> bool {
        self.calls.push(ObjectCall::new(op, resource, instance));
        !self.failures.contains(&(op, resource))
    }
}

/// An in-memory Device object.
///
/// Enforces the rules a real object tree does: no duplicate creates, no
/// set or delete on absent resources, single-instance primitives only on
/// single-instance resources (and the reverse), and values matching the
/// resource's representation. Every call is journaled, and failures can be
/// injected per primitive and resource.
#[derive(Default)]
pub struct MemoryDeviceObject {
    table: Mutex<ObjectTable>,
}

impl MemoryDeviceObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the journal of primitive calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ObjectCall> {
        self.table.lock().calls.clone()
    }

    /// Clears the journal.
    pub fn clear_calls(&self) {
        self.table.lock().calls.clear();
    }

    /// Counts journaled calls of one kind.
    #[must_use]
    pub fn count(&self, op: ObjectOp) -> usize {
        self.table
            .lock()
            .calls
            .iter()
            .filter(|call| call.op == op)
            .count()
    }

    /// Makes every future `op` on `resource` fail.
    pub fn inject_failure(&self, op: ObjectOp, resource: ResourceKind) {
        self.table.lock().failures.insert((op, resource));
    }

    /// Removes every injected failure.
    pub fn clear_failures(&self) {
        self.table.lock().failures.clear();
    }

    /// Returns the existing instance IDs of a multi-instance resource.
    #[must_use]
    pub fn instances(&self, resource: ResourceKind) -> Vec<u16> {
        self.table
            .lock()
            .multi
            .keys()
            .filter(|(kind, _)| *kind == resource)
            .map(|(_, instance)| *instance)
            .collect()
    }

    /// Returns the number of existing resources and resource instances.
    #[must_use]
    pub fn len(&self) -> usize {
        let table = self.table.lock();
        table.single.len() + table.multi.len()
    }

    /// Returns true if no resource exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeviceObject for MemoryDeviceObject {
    fn create_resource(&self, resource: ResourceKind, value: ResourceValue) -> bool {
        let mut table = self.table.lock();
        if !table.record(ObjectOp::Create, resource, None)
            || resource.cardinality() != Cardinality::Single
            || value.representation() != resource.representation()
            || table.single.contains_key(&resource)
        {
            return false;
        }
        table.single.insert(resource, value);
        true
    }

    fn create_resource_instance(&self, resource: ResourceKind, value: i64, instance: u16) -> bool {
        let mut table = self.table.lock();
        if !table.record(ObjectOp::Create, resource, Some(instance))
            || !is_multi_integer(resource)
            || table.multi.contains_key(&(resource, instance))
        {
            return false;
        }
        table.multi.insert((resource, instance), value);
        true
    }

    fn delete_resource(&self, resource: ResourceKind) -> bool {
        let mut table = self.table.lock();
        table.record(ObjectOp::Delete, resource, None) && table.single.remove(&resource).is_some()
    }

    fn delete_resource_instance(&self, resource: ResourceKind, instance: u16) -> bool {
        let mut table = self.table.lock();
        table.record(ObjectOp::Delete, resource, Some(instance))
            && table.multi.remove(&(resource, instance)).is_some()
    }

    fn set_resource_value(&self, resource: ResourceKind, value: ResourceValue) -> bool {
        let mut table = self.table.lock();
        if !table.record(ObjectOp::Set, resource, None)
            || value.representation() == Representation::Executable
            || value.representation() != resource.representation()
        {
            return false;
        }
        match table.single.get_mut(&resource) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn set_resource_instance_value(&self, resource: ResourceKind, value: i64, instance: u16) -> bool {
        let mut table = self.table.lock();
        if !table.record(ObjectOp::Set, resource, Some(instance)) {
            return false;
        }
        match table.multi.get_mut(&(resource, instance)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn is_resource_present(&self, resource: ResourceKind) -> bool {
        let mut table = self.table.lock();
        table.calls.push(ObjectCall::new(ObjectOp::Probe, resource, None));
        table.single.contains_key(&resource)
    }

    fn is_resource_instance_present(&self, resource: ResourceKind, instance: u16) -> bool {
        let mut table = self.table.lock();
        table
            .calls
            .push(ObjectCall::new(ObjectOp::Probe, resource, Some(instance)));
        table.multi.contains_key(&(resource, instance))
    }

    fn resource_value(&self, resource: ResourceKind, instance: Option<u16>) -> Option<ResourceValue> {
        let mut table = self.table.lock();
        table
            .calls
            .push(ObjectCall::new(ObjectOp::Read, resource, instance));
        match instance {
            None => table.single.get(&resource).cloned(),
            Some(id) => table
                .multi
                .get(&(resource, id))
                .map(|value| ResourceValue::Integer(*value)),
        }
    }
}

impl std::fmt::Debug for MemoryDeviceObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.lock();
        f.debug_struct("MemoryDeviceObject")
            .field("resources", &table.single.len())
            .field("instances", &table.multi.len())
            .field("calls", &table.calls.len())
            .finish()
    }
}

fn is_multi_integer(resource: ResourceKind) -> bool {
    resource.cardinality() == Cardinality::Multi
        && resource.representation() == Representation::Integer
}

/// A named LWM2M object with no behavior of its own, handed to the engine
/// through `add_object`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticObject {
    name: String,
    object_id: u16,
}

impl StaticObject {
    /// Creates an object descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, object_id: u16) -> Self {
        Self {
            name: name.into(),
            object_id,
        }
    }
}

impl Lwm2mObject for StaticObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_id(&self) -> u16 {
        self.object_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_cardinality() {
        let object = MemoryDeviceObject::new();
        assert!(!object.create_resource(ResourceKind::ErrorCode, ResourceValue::Integer(0)));
        assert!(!object.create_resource_instance(ResourceKind::BatteryLevel, 50, 0));
    }

    #[test]
    fn rejects_wrong_representation() {
        let object = MemoryDeviceObject::new();
        assert!(!object.create_resource(ResourceKind::Timezone, ResourceValue::Integer(1)));
        assert!(object.create_resource(ResourceKind::Timezone, ResourceValue::from("UTC")));
        assert!(!object.set_resource_value(ResourceKind::Timezone, ResourceValue::Integer(1)));
    }

    #[test]
    fn instances_are_independent() {
        let object = MemoryDeviceObject::new();
        assert!(object.create_resource_instance(ResourceKind::PowerSourceVoltage, 5000, 0));
        assert!(object.create_resource_instance(ResourceKind::PowerSourceVoltage, 3700, 2));
        assert_eq!(object.instances(ResourceKind::PowerSourceVoltage), vec![0, 2]);

        assert!(object.delete_resource_instance(ResourceKind::PowerSourceVoltage, 0));
        assert!(!object.delete_resource_instance(ResourceKind::PowerSourceVoltage, 0));
        assert_eq!(object.instances(ResourceKind::PowerSourceVoltage), vec![2]);
    }

    #[test]
    fn injected_failure_is_journaled() {
        let object = MemoryDeviceObject::new();
        object.inject_failure(ObjectOp::Delete, ResourceKind::Manufacturer);
        assert!(object.create_resource(ResourceKind::Manufacturer, ResourceValue::from("acme")));

        assert!(!object.delete_resource(ResourceKind::Manufacturer));
        assert_eq!(object.count(ObjectOp::Delete), 1);
        assert_eq!(object.len(), 1);

        object.clear_failures();
        assert!(object.delete_resource(ResourceKind::Manufacturer));
        assert!(object.is_empty());
    }
}

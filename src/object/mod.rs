// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object-tree primitives supplied by the device-management engine.
//!
//! The engine owns the LWM2M object tree. This crate only consumes it
//! through the [`DeviceObject`] trait (the Device object's resource
//! primitives) and hands additional objects to the engine as
//! [`Lwm2mObject`] trait objects.

use crate::resource::{ResourceKind, ResourceValue};

/// Resource primitives of the engine's Device object.
///
/// Every method reports whether the object accepted the call; the
/// [`ResourceEngine`](crate::resource::ResourceEngine) turns rejections
/// into typed errors. Implementations are shared with the engine's callback
/// context and must be thread-safe.
pub trait DeviceObject: Send + Sync {
    /// Creates a single-instance resource holding `value`.
    fn create_resource(&self, resource: ResourceKind, value: ResourceValue) -> bool;

    /// Creates instance `instance` of a multi-instance integer resource.
    fn create_resource_instance(&self, resource: ResourceKind, value: i64, instance: u16) -> bool;

    /// Deletes a single-instance resource.
    fn delete_resource(&self, resource: ResourceKind) -> bool;

    /// Deletes one instance of a multi-instance resource.
    fn delete_resource_instance(&self, resource: ResourceKind, instance: u16) -> bool;

    /// Sets the value of a single-instance resource.
    fn set_resource_value(&self, resource: ResourceKind, value: ResourceValue) -> bool;

    /// Sets the value of one instance of a multi-instance integer resource.
    fn set_resource_instance_value(&self, resource: ResourceKind, value: i64, instance: u16)
    -> bool;

    /// Returns true if the resource exists on the object.
    fn is_resource_present(&self, resource: ResourceKind) -> bool;

    /// Returns true if the given instance of a multi-instance resource exists.
    fn is_resource_instance_present(&self, resource: ResourceKind, instance: u16) -> bool;

    /// Reads back a resource value, or `None` if it does not exist.
    fn resource_value(&self, resource: ResourceKind, instance: Option<u16>)
    -> Option<ResourceValue>;
}

/// An additional LWM2M object registered alongside the Device object.
pub trait Lwm2mObject: Send + Sync {
    /// Object name, used for logging.
    fn name(&self) -> &str;

    /// OMA LWM2M object ID.
    fn object_id(&self) -> u16;
}

impl std::fmt::Debug for dyn Lwm2mObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lwm2mObject")
            .field("name", &self.name())
            .field("object_id", &self.object_id())
            .finish()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-source instance registry.
//!
//! A fixed table with one slot per possible instance ID. The slot index is
//! the LWM2M instance ID shared by the Available Power Sources, Power Source
//! Voltage and Power Source Current resources of that power source.
//!
//! Scans always run in ascending index order: the first free slot is
//! allocated and the first matching slot is found, so the instance ID a
//! power source receives is deterministic.

use crate::error::{Error, ValueError};
use crate::types::PowerSource;

/// Number of slots in the registry, one per possible instance ID.
pub const MAX_POWER_SOURCE_SLOTS: usize = 8;

/// Table mapping instance IDs to the power source occupying them.
///
/// # Examples
///
/// ```
/// use lwdm_lib::registry::PowerSourceRegistry;
/// use lwdm_lib::types::PowerSource;
///
/// let mut registry = PowerSourceRegistry::new();
/// let dc = registry.free_slot().unwrap();
/// registry.occupy(dc, PowerSource::Dc);
/// assert_eq!(registry.find(PowerSource::Dc), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSourceRegistry {
    slots: [Option<PowerSource>; MAX_POWER_SOURCE_SLOTS],
    capacity: usize,
}

impl PowerSourceRegistry {
    /// Creates a registry using every slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_POWER_SOURCE_SLOTS],
            capacity: MAX_POWER_SOURCE_SLOTS,
        }
    }

    /// Creates a registry limited to the first `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless `1 <= capacity <= MAX_POWER_SOURCE_SLOTS`.
    pub fn with_capacity(capacity: usize) -> Result<Self, ValueError> {
        if capacity == 0 || capacity > MAX_POWER_SOURCE_SLOTS {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: i64::try_from(MAX_POWER_SOURCE_SLOTS).unwrap_or(i64::MAX),
                actual: i64::try_from(capacity).unwrap_or(i64::MAX),
            });
        }
        Ok(Self {
            slots: [None; MAX_POWER_SOURCE_SLOTS],
            capacity,
        })
    }

    /// Returns the number of usable slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the lowest unused instance ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryFull`] if every usable slot is occupied.
    pub fn free_slot(&self) -> Result<u16, Error> {
        self.usable()
            .iter()
            .position(Option::is_none)
            .map(to_instance)
            .ok_or(Error::RegistryFull {
                capacity: self.capacity,
            })
    }

    /// Returns the instance ID held by `source`, if registered.
    #[must_use]
    pub fn find(&self, source: PowerSource) -> Option<u16> {
        self.usable()
            .iter()
            .position(|slot| *slot == Some(source))
            .map(to_instance)
    }

    /// Returns the instance ID held by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `source` is not registered.
    pub fn require(&self, source: PowerSource) -> Result<u16, Error> {
        self.find(source).ok_or(Error::NotFound(source))
    }

    /// Returns the power source in a slot.
    #[must_use]
    pub fn get(&self, instance: u16) -> Option<PowerSource> {
        self.usable().get(usize::from(instance)).copied().flatten()
    }

    /// Marks a slot as held by `source`.
    ///
    /// Out-of-range instance IDs are ignored.
    pub fn occupy(&mut self, instance: u16, source: PowerSource) {
        if let Some(slot) = self.usable_mut().get_mut(usize::from(instance)) {
            *slot = Some(source);
        }
    }

    /// Marks a slot as unused, returning its previous occupant.
    pub fn release(&mut self, instance: u16) -> Option<PowerSource> {
        self.usable_mut()
            .get_mut(usize::from(instance))
            .and_then(Option::take)
    }

    /// Returns every occupied slot as (instance ID, power source) pairs,
    /// in ascending instance order.
    #[must_use]
    pub fn occupied(&self) -> Vec<(u16, PowerSource)> {
        self.usable()
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|source| (to_instance(index), source)))
            .collect()
    }

    /// Returns the number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.usable().iter().flatten().count()
    }

    /// Returns true if no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resets every slot to unused.
    pub fn clear(&mut self) {
        self.slots = [None; MAX_POWER_SOURCE_SLOTS];
    }

    fn usable(&self) -> &[Option<PowerSource>] {
        &self.slots[..self.capacity]
    }

    fn usable_mut(&mut self) -> &mut [Option<PowerSource>] {
        &mut self.slots[..self.capacity]
    }
}

impl Default for PowerSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Slot indices are bounded by MAX_POWER_SOURCE_SLOTS, which fits in u16.
#[allow(clippy::cast_possible_truncation)]
fn to_instance(index: usize) -> u16 {
    index as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let registry = PowerSourceRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.capacity(), MAX_POWER_SOURCE_SLOTS);
        assert_eq!(registry.free_slot().unwrap(), 0);
    }

    #[test]
    fn allocation_is_first_free() {
        let mut registry = PowerSourceRegistry::new();
        for source in [PowerSource::Dc, PowerSource::Usb, PowerSource::Solar] {
            let slot = registry.free_slot().unwrap();
            registry.occupy(slot, source);
        }

        assert_eq!(registry.find(PowerSource::Dc), Some(0));
        assert_eq!(registry.find(PowerSource::Usb), Some(1));
        assert_eq!(registry.find(PowerSource::Solar), Some(2));

        registry.release(0);
        assert_eq!(registry.free_slot().unwrap(), 0);
    }

    #[test]
    fn find_returns_first_match() {
        let mut registry = PowerSourceRegistry::new();
        registry.occupy(3, PowerSource::Mains);
        registry.occupy(5, PowerSource::Mains);
        assert_eq!(registry.find(PowerSource::Mains), Some(3));
    }

    #[test]
    fn full_registry() {
        let mut registry = PowerSourceRegistry::with_capacity(2).unwrap();
        registry.occupy(0, PowerSource::Dc);
        registry.occupy(1, PowerSource::Usb);

        assert!(matches!(
            registry.free_slot(),
            Err(Error::RegistryFull { capacity: 2 })
        ));
    }

    #[test]
    fn capacity_limits_slots() {
        let mut registry = PowerSourceRegistry::with_capacity(2).unwrap();
        registry.occupy(4, PowerSource::Solar);
        assert!(registry.is_empty());
        assert_eq!(registry.get(4), None);
    }

    #[test]
    fn with_capacity_bounds() {
        assert!(PowerSourceRegistry::with_capacity(0).is_err());
        assert!(PowerSourceRegistry::with_capacity(MAX_POWER_SOURCE_SLOTS + 1).is_err());
        assert!(PowerSourceRegistry::with_capacity(MAX_POWER_SOURCE_SLOTS).is_ok());
    }

    #[test]
    fn require_missing_source() {
        let registry = PowerSourceRegistry::new();
        assert!(matches!(
            registry.require(PowerSource::PoE),
            Err(Error::NotFound(PowerSource::PoE))
        ));
    }

    #[test]
    fn occupied_and_clear() {
        let mut registry = PowerSourceRegistry::new();
        registry.occupy(1, PowerSource::InternalBattery);
        registry.occupy(6, PowerSource::ExternalBattery);

        assert_eq!(
            registry.occupied(),
            vec![
                (1, PowerSource::InternalBattery),
                (6, PowerSource::ExternalBattery)
            ]
        );
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.release(1), Some(PowerSource::InternalBattery));
        assert_eq!(registry.release(1), None);

        registry.clear();
        assert!(registry.is_empty());
    }
}

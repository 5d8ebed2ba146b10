// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process collaborators for host builds and tests.
//!
//! [`MemoryEngine`], [`MemoryDeviceObject`] and [`MemoryConfigStore`]
//! implement the engine, Device object and config store seams without any
//! network or flash behind them. Each keeps a journal of the calls it
//! received so call ordering can be asserted.

mod engine;
mod object;
mod store;

pub use engine::{CloseBehavior, EngineCall, MemoryEngine};
pub use object::{MemoryDeviceObject, ObjectCall, ObjectOp, StaticObject};
pub use store::{MemoryConfigStore, StoreCall};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device object resources: catalog, values and lifecycle operations.
//!
//! - [`ResourceKind`] - The closed set of Device object resources
//! - [`ResourceValue`] - String, integer or executable payloads
//! - [`ResourceEngine`] - Create, set (upsert) and delete operations

mod catalog;
mod engine;
mod value;

pub use catalog::{Cardinality, Representation, ResourceKind};
pub use engine::{ResourceEngine, Upsert};
pub use value::ResourceValue;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use super::Representation;

/// A value held by a Device object resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceValue {
    /// UTF-8 string.
    String(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// Executable resource, no payload.
    Executable,
}

impl ResourceValue {
    /// Returns the representation of this value.
    #[must_use]
    pub const fn representation(&self) -> Representation {
        match self {
            Self::String(_) => Representation::String,
            Self::Integer(_) => Representation::Integer,
            Self::Executable => Representation::Executable,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for ResourceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ResourceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ResourceValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl fmt::Display for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value:?}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Executable => f.write_str("<executable>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert_eq!(ResourceValue::from(42).as_int(), Some(42));
        assert_eq!(ResourceValue::from("v1.0").as_str(), Some("v1.0"));
        assert_eq!(ResourceValue::Executable.as_int(), None);
    }

    #[test]
    fn representation_follows_variant() {
        assert_eq!(
            ResourceValue::from("x").representation(),
            Representation::String
        );
        assert_eq!(
            ResourceValue::Executable.representation(),
            Representation::Executable
        );
    }
}

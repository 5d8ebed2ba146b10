// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation table for the engine's numeric error codes.

use std::fmt;

/// Label used for codes outside the table.
pub const UNKNOWN_ERROR: &str = "UNKNOWN";

/// Error codes the engine reports through its error callback.
///
/// Connection errors occupy `0..=12`; firmware-update warnings and errors
/// (feature `update`) start at `0x0400` and `0x0500`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EngineErrorCode {
    /// No error.
    ConnectErrorNone,
    /// A connection already exists.
    ConnectAlreadyExists,
    /// Bootstrap failed.
    ConnectBootstrapFailed,
    /// Invalid connection parameters.
    ConnectInvalidParameters,
    /// The client is not registered.
    ConnectNotRegistered,
    /// The connection attempt timed out.
    ConnectTimeout,
    /// Network error.
    ConnectNetworkError,
    /// The server response could not be parsed.
    ConnectResponseParseFailed,
    /// Unknown connection error.
    ConnectUnknownError,
    /// Out of memory while connecting.
    ConnectMemoryConnectFail,
    /// The server refused the connection.
    ConnectNotAllowed,
    /// The secure transport handshake failed.
    ConnectSecureConnectionFailed,
    /// DNS resolution failed.
    ConnectDnsResolvingFailed,
    /// Update certificate not found.
    #[cfg(feature = "update")]
    UpdateWarningCertificateNotFound,
    /// Update identity not found.
    #[cfg(feature = "update")]
    UpdateWarningIdentityNotFound,
    /// Update certificate invalid.
    #[cfg(feature = "update")]
    UpdateWarningCertificateInvalid,
    /// Update signature invalid.
    #[cfg(feature = "update")]
    UpdateWarningSignatureInvalid,
    /// Update vendor mismatch.
    #[cfg(feature = "update")]
    UpdateWarningVendorMismatch,
    /// Update class mismatch.
    #[cfg(feature = "update")]
    UpdateWarningClassMismatch,
    /// Update device mismatch.
    #[cfg(feature = "update")]
    UpdateWarningDeviceMismatch,
    /// Update URI not found.
    #[cfg(feature = "update")]
    UpdateWarningUriNotFound,
    /// Update rejected by rollback protection.
    #[cfg(feature = "update")]
    UpdateWarningRollbackProtection,
    /// Unknown update warning.
    #[cfg(feature = "update")]
    UpdateWarningUnknown,
    /// The update image could not be written to storage.
    #[cfg(feature = "update")]
    UpdateErrorWriteToStorage,
}

impl EngineErrorCode {
    /// Looks up a numeric code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::ConnectErrorNone,
            1 => Self::ConnectAlreadyExists,
            2 => Self::ConnectBootstrapFailed,
            3 => Self::ConnectInvalidParameters,
            4 => Self::ConnectNotRegistered,
            5 => Self::ConnectTimeout,
            6 => Self::ConnectNetworkError,
            7 => Self::ConnectResponseParseFailed,
            8 => Self::ConnectUnknownError,
            9 => Self::ConnectMemoryConnectFail,
            10 => Self::ConnectNotAllowed,
            11 => Self::ConnectSecureConnectionFailed,
            12 => Self::ConnectDnsResolvingFailed,
            #[cfg(feature = "update")]
            0x0401 => Self::UpdateWarningCertificateNotFound,
            #[cfg(feature = "update")]
            0x0402 => Self::UpdateWarningIdentityNotFound,
            #[cfg(feature = "update")]
            0x0403 => Self::UpdateWarningCertificateInvalid,
            #[cfg(feature = "update")]
            0x0404 => Self::UpdateWarningSignatureInvalid,
            #[cfg(feature = "update")]
            0x0405 => Self::UpdateWarningVendorMismatch,
            #[cfg(feature = "update")]
            0x0406 => Self::UpdateWarningClassMismatch,
            #[cfg(feature = "update")]
            0x0407 => Self::UpdateWarningDeviceMismatch,
            #[cfg(feature = "update")]
            0x0408 => Self::UpdateWarningUriNotFound,
            #[cfg(feature = "update")]
            0x0409 => Self::UpdateWarningRollbackProtection,
            #[cfg(feature = "update")]
            0x040A => Self::UpdateWarningUnknown,
            #[cfg(feature = "update")]
            0x0501 => Self::UpdateErrorWriteToStorage,
            _ => return None,
        })
    }

    /// Returns the descriptive name of the code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectErrorNone => "ConnectErrorNone",
            Self::ConnectAlreadyExists => "ConnectAlreadyExists",
            Self::ConnectBootstrapFailed => "ConnectBootstrapFailed",
            Self::ConnectInvalidParameters => "ConnectInvalidParameters",
            Self::ConnectNotRegistered => "ConnectNotRegistered",
            Self::ConnectTimeout => "ConnectTimeout",
            Self::ConnectNetworkError => "ConnectNetworkError",
            Self::ConnectResponseParseFailed => "ConnectResponseParseFailed",
            Self::ConnectUnknownError => "ConnectUnknownError",
            Self::ConnectMemoryConnectFail => "ConnectMemoryConnectFail",
            Self::ConnectNotAllowed => "ConnectNotAllowed",
            Self::ConnectSecureConnectionFailed => "ConnectSecureConnectionFailed",
            Self::ConnectDnsResolvingFailed => "ConnectDnsResolvingFailed",
            #[cfg(feature = "update")]
            Self::UpdateWarningCertificateNotFound => "UpdateWarningCertificateNotFound",
            #[cfg(feature = "update")]
            Self::UpdateWarningIdentityNotFound => "UpdateWarningIdentityNotFound",
            #[cfg(feature = "update")]
            Self::UpdateWarningCertificateInvalid => "UpdateWarningCertificateInvalid",
            #[cfg(feature = "update")]
            Self::UpdateWarningSignatureInvalid => "UpdateWarningSignatureInvalid",
            #[cfg(feature = "update")]
            Self::UpdateWarningVendorMismatch => "UpdateWarningVendorMismatch",
            #[cfg(feature = "update")]
            Self::UpdateWarningClassMismatch => "UpdateWarningClassMismatch",
            #[cfg(feature = "update")]
            Self::UpdateWarningDeviceMismatch => "UpdateWarningDeviceMismatch",
            #[cfg(feature = "update")]
            Self::UpdateWarningUriNotFound => "UpdateWarningURINotFound",
            #[cfg(feature = "update")]
            Self::UpdateWarningRollbackProtection => "UpdateWarningRollbackProtection",
            #[cfg(feature = "update")]
            Self::UpdateWarningUnknown => "UpdateWarningUnknown",
            #[cfg(feature = "update")]
            Self::UpdateErrorWriteToStorage => "UpdateErrorWriteToStorage",
        }
    }

    /// Translates a raw code, falling back to [`UNKNOWN_ERROR`].
    #[must_use]
    pub fn describe(code: i32) -> &'static str {
        Self::from_code(code).map_or(UNKNOWN_ERROR, |known| known.as_str())
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_codes() {
        assert_eq!(
            EngineErrorCode::from_code(5),
            Some(EngineErrorCode::ConnectTimeout)
        );
        assert_eq!(EngineErrorCode::describe(12), "ConnectDnsResolvingFailed");
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(EngineErrorCode::from_code(-1), None);
        assert_eq!(EngineErrorCode::describe(13), UNKNOWN_ERROR);
    }

    #[cfg(feature = "update")]
    #[test]
    fn update_codes() {
        assert_eq!(
            EngineErrorCode::describe(0x0501),
            "UpdateErrorWriteToStorage"
        );
        assert_eq!(EngineErrorCode::describe(0x0408), "UpdateWarningURINotFound");
    }

    #[cfg(not(feature = "update"))]
    #[test]
    fn update_codes_unknown_without_feature() {
        assert_eq!(EngineErrorCode::describe(0x0501), UNKNOWN_ERROR);
    }
}

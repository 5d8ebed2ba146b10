// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional application hooks for connection events.

#[cfg(feature = "update")]
use crate::engine::UpdateProgressHandler;
use crate::engine::{ErrorHandler, EventHandler};

/// The application's connection hooks.
///
/// Every hook is optional; an absent hook is simply not called. Hooks run on
/// the engine's execution context, not the caller's thread.
#[derive(Clone, Default)]
pub struct UserCallbacks {
    registered: Option<EventHandler>,
    deregistered: Option<EventHandler>,
    error: Option<ErrorHandler>,
    #[cfg(feature = "update")]
    update_progress: Option<UpdateProgressHandler>,
}

impl UserCallbacks {
    /// Creates an empty set of hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hook called after registration.
    pub fn set_registered<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.registered = Some(std::sync::Arc::new(callback));
    }

    /// Sets the hook called after deregistration.
    pub fn set_deregistered<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.deregistered = Some(std::sync::Arc::new(callback));
    }

    /// Sets the hook receiving raw engine error codes.
    pub fn set_error<F>(&mut self, callback: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.error = Some(std::sync::Arc::new(callback));
    }

    /// Sets the firmware-update progress hook.
    #[cfg(feature = "update")]
    pub fn set_update_progress<F>(&mut self, callback: F)
    where
        F: Fn(u32, u32) + Send + Sync + 'static,
    {
        self.update_progress = Some(std::sync::Arc::new(callback));
    }

    /// Returns the update progress hook, if any.
    #[cfg(feature = "update")]
    #[must_use]
    pub fn update_progress(&self) -> Option<UpdateProgressHandler> {
        self.update_progress.clone()
    }

    pub(crate) fn dispatch_registered(&self) {
        if let Some(callback) = &self.registered {
            callback();
        }
    }

    pub(crate) fn dispatch_deregistered(&self) {
        if let Some(callback) = &self.deregistered {
            callback();
        }
    }

    pub(crate) fn dispatch_error(&self, code: i32) {
        if let Some(callback) = &self.error {
            callback(code);
        }
    }
}

impl std::fmt::Debug for UserCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("UserCallbacks");
        debug
            .field("registered", &self.registered.is_some())
            .field("deregistered", &self.deregistered.is_some())
            .field("error", &self.error.is_some());
        #[cfg(feature = "update")]
        debug.field("update_progress", &self.update_progress.is_some());
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    #[test]
    fn absent_hooks_are_skipped() {
        let callbacks = UserCallbacks::new();
        callbacks.dispatch_registered();
        callbacks.dispatch_deregistered();
        callbacks.dispatch_error(6);
    }

    #[test]
    fn hooks_receive_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let last_code = Arc::new(AtomicI32::new(-1));

        let mut callbacks = UserCallbacks::new();
        let c = count.clone();
        callbacks.set_registered(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let c = count.clone();
        callbacks.set_deregistered(move || {
            c.fetch_add(10, Ordering::SeqCst);
        });
        let code = last_code.clone();
        callbacks.set_error(move |raw| code.store(raw, Ordering::SeqCst));

        callbacks.dispatch_registered();
        callbacks.dispatch_deregistered();
        callbacks.dispatch_error(5);

        assert_eq!(count.load(Ordering::SeqCst), 11);
        assert_eq!(last_code.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn debug_shows_presence_only() {
        let mut callbacks = UserCallbacks::new();
        callbacks.set_error(|_| {});
        let rendered = format!("{callbacks:?}");
        assert!(rendered.contains("error: true"));
        assert!(rendered.contains("registered: false"));
    }
}

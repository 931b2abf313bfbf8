// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-swap enhancement hooks.
//!
//! Layout enhancements (masonry grids, sliders, lightboxes) initialize on page
//! load and do not notice a body swap. Instead of recognizing them by
//! hard-coded script URLs, the engine keeps a registry that page scripts add
//! themselves to. Every hook runs after each swap. A hook that names a
//! script pattern additionally runs when a swapped-in external script whose
//! URL contains that pattern finishes loading, and once more
//! [`REINVOKE_DELAY_MS`] later in case the script was served from cache
//! before the load listener attached.
//!
//! Hooks are keyed by name. Registering an existing name replaces the entry,
//! so a registration script that is re-executed by a swap does not
//! accumulate duplicates.

use alloc::string::String;
use alloc::vec::Vec;

/// Delay before a pattern-matched hook is invoked a second time.
pub const REINVOKE_DELAY_MS: u32 = 300;

/// One registered hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnhancementHook<H> {
    /// Unique name.
    pub name: String,
    /// Substring of the script URL whose load should trigger this hook.
    pub script_pattern: Option<String>,
    /// The callback itself.
    pub callback: H,
}

impl<H> EnhancementHook<H> {
    /// Returns `true` if `script_url` should trigger this hook.
    #[must_use]
    pub fn matches(&self, script_url: &str) -> bool {
        self.script_pattern
            .as_deref()
            .is_some_and(|p| !p.is_empty() && script_url.contains(p))
    }
}

/// Ordered set of hooks, keyed by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookRegistry<H> {
    hooks: Vec<EnhancementHook<H>>,
}

impl<H> Default for HookRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> HookRegistry<H> {
    /// An empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Adds a hook, replacing any hook with the same name in place.
    ///
    /// Returns the replaced callback, if there was one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        script_pattern: Option<String>,
        callback: H,
    ) -> Option<H> {
        let name = name.into();
        let script_pattern = script_pattern.filter(|p| !p.is_empty());
        if let Some(existing) = self.hooks.iter_mut().find(|h| h.name == name) {
            existing.script_pattern = script_pattern;
            return Some(core::mem::replace(&mut existing.callback, callback));
        }
        self.hooks.push(EnhancementHook {
            name,
            script_pattern,
            callback,
        });
        None
    }

    /// Removes the hook called `name`.
    pub fn unregister(&mut self, name: &str) -> Option<H> {
        let pos = self.hooks.iter().position(|h| h.name == name)?;
        Some(self.hooks.remove(pos).callback)
    }

    /// All hooks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnhancementHook<H>> {
        self.hooks.iter()
    }

    /// Hooks whose pattern matches `script_url`.
    pub fn matching<'a>(
        &'a self,
        script_url: &'a str,
    ) -> impl Iterator<Item = &'a EnhancementHook<H>> + 'a {
        self.hooks.iter().filter(move |h| h.matches(script_url))
    }

    /// Number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns `true` if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

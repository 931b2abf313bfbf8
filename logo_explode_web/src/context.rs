// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine state shared by every listener and session.

use std::cell::{Cell, RefCell};

use gloo::events::EventListener;
use logo_explode_core::config::EngineConfig;
use logo_explode_core::hooks::HookRegistry;
use logo_explode_core::trace::{NoopSink, TraceSink, Tracer};

use crate::fetch::{HttpPageSource, PageSource};
use crate::navigate::{BrowserNavigator, Navigator};

/// Everything the engine needs, passed explicitly instead of living in
/// globals.
///
/// Shared as `Rc<EngineContext>`; listeners hold a `Weak` to it.
pub struct EngineContext {
    config: EngineConfig,
    navigator: Box<dyn Navigator>,
    pages: Box<dyn PageSource>,
    sink: RefCell<Box<dyn TraceSink>>,
    hooks: RefCell<HookRegistry<js_sys::Function>>,
    /// Click listeners on the current sources. Replaced wholesale on bind.
    listeners: RefCell<Vec<EventListener>>,
    /// Listeners that live as long as the engine.
    resident: RefCell<Vec<EventListener>>,
    active_id: RefCell<Option<String>>,
    arrival_id: RefCell<Option<String>>,
    sessions: Cell<u32>,
    /// A swap has pushed a history entry since the page was loaded.
    swapped: Cell<bool>,
}

impl core::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineContext")
            .field("config", &self.config)
            .field("hooks", &self.hooks.borrow().len())
            .field("bound", &self.listeners.borrow().len())
            .field("active_id", &self.active_id.borrow())
            .finish_non_exhaustive()
    }
}

impl EngineContext {
    /// A context that talks to the real browser.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let pages = HttpPageSource::new(config.fetch_timeout_ms);
        Self::with_parts(config, Box::new(BrowserNavigator), Box::new(pages))
    }

    /// A context with caller-supplied navigation and page loading.
    #[must_use]
    pub fn with_parts(
        config: EngineConfig,
        navigator: Box<dyn Navigator>,
        pages: Box<dyn PageSource>,
    ) -> Self {
        Self {
            config,
            navigator,
            pages,
            sink: RefCell::new(Box::new(NoopSink)),
            hooks: RefCell::new(HookRegistry::new()),
            listeners: RefCell::new(Vec::new()),
            resident: RefCell::new(Vec::new()),
            active_id: RefCell::new(None),
            arrival_id: RefCell::new(None),
            sessions: Cell::new(0),
            swapped: Cell::new(false),
        }
    }

    /// Replaces the trace sink.
    pub fn set_sink(&self, sink: Box<dyn TraceSink>) {
        *self.sink.borrow_mut() = sink;
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Id of the most recently started session, if any.
    ///
    /// Advisory only; nothing is serialized on it.
    #[must_use]
    pub fn active_transition_id(&self) -> Option<String> {
        self.active_id.borrow().clone()
    }

    /// Transition id this page was arrived at with, if any.
    #[must_use]
    pub fn arrival_transition_id(&self) -> Option<String> {
        self.arrival_id.borrow().clone()
    }

    /// Number of sources with a live click listener.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of sessions started so far.
    #[must_use]
    pub fn sessions_started(&self) -> u32 {
        self.sessions.get()
    }

    /// Adds or replaces the hook called `name`.
    ///
    /// Returns `true` if a hook with that name was replaced.
    pub fn register_hook(
        &self,
        name: &str,
        callback: js_sys::Function,
        script_pattern: Option<String>,
    ) -> bool {
        self.hooks
            .borrow_mut()
            .register(name, script_pattern, callback)
            .is_some()
    }

    /// Removes the hook called `name`.
    pub fn unregister_hook(&self, name: &str) -> bool {
        self.hooks.borrow_mut().unregister(name).is_some()
    }

    pub(crate) fn navigator(&self) -> &dyn Navigator {
        &*self.navigator
    }

    pub(crate) fn pages(&self) -> &dyn PageSource {
        &*self.pages
    }

    pub(crate) fn hooks(&self) -> &RefCell<HookRegistry<js_sys::Function>> {
        &self.hooks
    }

    pub(crate) fn begin_session(&self, id: &str) {
        *self.active_id.borrow_mut() = Some(id.to_owned());
        self.sessions.set(self.sessions.get() + 1);
    }

    pub(crate) fn mark_swapped(&self) {
        self.swapped.set(true);
    }

    /// Whether the document in memory came from a swap rather than a load.
    pub(crate) fn has_swapped(&self) -> bool {
        self.swapped.get()
    }

    pub(crate) fn set_arrival_id(&self, id: Option<String>) {
        *self.arrival_id.borrow_mut() = id;
    }

    /// Drops every click listener and installs `listeners` instead.
    pub(crate) fn replace_listeners(&self, listeners: Vec<EventListener>) {
        // The old listeners are dropped after the borrow ends.
        let old = std::mem::replace(&mut *self.listeners.borrow_mut(), listeners);
        drop(old);
    }

    pub(crate) fn keep(&self, listener: EventListener) {
        self.resident.borrow_mut().push(listener);
    }

    /// Runs `f` with a tracer bound to the current sink.
    pub(crate) fn trace(&self, f: impl FnOnce(&mut Tracer<'_>)) {
        let mut sink = self.sink.borrow_mut();
        let mut tracer = Tracer::new(&mut **sink);
        f(&mut tracer);
    }
}

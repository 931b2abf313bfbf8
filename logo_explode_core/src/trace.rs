// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for transition sessions.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! backend calls as a session progresses. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use kurbo::Rect;

use crate::session::Phase;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a click resolved to an ordinary navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// The clicked source carries no transition id.
    MissingId,
    /// The destination request failed or returned a non-success status.
    Fetch,
    /// The destination request exceeded the configured timeout.
    Timeout,
    /// The destination body could not be parsed.
    Parse,
    /// A DOM operation failed before the swap.
    Dom,
}

/// How the inward half of a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LandingKind {
    /// The clone shrank onto the target.
    Landed,
    /// The cropped-icon clone was replaced by a clone of the target first.
    Substituted,
    /// No target was found; the clone faded out.
    Faded,
}

/// What caused an enhancement hook to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookTrigger {
    /// The post-swap pass over every hook.
    Swap,
    /// A matching external script finished loading.
    ScriptLoad,
    /// The delayed re-invocation after a matching script was inserted.
    Delayed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted on every phase change.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEvent<'a> {
    /// Transition id of the session.
    pub id: &'a str,
    /// Phase left.
    pub from: Phase,
    /// Phase entered.
    pub to: Phase,
    /// Milliseconds since the time origin of the page.
    pub at_ms: f64,
}

/// Emitted when a click degrades to plain navigation.
#[derive(Clone, Copy, Debug)]
pub struct FallbackEvent<'a> {
    /// Destination URL.
    pub url: &'a str,
    /// Why the animated path was abandoned.
    pub reason: FallbackReason,
}

/// Emitted after the destination document has been swapped in.
#[derive(Clone, Copy, Debug)]
pub struct SwapEvent<'a> {
    /// Transition id of the session.
    pub id: &'a str,
    /// Destination URL.
    pub url: &'a str,
    /// Stylesheet links appended to the head.
    pub stylesheets_added: usize,
    /// Inline style blocks replaced or appended.
    pub styles_updated: usize,
    /// Head scripts appended.
    pub scripts_added: usize,
    /// Body scripts recreated so they execute.
    pub scripts_rerun: usize,
}

/// Emitted when the inward animation has finished.
#[derive(Clone, Copy, Debug)]
pub struct LandingEvent<'a> {
    /// Transition id of the session.
    pub id: &'a str,
    /// How the session ended.
    pub kind: LandingKind,
    /// Final clone rectangle (zero when faded).
    pub rect: Rect,
}

/// Emitted each time an enhancement hook is invoked.
#[derive(Clone, Copy, Debug)]
pub struct HookEvent<'a> {
    /// Hook name.
    pub name: &'a str,
    /// What triggered it.
    pub trigger: HookTrigger,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from transition sessions.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called on every phase change.
    fn on_phase(&mut self, e: &PhaseEvent<'_>) {
        _ = e;
    }

    /// Called when a click degrades to plain navigation.
    fn on_fallback(&mut self, e: &FallbackEvent<'_>) {
        _ = e;
    }

    /// Called after a swap.
    fn on_swap(&mut self, e: &SwapEvent<'_>) {
        _ = e;
    }

    /// Called when the inward animation has finished.
    fn on_landing(&mut self, e: &LandingEvent<'_>) {
        _ = e;
    }

    /// Called when an enhancement hook runs.
    fn on_hook(&mut self, e: &HookEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PhaseEvent`].
    #[inline]
    pub fn phase(&mut self, e: &PhaseEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FallbackEvent`].
    #[inline]
    pub fn fallback(&mut self, e: &FallbackEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_fallback(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SwapEvent`].
    #[inline]
    pub fn swap(&mut self, e: &SwapEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_swap(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LandingEvent`].
    #[inline]
    pub fn landing(&mut self, e: &LandingEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_landing(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`HookEvent`].
    #[inline]
    pub fn hook(&mut self, e: &HookEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_hook(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

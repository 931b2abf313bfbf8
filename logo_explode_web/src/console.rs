// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Console trace sink, installed when the settings ask for `debug`.

use gloo::console;
use logo_explode_core::trace::{
    FallbackEvent, HookEvent, LandingEvent, PhaseEvent, SwapEvent, TraceSink,
};

/// Writes every trace event to `console.debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl TraceSink for ConsoleSink {
    fn on_phase(&mut self, e: &PhaseEvent<'_>) {
        console::debug!(format!(
            "logo-explode [{}] {} -> {} at {:.1} ms",
            e.id, e.from, e.to, e.at_ms
        ));
    }

    fn on_fallback(&mut self, e: &FallbackEvent<'_>) {
        console::debug!(format!(
            "logo-explode: plain navigation to {} ({:?})",
            e.url, e.reason
        ));
    }

    fn on_swap(&mut self, e: &SwapEvent<'_>) {
        console::debug!(format!(
            "logo-explode [{}] swapped in {}: +{} stylesheets, {} styles, +{} head scripts, {} body scripts",
            e.id, e.url, e.stylesheets_added, e.styles_updated, e.scripts_added, e.scripts_rerun
        ));
    }

    fn on_landing(&mut self, e: &LandingEvent<'_>) {
        console::debug!(format!(
            "logo-explode [{}] {:?} at {:?}",
            e.id, e.kind, e.rect
        ));
    }

    fn on_hook(&mut self, e: &HookEvent<'_>) {
        console::debug!(format!(
            "logo-explode: hook {} ({:?})",
            e.name, e.trigger
        ));
    }
}

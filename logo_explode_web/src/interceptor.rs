// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning clicks on source markers into transitions.

use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use logo_explode_core::marker::{SOURCE_SELECTOR, TransitionMarker};
use logo_explode_core::trace::{FallbackEvent, FallbackReason};
use wasm_bindgen::JsCast as _;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlAnchorElement, MouseEvent};

use crate::context::EngineContext;
use crate::dom::{self, ElementAttrs};
use crate::orchestrator;

/// Attaches one click listener to every source marker in the document.
///
/// Listeners from a previous call are dropped first, so binding again after
/// a swap never doubles up. A source with `data-transition-link` listens on
/// itself; otherwise its first `<a>` does. Sources with neither are skipped.
///
/// Returns the number of sources bound.
pub fn bind(ctx: &Rc<EngineContext>) -> usize {
    let Ok(doc) = dom::document() else {
        return 0;
    };
    let mut listeners = Vec::new();
    for wrapper in dom::query_doc(&doc, SOURCE_SELECTOR) {
        let marker = TransitionMarker::read(&ElementAttrs(&wrapper));
        if marker.link.is_some() {
            dom::set_styles(&wrapper, &[("cursor", "pointer")]);
            listeners.push(listen(ctx, &wrapper, wrapper.clone()));
        } else if let Ok(Some(anchor)) = wrapper.query_selector("a") {
            listeners.push(listen(ctx, &anchor, wrapper.clone()));
        }
    }
    let count = listeners.len();
    ctx.replace_listeners(listeners);
    count
}

fn listen(ctx: &Rc<EngineContext>, on: &Element, wrapper: Element) -> EventListener {
    let weak: Weak<EngineContext> = Rc::downgrade(ctx);
    let anchor = on.clone();
    // Non-passive, or preventDefault would be ignored.
    EventListener::new_with_options(
        on,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            if let Some(ctx) = weak.upgrade() {
                on_click(&ctx, event, &wrapper, &anchor);
            }
        },
    )
}

fn on_click(ctx: &Rc<EngineContext>, event: &Event, wrapper: &Element, anchor: &Element) {
    // Let the browser open new tabs and windows as usual.
    if let Some(mouse) = event.dyn_ref::<MouseEvent>()
        && (mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key())
    {
        return;
    }
    let marker = TransitionMarker::read(&ElementAttrs(wrapper));
    let url = match &marker.link {
        Some(link) => link.clone(),
        None => match anchor.dyn_ref::<HtmlAnchorElement>() {
            Some(a) => a.href(),
            None => return,
        },
    };
    if url.is_empty() {
        return;
    }
    event.prevent_default();
    event.stop_propagation();

    if marker.id.is_none() {
        ctx.trace(|t| {
            t.fallback(&FallbackEvent {
                url: &url,
                reason: FallbackReason::MissingId,
            });
        });
        ctx.navigator().navigate(&url);
        return;
    }
    spawn_local(orchestrator::run(
        Rc::clone(ctx),
        wrapper.clone(),
        marker,
        url,
    ));
}

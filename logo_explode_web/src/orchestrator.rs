// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Running one transition from click to landing.
//!
//! ```text
//!   stage clone ─► expand ─► fetch + parse + swap ─► settle ─► shrink onto target
//!        │            │              │                              │
//!        └────────────┴──────────────┴─► plain navigation           └─► fade out
//! ```
//!
//! Every step is awaited in order: the expansion has finished before the
//! request is sent, and the swap has finished before the target is measured.
//! The target is hidden as soon as it is in the document and revealed in the
//! same task that removes the overlay.

use std::rc::Rc;

use gloo::console;
use gloo::timers::future::TimeoutFuture;
use kurbo::{Rect, Size};
use logo_explode_core::config::FADE_DURATION_MS;
use logo_explode_core::geometry::{explode_rect, has_area};
use logo_explode_core::marker::{TransitionMarker, target_selector};
use logo_explode_core::session::Phase;
use logo_explode_core::trace::{FallbackEvent, FallbackReason, LandingEvent, LandingKind};
use web_sys::{Element, Window};

use crate::animate::{EASE_EXPAND, EASE_SHRINK, animate_frame, fade_out};
use crate::context::EngineContext;
use crate::dom::{self, ElementAttrs};
use crate::error::TransitionError;
use crate::fetch::parse_document;
use crate::frame::next_frame;
use crate::geometry::{resolve_icon_rect, resolve_rect};
use crate::session::{Hidden, Session};
use crate::swapper;
use crate::view_transition;

/// How the fetch-and-swap step ended.
enum Arrival {
    /// The new page is in; the target, if found, is already hidden.
    Swapped(Option<Hidden>),
    /// Nothing was changed; navigate instead.
    Failed(TransitionError),
    /// The swap itself failed part way.
    Broken(TransitionError),
}

/// Runs a transition from the source `wrapper` to `url`.
///
/// Never fails: every error ends in either a plain navigation or a torn-down
/// overlay on the new page.
pub async fn run(ctx: Rc<EngineContext>, wrapper: Element, marker: TransitionMarker, url: String) {
    let Some(id) = marker.id.clone() else {
        ctx.trace(|t| {
            t.fallback(&FallbackEvent {
                url: &url,
                reason: FallbackReason::MissingId,
            });
        });
        ctx.navigator().navigate(&url);
        return;
    };
    // No second session can start until the swap binds the new sources.
    ctx.replace_listeners(Vec::new());

    let config = ctx.config().clone();
    let effective = marker.overrides.resolve(&config);
    let mut session = Session::new(ctx, id);

    session.advance(Phase::Cloning);
    let color = marker.overlay_color(&config).map(str::to_owned);
    let source = dom::animatable(&wrapper);
    if let Err(err) = session.stage(&source, color.as_deref()) {
        session.teardown();
        session.abort(&url, &err);
        return;
    }
    // A source without area cannot be animated meaningfully.
    let instant = !has_area(session.rect());

    session.advance(Phase::Expanding);
    let viewport = match dom::window() {
        Ok(window) => viewport_size(&window),
        Err(_) => Size::ZERO,
    };
    let exploded = explode_rect(session.rect(), viewport, effective.explode_scale);
    if let Some(clone) = session.clone_element().cloned() {
        let duration = if instant { 0 } else { effective.expand_ms };
        let expanded = animate_frame(&clone, session.rect(), exploded, duration, EASE_EXPAND).await;
        if let Err(err) = expanded {
            session.abort(&url, &err);
            return;
        }
    }
    session.set_rect(exploded);

    session.advance(Phase::Fetching);
    match fetch_and_swap(&session, &url).await {
        Arrival::Swapped(hidden) => {
            if let Some(hidden) = hidden {
                session.adopt(hidden);
            }
            session.advance(Phase::Swapped);
        }
        Arrival::Failed(err) => {
            session.abort(&url, &err);
            return;
        }
        Arrival::Broken(err) => {
            session.teardown();
            session.abort(&url, &err);
            return;
        }
    }

    TimeoutFuture::new(config.settle_delay_ms).await;
    next_frame().await;

    session.advance(Phase::Shrinking);
    land(&mut session, instant, effective.shrink_ms).await;
    session.advance(Phase::Done);
    debug_assert!(session.phase().is_terminal(), "session ended in {}", session.phase());
}

async fn fetch_and_swap(session: &Session, url: &str) -> Arrival {
    let doc = match dom::document() {
        Ok(doc) => doc,
        Err(err) => return Arrival::Failed(err),
    };
    let update = load(
        Rc::clone(session.ctx()),
        url.to_owned(),
        session.id().to_owned(),
        session.overlay().cloned(),
    );
    view_transition::run(&doc, update)
        .await
        .unwrap_or_else(Arrival::Failed)
}

async fn load(
    ctx: Rc<EngineContext>,
    url: String,
    id: String,
    overlay: Option<Element>,
) -> Arrival {
    let html = match ctx.pages().fetch(&url).await {
        Ok(html) => html,
        Err(err) => return Arrival::Failed(err),
    };
    let incoming = match parse_document(&html) {
        Ok(doc) => doc,
        Err(err) => return Arrival::Failed(err),
    };
    if let Err(err) = swapper::swap(&ctx, &incoming, &url, &id, overlay.as_ref()) {
        return Arrival::Broken(err);
    }
    // Hidden before the new page is first painted.
    let target = find_target(&id).map(|wrapper| Hidden::hide(dom::animatable(&wrapper)));
    Arrival::Swapped(target)
}

fn find_target(id: &str) -> Option<Element> {
    dom::document()
        .ok()?
        .query_selector(&target_selector(id))
        .ok()
        .flatten()
}

/// Shrinks the clone onto the target, or fades it out without one, then
/// tears the session down.
pub(crate) async fn land(session: &mut Session, instant: bool, shrink_ms: u32) {
    let Some(target) = find_target(session.id()) else {
        console::warn!("logo-explode: no target for", session.id().to_owned());
        if let Some(clone) = session.clone_element().cloned() {
            let _ = fade_out(&clone, FADE_DURATION_MS).await;
        }
        session.teardown();
        report_landing(session, LandingKind::Faded, Rect::ZERO);
        return;
    };

    let marker = TransitionMarker::read(&ElementAttrs(&target));
    let animatable = dom::animatable(&target);
    session.hide(&animatable);

    let (rect, kind) = match (session.cropped_icon(), dom::icon_inner(&animatable)) {
        (true, Some(inner)) => (resolve_icon_rect(&inner), LandingKind::Landed),
        (true, None) => {
            if let Err(err) = session.substitute(&animatable) {
                console::warn!("logo-explode:", err.to_string());
                session.teardown();
                return;
            }
            (resolve_rect(&animatable), LandingKind::Substituted)
        }
        (false, _) => (resolve_rect(&animatable), LandingKind::Landed),
    };
    let rect = rect + marker.offset;
    let duration = if instant {
        0
    } else {
        marker.overrides.shrink_ms.unwrap_or(shrink_ms)
    };

    if let Some(clone) = session.clone_element().cloned() {
        let shrunk = animate_frame(&clone, session.rect(), rect, duration, EASE_SHRINK).await;
        if let Err(err) = shrunk {
            console::warn!("logo-explode:", err.to_string());
        }
    }
    session.set_rect(rect);
    session.teardown();
    report_landing(session, kind, rect);
}

fn report_landing(session: &Session, kind: LandingKind, rect: Rect) {
    session.ctx().trace(|t| {
        t.landing(&LandingEvent {
            id: session.id(),
            kind,
            rect,
        });
    });
}

fn viewport_size(window: &Window) -> Size {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Size::new(dim(window.inner_width()), dim(window.inner_height()))
}

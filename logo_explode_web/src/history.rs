// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session history.
//!
//! Every swap pushes `{ transitionId }`. Going back or forward to such an
//! entry reloads the page, since the document in memory no longer matches
//! the URL. Once a swap has happened, so does any other history move: the
//! entry the visitor started on carries no state, but its markup is gone.

use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{PopStateEvent, ScrollRestoration, UrlSearchParams, Window};

use crate::context::EngineContext;
use crate::error::TransitionError;

const STATE_KEY: &str = "transitionId";
const QUERY_KEY: &str = "transition_id";

/// Pushes a history entry for `url` carrying `id`.
pub(crate) fn push(window: &Window, url: &str, id: &str) -> Result<(), TransitionError> {
    let state = Object::new();
    Reflect::set(&state, &STATE_KEY.into(), &id.into()).map_err(TransitionError::dom)?;
    window
        .history()
        .map_err(TransitionError::dom)?
        .push_state_with_url(&state, "", Some(url))
        .map_err(TransitionError::dom)
}

/// Transition id carried by a history state object.
pub(crate) fn state_id(state: &JsValue) -> Option<String> {
    if !state.is_object() {
        return None;
    }
    Reflect::get(state, &STATE_KEY.into())
        .ok()?
        .as_string()
        .filter(|id| !id.is_empty())
}

/// Transition id this page was reached with: the `transition_id` query
/// parameter, else the current history state.
pub(crate) fn arrival_id(window: &Window) -> Option<String> {
    let from_query = window
        .location()
        .search()
        .ok()
        .and_then(|search| UrlSearchParams::new_with_str(&search).ok())
        .and_then(|params| params.get(QUERY_KEY))
        .filter(|id| !id.is_empty());
    from_query.or_else(|| {
        let state = window.history().ok()?.state().ok()?;
        state_id(&state)
    })
}

/// Stops the browser from restoring scroll positions on its own.
pub(crate) fn manual_scroll_restoration(window: &Window) {
    if let Ok(history) = window.history() {
        let _ = history.set_scroll_restoration(ScrollRestoration::Manual);
    }
}

/// Reloads the page when the user travels to an entry pushed by a swap, or
/// anywhere at all after a swap.
pub(crate) fn bind_popstate(ctx: &Rc<EngineContext>, window: &Window) {
    let weak: Weak<EngineContext> = Rc::downgrade(ctx);
    let listener = EventListener::new(window, "popstate", move |event| {
        let Some(ctx) = weak.upgrade() else {
            return;
        };
        let state = event
            .dyn_ref::<PopStateEvent>()
            .map_or(JsValue::NULL, PopStateEvent::state);
        if state_id(&state).is_some() || ctx.has_swapped() {
            ctx.navigator().reload();
        }
    });
    ctx.keep(listener);
}

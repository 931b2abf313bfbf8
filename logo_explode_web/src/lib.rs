// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser engine for shared-element page transitions.
//!
//! Clicking a source marker clones its visual, grows the clone over the
//! viewport, fetches the destination page and swaps it in without a reload,
//! then shrinks the clone onto the matching target marker. Any failure before
//! the swap turns into an ordinary navigation.
//!
//! - [`start`]: entry point run when the module is instantiated
//! - [`EngineContext`]: configuration and state shared by every component
//! - [`bind`]: attaches click listeners to source markers
//! - [`run_transition`]: drives one session
//! - [`resolve_rect`]: visually-accurate element rectangles
//!
//! Page scripts extend the engine through `registerEnhancementHook`.

mod animate;
mod clone;
mod console;
mod context;
mod dom;
mod enhance;
mod error;
mod fetch;
mod frame;
mod geometry;
mod history;
mod interceptor;
mod navigate;
mod orchestrator;
mod session;
mod settings;
mod swapper;
mod view_transition;

#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::prelude::*;

pub use console::ConsoleSink;
pub use context::EngineContext;
pub use error::TransitionError;
pub use fetch::{HttpPageSource, PageFuture, PageSource};
pub use geometry::resolve_rect;
pub use interceptor::bind;
pub use navigate::{BrowserNavigator, Navigator};
pub use orchestrator::run as run_transition;
pub use settings::{SETTINGS_GLOBAL, load as load_settings};
pub use swapper::SWAPPED_EVENT;

thread_local! {
    /// The engine started by [`start`]. Only the JS-facing exports reach it
    /// through here; everything else is handed the context explicitly.
    static ENGINE: RefCell<Option<Rc<EngineContext>>> = const { RefCell::new(None) };
}

/// Starts the engine for the current page.
///
/// Reads the settings, then binds the page once the DOM is ready.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn start() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let config = settings::load(&window);
    let ctx = Rc::new(EngineContext::new(config));
    if ctx.config().debug {
        ctx.set_sink(Box::new(ConsoleSink));
    }
    ENGINE.with(|engine| *engine.borrow_mut() = Some(Rc::clone(&ctx)));

    let Some(doc) = window.document() else {
        return;
    };
    let state = js_sys::Reflect::get(&doc, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string());
    if state.as_deref() == Some("loading") {
        let pending = Rc::clone(&ctx);
        EventListener::once(&doc, "DOMContentLoaded", move |_| init(&pending)).forget();
    } else {
        init(&ctx);
    }
}

/// Binds a ready document.
fn init(ctx: &Rc<EngineContext>) {
    let Ok(window) = dom::window() else {
        return;
    };
    ctx.set_arrival_id(history::arrival_id(&window));
    history::manual_scroll_restoration(&window);
    history::bind_popstate(ctx, &window);
    bind(ctx);
}

/// Registers a post-swap enhancement hook.
///
/// `callback` runs after every swap. With a `script_pattern`, it also runs
/// when a swapped-in external script whose URL contains the pattern loads,
/// and once more shortly after. Registering a taken name replaces that hook.
///
/// Returns `true` if a hook was replaced.
#[wasm_bindgen(js_name = "registerEnhancementHook")]
pub fn register_enhancement_hook(
    name: &str,
    callback: js_sys::Function,
    script_pattern: Option<String>,
) -> bool {
    with_engine(|ctx| ctx.register_hook(name, callback, script_pattern)).unwrap_or(false)
}

/// Removes the enhancement hook called `name`.
#[wasm_bindgen(js_name = "unregisterEnhancementHook")]
pub fn unregister_enhancement_hook(name: &str) -> bool {
    with_engine(|ctx| ctx.unregister_hook(name)).unwrap_or(false)
}

fn with_engine<R>(f: impl FnOnce(&EngineContext) -> R) -> Option<R> {
    let ctx = ENGINE.with(|engine| engine.borrow().clone())?;
    Some(f(&ctx))
}

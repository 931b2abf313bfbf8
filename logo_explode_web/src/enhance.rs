// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Re-running page scripts and enhancement hooks after a swap.

use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use js_sys::Function;
use logo_explode_core::hooks::REINVOKE_DELAY_MS;
use logo_explode_core::trace::{HookEvent, HookTrigger};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, HtmlScriptElement};

use crate::context::EngineContext;
use crate::dom;
use crate::error::{TransitionError, describe};

/// A fresh `<script>` with the attributes and text of `old`.
///
/// Scripts inserted through `innerHTML` or taken from a parsed document
/// never run; a newly created element does.
pub(crate) fn recreate_script(doc: &Document, old: &Element) -> Result<Element, TransitionError> {
    let fresh = doc.create_element("script").map_err(TransitionError::dom)?;
    for name in old.get_attribute_names().iter() {
        let Some(name) = name.as_string() else {
            continue;
        };
        if let Some(value) = old.get_attribute(&name) {
            fresh
                .set_attribute(&name, &value)
                .map_err(TransitionError::dom)?;
        }
    }
    fresh.set_text_content(old.text_content().as_deref());
    Ok(fresh)
}

/// Replaces every script under `root` with a fresh copy so it executes.
///
/// Returns the number of scripts replaced.
pub(crate) fn rerun_scripts(
    ctx: &Rc<EngineContext>,
    doc: &Document,
    root: &Element,
) -> Result<usize, TransitionError> {
    let scripts = dom::query_all(root, "script");
    for old in &scripts {
        let fresh = recreate_script(doc, old)?;
        watch(ctx, &fresh);
        old.replace_with_with_node_1(&fresh)
            .map_err(TransitionError::dom)?;
    }
    Ok(scripts.len())
}

/// Arms the load and delayed triggers of hooks matching `script`'s URL.
pub(crate) fn watch(ctx: &Rc<EngineContext>, script: &Element) {
    let Some(src) = script
        .dyn_ref::<HtmlScriptElement>()
        .map(HtmlScriptElement::src)
        .filter(|src| !src.is_empty())
    else {
        return;
    };
    if ctx.hooks().borrow().matching(&src).next().is_none() {
        return;
    }
    let weak = Rc::downgrade(ctx);
    let on_load = {
        let weak = weak.clone();
        let src = src.clone();
        move |_: &web_sys::Event| {
            if let Some(ctx) = weak.upgrade() {
                run_matching(&ctx, &src, HookTrigger::ScriptLoad);
            }
        }
    };
    EventListener::once(script, "load", on_load).forget();
    // Covers scripts that were already cached and loaded before the listener
    // attached.
    Timeout::new(REINVOKE_DELAY_MS, move || {
        if let Some(ctx) = weak.upgrade() {
            run_matching(&ctx, &src, HookTrigger::Delayed);
        }
    })
    .forget();
}

/// Invokes every registered hook.
pub(crate) fn run_all(ctx: &EngineContext) {
    let hooks: Vec<_> = ctx
        .hooks()
        .borrow()
        .iter()
        .map(|h| (h.name.clone(), h.callback.clone()))
        .collect();
    invoke(ctx, hooks, HookTrigger::Swap);
}

fn run_matching(ctx: &EngineContext, script_url: &str, trigger: HookTrigger) {
    let hooks: Vec<_> = ctx
        .hooks()
        .borrow()
        .matching(script_url)
        .map(|h| (h.name.clone(), h.callback.clone()))
        .collect();
    invoke(ctx, hooks, trigger);
}

// The registry is not borrowed while callbacks run; a hook may register
// another hook.
fn invoke(ctx: &EngineContext, hooks: Vec<(String, Function)>, trigger: HookTrigger) {
    for (name, callback) in hooks {
        ctx.trace(|t| {
            t.hook(&HookEvent {
                name: &name,
                trigger,
            });
        });
        if let Err(err) = callback.call0(&JsValue::NULL) {
            console::warn!(format!(
                "logo-explode: hook {name} failed: {}",
                describe(&err)
            ));
        }
    }
}

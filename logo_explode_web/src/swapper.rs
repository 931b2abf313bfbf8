// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replacing the current page with a fetched one.

use std::rc::Rc;

use gloo::timers::callback::Timeout;
use js_sys::{Object, Reflect};
use logo_explode_core::head::{HeadEntries, HeadPlan, StyleAction};
use logo_explode_core::scroll::{ScrollPlan, ScrollTarget, fragment_of, fragment_offset};
use logo_explode_core::trace::SwapEvent;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Event, Url, Window};

use crate::context::EngineContext;
use crate::dom;
use crate::enhance;
use crate::error::TransitionError;
use crate::history;
use crate::interceptor;

/// Event dispatched on `document` after every swap.
pub const SWAPPED_EVENT: &str = "logo-explode:swapped";

/// Fixed site headers that a fragment target must clear.
const HEADER_SELECTORS: [&str; 3] = ["header", ".site-header", "#masthead"];

/// Swaps `incoming` into the live document for session `id`.
///
/// `overlay` is detached while the body is replaced and re-attached after.
pub(crate) fn swap(
    ctx: &Rc<EngineContext>,
    incoming: &Document,
    url: &str,
    id: &str,
    overlay: Option<&Element>,
) -> Result<(), TransitionError> {
    let window = dom::window()?;
    let doc = dom::document()?;
    let body = doc.body().ok_or_else(|| TransitionError::missing("body"))?;
    let new_body = incoming
        .body()
        .ok_or_else(|| TransitionError::missing("destination body"))?;

    let fragment = fragment_of(url).map(decode_fragment);
    let plan = ScrollPlan::choose(fragment.as_deref(), ctx.config().force_scroll_top, |frag| {
        incoming.get_element_by_id(frag).is_some()
    });
    if plan.before_swap {
        window.scroll_to_with_x_and_y(0.0, 0.0);
    }

    history::push(&window, url, id)?;
    ctx.mark_swapped();
    doc.set_title(&incoming.title());
    body.set_class_name(&new_body.class_name());
    let base = absolute(&window, url);
    let merged = merge_head(ctx, &doc, incoming, &base)?;

    if let Some(overlay) = overlay {
        overlay.remove();
    }
    body.set_inner_html(&new_body.inner_html());
    if let Some(overlay) = overlay {
        body.append_child(overlay).map_err(TransitionError::dom)?;
    }
    let scripts_rerun = enhance::rerun_scripts(ctx, &doc, &body)?;

    apply_scroll(&window, &doc, &plan.target);
    for delay in plan.checkpoints {
        let target = plan.target.clone();
        Timeout::new(delay, move || {
            if let (Ok(window), Ok(doc)) = (dom::window(), dom::document()) {
                apply_scroll(&window, &doc, &target);
            }
        })
        .forget();
    }

    interceptor::bind(ctx);
    signal(&window, &doc, id);
    enhance::run_all(ctx);

    ctx.trace(|t| {
        t.swap(&SwapEvent {
            id,
            url,
            stylesheets_added: merged.stylesheets.len(),
            styles_updated: merged.styles.len(),
            scripts_added: merged.scripts.len(),
            scripts_rerun,
        });
    });
    Ok(())
}

/// `url` resolved against the current location.
fn absolute(window: &Window, url: &str) -> String {
    let here = window.location().href().unwrap_or_default();
    Url::new_with_base(url, &here).map_or_else(|_| url.to_owned(), |u| u.href())
}

/// Percent-decodes a URL fragment, keeping it as is when it is malformed.
pub(crate) fn decode_fragment(raw: &str) -> String {
    js_sys::decode_uri_component(raw).map_or_else(|_| raw.to_owned(), String::from)
}

/// Resolves `value` against `base`, or returns it unchanged.
fn resolve(value: &str, base: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    Url::new_with_base(value, base).map_or_else(|_| value.to_owned(), |u| u.href())
}

struct HeadNodes {
    stylesheets: Vec<Element>,
    styles: Vec<Element>,
    scripts: Vec<Element>,
    entries: HeadEntries,
}

fn head_nodes(doc: &Document, base: &str) -> HeadNodes {
    let Some(head) = doc.head() else {
        return HeadNodes {
            stylesheets: Vec::new(),
            styles: Vec::new(),
            scripts: Vec::new(),
            entries: HeadEntries::default(),
        };
    };
    let url_of = |el: &Element, attr: &str| resolve(&el.get_attribute(attr).unwrap_or_default(), base);
    let stylesheets = dom::query_all(&head, "link[rel~=\"stylesheet\"][href]");
    let styles = dom::query_all(&head, "style[id]");
    let scripts = dom::query_all(&head, "script[src]");
    let entries = HeadEntries {
        stylesheets: stylesheets.iter().map(|el| url_of(el, "href")).collect(),
        styles: styles.iter().map(Element::id).collect(),
        scripts: scripts.iter().map(|el| url_of(el, "src")).collect(),
    };
    HeadNodes {
        stylesheets,
        styles,
        scripts,
        entries,
    }
}

fn merge_head(
    ctx: &Rc<EngineContext>,
    doc: &Document,
    incoming: &Document,
    base: &str,
) -> Result<HeadPlan, TransitionError> {
    let head = doc.head().ok_or_else(|| TransitionError::missing("head"))?;
    let here = doc.url().unwrap_or_default();
    let existing = head_nodes(doc, &here);
    let arriving = head_nodes(incoming, base);
    let plan = HeadPlan::reconcile(&existing.entries, &arriving.entries);

    for &n in &plan.stylesheets {
        let link = import(doc, &arriving.stylesheets[n])?;
        if let Some(href) = arriving.entries.stylesheets.get(n) {
            let _ = link.set_attribute("href", href);
        }
        head.append_child(&link).map_err(TransitionError::dom)?;
    }
    for action in &plan.styles {
        match *action {
            StyleAction::Replace(n) => {
                let style = import(doc, &arriving.styles[n])?;
                let id = &arriving.entries.styles[n];
                if let Some(old) = existing.styles.iter().find(|el| el.id() == *id) {
                    old.replace_with_with_node_1(&style)
                        .map_err(TransitionError::dom)?;
                }
            }
            StyleAction::Append(n) => {
                let style = import(doc, &arriving.styles[n])?;
                head.append_child(&style).map_err(TransitionError::dom)?;
            }
        }
    }
    for &n in &plan.scripts {
        let script = enhance::recreate_script(doc, &arriving.scripts[n])?;
        if let Some(src) = arriving.entries.scripts.get(n) {
            let _ = script.set_attribute("src", src);
        }
        enhance::watch(ctx, &script);
        head.append_child(&script).map_err(TransitionError::dom)?;
    }
    Ok(plan)
}

fn import(doc: &Document, el: &Element) -> Result<Element, TransitionError> {
    doc.import_node_with_deep(el, true)
        .map_err(TransitionError::dom)?
        .dyn_into()
        .map_err(|_| TransitionError::missing("imported element"))
}

fn apply_scroll(window: &Window, doc: &Document, target: &ScrollTarget) {
    match target {
        ScrollTarget::Top => window.scroll_to_with_x_and_y(0.0, 0.0),
        ScrollTarget::Fragment(id) => {
            let Some(el) = doc.get_element_by_id(id) else {
                window.scroll_to_with_x_and_y(0.0, 0.0);
                return;
            };
            let top = el.get_bounding_client_rect().top();
            let scroll_y = window.scroll_y().unwrap_or(0.0);
            let y = fragment_offset(top, scroll_y, fixed_header_height(window, doc));
            window.scroll_to_with_x_and_y(0.0, y);
        }
    }
}

fn fixed_header_height(window: &Window, doc: &Document) -> f64 {
    HEADER_SELECTORS
        .iter()
        .filter_map(|sel| doc.query_selector(sel).ok().flatten())
        .find(|el| {
            window
                .get_computed_style(el)
                .ok()
                .flatten()
                .and_then(|s| s.get_property_value("position").ok())
                .is_some_and(|p| p == "fixed" || p == "sticky")
        })
        .map_or(0.0, |el| el.get_bounding_client_rect().height())
}

/// Tells page scripts that a new page is in place.
fn signal(window: &Window, doc: &Document, id: &str) {
    if let Ok(resize) = Event::new("resize") {
        let _ = window.dispatch_event(&resize);
    }
    if let Ok(ready) = Event::new("DOMContentLoaded") {
        let _ = doc.dispatch_event(&ready);
    }
    if let Ok(load) = Event::new("load") {
        let _ = window.dispatch_event(&load);
    }
    let detail = Object::new();
    let _ = Reflect::set(&detail, &JsValue::from_str("transitionId"), &JsValue::from_str(id));
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    if let Ok(swapped) = CustomEvent::new_with_event_init_dict(SWAPPED_EVENT, &init) {
        let _ = doc.dispatch_event(&swapped);
    }
}

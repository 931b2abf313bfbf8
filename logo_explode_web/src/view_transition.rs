// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View Transitions, where the browser has them.
//!
//! When `document.startViewTransition` exists, the page update runs inside
//! its update callback so the browser cross-fades old and new content under
//! the overlay. Otherwise the update simply runs.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::Document;

use crate::error::TransitionError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Document)]
    type TransitionDocument;

    #[wasm_bindgen(method, catch, js_name = "startViewTransition")]
    fn start_view_transition(
        this: &TransitionDocument,
        update: &Function,
    ) -> Result<ViewTransition, JsValue>;

    type ViewTransition;

    #[wasm_bindgen(method, getter, js_name = "updateCallbackDone")]
    fn update_callback_done(this: &ViewTransition) -> Promise;

    #[wasm_bindgen(method, getter)]
    fn ready(this: &ViewTransition) -> Promise;
}

/// Returns `true` if `doc` supports `startViewTransition`.
pub(crate) fn supported(doc: &Document) -> bool {
    Reflect::get(doc, &JsValue::from_str("startViewTransition")).is_ok_and(|f| f.is_function())
}

/// Runs `update`, inside a view transition when available.
pub(crate) async fn run<T, F>(doc: &Document, update: F) -> Result<T, TransitionError>
where
    T: 'static,
    F: Future<Output = T> + 'static,
{
    if !supported(doc) {
        return Ok(update.await);
    }
    let slot: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));
    let filled = Rc::clone(&slot);
    let callback = Closure::once_into_js(move || {
        future_to_promise(async move {
            let value = update.await;
            *filled.borrow_mut() = Some(value);
            Ok(JsValue::UNDEFINED)
        })
    });
    let transition = doc
        .unchecked_ref::<TransitionDocument>()
        .start_view_transition(callback.unchecked_ref())
        .map_err(TransitionError::dom)?;
    // Both reject when the transition is skipped; the update still ran.
    let _ = JsFuture::from(transition.update_callback_done()).await;
    let _ = JsFuture::from(transition.ready()).await;
    let value = slot.borrow_mut().take();
    value.ok_or_else(|| TransitionError::Dom("view transition dropped the page update".into()))
}

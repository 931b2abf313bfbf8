// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame pacing.
//!
//! Every animation step ends by waiting for the next
//! `requestAnimationFrame` callback so that committed inline styles are laid
//! out before the next measurement.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

// Direct global bindings instead of `web_sys::Window` methods. Avoids
// fetching (and unwrapping) the Window/Performance objects on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;
}

/// Milliseconds since the page's time origin.
#[must_use]
pub(crate) fn now_ms() -> f64 {
    performance_now()
}

/// Resolves on the next animation frame.
pub(crate) async fn next_frame() {
    let promise = Promise::new(&mut |resolve, _reject| {
        request_animation_frame(&resolve);
    });
    // The resolve callback never rejects.
    let _ = JsFuture::from(promise).await;
}

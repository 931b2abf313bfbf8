// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web Animations.
//!
//! Each animation runs with `fill: forwards`, is awaited, has its end state
//! committed to inline style, and is then cancelled so the inline style is
//! what remains. One animation frame passes before the future resolves.
//! A zero duration skips the animation and just applies the end state.

use js_sys::{Array, Object, Promise, Reflect};
use kurbo::Rect;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

use crate::dom;
use crate::error::TransitionError;
use crate::frame::next_frame;

/// Easing of the outward animation.
pub(crate) const EASE_EXPAND: &str = "cubic-bezier(0.2, 0.9, 0.2, 1)";
/// Easing of the inward animation.
pub(crate) const EASE_SHRINK: &str = "cubic-bezier(0.2, 0, 0.2, 1)";

#[wasm_bindgen]
extern "C" {
    /// Any element, viewed through `Element.animate`.
    #[wasm_bindgen(extends = Element)]
    type Animatable;

    #[wasm_bindgen(method, catch)]
    fn animate(
        this: &Animatable,
        keyframes: &JsValue,
        options: &JsValue,
    ) -> Result<RunningAnimation, JsValue>;

    type RunningAnimation;

    #[wasm_bindgen(method, getter)]
    fn finished(this: &RunningAnimation) -> Promise;

    #[wasm_bindgen(method, catch, js_name = "commitStyles")]
    fn commit_styles(this: &RunningAnimation) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn cancel(this: &RunningAnimation);
}

/// Moves `el` from `from` to `to` over `duration_ms`.
pub(crate) async fn animate_frame(
    el: &Element,
    from: Rect,
    to: Rect,
    duration_ms: u32,
    easing: &str,
) -> Result<(), TransitionError> {
    if duration_ms > 0 {
        let keyframes = Array::of2(&frame_keyframe(from)?.into(), &frame_keyframe(to)?.into());
        run(el, &keyframes, duration_ms, easing).await?;
    }
    // Also covers the commit when the element is not rendered.
    dom::place(el, to);
    next_frame().await;
    Ok(())
}

/// Fades `el` to transparent over `duration_ms`.
pub(crate) async fn fade_out(el: &Element, duration_ms: u32) -> Result<(), TransitionError> {
    if duration_ms > 0 {
        let keyframes = Array::of2(
            &object(&[("opacity", "1".into())])?.into(),
            &object(&[("opacity", "0".into())])?.into(),
        );
        run(el, &keyframes, duration_ms, "ease").await?;
    }
    dom::set_styles(el, &[("opacity", "0")]);
    next_frame().await;
    Ok(())
}

async fn run(
    el: &Element,
    keyframes: &Array,
    duration_ms: u32,
    easing: &str,
) -> Result<(), TransitionError> {
    let options = object(&[
        ("duration", f64::from(duration_ms).into()),
        ("easing", easing.into()),
        ("fill", "forwards".into()),
    ])?;
    let animation = el
        .unchecked_ref::<Animatable>()
        .animate(keyframes, &options)
        .map_err(TransitionError::dom)?;
    // A cancelled animation rejects `finished`; the end state is applied
    // either way.
    let _ = JsFuture::from(animation.finished()).await;
    let _ = animation.commit_styles();
    animation.cancel();
    Ok(())
}

fn frame_keyframe(rect: Rect) -> Result<Object, TransitionError> {
    let [left, top, width, height] = dom::css_frame(rect);
    object(&[
        ("left", left.into()),
        ("top", top.into()),
        ("width", width.into()),
        ("height", height.into()),
    ])
}

fn object(props: &[(&str, JsValue)]) -> Result<Object, TransitionError> {
    let obj = Object::new();
    for (key, value) in props {
        Reflect::set(&obj, &JsValue::from_str(key), value).map_err(TransitionError::dom)?;
    }
    Ok(obj)
}

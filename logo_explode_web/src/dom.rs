// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small DOM helpers shared by the engine.

use kurbo::Rect;
use logo_explode_core::marker::AttributeSource;
use wasm_bindgen::JsCast as _;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, SvgElement, Window};

use crate::error::TransitionError;

/// Reads marker attributes straight off an element.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ElementAttrs<'a>(pub(crate) &'a Element);

impl AttributeSource for ElementAttrs<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

pub(crate) fn window() -> Result<Window, TransitionError> {
    web_sys::window().ok_or_else(|| TransitionError::missing("window"))
}

pub(crate) fn document() -> Result<Document, TransitionError> {
    window()?
        .document()
        .ok_or_else(|| TransitionError::missing("document"))
}

/// Inline style of an HTML or SVG element.
pub(crate) fn inline_style(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    el.dyn_ref::<SvgElement>().map(SvgElement::style)
}

/// Sets several inline properties, ignoring elements without inline style.
pub(crate) fn set_styles(el: &Element, props: &[(&str, &str)]) {
    if let Some(s) = inline_style(el) {
        for (name, value) in props {
            let _ = s.set_property(name, value);
        }
    }
}

/// Positions `el` at `rect` with `left`/`top`/`width`/`height`.
pub(crate) fn place(el: &Element, rect: Rect) {
    let frame = css_frame(rect);
    set_styles(
        el,
        &[
            ("left", frame[0].as_str()),
            ("top", frame[1].as_str()),
            ("width", frame[2].as_str()),
            ("height", frame[3].as_str()),
        ],
    );
}

/// `left`, `top`, `width`, `height` of `rect` as CSS pixel lengths.
pub(crate) fn css_frame(rect: Rect) -> [String; 4] {
    [
        format!("{}px", rect.x0),
        format!("{}px", rect.y0),
        format!("{}px", rect.width()),
        format!("{}px", rect.height()),
    ]
}

/// All elements under `root` matching `selector`, in document order.
pub(crate) fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    query_list(root.query_selector_all(selector))
}

/// All elements in `doc` matching `selector`, in document order.
pub(crate) fn query_doc(doc: &Document, selector: &str) -> Vec<Element> {
    query_list(doc.query_selector_all(selector))
}

fn query_list(list: Result<web_sys::NodeList, wasm_bindgen::JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// The element that visually represents a marker wrapper: its first `<svg>`,
/// else its first `<img>`, else the wrapper itself.
pub(crate) fn animatable(wrapper: &Element) -> Element {
    ["svg", "img"]
        .iter()
        .find_map(|sel| wrapper.query_selector(sel).ok().flatten())
        .unwrap_or_else(|| wrapper.clone())
}

/// The nested `<svg>` of an icon grid, if `el` is an `<svg>` containing one.
pub(crate) fn icon_inner(el: &Element) -> Option<Element> {
    if !el.local_name().eq_ignore_ascii_case("svg") {
        return None;
    }
    el.query_selector("svg").ok().flatten()
}

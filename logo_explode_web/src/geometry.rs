// Copyright 2026 the Logo Explode Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measuring elements.
//!
//! The browser reports the layout box of an element, which is not always
//! where its pixels are: an `<svg>` letterboxes its viewBox and may draw only
//! part of it, and a `contain`-fitted `<img>` letterboxes its bitmap. This
//! module gathers what the DOM knows into a [`VisualBox`] and lets the core
//! resolve it.

use kurbo::{Rect, Size};
use logo_explode_core::geometry::{AspectAlign, VisualBox, parse_view_box};
use wasm_bindgen::JsCast as _;
use web_sys::{Element, HtmlImageElement, SvgGraphicsElement};

use crate::dom;

/// The visually-accurate viewport rectangle of `el`.
#[must_use]
pub fn resolve_rect(el: &Element) -> Rect {
    measure(el).resolve()
}

/// The visible rectangle of an icon drawn by the nested `<svg>` `inner`:
/// its content box, mapped through its viewBox.
pub(crate) fn resolve_icon_rect(inner: &Element) -> Rect {
    vector_box(inner, bounds(inner)).resolve()
}

/// Content bounding box of an SVG element in its own user units.
pub(crate) fn content_box(el: &Element) -> Option<Rect> {
    let graphics = el.dyn_ref::<SvgGraphicsElement>()?;
    // getBBox throws for elements that are not rendered.
    let b = graphics.get_b_box().ok()?;
    let rect = Rect::new(
        f64::from(b.x()),
        f64::from(b.y()),
        f64::from(b.x() + b.width()),
        f64::from(b.y() + b.height()),
    );
    Some(rect)
}

fn measure(el: &Element) -> VisualBox {
    let bounds = bounds(el);
    if el.local_name().eq_ignore_ascii_case("svg") {
        return vector_box(el, bounds);
    }
    if let Some(img) = el.dyn_ref::<HtmlImageElement>() {
        let natural = Size::new(
            f64::from(img.natural_width()),
            f64::from(img.natural_height()),
        );
        if natural.width > 0.0 && natural.height > 0.0 {
            return VisualBox::Raster {
                bounds,
                natural,
                contain: object_fit_contains(el),
            };
        }
    }
    VisualBox::Plain(bounds)
}

fn vector_box(el: &Element, bounds: Rect) -> VisualBox {
    VisualBox::Vector {
        bounds,
        view_box: el
            .get_attribute("viewBox")
            .as_deref()
            .and_then(parse_view_box),
        content: content_box(el),
        align: el
            .get_attribute("preserveAspectRatio")
            .as_deref()
            .map_or(AspectAlign::CENTERED, AspectAlign::parse),
    }
}

fn bounds(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

fn object_fit_contains(el: &Element) -> bool {
    let Ok(window) = dom::window() else {
        return false;
    };
    let Ok(Some(style)) = window.get_computed_style(el) else {
        return false;
    };
    let fit = style.get_property_value("object-fit").unwrap_or_default();
    matches!(fit.trim(), "contain" | "scale-down")
}
